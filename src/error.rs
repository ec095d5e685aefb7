// Resolution error taxonomy
//
// Every variant is a per-spec, resolution-time condition; none is
// process-fatal. They stop at the registry boundary as an Erroneous
// status transition plus an error notification.

use crate::engine::EngineError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolutionError {
    /// Pattern matched an interface or array where only classes are valid
    #[error("{class_name} is not a class type")]
    InvalidReferenceTypeKind { class_name: String },

    #[error("no field {field} in {class_name}")]
    NoSuchField { field: String, class_name: String },

    /// No executable code at the requested line, or line info absent
    #[error("no executable code at {location}")]
    NoLineInfo { location: String },

    #[error("{name} is not a valid member name")]
    MalformedMemberName { name: String },

    #[error("method {method} is overloaded in {class_name}; specify arguments")]
    AmbiguousMethod { method: String, class_name: String },

    #[error("no method {method} in {class_name}")]
    NoSuchMethod { method: String, class_name: String },

    /// An operation requiring an active target was attempted with none
    #[error("no target session available")]
    SessionUnavailable,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
