// Deferred event-request resolution for debugger backends
//
// Users declare breakpoints, watchpoints, and exception intercepts
// against classes that may not be loaded yet; the registry resolves
// each declaration into a live engine subscription the moment a
// matching class shows up on the event stream:
// - RequestSpec: one pending-or-resolved declaration
// - RequestSpecRegistry: the set of specs for a session
// - SessionEventRouter: the event task driving resolution
// - EngineSession: capability interface the embedder supplies

pub mod descriptor;
pub mod engine;
pub mod error;
pub mod events;
pub mod observer;
pub mod pattern;
pub mod registry;
pub mod router;
pub mod spec;

pub use engine::{EngineError, EngineSession, SubscriptionHandle, SuspendPolicy};
pub use error::ResolutionError;
pub use observer::{EventObserver, SpecObserver};
pub use pattern::ReferenceTypePattern;
pub use registry::RequestSpecRegistry;
pub use router::{RouterError, SessionEventRouter, SessionState};
pub use spec::{RequestSpec, SpecId, SpecKind, SpecStatus};
