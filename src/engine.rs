// Collaborator engine interface
//
// The narrow capability surface this core needs from the VM
// inspection/control API; the embedding process supplies the impl

use crate::descriptor::{ClassDescriptor, FieldDescriptor, Location};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque token for a live, engine-side event registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle(pub i32);

/// Suspend policy attached to an event subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuspendPolicy {
    None,
    EventThread,
    All,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("target disconnected")]
    Disconnected,

    #[error("engine error: {0}")]
    Failed(String),
}

/// Capability interface into the collaborator engine
///
/// Subscriptions created through this trait are enabled immediately;
/// there is no separate enable step. Calls may block on the target.
pub trait EngineSession: Send + Sync {
    /// Snapshot of every currently loaded reference type
    fn all_loaded_classes(&self) -> Vec<ClassDescriptor>;

    fn create_line_breakpoint(&self, location: &Location)
        -> Result<SubscriptionHandle, EngineError>;

    fn create_method_breakpoint(&self, location: &Location)
        -> Result<SubscriptionHandle, EngineError>;

    /// Exception subscription; None class means a catch-all
    fn create_exception_subscription(
        &self,
        class: Option<&ClassDescriptor>,
        notify_caught: bool,
        notify_uncaught: bool,
        suspend_policy: SuspendPolicy,
    ) -> Result<SubscriptionHandle, EngineError>;

    fn create_field_access_subscription(
        &self,
        class: &ClassDescriptor,
        field: &FieldDescriptor,
    ) -> Result<SubscriptionHandle, EngineError>;

    fn create_field_modification_subscription(
        &self,
        class: &ClassDescriptor,
        field: &FieldDescriptor,
    ) -> Result<SubscriptionHandle, EngineError>;

    fn create_class_prepare_subscription(&self, suspend_policy: SuspendPolicy)
        -> Result<SubscriptionHandle, EngineError>;

    fn create_class_unload_subscription(&self, suspend_policy: SuspendPolicy)
        -> Result<SubscriptionHandle, EngineError>;

    fn create_thread_start_subscription(&self, suspend_policy: SuspendPolicy)
        -> Result<SubscriptionHandle, EngineError>;

    fn create_thread_death_subscription(&self, suspend_policy: SuspendPolicy)
        -> Result<SubscriptionHandle, EngineError>;

    /// Tear down a live subscription
    fn delete_subscription(&self, handle: SubscriptionHandle) -> Result<(), EngineError>;

    /// Resume the whole target
    fn resume(&self) -> Result<(), EngineError>;
}
