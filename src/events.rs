// Session event stream
//
// Batched event sets delivered by the target; the embedder's transport
// feeds these into the router's channel

use crate::descriptor::{ClassDescriptor, Location, ThreadId};
use crate::engine::{SubscriptionHandle, SuspendPolicy};
use serde::{Deserialize, Serialize};

/// Composite event delivery (can contain multiple events)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSet {
    pub suspend_policy: SuspendPolicy,
    pub events: Vec<DebugEvent>,
}

/// Single event within an event set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DebugEvent {
    ClassPrepare {
        thread: ThreadId,
        class: ClassDescriptor,
    },
    ClassUnload {
        class_name: String,
    },
    ThreadStart {
        thread: ThreadId,
    },
    ThreadDeath {
        thread: ThreadId,
    },
    Breakpoint {
        subscription: SubscriptionHandle,
        thread: ThreadId,
        location: Location,
    },
    Watchpoint {
        subscription: SubscriptionHandle,
        thread: ThreadId,
        field: String,
    },
    ExceptionThrown {
        subscription: SubscriptionHandle,
        thread: ThreadId,
        location: Option<Location>,
        caught: bool,
    },
    VmDisconnect,
}

impl DebugEvent {
    /// Whether this event should leave the target interrupted
    /// (breakpoint-like, watchpoint-like, and exception events)
    pub fn wants_interrupt(&self) -> bool {
        matches!(
            self,
            DebugEvent::Breakpoint { .. }
                | DebugEvent::Watchpoint { .. }
                | DebugEvent::ExceptionThrown { .. }
        )
    }
}

impl EventSet {
    /// Convenience constructor for a single-event set
    pub fn single(suspend_policy: SuspendPolicy, event: DebugEvent) -> Self {
        Self {
            suspend_policy,
            events: vec![event],
        }
    }
}
