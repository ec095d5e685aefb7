// Session event router
//
// Single task owning event delivery for one target session: classifies
// incoming event sets, drives registry resolution on class-prepare, and
// applies the suspend/resume policy around delivery

use crate::descriptor::ThreadId;
use crate::engine::{EngineError, EngineSession, SuspendPolicy};
use crate::events::{DebugEvent, EventSet};
use crate::observer::EventObserver;
use crate::registry::RequestSpecRegistry;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Target lifecycle, one-directional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Attached,
    Detached,
}

#[derive(Debug, Error)]
pub enum RouterError {
    /// A session was already started on this router (attached or ended)
    #[error("session already started")]
    SessionActive,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Consumes the live event stream from the target
///
/// The spawned task is the only caller of the registry's resolution
/// pass; install and delete may run concurrently from other tasks.
pub struct SessionEventRouter {
    registry: Arc<RequestSpecRegistry>,
    observers: Mutex<Vec<Arc<dyn EventObserver>>>,
    state: Mutex<SessionState>,
    interrupted: AtomicBool,
    threads: Mutex<HashSet<ThreadId>>,
}

impl SessionEventRouter {
    pub fn new(registry: Arc<RequestSpecRegistry>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            observers: Mutex::new(Vec::new()),
            state: Mutex::new(SessionState::NoSession),
            interrupted: AtomicBool::new(false),
            threads: Mutex::new(HashSet::new()),
        })
    }

    pub async fn add_observer(&self, observer: Arc<dyn EventObserver>) {
        self.observers.lock().await.push(observer);
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    /// Whether the last delivered event set left the target interrupted
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    /// Threads currently alive in the target, from start/death events
    pub async fn live_threads(&self) -> Vec<ThreadId> {
        self.threads.lock().await.iter().copied().collect()
    }

    /// Attach to a target and spawn the event task
    ///
    /// Installs the always-on subscriptions (class-prepare and the
    /// exception catch-all suspend the whole target, the rest do not),
    /// attaches the session to the registry, and starts consuming
    /// event sets from the channel.
    pub async fn start_session(
        self: &Arc<Self>,
        engine: Arc<dyn EngineSession>,
        events: mpsc::Receiver<EventSet>,
    ) -> Result<JoinHandle<()>, RouterError> {
        {
            let mut state = self.state.lock().await;
            if *state != SessionState::NoSession {
                return Err(RouterError::SessionActive);
            }

            engine.create_class_prepare_subscription(SuspendPolicy::All)?;
            engine.create_class_unload_subscription(SuspendPolicy::None)?;
            engine.create_thread_start_subscription(SuspendPolicy::None)?;
            engine.create_thread_death_subscription(SuspendPolicy::None)?;
            engine.create_exception_subscription(None, true, true, SuspendPolicy::All)?;

            *state = SessionState::Attached;
        }

        self.registry.attach_session(engine.clone()).await;
        info!("session attached, event task starting");

        let router = Arc::clone(self);
        Ok(tokio::spawn(router.event_task(engine, events)))
    }

    async fn event_task(
        self: Arc<Self>,
        engine: Arc<dyn EngineSession>,
        mut events: mpsc::Receiver<EventSet>,
    ) {
        loop {
            let Some(set) = events.recv().await else {
                warn!("event channel closed before disconnect");
                break;
            };
            if self.process_event_set(&engine, &set).await {
                break;
            }
        }

        self.threads.lock().await.clear();
        self.registry.detach_session().await;
        *self.state.lock().await = SessionState::Detached;
        info!("session detached, event task ended");
    }

    /// Deliver one event set; returns true on VM disconnect
    async fn process_event_set(&self, engine: &Arc<dyn EngineSession>, set: &EventSet) -> bool {
        debug!(
            "event set: {} events, suspend_policy={:?}",
            set.events.len(),
            set.suspend_policy
        );

        // An event only leaves the target interrupted if the set
        // actually suspended it
        let remain_interrupted = set.suspend_policy != SuspendPolicy::None
            && set.events.iter().any(DebugEvent::wants_interrupt);
        let mut disconnected = false;

        // Internal first pass: resolution and bookkeeping happen before
        // any external observer sees the set
        for event in &set.events {
            match event {
                DebugEvent::ClassPrepare { class, .. } => {
                    debug!("class prepared: {}", class.name);
                    self.registry.resolve(class).await;
                }
                DebugEvent::ClassUnload { class_name } => {
                    debug!("class unloaded: {}", class_name);
                }
                DebugEvent::ThreadStart { thread } => {
                    self.threads.lock().await.insert(*thread);
                }
                DebugEvent::ThreadDeath { thread } => {
                    self.threads.lock().await.remove(thread);
                }
                DebugEvent::Breakpoint { subscription, .. }
                | DebugEvent::Watchpoint { subscription, .. }
                | DebugEvent::ExceptionThrown { subscription, .. } => {
                    match self.registry.spec_for_handle(*subscription).await {
                        Some(spec) => info!("hit {}", spec),
                        None => debug!("event for unowned subscription {:?}", subscription),
                    }
                }
                DebugEvent::VmDisconnect => {
                    info!("target disconnected");
                    disconnected = true;
                }
            }
        }

        self.interrupted.store(remain_interrupted, Ordering::SeqCst);

        // Fan out to a snapshot of the observer list, outside the lock
        let observers = self.observers.lock().await.clone();
        for observer in &observers {
            observer.event_set_received(set);
        }

        if disconnected {
            return true;
        }

        if set.suspend_policy != SuspendPolicy::None && !remain_interrupted {
            // A resume racing a concurrent disconnect is swallowed; the
            // session is ending anyway
            match engine.resume() {
                Ok(()) => self.interrupted.store(false, Ordering::SeqCst),
                Err(e) => debug!("auto-resume failed: {}", e),
            }
        }

        false
    }
}
