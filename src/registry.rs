// Request spec registry
//
// Owns every spec for one session, drives resolution against newly
// loaded classes, and fans lifecycle notifications out to observers

use crate::descriptor::ClassDescriptor;
use crate::engine::{EngineSession, SubscriptionHandle};
use crate::error::ResolutionError;
use crate::observer::{dispatch, SpecObserver, SpecTransition};
use crate::pattern::ReferenceTypePattern;
use crate::spec::{RequestSpec, ResolveOutcome, SpecId, SpecKind, SpecStatus};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// The set of all request specs for one session
///
/// Created with a session and discarded with it. Specs may be installed
/// before the session starts; they stay deferred until it does.
pub struct RequestSpecRegistry {
    inner: Mutex<Inner>,
    next_id: AtomicU32,
}

struct Inner {
    /// Registration order is resolution order
    specs: Vec<RequestSpec>,
    /// Back-reference from live handles to owning specs, used when
    /// correlating incoming events to the spec that requested them
    by_handle: HashMap<SubscriptionHandle, SpecId>,
    session: Option<Arc<dyn EngineSession>>,
    observers: Vec<Arc<dyn SpecObserver>>,
}

/// A pending notification, dispatched after the registry lock is
/// released so observer callbacks may re-enter the registry
struct Notice {
    spec: RequestSpec,
    transition: SpecTransition,
}

impl Default for RequestSpecRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSpecRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                specs: Vec::new(),
                by_handle: HashMap::new(),
                session: None,
                observers: Vec::new(),
            }),
            next_id: AtomicU32::new(1),
        }
    }

    fn mint_id(&self) -> SpecId {
        SpecId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Create a line breakpoint spec; not yet installed
    pub fn create_line_breakpoint(
        &self,
        pattern: ReferenceTypePattern,
        line: u32,
    ) -> RequestSpec {
        RequestSpec::new(self.mint_id(), pattern, SpecKind::LineBreakpoint { line })
    }

    /// Create a method breakpoint spec; not yet installed
    pub fn create_method_breakpoint(
        &self,
        pattern: ReferenceTypePattern,
        method: impl Into<String>,
        argument_types: Option<Vec<String>>,
    ) -> RequestSpec {
        RequestSpec::new(
            self.mint_id(),
            pattern,
            SpecKind::MethodBreakpoint {
                method: method.into(),
                argument_types,
            },
        )
    }

    /// Create an exception intercept spec; not yet installed
    pub fn create_exception_intercept(
        &self,
        pattern: ReferenceTypePattern,
        notify_caught: bool,
        notify_uncaught: bool,
    ) -> RequestSpec {
        RequestSpec::new(
            self.mint_id(),
            pattern,
            SpecKind::ExceptionIntercept {
                notify_caught,
                notify_uncaught,
            },
        )
    }

    /// Create a field access watchpoint spec; not yet installed
    pub fn create_access_watchpoint(
        &self,
        pattern: ReferenceTypePattern,
        field: impl Into<String>,
    ) -> RequestSpec {
        RequestSpec::new(
            self.mint_id(),
            pattern,
            SpecKind::AccessWatchpoint {
                field: field.into(),
            },
        )
    }

    /// Create a field modification watchpoint spec; not yet installed
    pub fn create_modification_watchpoint(
        &self,
        pattern: ReferenceTypePattern,
        field: impl Into<String>,
    ) -> RequestSpec {
        RequestSpec::new(
            self.mint_id(),
            pattern,
            SpecKind::ModificationWatchpoint {
                field: field.into(),
            },
        )
    }

    pub async fn add_observer(&self, observer: Arc<dyn SpecObserver>) {
        self.inner.lock().await.observers.push(observer);
    }

    /// Add a spec to the registry and attempt immediate resolution
    ///
    /// With a session (passed explicitly or already attached) the spec
    /// resolves synchronously against the loaded classes or errors;
    /// without one it stays deferred until a session starts. An
    /// explicitly passed session becomes the current one when none is
    /// attached yet. Returns a snapshot of the installed spec.
    pub async fn install(
        &self,
        spec: RequestSpec,
        session: Option<&Arc<dyn EngineSession>>,
    ) -> RequestSpec {
        let (snapshot, notices, observers) = {
            let mut inner = self.inner.lock().await;
            let effective = session.cloned().or_else(|| inner.session.clone());

            // Remember an explicitly passed session so a later delete()
            // can still release the subscription this install creates
            if inner.session.is_none() {
                inner.session = effective.clone();
            }

            let mut spec = spec;
            let mut notices = vec![Notice {
                spec: spec.clone(),
                transition: SpecTransition::Set,
            }];

            let transition = match effective {
                Some(engine) => match spec.attempt_immediate_resolve(engine.as_ref()) {
                    ResolveOutcome::Resolved(handle) => {
                        info!("installed and resolved {}", spec);
                        inner.by_handle.insert(handle, spec.id());
                        SpecTransition::Resolved
                    }
                    ResolveOutcome::Erroneous(e) => {
                        warn!("installed spec failed to resolve: {}", e);
                        SpecTransition::Error
                    }
                    ResolveOutcome::Deferred => {
                        debug!("installed spec deferred");
                        SpecTransition::Deferred
                    }
                },
                None => {
                    debug!("no session, spec deferred");
                    SpecTransition::Deferred
                }
            };

            notices.push(Notice {
                spec: spec.clone(),
                transition,
            });
            let snapshot = spec.clone();
            inner.specs.push(spec);
            (snapshot, notices, inner.observers.clone())
        };

        fire(&notices, &observers);
        snapshot
    }

    /// Test every unresolved spec against a newly observed class
    ///
    /// Called once per class-prepare event from the router task; specs
    /// are tested in registration order, terminal specs are skipped.
    pub async fn resolve(&self, class: &ClassDescriptor) {
        let (notices, observers) = {
            let mut inner = self.inner.lock().await;
            let Some(session) = inner.session.clone() else {
                debug!("resolve pass without session, ignoring {}", class.name);
                return;
            };

            debug!("resolution pass for {}", class.name);
            let inner = &mut *inner;
            let mut notices = Vec::new();
            for spec in inner.specs.iter_mut() {
                match spec.attempt_resolve(session.as_ref(), class) {
                    Some(ResolveOutcome::Resolved(handle)) => {
                        info!("resolved {}", spec);
                        inner.by_handle.insert(handle, spec.id());
                        notices.push(Notice {
                            spec: spec.clone(),
                            transition: SpecTransition::Resolved,
                        });
                    }
                    Some(ResolveOutcome::Erroneous(e)) => {
                        warn!("spec failed to resolve against {}: {}", class.name, e);
                        notices.push(Notice {
                            spec: spec.clone(),
                            transition: SpecTransition::Error,
                        });
                    }
                    Some(ResolveOutcome::Deferred) | None => {}
                }
            }
            (notices, inner.observers.clone())
        };

        fire(&notices, &observers);
    }

    /// Attempt immediate resolution of every unresolved spec
    ///
    /// Errors with SessionUnavailable when no session is attached.
    pub async fn resolve_all(&self) -> Result<(), ResolutionError> {
        let (notices, observers) = {
            let mut inner = self.inner.lock().await;
            let session = inner
                .session
                .clone()
                .ok_or(ResolutionError::SessionUnavailable)?;
            (immediate_pass(&mut inner, &session), inner.observers.clone())
        };
        fire(&notices, &observers);
        Ok(())
    }

    /// Attach the active session and resolve everything resolvable
    pub async fn attach_session(&self, session: Arc<dyn EngineSession>) {
        let (notices, observers) = {
            let mut inner = self.inner.lock().await;
            inner.session = Some(session.clone());
            info!("session attached, resolving {} specs", inner.specs.len());
            (immediate_pass(&mut inner, &session), inner.observers.clone())
        };
        fire(&notices, &observers);
    }

    /// Drop the session; live handles die with the target
    pub async fn detach_session(&self) {
        let mut inner = self.inner.lock().await;
        inner.session = None;
        inner.by_handle.clear();
        info!("session detached");
    }

    /// Remove a spec, deleting its live subscription when resolved
    ///
    /// Safe at any status; returns false for an unknown id. The deleted
    /// notification fires regardless of prior state.
    pub async fn delete(&self, id: SpecId) -> bool {
        let (notice, observers) = {
            let mut inner = self.inner.lock().await;
            let Some(index) = inner.specs.iter().position(|s| s.id() == id) else {
                return false;
            };
            let spec = inner.specs.remove(index);

            if let SpecStatus::Resolved(handle) = spec.status() {
                inner.by_handle.remove(handle);
                if let Some(session) = &inner.session {
                    // Best effort: the subscription dies with the target
                    // anyway if this races a disconnect
                    if let Err(e) = session.delete_subscription(*handle) {
                        debug!("delete of live subscription failed: {}", e);
                    }
                }
            }

            info!("deleted {}", spec);
            (
                Notice {
                    spec,
                    transition: SpecTransition::Deleted,
                },
                inner.observers.clone(),
            )
        };

        fire(std::slice::from_ref(&notice), &observers);
        true
    }

    /// Defensive snapshot of every registered spec
    pub async fn list(&self) -> Vec<RequestSpec> {
        self.inner.lock().await.specs.clone()
    }

    /// Correlate a live subscription handle back to its owning spec
    pub async fn spec_for_handle(&self, handle: SubscriptionHandle) -> Option<RequestSpec> {
        let inner = self.inner.lock().await;
        let id = inner.by_handle.get(&handle)?;
        inner.specs.iter().find(|s| s.id() == *id).cloned()
    }

    /// First registered spec structurally equal to the given one
    ///
    /// Duplicate installation is not prevented automatically; callers
    /// use this to decide.
    pub async fn find_matching(&self, spec: &RequestSpec) -> Option<RequestSpec> {
        self.inner
            .lock()
            .await
            .specs
            .iter()
            .find(|s| *s == spec)
            .cloned()
    }
}

fn immediate_pass(inner: &mut Inner, session: &Arc<dyn EngineSession>) -> Vec<Notice> {
    let mut notices = Vec::new();
    let mut resolved = Vec::new();
    for spec in inner.specs.iter_mut() {
        if !spec.is_unresolved() {
            continue;
        }
        match spec.attempt_immediate_resolve(session.as_ref()) {
            ResolveOutcome::Resolved(handle) => {
                info!("resolved {}", spec);
                resolved.push((handle, spec.id()));
                notices.push(Notice {
                    spec: spec.clone(),
                    transition: SpecTransition::Resolved,
                });
            }
            ResolveOutcome::Erroneous(e) => {
                warn!("spec failed to resolve: {}", e);
                notices.push(Notice {
                    spec: spec.clone(),
                    transition: SpecTransition::Error,
                });
            }
            ResolveOutcome::Deferred => {}
        }
    }
    for (handle, id) in resolved {
        inner.by_handle.insert(handle, id);
    }
    notices
}

/// Dispatch notices to an observer snapshot, outside the registry lock
fn fire(notices: &[Notice], observers: &[Arc<dyn SpecObserver>]) {
    for notice in notices {
        let error = match notice.spec.status() {
            SpecStatus::Erroneous(e) => Some(e),
            _ => None,
        };
        for observer in observers {
            dispatch(observer.as_ref(), &notice.spec, notice.transition, error);
        }
    }
}
