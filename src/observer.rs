// Observer contracts
//
// Per-kind, per-transition callbacks keep "a line breakpoint resolved"
// and "a watchpoint resolved" distinguishable at compile time for UI
// layers, without downcasting. Every method defaults to a no-op.

use crate::error::ResolutionError;
use crate::events::EventSet;
use crate::spec::{RequestSpec, SpecKind};

/// Lifecycle transitions a spec reports through its observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecTransition {
    Set,
    Deferred,
    Resolved,
    Deleted,
    Error,
}

/// Spec lifecycle observer
///
/// Invoked synchronously from the router task (resolution passes) or the
/// installing task (install-time transitions), always outside the
/// registry lock.
#[allow(unused_variables)]
pub trait SpecObserver: Send + Sync {
    fn line_breakpoint_set(&self, spec: &RequestSpec) {}
    fn line_breakpoint_deferred(&self, spec: &RequestSpec) {}
    fn line_breakpoint_resolved(&self, spec: &RequestSpec) {}
    fn line_breakpoint_deleted(&self, spec: &RequestSpec) {}
    fn line_breakpoint_error(&self, spec: &RequestSpec, error: &ResolutionError) {}

    fn method_breakpoint_set(&self, spec: &RequestSpec) {}
    fn method_breakpoint_deferred(&self, spec: &RequestSpec) {}
    fn method_breakpoint_resolved(&self, spec: &RequestSpec) {}
    fn method_breakpoint_deleted(&self, spec: &RequestSpec) {}
    fn method_breakpoint_error(&self, spec: &RequestSpec, error: &ResolutionError) {}

    fn exception_intercept_set(&self, spec: &RequestSpec) {}
    fn exception_intercept_deferred(&self, spec: &RequestSpec) {}
    fn exception_intercept_resolved(&self, spec: &RequestSpec) {}
    fn exception_intercept_deleted(&self, spec: &RequestSpec) {}
    fn exception_intercept_error(&self, spec: &RequestSpec, error: &ResolutionError) {}

    fn access_watchpoint_set(&self, spec: &RequestSpec) {}
    fn access_watchpoint_deferred(&self, spec: &RequestSpec) {}
    fn access_watchpoint_resolved(&self, spec: &RequestSpec) {}
    fn access_watchpoint_deleted(&self, spec: &RequestSpec) {}
    fn access_watchpoint_error(&self, spec: &RequestSpec, error: &ResolutionError) {}

    fn modification_watchpoint_set(&self, spec: &RequestSpec) {}
    fn modification_watchpoint_deferred(&self, spec: &RequestSpec) {}
    fn modification_watchpoint_resolved(&self, spec: &RequestSpec) {}
    fn modification_watchpoint_deleted(&self, spec: &RequestSpec) {}
    fn modification_watchpoint_error(&self, spec: &RequestSpec, error: &ResolutionError) {}
}

/// Raw event-set observer, notified after the internal resolution pass
pub trait EventObserver: Send + Sync {
    fn event_set_received(&self, set: &EventSet);
}

/// Route a transition to the kind-specific observer callback
pub(crate) fn dispatch(
    observer: &dyn SpecObserver,
    spec: &RequestSpec,
    transition: SpecTransition,
    error: Option<&ResolutionError>,
) {
    use SpecTransition::*;

    match (spec.kind(), transition) {
        (SpecKind::LineBreakpoint { .. }, Set) => observer.line_breakpoint_set(spec),
        (SpecKind::LineBreakpoint { .. }, Deferred) => observer.line_breakpoint_deferred(spec),
        (SpecKind::LineBreakpoint { .. }, Resolved) => observer.line_breakpoint_resolved(spec),
        (SpecKind::LineBreakpoint { .. }, Deleted) => observer.line_breakpoint_deleted(spec),
        (SpecKind::LineBreakpoint { .. }, Error) => {
            if let Some(e) = error {
                observer.line_breakpoint_error(spec, e);
            }
        }

        (SpecKind::MethodBreakpoint { .. }, Set) => observer.method_breakpoint_set(spec),
        (SpecKind::MethodBreakpoint { .. }, Deferred) => observer.method_breakpoint_deferred(spec),
        (SpecKind::MethodBreakpoint { .. }, Resolved) => observer.method_breakpoint_resolved(spec),
        (SpecKind::MethodBreakpoint { .. }, Deleted) => observer.method_breakpoint_deleted(spec),
        (SpecKind::MethodBreakpoint { .. }, Error) => {
            if let Some(e) = error {
                observer.method_breakpoint_error(spec, e);
            }
        }

        (SpecKind::ExceptionIntercept { .. }, Set) => observer.exception_intercept_set(spec),
        (SpecKind::ExceptionIntercept { .. }, Deferred) => {
            observer.exception_intercept_deferred(spec);
        }
        (SpecKind::ExceptionIntercept { .. }, Resolved) => {
            observer.exception_intercept_resolved(spec);
        }
        (SpecKind::ExceptionIntercept { .. }, Deleted) => observer.exception_intercept_deleted(spec),
        (SpecKind::ExceptionIntercept { .. }, Error) => {
            if let Some(e) = error {
                observer.exception_intercept_error(spec, e);
            }
        }

        (SpecKind::AccessWatchpoint { .. }, Set) => observer.access_watchpoint_set(spec),
        (SpecKind::AccessWatchpoint { .. }, Deferred) => observer.access_watchpoint_deferred(spec),
        (SpecKind::AccessWatchpoint { .. }, Resolved) => observer.access_watchpoint_resolved(spec),
        (SpecKind::AccessWatchpoint { .. }, Deleted) => observer.access_watchpoint_deleted(spec),
        (SpecKind::AccessWatchpoint { .. }, Error) => {
            if let Some(e) = error {
                observer.access_watchpoint_error(spec, e);
            }
        }

        (SpecKind::ModificationWatchpoint { .. }, Set) => {
            observer.modification_watchpoint_set(spec);
        }
        (SpecKind::ModificationWatchpoint { .. }, Deferred) => {
            observer.modification_watchpoint_deferred(spec);
        }
        (SpecKind::ModificationWatchpoint { .. }, Resolved) => {
            observer.modification_watchpoint_resolved(spec);
        }
        (SpecKind::ModificationWatchpoint { .. }, Deleted) => {
            observer.modification_watchpoint_deleted(spec);
        }
        (SpecKind::ModificationWatchpoint { .. }, Error) => {
            if let Some(e) = error {
                observer.modification_watchpoint_error(spec, e);
            }
        }
    }
}
