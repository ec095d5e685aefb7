// Request specs
//
// A spec is a user-declared intent to subscribe to a debugging event
// once a class matching its pattern is loaded. Resolution turns the
// spec into a live engine subscription.

use crate::descriptor::{ClassDescriptor, MethodDescriptor, ReferenceKind};
use crate::engine::{EngineSession, SubscriptionHandle, SuspendPolicy};
use crate::error::ResolutionError;
use crate::pattern::{is_identifier, ReferenceTypePattern};
use std::fmt;

/// Registry-assigned spec identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpecId(pub u32);

/// Kind-specific attributes of a request spec
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecKind {
    LineBreakpoint {
        line: u32,
    },
    MethodBreakpoint {
        method: String,
        /// Explicit argument type names; None defers to overload counting
        argument_types: Option<Vec<String>>,
    },
    ExceptionIntercept {
        notify_caught: bool,
        notify_uncaught: bool,
    },
    AccessWatchpoint {
        field: String,
    },
    ModificationWatchpoint {
        field: String,
    },
}

/// Resolution status; the live handle exists iff Resolved
#[derive(Debug, Clone, PartialEq)]
pub enum SpecStatus {
    Unresolved,
    Resolved(SubscriptionHandle),
    Erroneous(ResolutionError),
}

/// Outcome of a resolution attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ResolveOutcome {
    Resolved(SubscriptionHandle),
    Erroneous(ResolutionError),
    Deferred,
}

/// One pending-or-resolved event subscription declaration
#[derive(Debug, Clone)]
pub struct RequestSpec {
    id: SpecId,
    pattern: ReferenceTypePattern,
    kind: SpecKind,
    status: SpecStatus,
}

// Structural equality: pattern plus kind-specific fields. Identity and
// status are deliberately excluded so callers can detect semantically
// duplicate installs.
impl PartialEq for RequestSpec {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.kind == other.kind
    }
}

impl RequestSpec {
    pub(crate) fn new(id: SpecId, pattern: ReferenceTypePattern, kind: SpecKind) -> Self {
        Self {
            id,
            pattern,
            kind,
            status: SpecStatus::Unresolved,
        }
    }

    pub fn id(&self) -> SpecId {
        self.id
    }

    pub fn pattern(&self) -> &ReferenceTypePattern {
        &self.pattern
    }

    pub fn kind(&self) -> &SpecKind {
        &self.kind
    }

    pub fn status(&self) -> &SpecStatus {
        &self.status
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.status, SpecStatus::Unresolved)
    }

    /// Live subscription handle, present iff resolved
    pub fn handle(&self) -> Option<SubscriptionHandle> {
        match self.status {
            SpecStatus::Resolved(handle) => Some(handle),
            _ => None,
        }
    }

    /// Resolve against a class already known to match this spec's pattern
    ///
    /// Transitions Unresolved to Resolved or Erroneous; both are terminal.
    pub(crate) fn resolve(
        &mut self,
        session: &dyn EngineSession,
        class: &ClassDescriptor,
    ) -> Result<SubscriptionHandle, ResolutionError> {
        debug_assert!(self.is_unresolved(), "resolve() on a terminal spec");
        match self.create_subscription(session, class) {
            Ok(handle) => {
                self.status = SpecStatus::Resolved(handle);
                Ok(handle)
            }
            Err(e) => {
                self.status = SpecStatus::Erroneous(e.clone());
                Err(e)
            }
        }
    }

    /// Test a newly loaded class against this spec and resolve on match
    ///
    /// No-op (None) when the spec is already terminal or the class does
    /// not match the pattern.
    pub(crate) fn attempt_resolve(
        &mut self,
        session: &dyn EngineSession,
        class: &ClassDescriptor,
    ) -> Option<ResolveOutcome> {
        if !self.is_unresolved() || !self.pattern.matches(&class.name) {
            return None;
        }
        Some(match self.resolve(session, class) {
            Ok(handle) => ResolveOutcome::Resolved(handle),
            Err(e) => ResolveOutcome::Erroneous(e),
        })
    }

    /// Install-time fast path: scan the currently loaded classes once
    /// and resolve against the first match, or report Deferred.
    pub(crate) fn attempt_immediate_resolve(
        &mut self,
        session: &dyn EngineSession,
    ) -> ResolveOutcome {
        if !self.is_unresolved() {
            return match &self.status {
                SpecStatus::Resolved(handle) => ResolveOutcome::Resolved(*handle),
                SpecStatus::Erroneous(e) => ResolveOutcome::Erroneous(e.clone()),
                SpecStatus::Unresolved => unreachable!(),
            };
        }
        for class in session.all_loaded_classes() {
            if self.pattern.matches(&class.name) {
                return match self.resolve(session, &class) {
                    Ok(handle) => ResolveOutcome::Resolved(handle),
                    Err(e) => ResolveOutcome::Erroneous(e),
                };
            }
        }
        ResolveOutcome::Deferred
    }

    /// Kind-specific subscription creation
    fn create_subscription(
        &self,
        session: &dyn EngineSession,
        class: &ClassDescriptor,
    ) -> Result<SubscriptionHandle, ResolutionError> {
        if class.kind != ReferenceKind::Class {
            return Err(ResolutionError::InvalidReferenceTypeKind {
                class_name: class.name.clone(),
            });
        }

        match &self.kind {
            SpecKind::LineBreakpoint { line } => {
                let locations = class.executable_locations_at_line(*line);
                let location = locations.first().ok_or_else(|| ResolutionError::NoLineInfo {
                    location: format!("{}:{}", class.name, line),
                })?;
                if location.method.is_none() {
                    return Err(ResolutionError::NoLineInfo {
                        location: format!("{}:{}", class.name, line),
                    });
                }
                Ok(session.create_line_breakpoint(location)?)
            }
            SpecKind::MethodBreakpoint {
                method,
                argument_types,
            } => {
                let target = find_matching_method(session, class, method, argument_types.as_deref())?;
                let location = target.entry_location(&class.name).ok_or_else(|| {
                    ResolutionError::NoLineInfo {
                        location: format!("{}.{}", class.name, method),
                    }
                })?;
                Ok(session.create_method_breakpoint(&location)?)
            }
            SpecKind::ExceptionIntercept {
                notify_caught,
                notify_uncaught,
            } => Ok(session.create_exception_subscription(
                Some(class),
                *notify_caught,
                *notify_uncaught,
                SuspendPolicy::All,
            )?),
            SpecKind::AccessWatchpoint { field } => {
                let field = lookup_field(class, field)?;
                Ok(session.create_field_access_subscription(class, field)?)
            }
            SpecKind::ModificationWatchpoint { field } => {
                let field = lookup_field(class, field)?;
                Ok(session.create_field_modification_subscription(class, field)?)
            }
        }
    }
}

impl fmt::Display for RequestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SpecKind::LineBreakpoint { line } => {
                write!(f, "breakpoint {}:{}", self.pattern, line)?;
            }
            SpecKind::MethodBreakpoint {
                method,
                argument_types,
            } => {
                write!(f, "breakpoint {}.{}", self.pattern, method)?;
                if let Some(args) = argument_types {
                    write!(f, "({})", args.join(","))?;
                }
            }
            SpecKind::ExceptionIntercept {
                notify_caught,
                notify_uncaught,
            } => {
                let flags = match (notify_caught, notify_uncaught) {
                    (true, true) => "caught, uncaught",
                    (true, false) => "caught",
                    (false, true) => "uncaught",
                    (false, false) => "none",
                };
                write!(f, "exception intercept {} ({})", self.pattern, flags)?;
            }
            SpecKind::AccessWatchpoint { field } => {
                write!(f, "watchpoint access {}.{}", self.pattern, field)?;
            }
            SpecKind::ModificationWatchpoint { field } => {
                write!(f, "watchpoint modification {}.{}", self.pattern, field)?;
            }
        }
        match &self.status {
            SpecStatus::Unresolved => write!(f, " (deferred)"),
            SpecStatus::Erroneous(e) => write!(f, " (erroneous: {})", e),
            SpecStatus::Resolved(_) => Ok(()),
        }
    }
}

/// Reserved constructor / static-initializer names
const CONSTRUCTOR_NAMES: [&str; 2] = ["<init>", "<clinit>"];

const PRIMITIVE_TYPES: [&str; 8] = [
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

fn lookup_field<'a>(
    class: &'a ClassDescriptor,
    name: &str,
) -> Result<&'a crate::descriptor::FieldDescriptor, ResolutionError> {
    if !is_identifier(name) {
        return Err(ResolutionError::MalformedMemberName {
            name: name.to_string(),
        });
    }
    class
        .field_by_name(name)
        .ok_or_else(|| ResolutionError::NoSuchField {
            field: name.to_string(),
            class_name: class.name.clone(),
        })
}

/// Overload disambiguation for method breakpoints
///
/// An explicit argument list is normalized and compared structurally;
/// without one, a unique name match wins and several are ambiguous.
fn find_matching_method<'a>(
    session: &dyn EngineSession,
    class: &'a ClassDescriptor,
    method: &str,
    argument_types: Option<&[String]>,
) -> Result<&'a MethodDescriptor, ResolutionError> {
    if !is_identifier(method) && !CONSTRUCTOR_NAMES.contains(&method) {
        return Err(ResolutionError::MalformedMemberName {
            name: method.to_string(),
        });
    }

    let candidates = class.methods_named(method);
    if candidates.is_empty() {
        return Err(ResolutionError::NoSuchMethod {
            method: method.to_string(),
            class_name: class.name.clone(),
        });
    }

    match argument_types {
        Some(args) => {
            let wanted = args
                .iter()
                .map(|a| normalize_argument_type_name(session, a, &class.name))
                .collect::<Result<Vec<_>, _>>()?;
            candidates
                .into_iter()
                .find(|m| arguments_match(m, &wanted))
                .ok_or_else(|| ResolutionError::NoSuchMethod {
                    method: format!("{}({})", method, wanted.join(",")),
                    class_name: class.name.clone(),
                })
        }
        None if candidates.len() == 1 => Ok(candidates[0]),
        None => Err(ResolutionError::AmbiguousMethod {
            method: method.to_string(),
            class_name: class.name.clone(),
        }),
    }
}

/// Structural comparison of an argument-type list against a candidate
///
/// A trailing "T..." matches a trailing "T[]" parameter of a candidate
/// declared variable-arity; everything else is exact equality.
fn arguments_match(candidate: &MethodDescriptor, wanted: &[String]) -> bool {
    if wanted.len() != candidate.argument_type_names.len() {
        return false;
    }
    let last = wanted.len().wrapping_sub(1);
    for (i, (want, have)) in wanted
        .iter()
        .zip(&candidate.argument_type_names)
        .enumerate()
    {
        match want.strip_suffix("...") {
            Some(base) => {
                if i != last || !candidate.is_varargs || format!("{}[]", base) != *have {
                    return false;
                }
            }
            None => {
                if want != have {
                    return false;
                }
            }
        }
    }
    true
}

/// Normalize a user-written argument type name
///
/// Strips whitespace, detaches a trailing "..." and any array brackets,
/// and expands an unqualified or wildcarded class name to a single
/// fully-qualified name by scanning the currently loaded classes.
fn normalize_argument_type_name(
    session: &dyn EngineSession,
    name: &str,
    class_name: &str,
) -> Result<String, ResolutionError> {
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ResolutionError::MalformedMemberName {
            name: name.to_string(),
        });
    }

    let (stem, varargs) = match compact.strip_suffix("...") {
        Some(stem) => (stem, true),
        None => (compact.as_str(), false),
    };

    let mut base = stem;
    let mut dimensions = 0;
    while let Some(inner) = base.strip_suffix("[]") {
        base = inner;
        dimensions += 1;
    }
    if base.is_empty() {
        return Err(ResolutionError::MalformedMemberName { name: compact });
    }

    let qualified = base.contains('.') && !base.starts_with('*');
    let expanded = if PRIMITIVE_TYPES.contains(&base) || qualified {
        base.to_string()
    } else {
        expand_class_name(session, base, class_name)?
    };

    let mut normalized = expanded;
    for _ in 0..dimensions {
        normalized.push_str("[]");
    }
    if varargs {
        normalized.push_str("...");
    }
    Ok(normalized)
}

/// Expand an unqualified ("String") or wildcarded ("*.String") class
/// name to the unique loaded class it denotes
fn expand_class_name(
    session: &dyn EngineSession,
    base: &str,
    class_name: &str,
) -> Result<String, ResolutionError> {
    let pattern = if base.starts_with('*') {
        ReferenceTypePattern::new(base)
    } else {
        if !is_identifier(base) {
            return Err(ResolutionError::MalformedMemberName {
                name: base.to_string(),
            });
        }
        ReferenceTypePattern::new(&format!("*.{}", base))
    };

    let mut matched: Option<String> = None;
    for class in session.all_loaded_classes() {
        if pattern.matches(&class.name) {
            if matched.is_some() {
                return Err(ResolutionError::AmbiguousMethod {
                    method: base.to_string(),
                    class_name: class_name.to_string(),
                });
            }
            matched = Some(class.name);
        }
    }
    // An unknown name is left as written; structural comparison will
    // reject it as NoSuchMethod.
    Ok(matched.unwrap_or_else(|| base.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FieldDescriptor, LineLocation, Location};
    use crate::engine::EngineError;
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Mutex;

    /// Engine stub handing out sequential handles over a fixed class set
    struct StubEngine {
        classes: Vec<ClassDescriptor>,
        next_handle: AtomicI32,
        created: Mutex<Vec<Location>>,
    }

    impl StubEngine {
        fn new(classes: Vec<ClassDescriptor>) -> Self {
            Self {
                classes,
                next_handle: AtomicI32::new(1),
                created: Mutex::new(Vec::new()),
            }
        }

        fn mint(&self) -> Result<SubscriptionHandle, EngineError> {
            Ok(SubscriptionHandle(
                self.next_handle.fetch_add(1, Ordering::SeqCst),
            ))
        }
    }

    impl EngineSession for StubEngine {
        fn all_loaded_classes(&self) -> Vec<ClassDescriptor> {
            self.classes.clone()
        }

        fn create_line_breakpoint(
            &self,
            location: &Location,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.created.lock().unwrap().push(location.clone());
            self.mint()
        }

        fn create_method_breakpoint(
            &self,
            location: &Location,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.created.lock().unwrap().push(location.clone());
            self.mint()
        }

        fn create_exception_subscription(
            &self,
            _class: Option<&ClassDescriptor>,
            _notify_caught: bool,
            _notify_uncaught: bool,
            _suspend_policy: SuspendPolicy,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_field_access_subscription(
            &self,
            _class: &ClassDescriptor,
            _field: &FieldDescriptor,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_field_modification_subscription(
            &self,
            _class: &ClassDescriptor,
            _field: &FieldDescriptor,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_class_prepare_subscription(
            &self,
            _suspend_policy: SuspendPolicy,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_class_unload_subscription(
            &self,
            _suspend_policy: SuspendPolicy,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_thread_start_subscription(
            &self,
            _suspend_policy: SuspendPolicy,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn create_thread_death_subscription(
            &self,
            _suspend_policy: SuspendPolicy,
        ) -> Result<SubscriptionHandle, EngineError> {
            self.mint()
        }

        fn delete_subscription(&self, _handle: SubscriptionHandle) -> Result<(), EngineError> {
            Ok(())
        }

        fn resume(&self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    fn method(
        name: &str,
        args: &[&str],
        varargs: bool,
        lines: &[(u32, u64)],
    ) -> MethodDescriptor {
        MethodDescriptor {
            name: name.to_string(),
            argument_type_names: args.iter().map(|a| a.to_string()).collect(),
            is_varargs: varargs,
            line_locations: lines
                .iter()
                .map(|&(line, code_index)| LineLocation { line, code_index })
                .collect(),
        }
    }

    fn foo_class() -> ClassDescriptor {
        ClassDescriptor {
            name: "com.example.Foo".to_string(),
            kind: ReferenceKind::Class,
            fields: vec![FieldDescriptor {
                name: "count".to_string(),
                type_name: "int".to_string(),
            }],
            methods: vec![
                method("run", &[], false, &[(10, 0), (11, 8)]),
                method("run", &["int"], false, &[(20, 0)]),
                method(
                    "log",
                    &["java.lang.String[]"],
                    true,
                    &[(30, 0)],
                ),
            ],
        }
    }

    fn spec(pattern: &str, kind: SpecKind) -> RequestSpec {
        RequestSpec::new(SpecId(1), ReferenceTypePattern::new(pattern), kind)
    }

    #[test]
    fn test_line_breakpoint_resolves() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });

        let outcome = s.attempt_resolve(&engine, &foo_class()).unwrap();
        assert!(matches!(outcome, ResolveOutcome::Resolved(_)));
        assert!(s.handle().is_some());

        let created = engine.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].line, 10);
        assert_eq!(created[0].method.as_deref(), Some("run"));
    }

    #[test]
    fn test_line_breakpoint_without_code_is_erroneous() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 99 });

        let outcome = s.attempt_resolve(&engine, &foo_class()).unwrap();
        assert!(matches!(
            outcome,
            ResolveOutcome::Erroneous(ResolutionError::NoLineInfo { .. })
        ));
        assert!(engine.created.lock().unwrap().is_empty());
    }

    #[test]
    fn test_attempt_resolve_is_idempotent_after_terminal() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });

        s.attempt_resolve(&engine, &foo_class()).unwrap();
        let handle = s.handle();

        // Second delivery of the same class is a no-op
        assert!(s.attempt_resolve(&engine, &foo_class()).is_none());
        assert_eq!(s.handle(), handle);
        assert_eq!(engine.created.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_attempt_resolve_skips_non_matching_class() {
        let engine = StubEngine::new(vec![]);
        let mut s = spec("com.example.Foo", SpecKind::LineBreakpoint { line: 10 });

        let other = ClassDescriptor {
            name: "com.example.Bar".to_string(),
            ..foo_class()
        };
        assert!(s.attempt_resolve(&engine, &other).is_none());
        assert!(s.is_unresolved());
    }

    #[test]
    fn test_immediate_resolve_deferred_when_not_loaded() {
        let engine = StubEngine::new(vec![]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });
        assert_eq!(s.attempt_immediate_resolve(&engine), ResolveOutcome::Deferred);
        assert!(s.is_unresolved());
    }

    #[test]
    fn test_immediate_resolve_against_loaded_class() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });
        assert!(matches!(
            s.attempt_immediate_resolve(&engine),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_interface_target_is_invalid() {
        let engine = StubEngine::new(vec![]);
        let iface = ClassDescriptor {
            kind: ReferenceKind::Interface,
            ..foo_class()
        };
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });
        let outcome = s.attempt_resolve(&engine, &iface).unwrap();
        assert!(matches!(
            outcome,
            ResolveOutcome::Erroneous(ResolutionError::InvalidReferenceTypeKind { .. })
        ));
    }

    #[test]
    fn test_method_breakpoint_without_args_is_ambiguous() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "run".to_string(),
                argument_types: None,
            },
        );
        let outcome = s.attempt_resolve(&engine, &foo_class()).unwrap();
        assert!(matches!(
            outcome,
            ResolveOutcome::Erroneous(ResolutionError::AmbiguousMethod { .. })
        ));
    }

    #[test]
    fn test_method_breakpoint_single_overload_needs_no_args() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "log".to_string(),
                argument_types: None,
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_method_breakpoint_with_explicit_args() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "run".to_string(),
                argument_types: Some(vec!["int".to_string()]),
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Resolved(_)
        ));

        let created = engine.created.lock().unwrap();
        assert_eq!(created[0].line, 20);
    }

    #[test]
    fn test_method_breakpoint_unknown_name() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "walk".to_string(),
                argument_types: None,
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Erroneous(ResolutionError::NoSuchMethod { .. })
        ));
    }

    #[test]
    fn test_method_breakpoint_malformed_name() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "not a name".to_string(),
                argument_types: None,
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Erroneous(ResolutionError::MalformedMemberName { .. })
        ));
    }

    #[test]
    fn test_constructor_name_is_accepted() {
        let class = ClassDescriptor {
            methods: vec![method("<init>", &[], false, &[(5, 0)])],
            ..foo_class()
        };
        let engine = StubEngine::new(vec![class.clone()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "<init>".to_string(),
                argument_types: None,
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &class).unwrap(),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_varargs_argument_matches_array_parameter() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "log".to_string(),
                argument_types: Some(vec!["java.lang.String...".to_string()]),
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_varargs_spec_rejects_non_varargs_candidate() {
        let class = ClassDescriptor {
            methods: vec![method("log", &["java.lang.String[]"], false, &[(30, 0)])],
            ..foo_class()
        };
        let engine = StubEngine::new(vec![class.clone()]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "log".to_string(),
                argument_types: Some(vec!["java.lang.String...".to_string()]),
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &class).unwrap(),
            ResolveOutcome::Erroneous(ResolutionError::NoSuchMethod { .. })
        ));
    }

    #[test]
    fn test_unqualified_argument_type_is_expanded() {
        let mut string_class = foo_class();
        string_class.name = "java.lang.String".to_string();
        let class = ClassDescriptor {
            methods: vec![method("greet", &["java.lang.String"], false, &[(7, 0)])],
            ..foo_class()
        };
        let engine = StubEngine::new(vec![class.clone(), string_class]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "greet".to_string(),
                argument_types: Some(vec![" String ".to_string()]),
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &class).unwrap(),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_ambiguous_argument_type_expansion() {
        let mut a = foo_class();
        a.name = "com.a.String".to_string();
        let mut b = foo_class();
        b.name = "com.b.String".to_string();
        let class = ClassDescriptor {
            methods: vec![method("greet", &["com.a.String"], false, &[(7, 0)])],
            ..foo_class()
        };
        let engine = StubEngine::new(vec![class.clone(), a, b]);
        let mut s = spec(
            "*.Foo",
            SpecKind::MethodBreakpoint {
                method: "greet".to_string(),
                argument_types: Some(vec!["String".to_string()]),
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &class).unwrap(),
            ResolveOutcome::Erroneous(ResolutionError::AmbiguousMethod { .. })
        ));
    }

    #[test]
    fn test_watchpoint_resolution_and_missing_field() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut access = spec(
            "*.Foo",
            SpecKind::AccessWatchpoint {
                field: "count".to_string(),
            },
        );
        assert!(matches!(
            access.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Resolved(_)
        ));

        let mut missing = spec(
            "*.Foo",
            SpecKind::ModificationWatchpoint {
                field: "absent".to_string(),
            },
        );
        assert!(matches!(
            missing.attempt_resolve(&engine, &foo_class()).unwrap(),
            ResolveOutcome::Erroneous(ResolutionError::NoSuchField { .. })
        ));
    }

    #[test]
    fn test_exception_intercept_needs_no_member_lookup() {
        let class = ClassDescriptor {
            name: "com.example.MyError".to_string(),
            kind: ReferenceKind::Class,
            fields: vec![],
            methods: vec![],
        };
        let engine = StubEngine::new(vec![class.clone()]);
        let mut s = spec(
            "*.MyError",
            SpecKind::ExceptionIntercept {
                notify_caught: true,
                notify_uncaught: true,
            },
        );
        assert!(matches!(
            s.attempt_resolve(&engine, &class).unwrap(),
            ResolveOutcome::Resolved(_)
        ));
    }

    #[test]
    fn test_structural_equality_ignores_id_and_status() {
        let a = RequestSpec::new(
            SpecId(1),
            ReferenceTypePattern::new("*.Foo"),
            SpecKind::LineBreakpoint { line: 10 },
        );
        let mut b = RequestSpec::new(
            SpecId(2),
            ReferenceTypePattern::new("*.Foo"),
            SpecKind::LineBreakpoint { line: 10 },
        );
        let engine = StubEngine::new(vec![foo_class()]);
        b.attempt_immediate_resolve(&engine);
        assert_eq!(a, b);

        let c = RequestSpec::new(
            SpecId(3),
            ReferenceTypePattern::new("*.Foo"),
            SpecKind::LineBreakpoint { line: 11 },
        );
        assert_ne!(a, c);
    }

    #[test]
    fn test_description_rendering() {
        let engine = StubEngine::new(vec![foo_class()]);
        let mut s = spec("*.Foo", SpecKind::LineBreakpoint { line: 10 });
        assert_eq!(s.to_string(), "breakpoint *.Foo:10 (deferred)");
        s.attempt_immediate_resolve(&engine);
        assert_eq!(s.to_string(), "breakpoint *.Foo:10");

        let w = spec(
            "com.example.Foo",
            SpecKind::AccessWatchpoint {
                field: "count".to_string(),
            },
        );
        assert_eq!(
            w.to_string(),
            "watchpoint access com.example.Foo.count (deferred)"
        );
    }
}
