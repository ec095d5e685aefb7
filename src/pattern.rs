// Reference type patterns
//
// Matches loaded-class names against user-supplied patterns:
// exact names ("com.example.Foo") or *-suffix wildcards ("*.Foo")

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pattern a request spec is declared against
///
/// A leading `*` makes the pattern a suffix match; anything else is an
/// exact class-name match. No middle or trailing wildcards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceTypePattern {
    wildcard: bool,
    text: String,
}

impl ReferenceTypePattern {
    /// Parse a pattern from its user-supplied form
    pub fn new(pattern: &str) -> Self {
        match pattern.strip_prefix('*') {
            Some(suffix) => Self {
                wildcard: true,
                text: suffix.to_string(),
            },
            None => Self {
                wildcard: false,
                text: pattern.to_string(),
            },
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Test whether a loaded class name satisfies this pattern
    pub fn matches(&self, class_name: &str) -> bool {
        if self.wildcard {
            class_name.ends_with(&self.text)
        } else {
            class_name == self.text
        }
    }

    /// Optional sanity check, not enforced on construction
    ///
    /// A wildcard must be `*` followed by a dot-led suffix; a non-wildcard
    /// must be a dot-separated sequence of legal identifiers.
    pub fn validate(&self) -> bool {
        if self.wildcard {
            return self.text.starts_with('.')
                && self.text.len() > 1
                && self.text[1..].split('.').all(is_identifier);
        }
        !self.text.is_empty() && self.text.split('.').all(is_identifier)
    }
}

impl fmt::Display for ReferenceTypePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            write!(f, "*{}", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

/// Legal Java-style identifier (letter/underscore/dollar start)
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}
