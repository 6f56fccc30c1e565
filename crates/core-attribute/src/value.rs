//! Typed attribute values
//!
//! Values are opaque to the filter engine: matchers inspect them, the engine
//! only moves them between permitted and denied sets. `Ord` and `Hash` are
//! derived so values can live in deterministic set collections.

use core::fmt;
use serde::{Deserialize, Serialize};

/// A single value of an identity attribute.
///
/// Scoped values carry a `value@scope` pair (e.g. `staff@example.org`) whose
/// parts are matched independently by scope-aware matchers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    /// Plain string value
    Str(String),
    /// Scoped string value (`value@scope`)
    Scoped {
        /// The value part, left of the scope delimiter
        value: String,
        /// The scope part, right of the scope delimiter
        scope: String,
    },
    /// Raw binary value
    Bytes(Vec<u8>),
    /// Explicitly empty value
    Empty,
}

impl AttributeValue {
    /// Create a scoped value
    #[must_use]
    pub fn scoped(value: impl Into<String>, scope: impl Into<String>) -> Self {
        Self::Scoped {
            value: value.into(),
            scope: scope.into(),
        }
    }

    /// The string form matched by value matchers, if this value has one.
    ///
    /// For scoped values this is the value part only; binary and empty
    /// values have no string form.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Scoped { value, .. } => Some(value),
            Self::Bytes(_) | Self::Empty => None,
        }
    }

    /// The scope part, for scoped values
    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Scoped { scope, .. } => Some(scope),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Scoped { value, scope } => write!(f, "{value}@{scope}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Empty => f.write_str("<empty>"),
        }
    }
}
