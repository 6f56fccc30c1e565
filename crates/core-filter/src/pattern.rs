//! String matching shared by value matchers and policy rules.
//!
//! A [`ValuePattern`] is either a literal comparison (with configurable case
//! sensitivity) or a compiled regular expression. Regexes are compiled once
//! at configuration time; evaluation never compiles.

use crate::error::{FilterError, Result};
use regex::Regex;

/// A criterion applied to candidate strings.
#[derive(Debug, Clone)]
pub enum ValuePattern {
    /// Literal comparison
    Literal {
        /// The string to compare against
        value: String,
        /// Whether comparison is case sensitive
        case_sensitive: bool,
    },
    /// Compiled regular expression, matched anywhere in the candidate
    Regex(Regex),
}

impl ValuePattern {
    /// Case-sensitive literal pattern
    #[must_use]
    pub fn exact(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            case_sensitive: true,
        }
    }

    /// Case-insensitive literal pattern
    #[must_use]
    pub fn exact_ignore_case(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            case_sensitive: false,
        }
    }

    /// Compile a regex pattern
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidPattern`] if the pattern does not
    /// compile.
    pub fn regex(pattern: impl AsRef<str>) -> Result<Self> {
        let pattern = pattern.as_ref();
        let compiled = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self::Regex(compiled))
    }

    /// Check whether a candidate string satisfies this pattern
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Literal {
                value,
                case_sensitive: true,
            } => value == candidate,
            Self::Literal {
                value,
                case_sensitive: false,
            } => value.eq_ignore_ascii_case(candidate),
            Self::Regex(re) => re.is_match(candidate),
        }
    }
}
