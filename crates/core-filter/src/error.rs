//! Error types for core-filter

use thiserror::Error;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur when building or running the filter engine.
///
/// Matcher and policy-rule evaluation never surfaces here: a component that
/// cannot render a decision reports a no-opinion outcome
/// ([`MatchResult::Fail`](crate::MatchResult::Fail) /
/// [`Tristate::Fail`](crate::Tristate::Fail)) which the engine absorbs.
#[derive(Error, Debug)]
pub enum FilterError {
    /// A component was given an empty or whitespace-only ID
    #[error("{component} requires a non-empty ID")]
    EmptyId {
        /// Component kind that rejected the ID
        component: &'static str,
    },

    /// A composite matcher or rule was built with no children
    #[error("{component} requires at least one child")]
    EmptyComposite {
        /// Composite kind that was left empty
        component: &'static str,
    },

    /// A builder was finalized with a required field unset
    #[error("{component} is missing required field `{field}`")]
    MissingField {
        /// Component being built
        component: &'static str,
        /// The unset field
        field: &'static str,
    },

    /// Policy exceeds the maximum allowed attribute rules
    #[error("policy exceeds maximum {max} rules (attempted: {attempted})")]
    TooManyRules {
        /// Maximum allowed rules
        max: usize,
        /// Attempted number of rules
        attempted: usize,
    },

    /// Engine exceeds the maximum allowed policies
    #[error("engine exceeds maximum {max} policies (attempted: {attempted})")]
    TooManyPolicies {
        /// Maximum allowed policies
        max: usize,
        /// Attempted number of policies
        attempted: usize,
    },

    /// A regex pattern failed to compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler error
        source: regex::Error,
    },

    /// Expression is too deeply nested (stack overflow prevention)
    #[error("expression exceeds maximum depth of {max}")]
    ExpressionTooDeep {
        /// Maximum allowed depth
        max: usize,
    },

    /// Expression string is too long (DoS prevention)
    #[error("expression exceeds maximum {max} characters (length: {length})")]
    ExpressionTooLong {
        /// Maximum allowed length
        max: usize,
        /// Actual expression length
        length: usize,
    },

    /// Invalid expression syntax
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A permit or deny was recorded for an attribute that is not part of
    /// the prefiltered input. The only structural error the evaluation path
    /// can report.
    #[error("attribute '{id}' is not in the prefiltered attribute set")]
    UnknownAttribute {
        /// The unknown attribute ID
        id: String,
    },

    /// Attribute construction error from the attribute model
    #[error(transparent)]
    Attribute(#[from] core_attribute::AttributeError),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}
