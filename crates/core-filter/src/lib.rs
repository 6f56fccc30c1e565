// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Federon Team <https://federon.dev>

//! # core-filter
//!
//! Attribute release policy engine: decides, per request, which identity
//! attributes and which values of those attributes may be released to a
//! requesting relying party.
//!
//! This crate provides the full decision core:
//!
//! - [`Matcher`]s select which *values* of one attribute satisfy a criterion
//! - [`PolicyRequirementRule`]s decide (tri-state) whether a policy applies
//!   to the current request at all
//! - [`AttributeRule`]s bind a matcher to an attribute with permit/deny
//!   polarity
//! - [`AttributeFilterPolicy`] bundles a requirement rule with its attribute
//!   rules
//! - [`AttributeFilter`] applies every policy and reconciles permitted minus
//!   denied values into the final released set
//!
//! ## Evaluation Semantics
//!
//! - **Fail-closed**: an attribute or value is released only when some
//!   active policy explicitly permits it; absence of any permit is a deny.
//! - **Deny overrides**: a value both permitted and denied is withheld.
//! - **No-opinion absorption**: a matcher or rule that cannot be evaluated
//!   contributes nothing; it never denies everything and never raises an
//!   error. To the relying party, "could not evaluate" is indistinguishable
//!   from "did not apply".
//! - **Subset only**: filtering may remove attributes and values, never add
//!   ones absent from the prefiltered input.
//!
//! ## Concurrency
//!
//! The engine and its policy graph are immutable after construction and
//! shared freely across threads; each request owns its
//! [`AttributeFilterContext`]. No blocking I/O occurs in the decision path;
//! metadata-aware components read a pre-resolved snapshot.
//!
//! ## Security
//!
//! Structural limits are enforced at configuration time to keep hostile or
//! malformed configurations from exhausting resources:
//! - [`MAX_RULES_PER_POLICY`] attribute rules per policy
//! - [`MAX_POLICIES_PER_ENGINE`] policies per engine
//! - [`MAX_EXPR_LENGTH`] / [`MAX_EXPR_DEPTH`] bounds on fact expressions

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attribute_rule;
mod builder;
mod config;
mod context;
mod engine;
mod error;
mod expr;
mod matcher;
mod metadata;
mod pattern;
mod policy;
mod rule;

pub use attribute_rule::AttributeRule;
pub use builder::{AttributeFilterBuilder, AttributeRuleBuilder, FilterPolicyBuilder};
pub use config::{
    FilterConfig, MatcherSpec, PatternSpec, PolicyConfig, RequirementSpec, RuleConfig,
};
pub use context::{AttributeFilterContext, AttributeFilterWorkContext};
pub use engine::AttributeFilter;
pub use error::{FilterError, Result};
pub use expr::{ExpressionRule, FactExpr, MAX_EXPR_DEPTH, MAX_EXPR_LENGTH};
pub use matcher::logic::{AndMatcher, NotMatcher, OrMatcher};
pub use matcher::metadata::RequestedInMetadataMatcher;
pub use matcher::value::{ScopeMatcher, ValueStringMatcher};
pub use matcher::{MatchAll, MatchNone, MatchResult, Matcher};
pub use metadata::{MetadataContext, RequestedAttribute};
pub use pattern::ValuePattern;
pub use policy::AttributeFilterPolicy;
pub use rule::logic::{AndRule, OrRule};
pub use rule::metadata::{
    EntityAttributeRule, EntityGroupRule, NameIdFormatRule, RegistrationAuthorityRule,
};
pub use rule::predicate::{ContextPredicate, PredicateRule};
pub use rule::request::{FactRule, RequestFact};
pub use rule::{AlwaysRule, NeverRule, PolicyRequirementRule, Tristate};

/// Maximum number of attribute rules per policy
pub const MAX_RULES_PER_POLICY: usize = 1024;

/// Maximum number of policies per engine
pub const MAX_POLICIES_PER_ENGINE: usize = 256;
