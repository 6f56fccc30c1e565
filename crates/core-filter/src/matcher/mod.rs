//! Value matchers.
//!
//! A [`Matcher`] decides which values of a single attribute satisfy some
//! criterion. The result is an explicit sum type: a matched subset of the
//! attribute's values, or [`MatchResult::Fail`] when the matcher cannot
//! render a decision at all (distinct from matching nothing). Failure is
//! no-opinion: the attribute rule that owns the matcher contributes nothing
//! for that evaluation.

pub mod logic;
pub mod metadata;
pub mod value;

use crate::context::AttributeFilterContext;
use core::fmt;
use core_attribute::{AttributeValue, IdpAttribute};
use std::collections::BTreeSet;

/// Outcome of evaluating a matcher against one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// The subset of the attribute's values that satisfy the criterion.
    /// Always a subset of the attribute's actual values; matching never
    /// invents values.
    Matched(BTreeSet<AttributeValue>),

    /// The matcher could not render a decision (e.g. required metadata is
    /// absent). Distinct from `Matched` with an empty set.
    Fail,
}

impl MatchResult {
    /// A successful match of no values
    #[must_use]
    pub fn empty() -> Self {
        Self::Matched(BTreeSet::new())
    }

    /// Collect an iterator of values into a successful result
    #[must_use]
    pub fn from_values(values: impl IntoIterator<Item = AttributeValue>) -> Self {
        Self::Matched(values.into_iter().collect())
    }

    /// True for the failure outcome
    #[must_use]
    pub fn is_fail(&self) -> bool {
        matches!(self, Self::Fail)
    }

    /// The matched values, or `None` on failure
    #[must_use]
    pub fn values(&self) -> Option<&BTreeSet<AttributeValue>> {
        match self {
            Self::Matched(values) => Some(values),
            Self::Fail => None,
        }
    }
}

/// Decides which values of an attribute satisfy a criterion.
///
/// Implementations are immutable once constructed and are shared across
/// concurrent filtering requests.
pub trait Matcher: fmt::Debug + Send + Sync {
    /// Evaluate this matcher against `attribute` in the context of one
    /// filtering request.
    fn evaluate(&self, attribute: &IdpAttribute, ctx: &AttributeFilterContext) -> MatchResult;
}

/// Matches every current value of the attribute.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl Matcher for MatchAll {
    fn evaluate(&self, attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::Matched(attribute.value_set())
    }
}

/// Matches no values, unconditionally.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchNone;

impl Matcher for MatchNone {
    fn evaluate(&self, _attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_all_returns_every_value() {
        let attribute = IdpAttribute::new("uid")
            .unwrap()
            .with_value(AttributeValue::from("jsmith"))
            .with_value(AttributeValue::from("daffyDuck"));
        let ctx = AttributeFilterContext::new();

        let result = MatchAll.evaluate(&attribute, &ctx);
        assert_eq!(result.values().unwrap().len(), 2);
    }

    #[test]
    fn match_none_is_empty_not_fail() {
        let attribute = IdpAttribute::new("uid").unwrap();
        let ctx = AttributeFilterContext::new();

        let result = MatchNone.evaluate(&attribute, &ctx);
        assert_eq!(result, MatchResult::empty());
        assert!(!result.is_fail());
    }
}
