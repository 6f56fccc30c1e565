//! Leaf matchers over attribute values.
//!
//! These inspect only the attribute's own values plus their static
//! configuration; they never fail. Values without the inspected part (binary
//! values for string matchers, unscoped values for scope matchers) simply do
//! not match.

use super::{MatchResult, Matcher};
use crate::context::AttributeFilterContext;
use crate::pattern::ValuePattern;
use core_attribute::IdpAttribute;

/// Matches values whose string form satisfies a [`ValuePattern`].
#[derive(Debug, Clone)]
pub struct ValueStringMatcher {
    pattern: ValuePattern,
}

impl ValueStringMatcher {
    /// Create a matcher over the given pattern
    #[must_use]
    pub fn new(pattern: ValuePattern) -> Self {
        Self { pattern }
    }
}

impl Matcher for ValueStringMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::from_values(
            attribute
                .values()
                .iter()
                .filter(|v| v.as_str().is_some_and(|s| self.pattern.matches(s)))
                .cloned(),
        )
    }
}

/// Matches scoped values whose scope part satisfies a [`ValuePattern`].
#[derive(Debug, Clone)]
pub struct ScopeMatcher {
    pattern: ValuePattern,
}

impl ScopeMatcher {
    /// Create a matcher over the given scope pattern
    #[must_use]
    pub fn new(pattern: ValuePattern) -> Self {
        Self { pattern }
    }
}

impl Matcher for ScopeMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::from_values(
            attribute
                .values()
                .iter()
                .filter(|v| v.scope().is_some_and(|s| self.pattern.matches(s)))
                .cloned(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_attribute::AttributeValue;

    fn ctx() -> AttributeFilterContext {
        AttributeFilterContext::new()
    }

    #[test]
    fn string_matcher_selects_matching_values_only() {
        let attribute = IdpAttribute::new("uid")
            .unwrap()
            .with_value(AttributeValue::from("jsmith"))
            .with_value(AttributeValue::from("daffyDuck"));

        let matcher = ValueStringMatcher::new(ValuePattern::exact("jsmith"));
        let result = matcher.evaluate(&attribute, &ctx());

        assert_eq!(
            result,
            MatchResult::from_values([AttributeValue::from("jsmith")])
        );
    }

    #[test]
    fn string_matcher_sees_the_value_part_of_scoped_values() {
        let attribute = IdpAttribute::new("eduPersonScopedAffiliation")
            .unwrap()
            .with_value(AttributeValue::scoped("staff", "example.org"))
            .with_value(AttributeValue::scoped("member", "example.org"));

        let matcher = ValueStringMatcher::new(ValuePattern::exact("staff"));
        let result = matcher.evaluate(&attribute, &ctx());
        assert_eq!(result.values().unwrap().len(), 1);
    }

    #[test]
    fn scope_matcher_ignores_unscoped_values() {
        let attribute = IdpAttribute::new("eduPersonScopedAffiliation")
            .unwrap()
            .with_value(AttributeValue::scoped("staff", "example.org"))
            .with_value(AttributeValue::from("staff"));

        let matcher = ScopeMatcher::new(ValuePattern::exact("example.org"));
        let result = matcher.evaluate(&attribute, &ctx());

        assert_eq!(
            result,
            MatchResult::from_values([AttributeValue::scoped("staff", "example.org")])
        );
    }

    #[test]
    fn regex_matcher_matches_binary_values_never() {
        let attribute = IdpAttribute::new("photo")
            .unwrap()
            .with_value(AttributeValue::Bytes(vec![0xff, 0xd8]));

        let matcher = ValueStringMatcher::new(ValuePattern::regex(".*").unwrap());
        assert_eq!(matcher.evaluate(&attribute, &ctx()), MatchResult::empty());
    }
}
