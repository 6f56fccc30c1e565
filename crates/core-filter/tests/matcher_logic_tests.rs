//! Integration tests for composite matcher semantics.

use core_attribute::{AttributeValue, IdpAttribute};
use core_filter::{
    AndMatcher, AttributeFilterContext, FilterError, MatchResult, Matcher, NotMatcher, OrMatcher,
    ValuePattern, ValueStringMatcher,
};
use std::sync::Arc;

/// A matcher that must not be invoked; panics if it is.
#[derive(Debug)]
struct ExplodingMatcher;

impl Matcher for ExplodingMatcher {
    fn evaluate(&self, _attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        panic!("matcher was invoked after the composite should have short-circuited");
    }
}

#[derive(Debug)]
struct FailingMatcher;

impl Matcher for FailingMatcher {
    fn evaluate(&self, _attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::Fail
    }
}

fn exact(value: &str) -> Arc<dyn Matcher> {
    Arc::new(ValueStringMatcher::new(ValuePattern::exact(value)))
}

fn values(attr: &[&str]) -> IdpAttribute {
    let mut attribute = IdpAttribute::new("attr").unwrap();
    for v in attr {
        attribute = attribute.with_value(AttributeValue::from(*v));
    }
    attribute
}

fn set(values: &[&str]) -> MatchResult {
    MatchResult::from_values(values.iter().map(|v| AttributeValue::from(*v)))
}

#[derive(Debug)]
struct FixedMatcher(Vec<&'static str>);

impl Matcher for FixedMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, _ctx: &AttributeFilterContext) -> MatchResult {
        MatchResult::from_values(
            attribute
                .values()
                .iter()
                .filter(|v| v.as_str().is_some_and(|s| self.0.contains(&s)))
                .cloned(),
        )
    }
}

#[test]
fn and_intersects_child_results() {
    let attribute = values(&["a", "b", "c"]);
    let ctx = AttributeFilterContext::new();

    let and = AndMatcher::new(vec![
        Arc::new(FixedMatcher(vec!["a", "b"])),
        Arc::new(FixedMatcher(vec!["b", "c"])),
    ])
    .unwrap();

    assert_eq!(and.evaluate(&attribute, &ctx), set(&["b"]));
}

#[test]
fn and_fails_without_invoking_children_past_the_failure() {
    let attribute = values(&["a", "b"]);
    let ctx = AttributeFilterContext::new();

    let and = AndMatcher::new(vec![
        Arc::new(FailingMatcher),
        Arc::new(ExplodingMatcher),
    ])
    .unwrap();

    assert_eq!(and.evaluate(&attribute, &ctx), MatchResult::Fail);
}

#[test]
fn and_short_circuits_on_empty_intersection() {
    let attribute = values(&["a", "b"]);
    let ctx = AttributeFilterContext::new();

    // Disjoint children produce an empty intersection; the third child must
    // not be consulted.
    let and = AndMatcher::new(vec![
        exact("a"),
        exact("b"),
        Arc::new(ExplodingMatcher),
    ])
    .unwrap();

    assert_eq!(and.evaluate(&attribute, &ctx), MatchResult::empty());
}

#[test]
fn or_unions_child_results() {
    let attribute = values(&["a", "b", "c"]);
    let ctx = AttributeFilterContext::new();

    let or = OrMatcher::new(vec![exact("a"), exact("c")]).unwrap();
    assert_eq!(or.evaluate(&attribute, &ctx), set(&["a", "c"]));
}

#[test]
fn or_failure_is_never_a_partial_union() {
    let attribute = values(&["a", "b"]);
    let ctx = AttributeFilterContext::new();

    let or = OrMatcher::new(vec![
        Arc::new(FailingMatcher),
        Arc::new(ExplodingMatcher),
    ])
    .unwrap();

    assert_eq!(or.evaluate(&attribute, &ctx), MatchResult::Fail);
}

#[test]
fn not_complements_within_actual_values() {
    let attribute = values(&["jsmith", "daffyDuck"]);
    let ctx = AttributeFilterContext::new();

    let not = NotMatcher::new(exact("jsmith"));
    assert_eq!(not.evaluate(&attribute, &ctx), set(&["daffyDuck"]));
}

#[test]
fn not_propagates_failure() {
    let attribute = values(&["a"]);
    let ctx = AttributeFilterContext::new();

    let not = NotMatcher::new(Arc::new(FailingMatcher));
    assert_eq!(not.evaluate(&attribute, &ctx), MatchResult::Fail);
}

#[test]
fn double_negation_restores_the_match_set() {
    let attribute = values(&["jsmith", "daffyDuck"]);
    let ctx = AttributeFilterContext::new();

    let inner = NotMatcher::new(exact("jsmith"));
    let outer = NotMatcher::new(Arc::new(inner));
    assert_eq!(outer.evaluate(&attribute, &ctx), set(&["jsmith"]));
}

#[test]
fn composites_require_at_least_one_child() {
    assert!(matches!(
        AndMatcher::new(vec![]),
        Err(FilterError::EmptyComposite { .. })
    ));
    assert!(matches!(
        OrMatcher::new(vec![]),
        Err(FilterError::EmptyComposite { .. })
    ));
}
