//! Integration tests for tri-state policy requirement semantics.

use core_attribute::{AttributeValue, IdpAttribute};
use core_filter::{
    AndRule, AttributeFilterContext, AttributeFilterWorkContext, AttributeRuleBuilder,
    ExpressionRule, FilterError, FilterPolicyBuilder, MatchResult, Matcher, OrRule,
    PolicyRequirementRule, PredicateRule, Tristate,
};
use std::sync::Arc;

/// A rule that must not be invoked; panics if it is.
#[derive(Debug)]
struct ExplodingRule;

impl PolicyRequirementRule for ExplodingRule {
    fn matches(&self, _ctx: &AttributeFilterContext) -> Tristate {
        panic!("rule was invoked after the combinator should have short-circuited");
    }
}

#[derive(Debug)]
struct FixedRule(Tristate);

impl PolicyRequirementRule for FixedRule {
    fn matches(&self, _ctx: &AttributeFilterContext) -> Tristate {
        self.0
    }
}

fn fixed(outcome: Tristate) -> Arc<dyn PolicyRequirementRule> {
    Arc::new(FixedRule(outcome))
}

#[test]
fn and_truth_table() {
    let ctx = AttributeFilterContext::new();
    let cases = [
        (vec![Tristate::True, Tristate::True], Tristate::True),
        (vec![Tristate::True, Tristate::False], Tristate::False),
        (vec![Tristate::False, Tristate::True], Tristate::False),
        (vec![Tristate::True, Tristate::Fail], Tristate::Fail),
        (vec![Tristate::Fail, Tristate::False], Tristate::Fail),
        (vec![Tristate::False, Tristate::Fail], Tristate::False),
    ];

    for (children, expected) in cases {
        let and = AndRule::new(children.iter().map(|t| fixed(*t)).collect()).unwrap();
        assert_eq!(and.matches(&ctx), expected, "AND over {children:?}");
    }
}

#[test]
fn or_truth_table() {
    let ctx = AttributeFilterContext::new();
    let cases = [
        (vec![Tristate::False, Tristate::False], Tristate::False),
        (vec![Tristate::False, Tristate::True], Tristate::True),
        (vec![Tristate::True, Tristate::False], Tristate::True),
        (vec![Tristate::False, Tristate::Fail], Tristate::Fail),
        (vec![Tristate::Fail, Tristate::True], Tristate::Fail),
        (vec![Tristate::True, Tristate::Fail], Tristate::True),
    ];

    for (children, expected) in cases {
        let or = OrRule::new(children.iter().map(|t| fixed(*t)).collect()).unwrap();
        assert_eq!(or.matches(&ctx), expected, "OR over {children:?}");
    }
}

#[test]
fn and_short_circuits_on_fail_and_false() {
    let ctx = AttributeFilterContext::new();

    let after_fail =
        AndRule::new(vec![fixed(Tristate::Fail), Arc::new(ExplodingRule)]).unwrap();
    assert_eq!(after_fail.matches(&ctx), Tristate::Fail);

    let after_false =
        AndRule::new(vec![fixed(Tristate::False), Arc::new(ExplodingRule)]).unwrap();
    assert_eq!(after_false.matches(&ctx), Tristate::False);
}

#[test]
fn or_short_circuits_on_true_and_fail() {
    let ctx = AttributeFilterContext::new();

    let after_true = OrRule::new(vec![fixed(Tristate::True), Arc::new(ExplodingRule)]).unwrap();
    assert_eq!(after_true.matches(&ctx), Tristate::True);

    let after_fail = OrRule::new(vec![fixed(Tristate::Fail), Arc::new(ExplodingRule)]).unwrap();
    assert_eq!(after_fail.matches(&ctx), Tristate::Fail);
}

#[test]
fn composite_rules_require_at_least_one_child() {
    assert!(matches!(
        AndRule::new(vec![]),
        Err(FilterError::EmptyComposite { .. })
    ));
    assert!(matches!(
        OrRule::new(vec![]),
        Err(FilterError::EmptyComposite { .. })
    ));
}

#[test]
fn inactive_policy_never_consults_its_matchers() {
    #[derive(Debug)]
    struct ExplodingMatcher;
    impl Matcher for ExplodingMatcher {
        fn evaluate(
            &self,
            _attribute: &IdpAttribute,
            _ctx: &AttributeFilterContext,
        ) -> MatchResult {
            panic!("matcher was invoked although the policy did not apply");
        }
    }

    for outcome in [Tristate::False, Tristate::Fail] {
        let policy = FilterPolicyBuilder::new("gated")
            .when(fixed(outcome))
            .add_rule(
                AttributeRuleBuilder::new()
                    .for_attribute("uid")
                    .permit(Arc::new(ExplodingMatcher))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let mut ctx = AttributeFilterContext::new();
        ctx.set_prefiltered_attributes(vec![IdpAttribute::new("uid")
            .unwrap()
            .with_value(AttributeValue::from("jsmith"))]);

        let mut work = AttributeFilterWorkContext::new();
        policy.apply(&ctx, &mut work);
        assert!(work.permitted_values().is_empty());
        assert!(work.denied_values().is_empty());
    }
}

#[test]
fn predicate_rules_map_none_to_fail() {
    let ctx = AttributeFilterContext::new().with_requester("https://sp.example.org");

    let decided = PredicateRule::new("requester-known", |c| Some(c.requester().is_some()));
    assert_eq!(decided.matches(&ctx), Tristate::True);

    let undecided = PredicateRule::new("no-decision", |_| None);
    assert_eq!(undecided.matches(&ctx), Tristate::Fail);
}

#[test]
fn expression_rules_decide_over_request_facts() {
    let rule = ExpressionRule::new(
        "requester == \"https://sp.example.org\" and principal == \"jsmith\"",
    )
    .unwrap();

    let ctx = AttributeFilterContext::new()
        .with_requester("https://sp.example.org")
        .with_principal("jsmith");
    assert_eq!(rule.matches(&ctx), Tristate::True);

    let other = AttributeFilterContext::new()
        .with_requester("https://sp.example.org")
        .with_principal("daffyDuck");
    assert_eq!(rule.matches(&other), Tristate::False);

    // A fact the request never supplied compares false, deactivating the
    // policy without failing it.
    let missing = AttributeFilterContext::new().with_requester("https://sp.example.org");
    assert_eq!(rule.matches(&missing), Tristate::False);
}

#[test]
fn expression_rule_fails_when_evaluation_cannot_complete() {
    // Deep enough to parse (length-bounded) but too deep to evaluate.
    let mut source = String::new();
    for _ in 0..40 {
        source.push_str("not ");
    }
    source.push_str("true");

    let rule = ExpressionRule::new(source).unwrap();
    let ctx = AttributeFilterContext::new();
    assert_eq!(rule.matches(&ctx), Tristate::Fail);
}
