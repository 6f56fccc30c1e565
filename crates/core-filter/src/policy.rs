//! Filter policies.

use crate::attribute_rule::AttributeRule;
use crate::context::{AttributeFilterContext, AttributeFilterWorkContext};
use crate::error::{FilterError, Result};
use crate::rule::{PolicyRequirementRule, Tristate};
use crate::MAX_RULES_PER_POLICY;
use std::sync::Arc;
use tracing::{debug, warn};

/// A policy requirement rule bundled with the attribute rules it activates.
///
/// The requirement rule is evaluated once per request. Only a `True` outcome
/// runs the attribute rules; `False` and `Fail` both leave the work context
/// untouched, differing only in how they are logged.
#[derive(Debug, Clone)]
pub struct AttributeFilterPolicy {
    /// Unique ID of this policy
    id: String,

    /// Decides whether this policy applies to the current request
    requirement: Arc<dyn PolicyRequirementRule>,

    /// Rules applied when the policy is active
    rules: Vec<AttributeRule>,
}

impl AttributeFilterPolicy {
    /// Create a policy.
    ///
    /// # Errors
    ///
    /// * [`FilterError::EmptyId`] - `id` is empty after trimming
    /// * [`FilterError::TooManyRules`] - more than [`MAX_RULES_PER_POLICY`] rules
    pub fn new(
        id: impl AsRef<str>,
        requirement: Arc<dyn PolicyRequirementRule>,
        rules: Vec<AttributeRule>,
    ) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(FilterError::EmptyId {
                component: "AttributeFilterPolicy",
            });
        }
        if rules.len() > MAX_RULES_PER_POLICY {
            return Err(FilterError::TooManyRules {
                max: MAX_RULES_PER_POLICY,
                attempted: rules.len(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            requirement,
            rules,
        })
    }

    /// Unique ID of this policy
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The attribute rules this policy activates
    #[must_use]
    pub fn rules(&self) -> &[AttributeRule] {
        &self.rules
    }

    /// Apply this policy to one request, merging permit/deny contributions
    /// into the work context when the requirement rule holds.
    pub fn apply(&self, ctx: &AttributeFilterContext, work: &mut AttributeFilterWorkContext) {
        match self.requirement.matches(ctx) {
            Tristate::True => {
                debug!(policy = %self.id, rules = self.rules.len(), "policy active");
                for rule in &self.rules {
                    rule.apply(ctx, work);
                }
            }
            Tristate::False => {
                debug!(policy = %self.id, "policy does not apply to this request");
            }
            Tristate::Fail => {
                warn!(
                    policy = %self.id,
                    "policy requirement could not be evaluated; policy treated as not applying"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::MatchAll;
    use crate::rule::{AlwaysRule, NeverRule};
    use core_attribute::{AttributeValue, IdpAttribute};
    use std::sync::Arc;

    fn ctx() -> AttributeFilterContext {
        let mut ctx = AttributeFilterContext::new();
        ctx.set_prefiltered_attributes(vec![IdpAttribute::new("uid")
            .unwrap()
            .with_value(AttributeValue::from("jsmith"))]);
        ctx
    }

    fn permit_uid() -> AttributeRule {
        AttributeRule::new("uid", Arc::new(MatchAll), false).unwrap()
    }

    #[test]
    fn empty_policy_id_is_rejected() {
        assert!(matches!(
            AttributeFilterPolicy::new("", Arc::new(AlwaysRule), vec![]),
            Err(FilterError::EmptyId { .. })
        ));
    }

    #[test]
    fn active_policy_runs_its_rules() {
        let policy =
            AttributeFilterPolicy::new("p", Arc::new(AlwaysRule), vec![permit_uid()]).unwrap();
        let ctx = ctx();
        let mut work = AttributeFilterWorkContext::new();

        policy.apply(&ctx, &mut work);
        assert!(work.permitted_values().contains_key("uid"));
    }

    #[test]
    fn inactive_policy_contributes_nothing() {
        let policy =
            AttributeFilterPolicy::new("p", Arc::new(NeverRule), vec![permit_uid()]).unwrap();
        let ctx = ctx();
        let mut work = AttributeFilterWorkContext::new();

        policy.apply(&ctx, &mut work);
        assert!(work.permitted_values().is_empty());
    }
}
