//! Builder pattern for ergonomic engine construction.
//!
//! Builders are the only construction path that composes matchers, rules and
//! policies; the components they produce are immutable, so the shared policy
//! graph can be handed to concurrent requests without further
//! synchronization.

use crate::attribute_rule::AttributeRule;
use crate::engine::AttributeFilter;
use crate::error::{FilterError, Result};
use crate::matcher::{MatchAll, Matcher};
use crate::policy::AttributeFilterPolicy;
use crate::rule::{AlwaysRule, PolicyRequirementRule};
use std::sync::Arc;

/// Builder for [`AttributeRule`] instances with a fluent API.
///
/// # Examples
///
/// ```
/// use core_filter::{AttributeRuleBuilder, MatchAll, ValuePattern, ValueStringMatcher};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), core_filter::FilterError> {
/// // Release every value of an attribute
/// let rule = AttributeRuleBuilder::new()
///     .for_attribute("eduPersonAffiliation")
///     .permit(Arc::new(MatchAll))
///     .build()?;
///
/// // Withhold one specific value
/// let rule = AttributeRuleBuilder::new()
///     .for_attribute("eduPersonAffiliation")
///     .deny(Arc::new(ValueStringMatcher::new(ValuePattern::exact("staff"))))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct AttributeRuleBuilder {
    attribute_id: Option<String>,
    matcher: Option<Arc<dyn Matcher>>,
    deny: bool,
}

impl AttributeRuleBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attribute this rule applies to
    #[must_use]
    pub fn for_attribute(mut self, attribute_id: impl Into<String>) -> Self {
        self.attribute_id = Some(attribute_id.into());
        self
    }

    /// Permit the values selected by `matcher`
    #[must_use]
    pub fn permit(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.matcher = Some(matcher);
        self.deny = false;
        self
    }

    /// Deny the values selected by `matcher`
    #[must_use]
    pub fn deny(mut self, matcher: Arc<dyn Matcher>) -> Self {
        self.matcher = Some(matcher);
        self.deny = true;
        self
    }

    /// Build the [`AttributeRule`].
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingField`] if the attribute ID or matcher
    /// was never set.
    pub fn build(self) -> Result<AttributeRule> {
        let attribute_id = self.attribute_id.ok_or(FilterError::MissingField {
            component: "AttributeRule",
            field: "attribute_id",
        })?;
        let matcher = self.matcher.ok_or(FilterError::MissingField {
            component: "AttributeRule",
            field: "matcher",
        })?;
        AttributeRule::new(attribute_id, matcher, self.deny)
    }
}

/// Builder for [`AttributeFilterPolicy`] instances with a fluent API.
///
/// A policy built without an explicit requirement applies to every request.
///
/// # Examples
///
/// ```
/// use core_filter::{FactRule, FilterPolicyBuilder, MatchAll, ValuePattern};
/// use std::sync::Arc;
///
/// # fn example() -> Result<(), core_filter::FilterError> {
/// let policy = FilterPolicyBuilder::new("release-to-sp")
///     .when(Arc::new(FactRule::requester(ValuePattern::exact(
///         "https://sp.example.org",
///     ))))
///     .add_rule_with(|rule| {
///         rule.for_attribute("eduPersonAffiliation").permit(Arc::new(MatchAll))
///     })?
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FilterPolicyBuilder {
    id: String,
    requirement: Arc<dyn PolicyRequirementRule>,
    rules: Vec<AttributeRule>,
}

impl FilterPolicyBuilder {
    /// Create a builder for the policy `id`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            requirement: Arc::new(AlwaysRule),
            rules: Vec::new(),
        }
    }

    /// Set the requirement rule gating this policy
    #[must_use]
    pub fn when(mut self, requirement: Arc<dyn PolicyRequirementRule>) -> Self {
        self.requirement = requirement;
        self
    }

    /// Add a pre-built attribute rule
    #[must_use]
    pub fn add_rule(mut self, rule: AttributeRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Add a rule using a builder function.
    ///
    /// # Errors
    ///
    /// Propagates the rule builder's error.
    pub fn add_rule_with<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(AttributeRuleBuilder) -> AttributeRuleBuilder,
    {
        let rule = f(AttributeRuleBuilder::new()).build()?;
        self.rules.push(rule);
        Ok(self)
    }

    /// Shorthand: permit every value of `attribute_id`
    #[must_use]
    pub fn permit_any(mut self, attribute_id: impl Into<String>) -> Self {
        if let Ok(rule) = AttributeRule::new(attribute_id.into(), Arc::new(MatchAll), false) {
            self.rules.push(rule);
        }
        self
    }

    /// Build the [`AttributeFilterPolicy`].
    ///
    /// # Errors
    ///
    /// Propagates [`AttributeFilterPolicy::new`] validation errors.
    pub fn build(self) -> Result<AttributeFilterPolicy> {
        AttributeFilterPolicy::new(self.id, self.requirement, self.rules)
    }
}

/// Builder for [`AttributeFilter`] engines with a fluent API.
#[derive(Debug)]
pub struct AttributeFilterBuilder {
    id: String,
    policies: Vec<AttributeFilterPolicy>,
}

impl AttributeFilterBuilder {
    /// Create a builder for the engine `id`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            policies: Vec::new(),
        }
    }

    /// Add a policy, preserving insertion order
    #[must_use]
    pub fn add_policy(mut self, policy: AttributeFilterPolicy) -> Self {
        self.policies.push(policy);
        self
    }

    /// Build the [`AttributeFilter`].
    ///
    /// # Errors
    ///
    /// Propagates [`AttributeFilter::new`] validation errors.
    pub fn build(self) -> Result<AttributeFilter> {
        AttributeFilter::new(self.id, self.policies)
    }
}
