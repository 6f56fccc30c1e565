//! Tri-state boolean composition of policy requirement rules.

use super::{PolicyRequirementRule, Tristate};
use crate::context::AttributeFilterContext;
use crate::error::{FilterError, Result};
use std::sync::Arc;

/// Applies when every child applies.
///
/// Short-circuits on the first child that reports `Fail` or `False`; the
/// first such outcome determines whether the composite reports `Fail` or
/// `False`.
#[derive(Debug, Clone)]
pub struct AndRule {
    children: Vec<Arc<dyn PolicyRequirementRule>>,
}

impl AndRule {
    /// Create an AND rule over `children`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyComposite`] if `children` is empty.
    pub fn new(children: Vec<Arc<dyn PolicyRequirementRule>>) -> Result<Self> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite {
                component: "AndRule",
            });
        }
        Ok(Self { children })
    }

    /// The composed child rules
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn PolicyRequirementRule>] {
        &self.children
    }
}

impl PolicyRequirementRule for AndRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        for child in &self.children {
            match child.matches(ctx) {
                Tristate::True => {}
                outcome @ (Tristate::False | Tristate::Fail) => return outcome,
            }
        }
        Tristate::True
    }
}

/// Applies when any child applies.
///
/// Short-circuits on the first child that reports `Fail` or `True`.
#[derive(Debug, Clone)]
pub struct OrRule {
    children: Vec<Arc<dyn PolicyRequirementRule>>,
}

impl OrRule {
    /// Create an OR rule over `children`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyComposite`] if `children` is empty.
    pub fn new(children: Vec<Arc<dyn PolicyRequirementRule>>) -> Result<Self> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite { component: "OrRule" });
        }
        Ok(Self { children })
    }

    /// The composed child rules
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn PolicyRequirementRule>] {
        &self.children
    }
}

impl PolicyRequirementRule for OrRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        for child in &self.children {
            match child.matches(ctx) {
                Tristate::False => {}
                outcome @ (Tristate::True | Tristate::Fail) => return outcome,
            }
        }
        Tristate::False
    }
}
