//! Boolean composition of matchers.
//!
//! Composites propagate failure: a child that cannot render a decision makes
//! the whole composition fail, so a partial intersection or union is never
//! reported as if it were complete.

use super::{MatchResult, Matcher};
use crate::context::AttributeFilterContext;
use crate::error::{FilterError, Result};
use core_attribute::IdpAttribute;
use std::sync::Arc;

/// Intersection of the child matchers' results.
#[derive(Debug, Clone)]
pub struct AndMatcher {
    children: Vec<Arc<dyn Matcher>>,
}

impl AndMatcher {
    /// Create an AND matcher over `children`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyComposite`] if `children` is empty.
    pub fn new(children: Vec<Arc<dyn Matcher>>) -> Result<Self> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite {
                component: "AndMatcher",
            });
        }
        Ok(Self { children })
    }

    /// The composed child matchers
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn Matcher>] {
        &self.children
    }
}

impl Matcher for AndMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, ctx: &AttributeFilterContext) -> MatchResult {
        let mut working: Option<std::collections::BTreeSet<_>> = None;

        for child in &self.children {
            match child.evaluate(attribute, ctx) {
                MatchResult::Fail => return MatchResult::Fail,
                MatchResult::Matched(values) => match working.as_mut() {
                    None => working = Some(values),
                    Some(set) => {
                        set.retain(|v| values.contains(v));
                        // Empty intersections stay empty; stop early.
                        if set.is_empty() {
                            return MatchResult::empty();
                        }
                    }
                },
            }
        }

        MatchResult::Matched(working.unwrap_or_default())
    }
}

/// Union of the child matchers' results.
#[derive(Debug, Clone)]
pub struct OrMatcher {
    children: Vec<Arc<dyn Matcher>>,
}

impl OrMatcher {
    /// Create an OR matcher over `children`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyComposite`] if `children` is empty.
    pub fn new(children: Vec<Arc<dyn Matcher>>) -> Result<Self> {
        if children.is_empty() {
            return Err(FilterError::EmptyComposite {
                component: "OrMatcher",
            });
        }
        Ok(Self { children })
    }

    /// The composed child matchers
    #[must_use]
    pub fn children(&self) -> &[Arc<dyn Matcher>] {
        &self.children
    }
}

impl Matcher for OrMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, ctx: &AttributeFilterContext) -> MatchResult {
        let mut union = std::collections::BTreeSet::new();
        for child in &self.children {
            match child.evaluate(attribute, ctx) {
                MatchResult::Fail => return MatchResult::Fail,
                MatchResult::Matched(values) => union.extend(values),
            }
        }
        MatchResult::Matched(union)
    }
}

/// Complement of one matcher's result within the attribute's current values.
#[derive(Debug, Clone)]
pub struct NotMatcher {
    child: Arc<dyn Matcher>,
}

impl NotMatcher {
    /// Create a NOT matcher around `child`
    #[must_use]
    pub fn new(child: Arc<dyn Matcher>) -> Self {
        Self { child }
    }

    /// The composed child matcher
    #[must_use]
    pub fn child(&self) -> &Arc<dyn Matcher> {
        &self.child
    }
}

impl Matcher for NotMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, ctx: &AttributeFilterContext) -> MatchResult {
        match self.child.evaluate(attribute, ctx) {
            // Failure has no complement.
            MatchResult::Fail => MatchResult::Fail,
            MatchResult::Matched(matched) => {
                let mut complement = attribute.value_set();
                complement.retain(|v| !matched.contains(v));
                MatchResult::Matched(complement)
            }
        }
    }
}
