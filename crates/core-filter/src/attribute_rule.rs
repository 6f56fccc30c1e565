//! Per-attribute value filtering rules.

use crate::context::{AttributeFilterContext, AttributeFilterWorkContext};
use crate::error::{FilterError, Result};
use crate::matcher::{MatchResult, Matcher};
use std::sync::Arc;
use tracing::{debug, warn};

/// Binds a matcher to an attribute ID with a permit or deny polarity.
///
/// When its policy is active, the rule asks the matcher which of the
/// attribute's values satisfy the criterion and records them in the work
/// context as permitted or denied. A matcher that fails contributes nothing
/// in either direction: a rule with no opinion must not silently deny (or
/// release) anything.
#[derive(Debug, Clone)]
pub struct AttributeRule {
    /// ID of the attribute this rule applies to
    attribute_id: String,

    /// Selects the values this rule permits or denies
    matcher: Arc<dyn Matcher>,

    /// Whether matched values are denied rather than permitted
    deny: bool,
}

impl AttributeRule {
    /// Create a rule for `attribute_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyId`] if the attribute ID is empty after
    /// trimming.
    pub fn new(attribute_id: impl AsRef<str>, matcher: Arc<dyn Matcher>, deny: bool) -> Result<Self> {
        let attribute_id = attribute_id.as_ref().trim();
        if attribute_id.is_empty() {
            return Err(FilterError::EmptyId {
                component: "AttributeRule",
            });
        }
        Ok(Self {
            attribute_id: attribute_id.to_string(),
            matcher,
            deny,
        })
    }

    /// ID of the attribute this rule applies to
    #[must_use]
    pub fn attribute_id(&self) -> &str {
        &self.attribute_id
    }

    /// Whether this is a deny rule
    #[must_use]
    pub fn is_deny(&self) -> bool {
        self.deny
    }

    /// Apply this rule, merging its permit or deny contribution into the
    /// work context.
    ///
    /// A request whose prefiltered input does not carry the rule's attribute
    /// is skipped.
    pub fn apply(&self, ctx: &AttributeFilterContext, work: &mut AttributeFilterWorkContext) {
        let Some(attribute) = ctx.prefiltered_attributes().get(&self.attribute_id) else {
            debug!(
                attribute = %self.attribute_id,
                "attribute not in prefiltered input; rule skipped"
            );
            return;
        };

        match self.matcher.evaluate(attribute, ctx) {
            MatchResult::Fail => {
                warn!(
                    attribute = %self.attribute_id,
                    deny = self.deny,
                    "matcher rendered no decision; rule contributes nothing"
                );
            }
            MatchResult::Matched(values) => {
                debug!(
                    attribute = %self.attribute_id,
                    matched = values.len(),
                    deny = self.deny,
                    "rule contributing matched values"
                );
                if self.deny {
                    work.add_denied_values(attribute, values);
                } else {
                    work.add_permitted_values(attribute, values);
                }
            }
        }
    }
}
