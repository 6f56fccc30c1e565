//! The attribute filter engine.

use crate::context::{AttributeFilterContext, AttributeFilterWorkContext};
use crate::error::{FilterError, Result};
use crate::policy::AttributeFilterPolicy;
use crate::MAX_POLICIES_PER_ENGINE;
use core_attribute::IdpAttribute;
use std::collections::BTreeMap;
use tracing::debug;

/// Filters attributes and values based on its configured policies.
///
/// The engine and its policy graph are immutable after construction and are
/// shared across threads; every request brings its own
/// [`AttributeFilterContext`]. Filtering may only remove attributes and
/// values, never add them, and any value no active policy permits is
/// withheld.
#[derive(Debug, Clone)]
pub struct AttributeFilter {
    /// ID of this engine, used in diagnostics
    id: String,

    /// Filter policies applied by this engine, in configured order
    policies: Vec<AttributeFilterPolicy>,
}

impl AttributeFilter {
    /// Create an engine.
    ///
    /// # Errors
    ///
    /// * [`FilterError::EmptyId`] - `id` is empty after trimming
    /// * [`FilterError::TooManyPolicies`] - more than
    ///   [`MAX_POLICIES_PER_ENGINE`] policies
    pub fn new(id: impl AsRef<str>, policies: Vec<AttributeFilterPolicy>) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(FilterError::EmptyId {
                component: "AttributeFilter",
            });
        }
        if policies.len() > MAX_POLICIES_PER_ENGINE {
            return Err(FilterError::TooManyPolicies {
                max: MAX_POLICIES_PER_ENGINE,
                attempted: policies.len(),
            });
        }
        Ok(Self {
            id: id.to_string(),
            policies,
        })
    }

    /// ID of this engine
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The configured filter policies
    #[must_use]
    pub fn policies(&self) -> &[AttributeFilterPolicy] {
        &self.policies
    }

    /// Filter the context's prefiltered attributes into its filtered set.
    ///
    /// Every policy is applied in configured order, accumulating permitted
    /// and denied value sets; the engine then reconciles permitted minus
    /// denied per attribute. An attribute with no permitted values (or whose
    /// permitted values are all denied) is absent from the output entirely.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownAttribute`] if a permit or deny was
    /// recorded for an attribute that is not part of the prefiltered input,
    /// a structural integrity violation rather than a policy outcome.
    pub fn filter_attributes(&self, ctx: &mut AttributeFilterContext) -> Result<()> {
        debug!(
            engine = %self.id,
            attributes = ctx.prefiltered_attributes().len(),
            policies = self.policies.len(),
            "beginning attribute filtering"
        );

        let mut work = AttributeFilterWorkContext::new();
        for policy in &self.policies {
            policy.apply(ctx, &mut work);
        }

        let filtered = self.reconcile(ctx, &work)?;
        ctx.set_filtered_attributes(filtered);
        Ok(())
    }

    /// Reconcile the work context into the final filtered attribute map.
    fn reconcile(
        &self,
        ctx: &AttributeFilterContext,
        work: &AttributeFilterWorkContext,
    ) -> Result<BTreeMap<String, IdpAttribute>> {
        let prefiltered = ctx.prefiltered_attributes();

        for id in work.permitted_values().keys() {
            if !prefiltered.contains_key(id) {
                return Err(FilterError::UnknownAttribute { id: id.clone() });
            }
        }
        for id in work.denied_values().keys() {
            if !prefiltered.contains_key(id) {
                return Err(FilterError::UnknownAttribute { id: id.clone() });
            }
        }

        let mut filtered = BTreeMap::new();
        for (id, attribute) in prefiltered {
            let Some(permitted) = work.permitted_values().get(id) else {
                debug!(engine = %self.id, attribute = %id, "no policy permitted release");
                continue;
            };
            if permitted.is_empty() {
                debug!(engine = %self.id, attribute = %id, "no policy permitted release");
                continue;
            }

            // Deny wins over permit for the same value.
            let mut releasable = permitted.clone();
            if let Some(denied) = work.denied_values().get(id) {
                releasable.retain(|v| !denied.contains(v));
            }

            if releasable.is_empty() {
                debug!(
                    engine = %self.id,
                    attribute = %id,
                    "deny rules filtered out all permitted values"
                );
                continue;
            }

            debug!(
                engine = %self.id,
                attribute = %id,
                values = releasable.len(),
                "values remained after filtering"
            );
            filtered.insert(id.clone(), attribute.filtered_clone(&releasable));
        }

        Ok(filtered)
    }
}
