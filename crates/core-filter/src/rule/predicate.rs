//! Externally supplied predicate rules.

use super::{PolicyRequirementRule, Tristate};
use crate::context::AttributeFilterContext;
use core::fmt;
use std::sync::Arc;
use tracing::warn;

/// The predicate signature: `None` means the predicate could not decide.
pub type ContextPredicate = dyn Fn(&AttributeFilterContext) -> Option<bool> + Send + Sync;

/// Adapts an arbitrary caller-supplied predicate into a requirement rule.
///
/// A predicate that returns `None` is reported as `Fail`, matching the
/// treatment of any other rule that cannot render a decision.
#[derive(Clone)]
pub struct PredicateRule {
    name: String,
    predicate: Arc<ContextPredicate>,
}

impl PredicateRule {
    /// Wrap `predicate` under a diagnostic name
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&AttributeFilterContext) -> Option<bool> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// The diagnostic name of this predicate
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PredicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateRule")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PolicyRequirementRule for PredicateRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        match (self.predicate)(ctx) {
            Some(decision) => Tristate::from_bool(decision),
            None => {
                warn!(predicate = %self.name, "predicate rendered no decision");
                Tristate::Fail
            }
        }
    }
}
