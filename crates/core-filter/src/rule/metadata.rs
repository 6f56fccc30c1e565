//! Rules over the requester's pre-resolved metadata.
//!
//! All of these fail (no opinion) when the request carries no metadata
//! snapshot: nothing can be concluded about a relying party whose metadata
//! was never resolved, and fail-closed semantics mean the policy simply does
//! not apply.

use super::{PolicyRequirementRule, Tristate};
use crate::context::AttributeFilterContext;
use crate::metadata::MetadataContext;
use crate::pattern::ValuePattern;
use tracing::debug;

fn snapshot<'c>(ctx: &'c AttributeFilterContext, rule: &str) -> Option<&'c MetadataContext> {
    let metadata = ctx.requester_metadata();
    if metadata.is_none() {
        debug!(rule = rule, "no requester metadata; cannot render a decision");
    }
    metadata
}

/// Matches a value of one entity attribute in the requester's metadata.
#[derive(Debug, Clone)]
pub struct EntityAttributeRule {
    name: String,
    pattern: ValuePattern,
}

impl EntityAttributeRule {
    /// Create a rule testing entity attribute `name` against `pattern`
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: ValuePattern) -> Self {
        Self {
            name: name.into(),
            pattern,
        }
    }
}

impl PolicyRequirementRule for EntityAttributeRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        let Some(metadata) = snapshot(ctx, "EntityAttributeRule") else {
            return Tristate::Fail;
        };
        let Some(values) = metadata.entity_attribute(&self.name) else {
            debug!(
                name = %self.name,
                entity = metadata.entity_id(),
                "entity attribute not published"
            );
            return Tristate::False;
        };
        Tristate::from_bool(values.iter().any(|v| self.pattern.matches(v)))
    }
}

/// Matches membership in a named metadata group.
#[derive(Debug, Clone)]
pub struct EntityGroupRule {
    group: String,
}

impl EntityGroupRule {
    /// Create a rule requiring membership in `group`
    #[must_use]
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

impl PolicyRequirementRule for EntityGroupRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        let Some(metadata) = snapshot(ctx, "EntityGroupRule") else {
            return Tristate::Fail;
        };
        Tristate::from_bool(metadata.in_group(&self.group))
    }
}

/// Matches the registration authority recorded in publication metadata.
///
/// Metadata that is present but silent about registration defers to the
/// configured `match_if_metadata_silent` flag.
#[derive(Debug, Clone)]
pub struct RegistrationAuthorityRule {
    authorities: Vec<String>,
    match_if_metadata_silent: bool,
}

impl RegistrationAuthorityRule {
    /// Create a rule accepting any of `authorities`
    #[must_use]
    pub fn new(authorities: Vec<String>) -> Self {
        Self {
            authorities,
            match_if_metadata_silent: false,
        }
    }

    /// What to report when metadata carries no registration info
    #[must_use]
    pub fn match_if_metadata_silent(mut self, value: bool) -> Self {
        self.match_if_metadata_silent = value;
        self
    }
}

impl PolicyRequirementRule for RegistrationAuthorityRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        let Some(metadata) = snapshot(ctx, "RegistrationAuthorityRule") else {
            return Tristate::Fail;
        };
        match metadata.registration_authority() {
            Some(authority) => {
                Tristate::from_bool(self.authorities.iter().any(|a| a == authority))
            }
            None => {
                debug!(
                    entity = metadata.entity_id(),
                    fallback = self.match_if_metadata_silent,
                    "no registration info in metadata; using configured fallback"
                );
                Tristate::from_bool(self.match_if_metadata_silent)
            }
        }
    }
}

/// Matches a NameID format the requester declares support for.
#[derive(Debug, Clone)]
pub struct NameIdFormatRule {
    format: String,
}

impl NameIdFormatRule {
    /// Create a rule requiring support for `format`
    #[must_use]
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }
}

impl PolicyRequirementRule for NameIdFormatRule {
    fn matches(&self, ctx: &AttributeFilterContext) -> Tristate {
        let Some(metadata) = snapshot(ctx, "NameIdFormatRule") else {
            return Tristate::Fail;
        };
        Tristate::from_bool(metadata.supports_nameid_format(&self.format))
    }
}
