//! Metadata-aware matchers.
//!
//! Unlike the leaf value matchers these consult the requester's pre-resolved
//! metadata snapshot, and fail (no opinion) when the snapshot is absent and
//! no permissive default is configured.

use super::{MatchResult, Matcher};
use crate::context::AttributeFilterContext;
use core_attribute::IdpAttribute;
use tracing::debug;

/// Matches the values the requesting relying party asks for in its metadata.
///
/// For an attribute the requester lists with no explicit values, every value
/// matches; with explicit values, only those values match. For an attribute
/// the requester does not list, nothing matches. When no metadata snapshot
/// is attached to the request the matcher fails, unless
/// `match_if_metadata_silent` is set, in which case every value matches.
#[derive(Debug, Clone, Default)]
pub struct RequestedInMetadataMatcher {
    /// Match everything when no metadata snapshot is available
    match_if_metadata_silent: bool,

    /// Only honor entries the requester marks as required
    only_if_required: bool,
}

impl RequestedInMetadataMatcher {
    /// Create a matcher with fail-on-silent defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Match all values when the metadata snapshot is absent
    #[must_use]
    pub fn match_if_metadata_silent(mut self, value: bool) -> Self {
        self.match_if_metadata_silent = value;
        self
    }

    /// Only honor requested attributes flagged required
    #[must_use]
    pub fn only_if_required(mut self, value: bool) -> Self {
        self.only_if_required = value;
        self
    }
}

impl Matcher for RequestedInMetadataMatcher {
    fn evaluate(&self, attribute: &IdpAttribute, ctx: &AttributeFilterContext) -> MatchResult {
        let Some(metadata) = ctx.requester_metadata() else {
            if self.match_if_metadata_silent {
                debug!(
                    attribute = attribute.id(),
                    "no requester metadata; matching all values per configuration"
                );
                return MatchResult::Matched(attribute.value_set());
            }
            debug!(
                attribute = attribute.id(),
                "no requester metadata; cannot render a decision"
            );
            return MatchResult::Fail;
        };

        let Some(requested) = metadata.requested_attribute(attribute.id()) else {
            return MatchResult::empty();
        };

        if self.only_if_required && !requested.required {
            return MatchResult::empty();
        }

        if requested.values.is_empty() {
            return MatchResult::Matched(attribute.value_set());
        }

        MatchResult::from_values(
            attribute
                .values()
                .iter()
                .filter(|v| {
                    v.as_str()
                        .is_some_and(|s| requested.values.iter().any(|w| w == s))
                })
                .cloned(),
        )
    }
}
