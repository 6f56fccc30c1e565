//! Per-request filtering state.
//!
//! An [`AttributeFilterContext`] carries one request through the engine: the
//! prefiltered attributes (input, never mutated), the request facts policy
//! rules consult, and the filtered attributes (output, engine-populated).
//! The [`AttributeFilterWorkContext`] accumulates permit/deny contributions
//! while policies run; the engine owns it for the duration of one
//! `filter_attributes` call and discards it after reconciliation.

use crate::metadata::MetadataContext;
use core_attribute::{AttributeValue, IdpAttribute};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Context supplying input to, and collecting output from, one filtering
/// request.
///
/// Not shared across requests; each concurrent filtering call owns its own
/// context while the engine and its policies are shared.
#[derive(Debug, Default)]
pub struct AttributeFilterContext {
    /// Attributes which are to be filtered, keyed by attribute ID
    prefiltered: BTreeMap<String, IdpAttribute>,

    /// Attributes which have been filtered, keyed by attribute ID
    filtered: BTreeMap<String, IdpAttribute>,

    /// The principal associated with the filtering
    principal: Option<String>,

    /// The attribute issuer (this IdP's) entity ID
    issuer: Option<String>,

    /// The attribute recipient (relying party's) entity ID
    requester: Option<String>,

    /// How the principal was authenticated
    authn_method: Option<String>,

    /// Pre-resolved metadata snapshot for the requester
    requester_metadata: Option<MetadataContext>,
}

impl AttributeFilterContext {
    /// Create an empty context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the attributes which are to be filtered.
    ///
    /// Replaces any previously set input wholesale; attributes are keyed by
    /// their ID, later duplicates winning.
    pub fn set_prefiltered_attributes(
        &mut self,
        attributes: impl IntoIterator<Item = IdpAttribute>,
    ) {
        self.prefiltered = attributes
            .into_iter()
            .map(|attribute| (attribute.id().to_string(), attribute))
            .collect();
    }

    /// The attributes to be filtered, keyed by ID
    #[must_use]
    pub fn prefiltered_attributes(&self) -> &BTreeMap<String, IdpAttribute> {
        &self.prefiltered
    }

    /// The attributes left after filtering, keyed by ID
    #[must_use]
    pub fn filtered_attributes(&self) -> &BTreeMap<String, IdpAttribute> {
        &self.filtered
    }

    /// Replace the filtered attribute set. Populated by the engine.
    pub fn set_filtered_attributes(&mut self, attributes: BTreeMap<String, IdpAttribute>) {
        self.filtered = attributes;
    }

    /// Set the principal name
    #[must_use]
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Set the attribute issuer entity ID
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the attribute recipient entity ID
    #[must_use]
    pub fn with_requester(mut self, requester: impl Into<String>) -> Self {
        self.requester = Some(requester.into());
        self
    }

    /// Set the principal authentication method
    #[must_use]
    pub fn with_authn_method(mut self, method: impl Into<String>) -> Self {
        self.authn_method = Some(method.into());
        self
    }

    /// Attach the requester's pre-resolved metadata snapshot
    #[must_use]
    pub fn with_requester_metadata(mut self, metadata: MetadataContext) -> Self {
        self.requester_metadata = Some(metadata);
        self
    }

    /// The principal name, if known
    #[must_use]
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    /// The attribute issuer entity ID, if known
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// The attribute recipient entity ID, if known
    #[must_use]
    pub fn requester(&self) -> Option<&str> {
        self.requester.as_deref()
    }

    /// The principal authentication method, if known
    #[must_use]
    pub fn authn_method(&self) -> Option<&str> {
        self.authn_method.as_deref()
    }

    /// The requester's metadata snapshot, if one was attached
    #[must_use]
    pub fn requester_metadata(&self) -> Option<&MetadataContext> {
        self.requester_metadata.as_ref()
    }

    /// Snapshot of the request facts expression rules evaluate over.
    ///
    /// Only facts that are present appear as keys, so `has` checks in
    /// expressions distinguish absent from empty.
    #[must_use]
    pub fn expression_facts(&self) -> BTreeMap<String, String> {
        let mut facts = BTreeMap::new();
        let pairs = [
            ("principal", &self.principal),
            ("issuer", &self.issuer),
            ("requester", &self.requester),
            ("authn_method", &self.authn_method),
        ];
        for (key, value) in pairs {
            if let Some(value) = value {
                facts.insert(key.to_string(), value.clone());
            }
        }
        facts
    }
}

/// Accumulator for permit and deny contributions made while policies run.
///
/// Contributions are union-accumulated: a later policy adds to, never
/// replaces, an earlier policy's permits and denies.
#[derive(Debug, Default)]
pub struct AttributeFilterWorkContext {
    /// Values, per attribute ID, permitted to be released
    permitted: BTreeMap<String, BTreeSet<AttributeValue>>,

    /// Values, per attribute ID, not permitted to be released
    denied: BTreeMap<String, BTreeSet<AttributeValue>>,
}

impl AttributeFilterWorkContext {
    /// Create an empty work context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record values of `attribute` as permitted to be released.
    ///
    /// Values that are not current values of the attribute are discarded
    /// with a warning: the filtering process can narrow the input but never
    /// widen it.
    pub fn add_permitted_values(
        &mut self,
        attribute: &IdpAttribute,
        values: impl IntoIterator<Item = AttributeValue>,
    ) {
        Self::accumulate(&mut self.permitted, attribute, values, "permit");
    }

    /// Record values of `attribute` as denied release.
    ///
    /// Values that are not current values of the attribute are discarded
    /// with a warning.
    pub fn add_denied_values(
        &mut self,
        attribute: &IdpAttribute,
        values: impl IntoIterator<Item = AttributeValue>,
    ) {
        Self::accumulate(&mut self.denied, attribute, values, "deny");
    }

    /// Permitted values accumulated so far, per attribute ID
    #[must_use]
    pub fn permitted_values(&self) -> &BTreeMap<String, BTreeSet<AttributeValue>> {
        &self.permitted
    }

    /// Denied values accumulated so far, per attribute ID
    #[must_use]
    pub fn denied_values(&self) -> &BTreeMap<String, BTreeSet<AttributeValue>> {
        &self.denied
    }

    fn accumulate(
        target: &mut BTreeMap<String, BTreeSet<AttributeValue>>,
        attribute: &IdpAttribute,
        values: impl IntoIterator<Item = AttributeValue>,
        verb: &str,
    ) {
        let entry = target.entry(attribute.id().to_string()).or_default();
        for value in values {
            if attribute.contains(&value) {
                entry.insert(value);
            } else {
                warn!(
                    attribute = attribute.id(),
                    %value,
                    "discarding {verb} for a value the attribute does not hold",
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affiliation() -> IdpAttribute {
        IdpAttribute::new("eduPersonAffiliation")
            .unwrap()
            .with_value(AttributeValue::from("member"))
            .with_value(AttributeValue::from("staff"))
    }

    #[test]
    fn contributions_accumulate_across_calls() {
        let attribute = affiliation();
        let mut work = AttributeFilterWorkContext::new();

        work.add_permitted_values(&attribute, [AttributeValue::from("member")]);
        work.add_permitted_values(&attribute, [AttributeValue::from("staff")]);

        let permitted = &work.permitted_values()["eduPersonAffiliation"];
        assert_eq!(permitted.len(), 2);
    }

    #[test]
    fn foreign_values_are_discarded() {
        let attribute = affiliation();
        let mut work = AttributeFilterWorkContext::new();

        work.add_permitted_values(&attribute, [AttributeValue::from("forged")]);

        assert!(work.permitted_values()["eduPersonAffiliation"].is_empty());
    }

    #[test]
    fn expression_facts_skip_absent_fields() {
        let ctx = AttributeFilterContext::new().with_principal("jsmith");
        let facts = ctx.expression_facts();
        assert_eq!(facts.get("principal").map(String::as_str), Some("jsmith"));
        assert!(!facts.contains_key("requester"));
    }
}
