//! Pre-resolved relying party metadata.
//!
//! The engine never resolves metadata itself. The surrounding profile
//! handler resolves the requester's published metadata ahead of filtering
//! and attaches a read-only [`MetadataContext`] snapshot to the filter
//! context; metadata-aware matchers and rules only read it. A missing
//! snapshot makes those components report no-opinion rather than an error.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// An attribute the relying party declares it wants, as published in its
/// metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestedAttribute {
    /// Whether the relying party marks the attribute as required
    #[serde(default)]
    pub required: bool,
    /// Acceptable values; empty means any value is acceptable
    #[serde(default)]
    pub values: Vec<String>,
}

/// Read-only snapshot of the requesting relying party's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataContext {
    /// Entity ID of the relying party this snapshot describes
    entity_id: String,

    /// Entity attributes published for the relying party, name to values
    #[serde(default)]
    entity_attributes: BTreeMap<String, Vec<String>>,

    /// Names of every metadata group the entity sits under
    #[serde(default)]
    groups: BTreeSet<String>,

    /// Registration authority from publication metadata, if any
    #[serde(default)]
    registration_authority: Option<String>,

    /// NameID formats the relying party declares support for
    #[serde(default)]
    nameid_formats: BTreeSet<String>,

    /// Attributes the relying party requests, keyed by attribute name
    #[serde(default)]
    requested_attributes: BTreeMap<String, RequestedAttribute>,
}

impl MetadataContext {
    /// Create a snapshot for the given entity ID
    #[must_use]
    pub fn new(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            ..Self::default()
        }
    }

    /// Record one entity attribute value
    #[must_use]
    pub fn with_entity_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entity_attributes
            .entry(name.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Record membership in a metadata group
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Record the registration authority
    #[must_use]
    pub fn with_registration_authority(mut self, authority: impl Into<String>) -> Self {
        self.registration_authority = Some(authority.into());
        self
    }

    /// Record a supported NameID format
    #[must_use]
    pub fn with_nameid_format(mut self, format: impl Into<String>) -> Self {
        self.nameid_formats.insert(format.into());
        self
    }

    /// Record a requested attribute
    #[must_use]
    pub fn with_requested_attribute(
        mut self,
        name: impl Into<String>,
        requested: RequestedAttribute,
    ) -> Self {
        self.requested_attributes.insert(name.into(), requested);
        self
    }

    /// Entity ID of the relying party
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Values of one entity attribute, if published
    #[must_use]
    pub fn entity_attribute(&self, name: &str) -> Option<&[String]> {
        self.entity_attributes.get(name).map(Vec::as_slice)
    }

    /// True if the entity sits under the named metadata group
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Registration authority, if published
    #[must_use]
    pub fn registration_authority(&self) -> Option<&str> {
        self.registration_authority.as_deref()
    }

    /// True if the relying party declares support for the NameID format
    #[must_use]
    pub fn supports_nameid_format(&self, format: &str) -> bool {
        self.nameid_formats.contains(format)
    }

    /// The requested-attribute entry for `name`, if any
    #[must_use]
    pub fn requested_attribute(&self, name: &str) -> Option<&RequestedAttribute> {
        self.requested_attributes.get(name)
    }
}
