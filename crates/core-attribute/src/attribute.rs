//! The identity attribute container

use crate::error::{AttributeError, Result};
use crate::value::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A named, ordered collection of attribute values.
///
/// Attributes are immutable from the filter engine's point of view: the
/// engine never mutates the prefiltered input, it produces filtered clones
/// carrying the surviving subset of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdpAttribute {
    /// Unique ID of this attribute
    id: String,
    /// Ordered values of this attribute
    values: Vec<AttributeValue>,
}

impl IdpAttribute {
    /// Create a new attribute with no values.
    ///
    /// The ID is trimmed; a whitespace-only ID is a construction error.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError::EmptyId`] if the ID is empty after trimming.
    pub fn new(id: impl AsRef<str>) -> Result<Self> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(AttributeError::EmptyId);
        }
        Ok(Self {
            id: id.to_string(),
            values: Vec::new(),
        })
    }

    /// Add one value, preserving insertion order
    #[must_use]
    pub fn with_value(mut self, value: AttributeValue) -> Self {
        self.values.push(value);
        self
    }

    /// Replace the value list wholesale
    #[must_use]
    pub fn with_values(mut self, values: impl IntoIterator<Item = AttributeValue>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// Get the attribute ID
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the ordered values
    #[must_use]
    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    /// The distinct values of this attribute, as a set
    #[must_use]
    pub fn value_set(&self) -> BTreeSet<AttributeValue> {
        self.values.iter().cloned().collect()
    }

    /// True if `value` is among this attribute's current values
    #[must_use]
    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.values.contains(value)
    }

    /// Clone this attribute keeping only the values in `keep`.
    ///
    /// The original value order is preserved; duplicates of a kept value are
    /// collapsed to the first occurrence.
    #[must_use]
    pub fn filtered_clone(&self, keep: &BTreeSet<AttributeValue>) -> Self {
        let mut seen = BTreeSet::new();
        let values = self
            .values
            .iter()
            .filter(|v| keep.contains(*v) && seen.insert((*v).clone()))
            .cloned()
            .collect();
        Self {
            id: self.id.clone(),
            values,
        }
    }
}
