//! Error types for core-attribute

use thiserror::Error;

/// Result type alias for attribute operations
pub type Result<T> = std::result::Result<T, AttributeError>;

/// Errors that can occur when constructing attributes
#[derive(Error, Debug)]
pub enum AttributeError {
    /// Attribute ID was empty or whitespace-only
    #[error("attribute ID cannot be empty")]
    EmptyId,
}
