// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Federon Team <https://federon.dev>

//! # federon-open-core
//!
//! Attribute release policy engine for federated identity providers.
//!
//! This crate provides a unified API for the Federon ecosystem's core
//! functionality:
//!
//! - **Attribute Model**: typed identity attributes and their values
//! - **Filter Engine**: rule-based, composable release decisions deciding
//!   which attributes (and which values of those attributes) may be released
//!   to a requesting relying party
//!
//! ## Quick Start
//!
//! ```rust
//! use federon_open_core::attribute::{AttributeValue, IdpAttribute};
//! use federon_open_core::filter::{
//!     AttributeFilterBuilder, AttributeFilterContext, FilterPolicyBuilder,
//! };
//!
//! # fn example() -> Result<(), federon_open_core::filter::FilterError> {
//! let engine = AttributeFilterBuilder::new("engine")
//!     .add_policy(
//!         FilterPolicyBuilder::new("release-mail")
//!             .permit_any("mail")
//!             .build()?,
//!     )
//!     .build()?;
//!
//! let mut ctx = AttributeFilterContext::new();
//! ctx.set_prefiltered_attributes(vec![IdpAttribute::new("mail")?
//!     .with_value(AttributeValue::from("jdoe@example.org"))]);
//! engine.filter_attributes(&mut ctx)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! This facade crate re-exports the following modules:
//!
//! - [`attribute`] - Attribute and value model (from `core-attribute`)
//! - [`filter`] - Attribute filter policy engine (from `core-filter`)
//!
//! ## Security
//!
//! The engine is fail-closed: an attribute or value survives filtering only
//! when some active policy explicitly permits it, and a rule that cannot be
//! evaluated contributes nothing rather than permitting anything.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Attribute model module.
///
/// Re-exports `core_attribute` for identity attribute and value types.
pub mod attribute {
    pub use core_attribute::*;
}

/// Filter engine module.
///
/// Re-exports `core_filter` for attribute release policy evaluation.
pub mod filter {
    pub use core_filter::*;
}

// Convenience re-exports at root level
pub use core_attribute::{AttributeValue, IdpAttribute};
pub use core_filter::{AttributeFilter, AttributeFilterContext, AttributeFilterPolicy};
