// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Federon Team <https://federon.dev>

//! # core-attribute
//!
//! Identity attribute model for the Federon attribute release engine.
//!
//! An [`IdpAttribute`] is a named, ordered collection of typed
//! [`AttributeValue`]s describing one fact about a principal: a mail
//! address, a set of affiliations, an entitlement. Attributes are produced by
//! the resolution subsystem and consumed read-only by the filter engine,
//! which releases a (possibly empty) subset of each attribute's values.
//!
//! ## Example
//!
//! ```
//! use core_attribute::{AttributeValue, IdpAttribute};
//!
//! # fn example() -> Result<(), core_attribute::AttributeError> {
//! let affiliation = IdpAttribute::new("eduPersonAffiliation")?
//!     .with_value(AttributeValue::from("member"))
//!     .with_value(AttributeValue::scoped("staff", "example.org"));
//!
//! assert_eq!(affiliation.id(), "eduPersonAffiliation");
//! assert_eq!(affiliation.values().len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attribute;
mod error;
mod value;

pub use attribute::IdpAttribute;
pub use error::{AttributeError, Result};
pub use value::AttributeValue;
