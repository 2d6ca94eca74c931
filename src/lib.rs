//! # xmlschema-structures
//!
//! Structural core of an XML Schema processor, operating over an already
//! compiled schema component graph:
//!
//! - substitution groups: which element declarations may stand in for a head
//!   declaration, honouring `block` constraints and type derivation;
//! - type derivation checks, including chained derivation and union member
//!   fallback;
//! - effective total ranges of particle trees (sequence, choice, all).
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use xmlschema_structures::namespaces::QName;
//! use xmlschema_structures::validators::{
//!     ComplexTypeBuilder, DerivationMethod, SchemaComponents, SubstitutionRegistry,
//!     XsdElement,
//! };
//!
//! let mut schema = SchemaComponents::new();
//! let any = schema.any_type();
//! let base = schema
//!     .add_complex_type(
//!         ComplexTypeBuilder::new()
//!             .name(QName::local("Base"))
//!             .base(any, DerivationMethod::Restriction)
//!             .build(),
//!     )
//!     .unwrap();
//! let head = schema.add_element(XsdElement::new(QName::local("head"), base)).unwrap();
//! let member = schema
//!     .add_element(XsdElement::new(QName::local("member"), base).with_substitution_group(head))
//!     .unwrap();
//!
//! let registry = SubstitutionRegistry::new(Arc::new(schema));
//! assert!(registry.is_substitutable(member, head));
//! assert_eq!(registry.substitution_group(head), vec![member]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod namespaces;
pub mod validators;

// Re-exports for convenience
pub use error::{Error, Result};
pub use limits::Limits;

/// Version of the xmlschema-structures library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// XSD 1.0 namespace
pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";
