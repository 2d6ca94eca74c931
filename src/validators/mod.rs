//! XML Schema components and the structural checks run over them
//!
//! The component model (elements, types, groups, particles) lives in an
//! arena, [`SchemaComponents`]. Three engines operate on it:
//!
//! - [`TypeDerivationChecker`] - type derivation under blocking constraints
//! - [`SubstitutionRegistry`] - substitution groups and tag resolution
//! - [`ParticleRangeEngine`] - effective total ranges of particles

// Component model
pub mod complex_types;
pub mod elements;
pub mod globals;
pub mod groups;
pub mod particles;
pub mod simple_types;
pub mod wildcards;

// Engines
pub mod derivation;
pub mod models;
pub mod substitution;

// Re-exports
pub use complex_types::{ComplexTypeBuilder, DerivationMethod, DerivationSet, XsdComplexType};
pub use derivation::{DerivationSteps, TypeDerivationChecker};
pub use elements::{ElementScope, XsdElement};
pub use globals::{
    ElementId, GlobalElementResolver, GroupId, SchemaComponents, TypeDefinition, TypeId,
};
pub use groups::{ModelType, XsdGroup};
pub use models::ParticleRangeEngine;
pub use particles::{parse_occurs, Occurs, OccursCalculator, Particle, ParticleDescription, Term};
pub use simple_types::{SimpleTypeVariety, XsdSimpleType};
pub use substitution::{SubstitutionMember, SubstitutionRegistry};
pub use wildcards::{NamespaceConstraint, XsdAnyElement};
