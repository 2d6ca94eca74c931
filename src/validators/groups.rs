//! XSD Model Group components
//!
//! This module implements model groups for XSD content models:
//! - xs:sequence - ordered content
//! - xs:choice - alternative content
//! - xs:all - unordered content
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Model_Groups

use serde::{Deserialize, Serialize};

use crate::namespaces::QName;

use super::globals::{ElementId, GroupId};
use super::particles::{Occurs, Particle};
use super::wildcards::XsdAnyElement;

/// Model group compositor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelType {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles
    All,
}

impl ModelType {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" | "{http://www.w3.org/2001/XMLSchema}sequence" => Some(Self::Sequence),
            "choice" | "{http://www.w3.org/2001/XMLSchema}choice" => Some(Self::Choice),
            "all" | "{http://www.w3.org/2001/XMLSchema}all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
            Self::All => write!(f, "all"),
        }
    }
}

/// XSD Model Group (sequence, choice, all)
///
/// Child order is preserved for every compositor; it only carries meaning
/// for sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct XsdGroup {
    /// Optional name for named model groups
    pub name: Option<QName>,
    /// Model type (sequence, choice, all)
    pub model: ModelType,
    /// Particles in this group
    pub particles: Vec<Particle>,
}

impl XsdGroup {
    /// Create a new model group
    pub fn new(model: ModelType) -> Self {
        Self {
            name: None,
            model,
            particles: Vec::new(),
        }
    }

    /// Create a named model group
    pub fn named(name: QName, model: ModelType) -> Self {
        Self {
            name: Some(name),
            model,
            particles: Vec::new(),
        }
    }

    /// Shorthand for an anonymous sequence
    pub fn sequence() -> Self {
        Self::new(ModelType::Sequence)
    }

    /// Shorthand for an anonymous choice
    pub fn choice() -> Self {
        Self::new(ModelType::Choice)
    }

    /// Shorthand for an anonymous all group
    pub fn all() -> Self {
        Self::new(ModelType::All)
    }

    /// Add a particle to the group
    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Add an element particle
    pub fn add_element(&mut self, element: ElementId, occurs: Occurs) {
        self.particles.push(Particle::element(element, occurs));
    }

    /// Add a wildcard particle
    pub fn add_any(&mut self, any: XsdAnyElement, occurs: Occurs) {
        self.particles.push(Particle::wildcard(any, occurs));
    }

    /// Add a nested group
    pub fn add_group(&mut self, group: GroupId, occurs: Occurs) {
        self.particles.push(Particle::group(group, occurs));
    }

    /// Builder form of [`XsdGroup::add_particle`]
    pub fn with_particle(mut self, particle: Particle) -> Self {
        self.particles.push(particle);
        self
    }

    /// Builder form of [`XsdGroup::add_element`]
    pub fn with_element(mut self, element: ElementId, occurs: Occurs) -> Self {
        self.add_element(element, occurs);
        self
    }

    /// Builder form of [`XsdGroup::add_group`]
    pub fn with_group(mut self, group: GroupId, occurs: Occurs) -> Self {
        self.add_group(group, occurs);
        self
    }

    /// Check if group has no particles
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of direct child particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Element declarations referenced directly by this group
    pub fn iter_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.particles.iter().filter_map(|p| match p.term {
            super::particles::Term::Element(id) => Some(id),
            _ => None,
        })
    }
}
