//! Effective total ranges of particles
//!
//! Computes the minimum and maximum number of elements a particle can
//! match (XSD 1.0 §3.8.6 and §3.9.6). Content-model builders use these to
//! decide emptiability and to bound repetition.
//!
//! - Element and wildcard terms contribute their own occurrence bounds.
//! - Sequence and all groups sum the ranges of their children.
//! - Choice groups take the smallest minimum and the largest maximum.
//! - The group range is then scaled by the occurrence bounds of the
//!   particle holding the group.
//!
//! Group ranges are memoized per [`GroupId`]; groups are immutable once in
//! the arena, so a cached range never goes stale.
//!
//! Reference: https://www.w3.org/TR/xmlschema-1/#cos-seq-range

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::globals::{GroupId, SchemaComponents};
use super::groups::ModelType;
use super::particles::{Occurs, OccursCalculator, Particle, Term};

/// Effective range calculator for the particles of one schema
#[derive(Debug)]
pub struct ParticleRangeEngine {
    schema: Arc<SchemaComponents>,
    group_ranges: RwLock<HashMap<GroupId, Occurs>>,
}

impl ParticleRangeEngine {
    /// Create an engine over a component arena
    pub fn new(schema: Arc<SchemaComponents>) -> Self {
        Self {
            schema,
            group_ranges: RwLock::new(HashMap::new()),
        }
    }

    /// The schema this engine works on
    pub fn schema(&self) -> &Arc<SchemaComponents> {
        &self.schema
    }

    /// Effective total range of a particle
    pub fn effective_range(&self, particle: &Particle) -> Occurs {
        match &particle.term {
            Term::Empty => Occurs::empty(),
            Term::Element(_) | Term::Wildcard(_) => particle.occurs,
            Term::Group(id) => self.group_range(*id).scaled_by(particle.occurs),
        }
    }

    /// Effective minimum number of elements matched by a particle
    pub fn min_effective_range(&self, particle: &Particle) -> u32 {
        self.effective_range(particle).min
    }

    /// Effective maximum number of elements matched by a particle
    /// (None = unbounded)
    pub fn max_effective_range(&self, particle: &Particle) -> Option<u32> {
        self.effective_range(particle).max
    }

    /// Check whether a particle can match nothing
    pub fn is_emptiable(&self, particle: &Particle) -> bool {
        self.min_effective_range(particle) == 0
    }

    /// Check whether a particle is structurally empty: the empty term, or a
    /// model group made only of empty particles
    pub fn is_empty(&self, particle: &Particle) -> bool {
        match &particle.term {
            Term::Empty => true,
            Term::Element(_) | Term::Wildcard(_) => false,
            Term::Group(id) => match self.schema.get_group(*id) {
                Some(group) => group.particles.iter().all(|p| self.is_empty(p)),
                None => true,
            },
        }
    }

    /// Effective range of a model group on its own, before the enclosing
    /// particle's occurrence bounds are applied
    pub fn group_range(&self, id: GroupId) -> Occurs {
        let cached = self.group_ranges.read().get(&id).copied();
        if let Some(range) = cached {
            return range;
        }

        let Some(group) = self.schema.get_group(id) else {
            return Occurs::empty();
        };
        let mut calculator = OccursCalculator::new();
        for child in &group.particles {
            let range = self.effective_range(child);
            match group.model {
                ModelType::Sequence | ModelType::All => calculator.add(range),
                ModelType::Choice => calculator.choose(range),
            }
        }
        let range = calculator.occurs();
        debug!(group = id.index(), model = %group.model, %range, "computed group range");

        *self.group_ranges.write().entry(id).or_insert(range)
    }
}
