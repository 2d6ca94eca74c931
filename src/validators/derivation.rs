//! Type derivation checks
//!
//! Decides whether a type is validly derived from another given a set of
//! blocked derivation methods (Type Derivation OK, XSD 1.0 §3.4.6 and
//! §3.14.6). The walk goes up the base-type chain of the derived type and
//! collects:
//!
//! - the derivation method of every step (simple steps count as restriction);
//! - the `block` sets of the complex types passed on the way, strictly
//!   between the derived type and the base.
//!
//! The walk ends at the base or at `anyType`. Reaching `anyType` without
//! meeting the base fails, unless the base is a union, in which case every
//! member type is tried in turn.

use tracing::{trace, warn};

use super::complex_types::DerivationSet;
use super::globals::{SchemaComponents, TypeId};

/// Methods and blocks accumulated along one derivation chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DerivationSteps {
    /// Derivation methods used by the steps taken
    pub methods: DerivationSet,
    /// Blocks declared by intermediate complex types
    pub blocks: DerivationSet,
}

impl DerivationSteps {
    /// Check whether one of the steps uses a method blocked along the chain
    pub fn is_blocked(&self) -> bool {
        self.methods.intersects(self.blocks)
    }

    /// Concatenate two chains
    pub fn combine(self, other: DerivationSteps) -> DerivationSteps {
        DerivationSteps {
            methods: self.methods | other.methods,
            blocks: self.blocks | other.blocks,
        }
    }
}

enum Walk {
    Reached(DerivationSteps),
    NotReached,
    Cut,
}

/// Checks type derivation over a component arena
#[derive(Debug, Clone, Copy)]
pub struct TypeDerivationChecker<'a> {
    schema: &'a SchemaComponents,
    max_depth: usize,
}

impl<'a> TypeDerivationChecker<'a> {
    /// Create a checker bounded by the arena's limits
    pub fn new(schema: &'a SchemaComponents) -> Self {
        Self {
            schema,
            max_depth: schema.limits().max_derivation_depth,
        }
    }

    /// Override the maximum number of base-type steps followed
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn walk(&self, derived: TypeId, base: TypeId) -> Walk {
        let any_type = self.schema.any_type();
        let mut steps = DerivationSteps::default();
        let mut current = derived;
        let mut depth = 0;

        while current != base && current != any_type {
            if depth >= self.max_depth {
                warn!(
                    derived = derived.index(),
                    base = base.index(),
                    depth,
                    "derivation chain cut short, possible base type cycle"
                );
                return Walk::Cut;
            }
            let Some(definition) = self.schema.get_type(current) else {
                return Walk::NotReached;
            };

            steps.methods |= definition.derivation_step();
            let next = definition.base_type().unwrap_or(any_type);
            if next != base {
                if let Some(complex) = self.schema.get_type(next).and_then(|t| t.as_complex()) {
                    steps.blocks |= complex.block;
                }
            }
            current = next;
            depth += 1;
        }

        if current == base {
            Walk::Reached(steps)
        } else {
            Walk::NotReached
        }
    }

    /// Methods and blocks collected from `derived` up to `base`.
    ///
    /// Returns None when `base` is not on the chain of `derived`. Union
    /// members are not tried.
    pub fn derivation_steps(&self, derived: TypeId, base: TypeId) -> Option<DerivationSteps> {
        match self.walk(derived, base) {
            Walk::Reached(steps) => Some(steps),
            Walk::NotReached | Walk::Cut => None,
        }
    }

    /// Check whether `derived` is validly derived from `base` when the
    /// methods in `blocking` are disallowed
    pub fn is_derivation_allowed(
        &self,
        derived: TypeId,
        base: TypeId,
        blocking: DerivationSet,
    ) -> bool {
        self.allowed(derived, base, blocking, 0)
    }

    fn allowed(&self, derived: TypeId, base: TypeId, blocking: DerivationSet, depth: usize) -> bool {
        match self.walk(derived, base) {
            Walk::Reached(steps) => {
                let allowed = !steps.methods.intersects(blocking | steps.blocks);
                trace!(
                    derived = derived.index(),
                    base = base.index(),
                    methods = steps.methods.bits(),
                    blocks = steps.blocks.bits(),
                    allowed,
                    "derivation chain reached base"
                );
                allowed
            }
            Walk::Cut => false,
            Walk::NotReached => {
                let Some(members) = self.schema.get_type(base).and_then(|t| t.union_members())
                else {
                    return false;
                };
                if depth >= self.max_depth {
                    warn!(base = base.index(), "union member nesting too deep");
                    return false;
                }
                members
                    .iter()
                    .any(|member| self.allowed(derived, *member, blocking, depth + 1))
            }
        }
    }
}
