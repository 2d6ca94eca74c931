//! Substitution groups
//!
//! Computes which element declarations may appear wherever a head
//! declaration is expected (XSD 1.0 §3.3.6, Substitution Group OK) and
//! resolves instance tags to the declaration that governs them.
//!
//! Groups are built from a reverse index of substitution group
//! affiliations. For each head, the members reachable through that index
//! are collected together with the derivation methods and intermediate
//! blocks of their type chains, so the head's own `block` can be applied
//! last. Both the unfiltered member lists and the final groups are
//! memoized; results are deterministic, so a race to fill the same entry
//! is harmless. A member list cut short by an affiliation cycle or by the
//! nesting limit is never memoized, so the answer for a head does not
//! depend on which heads were asked about first.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::namespaces::QName;

use super::complex_types::DerivationSet;
use super::derivation::{DerivationSteps, TypeDerivationChecker};
use super::globals::{ElementId, GlobalElementResolver, SchemaComponents};

/// A potential member of a substitution group, with the derivation
/// methods and blocks accumulated from the member up to the head
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubstitutionMember {
    /// The member declaration
    pub element: ElementId,
    /// Accumulated methods and intermediate blocks
    pub steps: DerivationSteps,
}

/// Reverse affiliation index: head -> declarations naming it directly
type DirectIndex = IndexMap<ElementId, Vec<ElementId>>;

/// Closure of one head, with the affiliation nesting it needed.
///
/// Only complete closures are memoized. One cut short by a cycle or by the
/// depth limit depends on where the walk started.
#[derive(Debug, Clone)]
struct PotentialGroup {
    members: Arc<[SubstitutionMember]>,
    height: usize,
    complete: bool,
}

impl PotentialGroup {
    fn complete(members: Vec<SubstitutionMember>, height: usize) -> Self {
        Self {
            members: members.into(),
            height,
            complete: true,
        }
    }

    fn truncated() -> Self {
        Self::truncated_with(Vec::new())
    }

    fn truncated_with(members: Vec<SubstitutionMember>) -> Self {
        Self {
            members: members.into(),
            height: 0,
            complete: false,
        }
    }
}

/// Memoizing substitution group calculator for one compiled schema
pub struct SubstitutionRegistry {
    schema: Arc<SchemaComponents>,
    resolver: Arc<dyn GlobalElementResolver + Send + Sync>,
    direct: OnceCell<DirectIndex>,
    potential: RwLock<HashMap<ElementId, PotentialGroup>>,
    groups: RwLock<HashMap<ElementId, Arc<[ElementId]>>>,
}

impl fmt::Debug for SubstitutionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionRegistry")
            .field("elements", &self.schema.element_count())
            .field("indexed", &self.direct.get().map(IndexMap::len))
            .field("cached_groups", &self.groups.read().len())
            .finish_non_exhaustive()
    }
}

impl SubstitutionRegistry {
    /// Create a registry resolving global names through the schema itself
    pub fn new(schema: Arc<SchemaComponents>) -> Self {
        let resolver: Arc<dyn GlobalElementResolver + Send + Sync> = schema.clone();
        Self {
            schema,
            resolver,
            direct: OnceCell::new(),
            potential: RwLock::new(HashMap::new()),
            groups: RwLock::new(HashMap::new()),
        }
    }

    /// Use another resolver for global element lookups
    pub fn with_resolver(mut self, resolver: Arc<dyn GlobalElementResolver + Send + Sync>) -> Self {
        self.resolver = resolver;
        self
    }

    /// The schema this registry works on
    pub fn schema(&self) -> &Arc<SchemaComponents> {
        &self.schema
    }

    fn checker(&self) -> TypeDerivationChecker<'_> {
        TypeDerivationChecker::new(&self.schema)
    }

    fn direct_index(&self) -> &DirectIndex {
        self.direct.get_or_init(|| {
            let mut index = DirectIndex::new();
            for (id, element) in self.schema.elements() {
                if let Some(head) = element.substitution_group {
                    index.entry(head).or_default().push(id);
                }
            }
            debug!(heads = index.len(), "built substitution group index");
            index
        })
    }

    /// Declarations whose affiliation points directly at `head`
    pub fn direct_substitutors(&self, head: ElementId) -> &[ElementId] {
        self.direct_index()
            .get(&head)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Clear the index and every memoized group.
    ///
    /// Takes `&mut self`: no lookup can be in flight while resetting.
    pub fn reset(&mut self) {
        self.direct = OnceCell::new();
        self.potential.get_mut().clear();
        self.groups.get_mut().clear();
        debug!("substitution registry reset");
    }

    /// Number of heads whose final group is memoized
    pub fn cached_group_count(&self) -> usize {
        self.groups.read().len()
    }

    /// All declarations that may substitute for `head`, before `head`'s own
    /// `block` is applied
    pub fn potential_substitution_group(&self, head: ElementId) -> Arc<[SubstitutionMember]> {
        let mut visiting = HashSet::new();
        self.potential_group_in(head, &mut visiting).members
    }

    fn potential_group_in(
        &self,
        head: ElementId,
        visiting: &mut HashSet<ElementId>,
    ) -> PotentialGroup {
        let depth = visiting.len();
        let limits = self.schema.limits();
        let cached = self.potential.read().get(&head).cloned();
        if let Some(group) = cached {
            // a cached closure is only valid where it would not have been cut
            if depth + group.height <= limits.max_substitution_depth {
                return group;
            }
        }

        let Some(head_decl) = self.schema.get_element(head) else {
            return PotentialGroup::complete(Vec::new(), 0);
        };
        let substitutors = self.direct_substitutors(head);
        if substitutors.is_empty() {
            return self.store_potential(head, PotentialGroup::complete(Vec::new(), 0));
        }
        if limits.check_substitution_depth(depth + 1).is_err() {
            warn!(head = %head_decl.name, "substitution group nesting too deep");
            return PotentialGroup::truncated();
        }
        if !visiting.insert(head) {
            warn!(head = %head_decl.name, "substitution group affiliation cycle");
            return PotentialGroup::truncated();
        }

        let checker = self.checker();
        let mut members = Vec::new();
        let mut height = 1;
        let mut complete = true;
        for &sub in substitutors {
            let Some(sub_decl) = self.schema.get_element(sub) else {
                continue;
            };
            let Some(steps) = checker.derivation_steps(sub_decl.type_id, head_decl.type_id) else {
                trace!(member = %sub_decl.name, head = %head_decl.name, "type not derived from head type");
                continue;
            };
            if steps.is_blocked() {
                trace!(member = %sub_decl.name, head = %head_decl.name, "derivation blocked by intermediate type");
                continue;
            }
            members.push(SubstitutionMember { element: sub, steps });

            let sub_block = if sub_decl.type_id == head_decl.type_id {
                DerivationSet::EMPTY
            } else {
                self.schema
                    .get_type(sub_decl.type_id)
                    .map(|t| t.block())
                    .unwrap_or_default()
            };
            let nested = self.potential_group_in(sub, visiting);
            complete &= nested.complete;
            height = height.max(nested.height + 1);
            for member in nested.members.iter() {
                let mut combined = steps.combine(member.steps);
                // sub's type is strictly inside the chain only when the
                // nested member was derived from it
                let member_type = self.schema.get_element(member.element).map(|e| e.type_id);
                if member_type != Some(sub_decl.type_id) {
                    combined.blocks |= sub_block;
                }
                if combined.is_blocked() {
                    continue;
                }
                members.push(SubstitutionMember {
                    element: member.element,
                    steps: combined,
                });
            }
        }
        visiting.remove(&head);

        if complete {
            self.store_potential(head, PotentialGroup::complete(members, height))
        } else {
            PotentialGroup::truncated_with(members)
        }
    }

    fn store_potential(&self, head: ElementId, group: PotentialGroup) -> PotentialGroup {
        self.potential
            .write()
            .entry(head)
            .or_insert(group)
            .clone()
    }

    /// The substitution group of `head`: every other declaration that may
    /// appear where `head` is expected, in discovery order.
    ///
    /// Empty when `head` blocks substitution or is not in the schema.
    pub fn substitution_group(&self, head: ElementId) -> Vec<ElementId> {
        let cached = self.groups.read().get(&head).cloned();
        if let Some(group) = cached {
            return group.to_vec();
        }

        let Some(head_decl) = self.schema.get_element(head) else {
            return Vec::new();
        };

        let group: Arc<[ElementId]> = if head_decl.blocks_substitution() {
            Arc::from(Vec::new())
        } else {
            self.potential_substitution_group(head)
                .iter()
                .filter(|member| member.element != head)
                .filter(|member| !head_decl.block.intersects(member.steps.methods))
                .map(|member| member.element)
                .collect::<IndexSet<_>>()
                .into_iter()
                .collect()
        };
        debug!(head = %head_decl.name, members = group.len(), "computed substitution group");

        self.groups
            .write()
            .entry(head)
            .or_insert(group)
            .to_vec()
    }

    /// Check whether `candidate` may appear where `head` is expected,
    /// using `head`'s own `block`
    pub fn is_substitutable(&self, candidate: ElementId, head: ElementId) -> bool {
        if candidate == head {
            return true;
        }
        match self.schema.get_element(head) {
            Some(head_decl) => self.substitution_group_ok(candidate, head, head_decl.block),
            None => false,
        }
    }

    /// Check whether `candidate` may appear where `head` is expected when
    /// the methods in `blocking` are disallowed
    pub fn substitution_group_ok(
        &self,
        candidate: ElementId,
        head: ElementId,
        blocking: DerivationSet,
    ) -> bool {
        if candidate == head {
            return true;
        }
        if blocking.contains(DerivationSet::SUBSTITUTION) {
            return false;
        }
        let (Some(candidate_decl), Some(head_decl)) =
            (self.schema.get_element(candidate), self.schema.get_element(head))
        else {
            return false;
        };
        if !self.is_affiliated(candidate, head) {
            return false;
        }

        self.checker()
            .is_derivation_allowed(candidate_decl.type_id, head_decl.type_id, blocking)
    }

    /// Follow the affiliation chain of `candidate` looking for `head`
    fn is_affiliated(&self, candidate: ElementId, head: ElementId) -> bool {
        let limits = self.schema.limits();
        let mut current = self
            .schema
            .get_element(candidate)
            .and_then(|e| e.substitution_group);
        // affiliation links followed to reach `current`
        let mut hops = 1;

        while let Some(id) = current {
            if limits.check_substitution_depth(hops).is_err() {
                warn!(
                    candidate = candidate.index(),
                    head = head.index(),
                    "affiliation chain cut short, possible cycle"
                );
                return false;
            }
            if id == head {
                return true;
            }
            hops += 1;
            current = self.schema.get_element(id).and_then(|e| e.substitution_group);
        }
        false
    }

    /// Resolve the declaration governing an instance element named `name`
    /// where `exemplar` is expected.
    ///
    /// The exemplar itself wins on an exact name match. Otherwise, for a
    /// global exemplar that allows substitution, the global declaration
    /// called `name` is returned if it validly substitutes for it.
    pub fn matching_declaration(&self, name: &QName, exemplar: ElementId) -> Option<ElementId> {
        let exemplar_decl = self.schema.get_element(exemplar)?;
        if exemplar_decl.name == *name {
            return Some(exemplar);
        }
        if !exemplar_decl.is_global() || exemplar_decl.blocks_substitution() {
            return None;
        }

        let candidate = self
            .resolver
            .resolve_global(name.namespace(), &name.local_name)?;
        if self.substitution_group_ok(candidate, exemplar, exemplar_decl.block) {
            Some(candidate)
        } else {
            trace!(name = %name, exemplar = %exemplar_decl.name, "global declaration does not substitute");
            None
        }
    }
}
