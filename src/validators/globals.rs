//! Schema component arena
//!
//! All declarations, type definitions and model groups of a compiled schema
//! live in one arena and refer to each other through copyable handles. Base
//! types, substitution group affiliations and group references are therefore
//! plain indices, never owning pointers, and can be walked without borrowing
//! trouble.
//!
//! The arena also keeps the map of global element declarations and serves as
//! the default [`GlobalElementResolver`].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;
use crate::namespaces::QName;

use super::complex_types::{DerivationSet, XsdComplexType};
use super::elements::XsdElement;
use super::groups::XsdGroup;
use super::particles::{Particle, Term};
use super::simple_types::{SimpleTypeVariety, XsdSimpleType};

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(usize);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index)
            }

            /// Position in the arena
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

handle!(
    /// Handle to an element declaration
    ElementId
);
handle!(
    /// Handle to a type definition
    TypeId
);
handle!(
    /// Handle to a model group
    GroupId
);

/// A type definition - either simple or complex
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    /// Simple type
    Simple(XsdSimpleType),
    /// Complex type
    Complex(XsdComplexType),
}

impl TypeDefinition {
    /// Check if this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self, TypeDefinition::Simple(_))
    }

    /// Check if this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, TypeDefinition::Complex(_))
    }

    /// Get the type name
    pub fn name(&self) -> Option<&QName> {
        match self {
            TypeDefinition::Simple(t) => t.name.as_ref(),
            TypeDefinition::Complex(t) => t.name.as_ref(),
        }
    }

    /// Get the base type handle
    pub fn base_type(&self) -> Option<TypeId> {
        match self {
            TypeDefinition::Simple(t) => t.base_type,
            TypeDefinition::Complex(t) => t.base_type,
        }
    }

    /// Derivation method of the step from this type to its base.
    ///
    /// Simple types always derive by restriction.
    pub fn derivation_step(&self) -> DerivationSet {
        match self {
            TypeDefinition::Simple(_) => DerivationSet::RESTRICTION,
            TypeDefinition::Complex(t) => t.derivation.as_set(),
        }
    }

    /// Derivations blocked by this type; always empty for simple types
    pub fn block(&self) -> DerivationSet {
        match self {
            TypeDefinition::Simple(_) => DerivationSet::EMPTY,
            TypeDefinition::Complex(t) => t.block,
        }
    }

    /// Get as simple type
    pub fn as_simple(&self) -> Option<&XsdSimpleType> {
        match self {
            TypeDefinition::Simple(t) => Some(t),
            TypeDefinition::Complex(_) => None,
        }
    }

    /// Get as complex type
    pub fn as_complex(&self) -> Option<&XsdComplexType> {
        match self {
            TypeDefinition::Simple(_) => None,
            TypeDefinition::Complex(t) => Some(t),
        }
    }

    /// Union member types, if this is a union simple type
    pub fn union_members(&self) -> Option<&[TypeId]> {
        match self {
            TypeDefinition::Simple(t) if t.is_union() => Some(t.member_types()),
            _ => None,
        }
    }
}

/// Lookup of global element declarations by name.
///
/// Supplied by whatever owns the compiled grammars; the substitution
/// registry uses it to turn an instance tag into a candidate declaration.
pub trait GlobalElementResolver {
    /// Find the global element declaration `{namespace}local_name`
    fn resolve_global(&self, namespace: Option<&str>, local_name: &str) -> Option<ElementId>;
}

/// Arena of the components of one compiled schema
#[derive(Debug, Clone)]
pub struct SchemaComponents {
    elements: Vec<XsdElement>,
    types: Vec<TypeDefinition>,
    groups: Vec<XsdGroup>,
    global_elements: IndexMap<QName, ElementId>,
    any_type: TypeId,
    any_simple_type: TypeId,
    limits: Limits,
}

impl SchemaComponents {
    /// Create an arena holding only the built-in `anyType` and `anySimpleType`
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an arena with custom limits
    pub fn with_limits(limits: Limits) -> Self {
        let any_type = TypeId::new(0);
        let any_simple_type = TypeId::new(1);
        let types = vec![
            TypeDefinition::Complex(XsdComplexType::any_type()),
            TypeDefinition::Simple(XsdSimpleType::atomic(
                Some(QName::namespaced(crate::XSD_NAMESPACE, "anySimpleType")),
                any_type,
            )),
        ];

        Self {
            elements: Vec::new(),
            types,
            groups: Vec::new(),
            global_elements: IndexMap::new(),
            any_type,
            any_simple_type,
            limits,
        }
    }

    /// The `anyType` sentinel every derivation chain ends at
    pub fn any_type(&self) -> TypeId {
        self.any_type
    }

    /// The `anySimpleType` built-in
    pub fn any_simple_type(&self) -> TypeId {
        self.any_simple_type
    }

    /// Limits applied to this arena and to walks over it
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    fn component_count(&self) -> usize {
        self.elements.len() + self.types.len() + self.groups.len()
    }

    fn check_type(&self, id: TypeId) -> Result<()> {
        if id.index() < self.types.len() {
            Ok(())
        } else {
            Err(Error::DanglingHandle {
                kind: "type",
                index: id.index(),
            })
        }
    }

    fn check_element(&self, id: ElementId) -> Result<()> {
        if id.index() < self.elements.len() {
            Ok(())
        } else {
            Err(Error::DanglingHandle {
                kind: "element",
                index: id.index(),
            })
        }
    }

    fn check_group(&self, id: GroupId) -> Result<()> {
        if id.index() < self.groups.len() {
            Ok(())
        } else {
            Err(Error::DanglingHandle {
                kind: "group",
                index: id.index(),
            })
        }
    }

    fn check_particle(&self, particle: &Particle) -> Result<()> {
        if !particle.occurs.is_well_formed() {
            return Err(ParseError::new(format!(
                "maxOccurs must be greater or equal than minOccurs, got {}",
                particle.occurs
            ))
            .with_location(particle.describe(self).to_string())
            .into());
        }
        match particle.term {
            Term::Element(id) => self.check_element(id),
            Term::Group(id) => self.check_group(id),
            Term::Empty | Term::Wildcard(_) => Ok(()),
        }
    }

    /// Add an element declaration.
    ///
    /// Global declarations are also registered by name.
    pub fn add_element(&mut self, element: XsdElement) -> Result<ElementId> {
        self.limits
            .check_schema_components(self.component_count() + 1)?;
        self.check_type(element.type_id)?;
        if let Some(head) = element.substitution_group {
            self.check_element(head)?;
        }

        let id = ElementId::new(self.elements.len());
        if element.is_global() {
            if self.global_elements.contains_key(&element.name) {
                return Err(Error::DuplicateGlobal(element.name.to_string()));
            }
            self.global_elements.insert(element.name.clone(), id);
        }
        self.elements.push(element);
        Ok(id)
    }

    /// Add a simple type definition
    pub fn add_simple_type(&mut self, simple_type: XsdSimpleType) -> Result<TypeId> {
        self.limits
            .check_schema_components(self.component_count() + 1)?;
        for referenced in simple_type.referenced_types() {
            self.check_type(referenced)?;
        }
        if simple_type.variety == SimpleTypeVariety::Union && simple_type.member_types.is_empty() {
            return Err(ParseError::new("union type must have at least one member type").into());
        }

        let id = TypeId::new(self.types.len());
        self.types.push(TypeDefinition::Simple(simple_type));
        Ok(id)
    }

    /// Add a complex type definition.
    ///
    /// A complex type without a base derives from `anyType` by restriction.
    pub fn add_complex_type(&mut self, mut complex_type: XsdComplexType) -> Result<TypeId> {
        self.limits
            .check_schema_components(self.component_count() + 1)?;
        match complex_type.base_type {
            Some(base) => self.check_type(base)?,
            None => complex_type.base_type = Some(self.any_type),
        }
        if let Some(ref content) = complex_type.content {
            self.check_particle(content)?;
        }

        let id = TypeId::new(self.types.len());
        self.types.push(TypeDefinition::Complex(complex_type));
        Ok(id)
    }

    /// Add a model group.
    ///
    /// Nested groups must already be in the arena, so particle trees are
    /// acyclic by construction.
    pub fn add_group(&mut self, group: XsdGroup) -> Result<GroupId> {
        self.limits
            .check_schema_components(self.component_count() + 1)?;
        for particle in &group.particles {
            self.check_particle(particle)?;
        }

        let id = GroupId::new(self.groups.len());
        self.groups.push(group);
        Ok(id)
    }

    /// Set the substitution group affiliation of an existing declaration.
    ///
    /// Used while compiling, when the head is declared after its members.
    /// No cycle check is made here.
    pub fn set_substitution_group(&mut self, element: ElementId, head: ElementId) -> Result<()> {
        self.check_element(element)?;
        self.check_element(head)?;
        self.elements[element.index()].substitution_group = Some(head);
        Ok(())
    }

    /// Re-point the base type of an existing definition.
    ///
    /// Used while compiling forward references. No cycle check is made here.
    pub fn set_base_type(&mut self, type_id: TypeId, base: TypeId) -> Result<()> {
        self.check_type(type_id)?;
        self.check_type(base)?;
        match &mut self.types[type_id.index()] {
            TypeDefinition::Simple(t) => t.base_type = Some(base),
            TypeDefinition::Complex(t) => t.base_type = Some(base),
        }
        Ok(())
    }

    /// Get an element declaration
    pub fn get_element(&self, id: ElementId) -> Option<&XsdElement> {
        self.elements.get(id.index())
    }

    /// Get a type definition
    pub fn get_type(&self, id: TypeId) -> Option<&TypeDefinition> {
        self.types.get(id.index())
    }

    /// Get a model group
    pub fn get_group(&self, id: GroupId) -> Option<&XsdGroup> {
        self.groups.get(id.index())
    }

    /// Look up a global element declaration by name
    pub fn global_element(&self, name: &QName) -> Option<ElementId> {
        self.global_elements.get(name).copied()
    }

    /// Iterate over global element declarations in declaration order
    pub fn global_elements(&self) -> impl Iterator<Item = (&QName, ElementId)> + '_ {
        self.global_elements.iter().map(|(name, id)| (name, *id))
    }

    /// Iterate over all element declarations
    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &XsdElement)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId::new(i), e))
    }

    /// Number of element declarations
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of type definitions, built-ins included
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

impl Default for SchemaComponents {
    fn default() -> Self {
        Self::new()
    }
}

impl GlobalElementResolver for SchemaComponents {
    fn resolve_global(&self, namespace: Option<&str>, local_name: &str) -> Option<ElementId> {
        let name = QName::new(namespace, local_name);
        self.global_element(&name)
    }
}
