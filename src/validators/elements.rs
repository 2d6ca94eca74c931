//! XSD Element declarations
//!
//! An element declaration is identified by its qualified name. Its
//! substitution group affiliation is a non-owning handle to the head
//! declaration it may replace.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Element_Declarations

use crate::namespaces::QName;

use super::complex_types::DerivationSet;
use super::globals::{ElementId, TypeId};

/// The scope of an element declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ElementScope {
    /// Scope not yet determined
    Absent,
    /// Global element declaration
    #[default]
    Global,
    /// Local element declaration (within a complex type or group)
    Local,
}

impl std::fmt::Display for ElementScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "absent"),
            Self::Global => write!(f, "global"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// XSD Element declaration
#[derive(Debug, Clone, PartialEq)]
pub struct XsdElement {
    /// Element name; the namespace is the target namespace
    pub name: QName,

    /// Type definition
    pub type_id: TypeId,

    /// Substitution group affiliation (the head this element may replace)
    pub substitution_group: Option<ElementId>,

    /// Element scope
    pub scope: ElementScope,

    /// Disallowed substitutions
    pub block: DerivationSet,

    /// Substitution group exclusions
    pub final_deriv: DerivationSet,

    /// Whether this element is abstract
    pub abstract_element: bool,

    /// Whether this element is nillable
    pub nillable: bool,
}

impl XsdElement {
    /// Create a new global element with a given name and type
    pub fn new(name: QName, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            substitution_group: None,
            scope: ElementScope::default(),
            block: DerivationSet::EMPTY,
            final_deriv: DerivationSet::EMPTY,
            abstract_element: false,
            nillable: false,
        }
    }

    /// Create a local element with a given name and type
    pub fn local(name: QName, type_id: TypeId) -> Self {
        Self::new(name, type_id).with_scope(ElementScope::Local)
    }

    /// Target namespace
    pub fn target_namespace(&self) -> Option<&str> {
        self.name.namespace()
    }

    /// Check if this element has the given name
    pub fn is_matching(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.name.matches(namespace, local_name)
    }

    /// Check if this is a global element
    pub fn is_global(&self) -> bool {
        self.scope == ElementScope::Global
    }

    /// Check if this is a local element
    pub fn is_local(&self) -> bool {
        self.scope == ElementScope::Local
    }

    /// Check if this element refuses to be substituted
    pub fn blocks_substitution(&self) -> bool {
        self.block.contains(DerivationSet::SUBSTITUTION)
    }

    /// Set substitution group
    pub fn with_substitution_group(mut self, head: ElementId) -> Self {
        self.substitution_group = Some(head);
        self
    }

    /// Set scope
    pub fn with_scope(mut self, scope: ElementScope) -> Self {
        self.scope = scope;
        self
    }

    /// Set block flags
    pub fn with_block(mut self, block: DerivationSet) -> Self {
        self.block = block;
        self
    }

    /// Set final flags
    pub fn with_final(mut self, final_deriv: DerivationSet) -> Self {
        self.final_deriv = final_deriv;
        self
    }

    /// Set abstract flag
    pub fn with_abstract(mut self, abstract_element: bool) -> Self {
        self.abstract_element = abstract_element;
        self
    }

    /// Set nillable flag
    pub fn with_nillable(mut self, nillable: bool) -> Self {
        self.nillable = nillable;
        self
    }
}
