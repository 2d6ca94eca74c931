//! XSD Simple Type definitions
//!
//! Only the structural side of simple types lives here: variety, base type,
//! list item type and union members. Every simple type derivation step counts
//! as a restriction when walking a derivation chain.
//!
//! See: https://www.w3.org/TR/xmlschema-2/

use serde::{Deserialize, Serialize};

use crate::namespaces::QName;

use super::complex_types::DerivationSet;
use super::globals::TypeId;

/// Variety of a simple type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SimpleTypeVariety {
    /// Atomic type (single value)
    Atomic,
    /// List type (whitespace-separated values)
    List,
    /// Union type (value matches one of several types)
    Union,
}

impl std::fmt::Display for SimpleTypeVariety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Atomic => write!(f, "atomic"),
            Self::List => write!(f, "list"),
            Self::Union => write!(f, "union"),
        }
    }
}

/// XSD Simple Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct XsdSimpleType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,
    /// Variety
    pub variety: SimpleTypeVariety,
    /// Base type; a missing base is read as `anyType`
    pub base_type: Option<TypeId>,
    /// Item type of a list
    pub item_type: Option<TypeId>,
    /// Ordered member types of a union
    pub member_types: Vec<TypeId>,
    /// Final derivation flags
    pub final_deriv: DerivationSet,
}

impl XsdSimpleType {
    /// Create an atomic type restricting `base`
    pub fn atomic(name: Option<QName>, base: TypeId) -> Self {
        Self {
            name,
            variety: SimpleTypeVariety::Atomic,
            base_type: Some(base),
            item_type: None,
            member_types: Vec::new(),
            final_deriv: DerivationSet::EMPTY,
        }
    }

    /// Create a list type of `item_type`
    pub fn list(name: Option<QName>, base: TypeId, item_type: TypeId) -> Self {
        Self {
            name,
            variety: SimpleTypeVariety::List,
            base_type: Some(base),
            item_type: Some(item_type),
            member_types: Vec::new(),
            final_deriv: DerivationSet::EMPTY,
        }
    }

    /// Create a union type over `member_types`, in order
    pub fn union(name: Option<QName>, base: TypeId, member_types: Vec<TypeId>) -> Self {
        Self {
            name,
            variety: SimpleTypeVariety::Union,
            base_type: Some(base),
            item_type: None,
            member_types,
            final_deriv: DerivationSet::EMPTY,
        }
    }

    /// Set final flags
    pub fn with_final(mut self, final_deriv: DerivationSet) -> Self {
        self.final_deriv = final_deriv;
        self
    }

    /// Check if this is a union type
    pub fn is_union(&self) -> bool {
        self.variety == SimpleTypeVariety::Union
    }

    /// Member types of a union; empty for other varieties
    pub fn member_types(&self) -> &[TypeId] {
        match self.variety {
            SimpleTypeVariety::Union => &self.member_types,
            _ => &[],
        }
    }

    /// Every type handle this definition references
    pub(crate) fn referenced_types(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.base_type
            .into_iter()
            .chain(self.item_type)
            .chain(self.member_types.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_members() {
        let base = TypeId::new(1);
        let union = XsdSimpleType::union(
            Some(QName::local("u")),
            base,
            vec![TypeId::new(2), TypeId::new(3)],
        );
        assert!(union.is_union());
        assert_eq!(union.member_types(), &[TypeId::new(2), TypeId::new(3)]);
        assert_eq!(union.variety.to_string(), "union");
    }

    #[test]
    fn test_atomic_has_no_members() {
        let atomic = XsdSimpleType::atomic(None, TypeId::new(1));
        assert!(!atomic.is_union());
        assert!(atomic.member_types().is_empty());
    }

    #[test]
    fn test_referenced_types() {
        let list = XsdSimpleType::list(None, TypeId::new(1), TypeId::new(4))
            .with_final(DerivationSet::RESTRICTION);
        assert_eq!(
            list.referenced_types().collect::<Vec<_>>(),
            vec![TypeId::new(1), TypeId::new(4)]
        );
        assert_eq!(list.final_deriv, DerivationSet::RESTRICTION);
    }
}
