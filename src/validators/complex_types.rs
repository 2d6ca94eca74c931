//! XSD Complex Type definitions and derivation sets
//!
//! A complex type records how it was derived from its base (extension or
//! restriction) and which derivations it blocks. The `block`/`final`
//! attributes of types and element declarations share one bitset
//! representation, [`DerivationSet`].
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Complex_Type_Definitions

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::namespaces::QName;

use super::globals::TypeId;
use super::particles::Particle;

/// Derivation method for complex types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DerivationMethod {
    /// Type derived by restriction
    #[default]
    Restriction,
    /// Type derived by extension
    Extension,
}

impl DerivationMethod {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "restriction" => Some(Self::Restriction),
            "extension" => Some(Self::Extension),
            _ => None,
        }
    }

    /// The single-bit set for this method
    pub fn as_set(self) -> DerivationSet {
        match self {
            Self::Restriction => DerivationSet::RESTRICTION,
            Self::Extension => DerivationSet::EXTENSION,
        }
    }
}

impl fmt::Display for DerivationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restriction => write!(f, "restriction"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// Bitset of derivation methods, used for `block`, `final` and for the
/// methods accumulated while walking a derivation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivationSet(u8);

impl DerivationSet {
    /// No derivation method
    pub const EMPTY: Self = Self(0);
    /// Derivation by extension
    pub const EXTENSION: Self = Self(1);
    /// Derivation by restriction
    pub const RESTRICTION: Self = Self(2);
    /// Substitution-group substitution
    pub const SUBSTITUTION: Self = Self(4);
    /// Derivation by list
    pub const LIST: Self = Self(8);
    /// Derivation by union
    pub const UNION: Self = Self(16);

    const TOKENS: [(&'static str, Self); 5] = [
        ("extension", Self::EXTENSION),
        ("restriction", Self::RESTRICTION),
        ("substitution", Self::SUBSTITUTION),
        ("list", Self::LIST),
        ("union", Self::UNION),
    ];

    /// All derivations blocked/finalized (`#all`)
    pub fn all() -> Self {
        Self(0b1_1111)
    }

    /// Build from raw bits
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::all().0)
    }

    /// Raw bits
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Parse a `block` or `final` attribute value
    pub fn from_attr(value: &str) -> Result<Self, ParseError> {
        let mut flags = Self::EMPTY;
        for token in value.split_whitespace() {
            if token == "#all" {
                return Ok(Self::all());
            }
            let (_, bit) = Self::TOKENS
                .iter()
                .find(|(name, _)| *name == token)
                .ok_or_else(|| {
                    ParseError::new(format!("unknown derivation method '{}'", token))
                })?;
            flags |= *bit;
        }
        Ok(flags)
    }

    /// True if no method is in the set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every method of `other` is in the set
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if the two sets share at least one method
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Check if a derivation method is in the set
    pub fn is_blocked(self, method: DerivationMethod) -> bool {
        self.intersects(method.as_set())
    }
}

impl BitOr for DerivationSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DerivationSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for DerivationSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl From<DerivationMethod> for DerivationSet {
    fn from(method: DerivationMethod) -> Self {
        method.as_set()
    }
}

impl fmt::Display for DerivationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, bit) in Self::TOKENS {
            if self.contains(bit) {
                if !first {
                    write!(f, " ")?;
                }
                write!(f, "{}", name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// XSD Complex Type definition
#[derive(Debug, Clone, PartialEq)]
pub struct XsdComplexType {
    /// Type name (None for anonymous types)
    pub name: Option<QName>,

    /// Base type; None only for the `anyType` root
    pub base_type: Option<TypeId>,

    /// How this type was derived from its base
    pub derivation: DerivationMethod,

    /// Content particle (None for empty or simple content)
    pub content: Option<Particle>,

    /// Whether this type is abstract
    pub abstract_type: bool,

    /// Block derivation flags
    pub block: DerivationSet,

    /// Final derivation flags
    pub final_deriv: DerivationSet,
}

impl XsdComplexType {
    /// Create a complex type derived from `base`
    pub fn new(name: Option<QName>, base: TypeId, derivation: DerivationMethod) -> Self {
        Self {
            name,
            base_type: Some(base),
            derivation,
            content: None,
            abstract_type: false,
            block: DerivationSet::EMPTY,
            final_deriv: DerivationSet::EMPTY,
        }
    }

    /// The root of the type hierarchy
    pub(crate) fn any_type() -> Self {
        Self {
            name: Some(QName::namespaced(crate::XSD_NAMESPACE, "anyType")),
            base_type: None,
            derivation: DerivationMethod::Restriction,
            content: None,
            abstract_type: false,
            block: DerivationSet::EMPTY,
            final_deriv: DerivationSet::EMPTY,
        }
    }

    /// Check if a derivation method is blocked by this type
    pub fn is_derivation_blocked(&self, method: DerivationMethod) -> bool {
        self.block.is_blocked(method)
    }

    /// Check if a derivation method is final for this type
    pub fn is_derivation_final(&self, method: DerivationMethod) -> bool {
        self.final_deriv.is_blocked(method)
    }

    /// Set the base type
    pub fn set_base_type(&mut self, base: TypeId, method: DerivationMethod) {
        self.base_type = Some(base);
        self.derivation = method;
    }
}

/// Builder for complex types
#[derive(Debug, Default)]
pub struct ComplexTypeBuilder {
    name: Option<QName>,
    base: Option<(TypeId, DerivationMethod)>,
    content: Option<Particle>,
    abstract_type: bool,
    block: DerivationSet,
    final_deriv: DerivationSet,
}

impl ComplexTypeBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the type name
    pub fn name(mut self, name: QName) -> Self {
        self.name = Some(name);
        self
    }

    /// Set the base type and derivation method
    pub fn base(mut self, base: TypeId, method: DerivationMethod) -> Self {
        self.base = Some((base, method));
        self
    }

    /// Set the content particle
    pub fn content(mut self, content: Particle) -> Self {
        self.content = Some(content);
        self
    }

    /// Set abstract flag
    pub fn abstract_type(mut self, abstract_type: bool) -> Self {
        self.abstract_type = abstract_type;
        self
    }

    /// Set block flags
    pub fn block(mut self, block: DerivationSet) -> Self {
        self.block = block;
        self
    }

    /// Set final flags
    pub fn final_deriv(mut self, final_deriv: DerivationSet) -> Self {
        self.final_deriv = final_deriv;
        self
    }

    /// Build the complex type.
    ///
    /// A type without an explicit base is left rootless; the component
    /// arena treats a missing base as `anyType`.
    pub fn build(self) -> XsdComplexType {
        let (base_type, derivation) = match self.base {
            Some((base, method)) => (Some(base), method),
            None => (None, DerivationMethod::Restriction),
        };
        XsdComplexType {
            name: self.name,
            base_type,
            derivation,
            content: self.content,
            abstract_type: self.abstract_type,
            block: self.block,
            final_deriv: self.final_deriv,
        }
    }
}
