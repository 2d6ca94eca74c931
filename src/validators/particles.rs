//! XSD Particle Schema Components
//!
//! This module implements the particle model for XSD elements, groups, and wildcards.
//! Particles define occurrence constraints (minOccurs, maxOccurs) for schema components.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#p

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Result};

use super::globals::{ElementId, GroupId, SchemaComponents};
use super::groups::ModelType;
use super::wildcards::XsdAnyElement;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max_occurs means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// One or more (1, unbounded)
    pub fn one_or_more() -> Self {
        Self { min: 1, max: None }
    }

    /// Empty (0, 0)
    pub fn empty() -> Self {
        Self { min: 0, max: Some(0) }
    }

    /// Check if this range admits zero occurrences
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Check if this range admits nothing but zero occurrences
    pub fn is_empty(&self) -> bool {
        self.max == Some(0)
    }

    /// Check if the maximum is unbounded
    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }

    /// Check that maxOccurs is not lower than minOccurs
    pub fn is_well_formed(&self) -> bool {
        match self.max {
            Some(max) => self.min <= max,
            None => true,
        }
    }

    /// Scale a group range by the occurrence bounds of the particle holding it.
    ///
    /// An unbounded group stays unbounded. A non-empty group repeated an
    /// unbounded number of times is unbounded; an empty one stays empty.
    pub fn scaled_by(self, outer: Occurs) -> Occurs {
        let min = self.min.saturating_mul(outer.min);
        let max = match (self.max, outer.max) {
            (None, _) => None,
            (Some(0), _) => Some(0),
            (Some(_), None) => None,
            (Some(a), Some(b)) => Some(a.saturating_mul(b)),
        };
        Occurs { min, max }
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}, {}]", self.min, max),
            None => write!(f, "[{}, unbounded]", self.min),
        }
    }
}

/// Parse minOccurs/maxOccurs from XML attribute values
pub fn parse_occurs(min_occurs: Option<&str>, max_occurs: Option<&str>) -> Result<Occurs> {
    let mut occurs = Occurs::once();

    if let Some(min_str) = min_occurs {
        occurs.min = min_str.trim().parse::<u32>().map_err(|_| {
            ParseError::new("minOccurs value is not a valid non-negative integer")
        })?;
    }

    match max_occurs.map(str::trim) {
        Some("unbounded") => occurs.max = None,
        Some(max_str) => {
            let max = max_str.parse::<u32>().map_err(|_| {
                ParseError::new("maxOccurs value must be a non-negative integer or 'unbounded'")
            })?;
            if occurs.min > max {
                return Err(ParseError::new(
                    "maxOccurs must be 'unbounded' or greater than minOccurs",
                )
                .into());
            }
            occurs.max = Some(max);
        }
        None => {
            if occurs.min > 1 {
                return Err(
                    ParseError::new("minOccurs must be lesser or equal than maxOccurs").into(),
                );
            }
        }
    }

    Ok(occurs)
}

/// The term a particle points at
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// No content
    Empty,
    /// Element declaration
    Element(ElementId),
    /// Element wildcard (xs:any)
    Wildcard(XsdAnyElement),
    /// Model group (sequence, choice, all)
    Group(GroupId),
}

/// An occurrence-constrained reference to a term
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// The term
    pub term: Term,
    /// Occurrence constraints
    pub occurs: Occurs,
}

impl Particle {
    /// Create a new particle
    pub fn new(term: Term, occurs: Occurs) -> Self {
        Self { term, occurs }
    }

    /// The empty particle
    pub fn empty() -> Self {
        Self::new(Term::Empty, Occurs::empty())
    }

    /// Particle for an element declaration
    pub fn element(element: ElementId, occurs: Occurs) -> Self {
        Self::new(Term::Element(element), occurs)
    }

    /// Particle for a wildcard
    pub fn wildcard(any: XsdAnyElement, occurs: Occurs) -> Self {
        Self::new(Term::Wildcard(any), occurs)
    }

    /// Particle for a model group
    pub fn group(group: GroupId, occurs: Occurs) -> Self {
        Self::new(Term::Group(group), occurs)
    }

    /// Get minimum occurrences
    pub fn min_occurs(&self) -> u32 {
        self.occurs.min
    }

    /// Get maximum occurrences (None = unbounded)
    pub fn max_occurs(&self) -> Option<u32> {
        self.occurs.max
    }

    /// Render this particle against the components it references
    pub fn describe<'a>(&'a self, schema: &'a SchemaComponents) -> ParticleDescription<'a> {
        ParticleDescription {
            particle: self,
            schema,
        }
    }
}

/// Human-readable rendering of a particle, e.g. `(a,b|c){0-UNBOUNDED}`
pub struct ParticleDescription<'a> {
    particle: &'a Particle,
    schema: &'a SchemaComponents,
}

impl ParticleDescription<'_> {
    fn write_term(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.particle.term {
            Term::Empty => write!(f, "EMPTY"),
            Term::Element(id) => match self.schema.get_element(*id) {
                Some(element) => write!(f, "{}", element.name),
                None => write!(f, "#{}", id.index()),
            },
            Term::Wildcard(any) => write!(f, "({})", any),
            Term::Group(id) => {
                let Some(group) = self.schema.get_group(*id) else {
                    return write!(f, "#{}", id.index());
                };
                let separator = match group.model {
                    ModelType::Choice => '|',
                    ModelType::Sequence | ModelType::All => ',',
                };
                if group.model == ModelType::All {
                    write!(f, "all")?;
                }
                write!(f, "(")?;
                for (i, child) in group.particles.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", separator)?;
                    }
                    write!(f, "{}", child.describe(self.schema))?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for ParticleDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_term(f)?;

        let Occurs { min, max } = self.particle.occurs;
        if (min, max) == (0, Some(0)) || (min, max) == (1, Some(1)) {
            return Ok(());
        }
        match max {
            None => write!(f, "{{{}-UNBOUNDED}}", min),
            Some(max) if max != min => write!(f, "{{{}-{}}}", min, max),
            Some(_) => write!(f, "{{{}}}", min),
        }
    }
}

/// Helper for calculating combined ranges of model group children
#[derive(Debug, Clone, Copy)]
pub struct OccursCalculator {
    /// Calculated minimum occurrences
    pub min_occurs: u32,
    /// Calculated maximum occurrences (None = unbounded)
    pub max_occurs: Option<u32>,
    count: usize,
}

impl OccursCalculator {
    /// Create a new calculator initialized to (0, 0)
    pub fn new() -> Self {
        Self {
            min_occurs: 0,
            max_occurs: Some(0),
            count: 0,
        }
    }

    /// Get as Occurs
    pub fn occurs(&self) -> Occurs {
        Occurs::new(self.min_occurs, self.max_occurs)
    }

    /// Add another particle's range (for sequence and all)
    pub fn add(&mut self, other: Occurs) {
        self.count += 1;
        self.min_occurs = self.min_occurs.saturating_add(other.min);
        self.max_occurs = match (self.max_occurs, other.max) {
            (Some(a), Some(b)) => Some(a.saturating_add(b)),
            _ => None,
        };
    }

    /// Fold in an alternative (for choice): min of mins, max of maxes
    pub fn choose(&mut self, other: Occurs) {
        self.count += 1;
        if self.count == 1 {
            self.min_occurs = other.min;
            self.max_occurs = other.max;
            return;
        }
        self.min_occurs = self.min_occurs.min(other.min);
        self.max_occurs = match (self.max_occurs, other.max) {
            (Some(a), Some(b)) => Some(a.max(b)),
            _ => None,
        };
    }

    /// Multiply by the occurrence bounds of the enclosing particle
    pub fn multiply(&mut self, outer: Occurs) {
        let scaled = self.occurs().scaled_by(outer);
        self.min_occurs = scaled.min;
        self.max_occurs = scaled.max;
    }

    /// Reset to (0, 0)
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for OccursCalculator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occurs_presets() {
        assert_eq!(Occurs::once(), Occurs::new(1, Some(1)));
        assert_eq!(Occurs::optional(), Occurs::new(0, Some(1)));
        assert_eq!(Occurs::zero_or_more(), Occurs::new(0, None));
        assert_eq!(Occurs::one_or_more(), Occurs::new(1, None));
        assert_eq!(Occurs::empty(), Occurs::new(0, Some(0)));
    }

    #[test]
    fn test_occurs_predicates() {
        let optional = Occurs::optional();
        assert!(optional.is_emptiable());
        assert!(!optional.is_empty());
        assert!(!optional.is_unbounded());

        let empty = Occurs::empty();
        assert!(empty.is_emptiable());
        assert!(empty.is_empty());

        assert!(Occurs::new(2, Some(5)).is_well_formed());
        assert!(!Occurs::new(5, Some(2)).is_well_formed());
        assert!(Occurs::one_or_more().is_well_formed());
    }

    #[test]
    fn test_scaled_by() {
        assert_eq!(
            Occurs::new(2, Some(3)).scaled_by(Occurs::new(2, Some(4))),
            Occurs::new(4, Some(12))
        );
        // unbounded group stays unbounded even when repeated at most zero times
        assert_eq!(
            Occurs::new(1, None).scaled_by(Occurs::new(0, Some(0))),
            Occurs::new(0, None)
        );
        // empty group stays empty under unbounded repetition
        assert_eq!(
            Occurs::empty().scaled_by(Occurs::one_or_more()),
            Occurs::empty()
        );
        assert_eq!(
            Occurs::new(1, Some(2)).scaled_by(Occurs::zero_or_more()),
            Occurs::zero_or_more()
        );
    }

    #[test]
    fn test_occurs_display() {
        assert_eq!(Occurs::new(1, Some(3)).to_string(), "[1, 3]");
        assert_eq!(Occurs::zero_or_more().to_string(), "[0, unbounded]");
    }

    #[test]
    fn test_parse_occurs_default() {
        let occurs = parse_occurs(None, None).unwrap();
        assert_eq!(occurs, Occurs::once());
    }

    #[test]
    fn test_parse_occurs_values() {
        let occurs = parse_occurs(Some("0"), Some("5")).unwrap();
        assert_eq!(occurs, Occurs::new(0, Some(5)));

        let occurs = parse_occurs(Some("1"), Some("unbounded")).unwrap();
        assert_eq!(occurs, Occurs::new(1, None));
    }

    #[test]
    fn test_parse_occurs_errors() {
        assert!(parse_occurs(Some("abc"), None).is_err());
        assert!(parse_occurs(None, Some("abc")).is_err());
        assert!(parse_occurs(Some("5"), Some("3")).is_err());
        assert!(parse_occurs(Some("5"), None).is_err());
        assert!(parse_occurs(Some("-1"), None).is_err());
    }

    #[test]
    fn test_occurs_calculator_add() {
        let mut calc = OccursCalculator::new();
        calc.add(Occurs::new(1, Some(2)));
        assert_eq!(calc.occurs(), Occurs::new(1, Some(2)));

        calc.add(Occurs::new(2, Some(3)));
        assert_eq!(calc.occurs(), Occurs::new(3, Some(5)));

        calc.add(Occurs::new(1, None));
        assert_eq!(calc.occurs(), Occurs::new(4, None));
    }

    #[test]
    fn test_occurs_calculator_choose() {
        let mut calc = OccursCalculator::new();
        calc.choose(Occurs::new(2, Some(3)));
        assert_eq!(calc.occurs(), Occurs::new(2, Some(3)));

        calc.choose(Occurs::new(1, Some(5)));
        assert_eq!(calc.occurs(), Occurs::new(1, Some(5)));

        calc.choose(Occurs::new(4, None));
        assert_eq!(calc.occurs(), Occurs::new(1, None));
    }

    #[test]
    fn test_occurs_calculator_choose_nothing() {
        let calc = OccursCalculator::new();
        assert_eq!(calc.occurs(), Occurs::empty());
    }

    #[test]
    fn test_occurs_calculator_multiply() {
        let mut calc = OccursCalculator::new();
        calc.add(Occurs::new(2, Some(3)));
        calc.multiply(Occurs::new(2, Some(4)));
        assert_eq!(calc.occurs(), Occurs::new(4, Some(12)));

        calc.reset();
        assert_eq!(calc.occurs(), Occurs::empty());
    }
}
