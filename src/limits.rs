//! Limits and constraints for schema component walks
//!
//! Base-type chains and substitution-group affiliation chains are
//! back-references that the compiler promises to keep acyclic. The walks
//! over them are still bounded by these limits so that a broken graph
//! terminates instead of looping.

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of base-type steps followed in a derivation walk
    pub max_derivation_depth: usize,

    /// Maximum number of affiliation steps followed in a substitution walk
    pub max_substitution_depth: usize,

    /// Maximum number of schema components in one arena
    pub max_schema_components: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_derivation_depth: 1000,
            max_substitution_depth: 1000,
            max_schema_components: 100000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_derivation_depth: 100,
            max_substitution_depth: 100,
            max_schema_components: 10000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_derivation_depth: 100000,
            max_substitution_depth: 100000,
            max_schema_components: 10000000,
        }
    }

    /// Check if a derivation walk depth is within limits
    pub fn check_derivation_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_derivation_depth {
            Err(Error::LimitExceeded(format!(
                "derivation chain depth {} exceeds maximum {}",
                depth, self.max_derivation_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a substitution walk depth is within limits
    pub fn check_substitution_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_substitution_depth {
            Err(Error::LimitExceeded(format!(
                "substitution chain depth {} exceeds maximum {}",
                depth, self.max_substitution_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the component count is within limits
    pub fn check_schema_components(&self, count: usize) -> Result<()> {
        if count > self.max_schema_components {
            Err(Error::LimitExceeded(format!(
                "schema component count {} exceeds maximum {}",
                count, self.max_schema_components
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_derivation_depth, 1000);
        assert_eq!(limits.max_substitution_depth, 1000);
    }

    #[test]
    fn test_strict_is_tighter() {
        let strict = Limits::strict();
        let default = Limits::default();
        assert!(strict.max_derivation_depth < default.max_derivation_depth);
        assert!(strict.max_schema_components < default.max_schema_components);
    }

    #[test]
    fn test_checks() {
        let limits = Limits::strict();
        assert!(limits.check_derivation_depth(100).is_ok());
        assert!(limits.check_derivation_depth(101).is_err());
        assert!(limits.check_substitution_depth(50).is_ok());
        assert!(matches!(
            limits.check_schema_components(10001),
            Err(Error::LimitExceeded(_))
        ));
    }
}
