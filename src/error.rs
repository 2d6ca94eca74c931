//! Error types for xmlschema-structures
//!
//! The substitution, derivation and range engines never fail: absence is
//! reported as `false`, `None` or an empty group. Errors only come out of
//! building the schema component graph.

use std::fmt;
use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for schema component operations
#[derive(Error, Debug)]
pub enum Error {
    /// Schema component graph building error
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A handle that does not point into the component arena
    #[error("dangling {kind} handle #{index}")]
    DanglingHandle {
        /// Component kind ("element", "type", "group")
        kind: &'static str,
        /// Offending index
        index: usize,
    },

    /// A global declaration was registered twice under the same name
    #[error("duplicate global element declaration '{0}'")]
    DuplicateGlobal(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),
}

/// Schema building error with optional location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Component that caused the error
    pub location: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " (at {})", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}
