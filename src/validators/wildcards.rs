//! XSD element wildcards
//!
//! An `xs:any` particle term. Wildcards contribute their own occurrence
//! bounds to effective ranges and never recurse; the namespace constraint
//! is only carried for particle descriptions.
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#Wildcards

use std::fmt;

use indexmap::IndexSet;

/// Namespace constraint for wildcards
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamespaceConstraint {
    /// Any namespace is allowed (##any)
    #[default]
    Any,
    /// Any namespace except the target namespace and no namespace (##other)
    Other {
        /// The target namespace to exclude
        target_namespace: Option<String>,
    },
    /// Specific set of allowed namespaces; the empty string stands for no namespace
    Enumeration(IndexSet<String>),
}

impl fmt::Display for NamespaceConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "##any"),
            Self::Other { target_namespace } => {
                write!(f, "##other:\"{}\"", target_namespace.as_deref().unwrap_or_default())
            }
            Self::Enumeration(set) => {
                for (i, ns) in set.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "\"{}\"", ns)?;
                }
                Ok(())
            }
        }
    }
}

/// xs:any element wildcard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XsdAnyElement {
    /// Namespace constraint
    pub namespace: NamespaceConstraint,
}

impl XsdAnyElement {
    /// Create a wildcard
    pub fn new(namespace: NamespaceConstraint) -> Self {
        Self { namespace }
    }

    /// Wildcard accepting any namespace
    pub fn any() -> Self {
        Self::default()
    }
}

impl fmt::Display for XsdAnyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WC[{}]", self.namespace)
    }
}
