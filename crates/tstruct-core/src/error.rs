//! # Error Types — Construction, Declaration, and Access Failures
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Construction failures surface as a single [`StructError`] naming the
//!   outermost type being constructed, the innermost type where the failure
//!   arose, and the attribute path between them. A missing key three levels
//!   deep still reports the exact key and the nested type that required it.
//! - Descriptors report [`TypeFailure`], which the schema tags with the
//!   attribute name and owning type.
//! - Declaration errors are raised before any schema mutation, so a failed
//!   declaration never leaves a partially declared type behind.

use std::fmt;

use thiserror::Error;

use crate::value::Value;

// ─── Attribute Paths ─────────────────────────────────────────────────

/// A segment in the attribute path from the outermost struct to the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An attribute of a struct.
    Field(String),
    /// An element of a list attribute.
    Element(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Element(index) => write!(f, "[{index}]"),
        }
    }
}

/// Ordered path of segments, outermost first.
///
/// Displays as `address.city` or `members[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributePath(Vec<PathSegment>);

impl AttributePath {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push_front(&mut self, segment: PathSegment) {
        self.0.insert(0, segment);
    }

    fn insert(&mut self, index: usize, segment: PathSegment) {
        let index = index.min(self.0.len());
        self.0.insert(index, segment);
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Field(_) if i > 0 => write!(f, ".{segment}")?,
                _ => write!(f, "{segment}")?,
            }
        }
        Ok(())
    }
}

// ─── Construction Failures ───────────────────────────────────────────

/// Root cause of a failed construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// A required attribute with no default was absent from the input.
    #[error(":{key} is missing in Hash input")]
    MissingKey {
        /// The missing attribute name.
        key: String,
    },

    /// A present value failed its descriptor's validation or coercion.
    #[error("{actual} (Value) has invalid type for :{key}, expected {expected}")]
    InvalidType {
        /// The offending attribute name.
        key: String,
        /// Name of the descriptor that rejected the value.
        expected: String,
        /// Textual representation of the rejected value.
        actual: String,
    },

    /// A strict-mode type received keys outside its schema.
    #[error("unexpected keys {} in Hash input", format_keys(.keys))]
    UnexpectedKeys {
        /// The extraneous keys, in input order.
        keys: Vec<String>,
    },

    /// The input was neither a mapping nor a struct instance.
    #[error("{actual} is not a Hash")]
    NotAMapping {
        /// Textual representation of the rejected input.
        actual: String,
    },
}

fn format_keys(keys: &[String]) -> String {
    let parts: Vec<String> = keys.iter().map(|k| format!(":{k}")).collect();
    format!("[{}]", parts.join(", "))
}

/// A failed construction call.
///
/// `type_name` is the outermost type whose constructor was called; `origin`
/// is the innermost type that detected the failure. They coincide for
/// failures in flat structs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructError {
    type_name: String,
    origin: String,
    path: AttributePath,
    kind: FailureKind,
}

impl StructError {
    /// Create a failure detected at the top level of `type_name`.
    pub fn new(type_name: impl Into<String>, kind: FailureKind) -> Self {
        let type_name = type_name.into();
        Self {
            origin: type_name.clone(),
            type_name,
            path: AttributePath::new(),
            kind,
        }
    }

    /// Create a missing key failure for attribute `key` of `type_name`.
    pub fn missing_key(type_name: impl Into<String>, key: &str) -> Self {
        let mut err = Self::new(
            type_name,
            FailureKind::MissingKey {
                key: key.to_string(),
            },
        );
        err.path.push_front(PathSegment::Field(key.to_string()));
        err
    }

    /// Create an invalid type failure for attribute `key` of `type_name`.
    pub fn invalid_type(
        type_name: impl Into<String>,
        key: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        let mut err = Self::new(
            type_name,
            FailureKind::InvalidType {
                key: key.to_string(),
                expected: expected.into(),
                actual: actual.into(),
            },
        );
        err.path.push_front(PathSegment::Field(key.to_string()));
        err
    }

    /// Re-attribute this failure to attribute `key` of the enclosing `owner`.
    pub fn nested_in(mut self, owner: impl Into<String>, key: &str) -> Self {
        self.type_name = owner.into();
        self.path.push_front(PathSegment::Field(key.to_string()));
        self
    }

    /// Outermost type whose constructor failed.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Innermost type that detected the failure.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    pub fn kind(&self) -> &FailureKind {
        &self.kind
    }

    /// The offending key, for missing key and invalid type failures.
    pub fn key(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::MissingKey { key } | FailureKind::InvalidType { key, .. } => Some(key),
            FailureKind::UnexpectedKeys { .. } | FailureKind::NotAMapping { .. } => None,
        }
    }

    pub fn is_missing_key(&self) -> bool {
        matches!(self.kind, FailureKind::MissingKey { .. })
    }

    pub fn is_invalid_type(&self) -> bool {
        matches!(self.kind, FailureKind::InvalidType { .. })
    }
}

impl fmt::Display for StructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}.new] {}", self.origin, self.kind)?;
        if self.origin != self.type_name || self.path.len() > 1 {
            write!(f, " (via {}.new at {})", self.type_name, self.path)?;
        }
        Ok(())
    }
}

impl std::error::Error for StructError {}

// ─── Descriptor Failures ─────────────────────────────────────────────

/// Failure reported by a [`TypeDescriptor`](crate::TypeDescriptor).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeFailure {
    /// The value could not be validated or coerced.
    #[error("{actual} (Value) has invalid type, expected {expected}")]
    InvalidType {
        /// Name of the rejecting descriptor.
        expected: String,
        /// Textual representation of the rejected value.
        actual: String,
    },

    /// A nested struct constructor failed.
    #[error(transparent)]
    Nested(Box<StructError>),

    /// An element of a list failed.
    #[error("element {index}: {failure}")]
    Element {
        /// Position of the failing element.
        index: usize,
        /// The element's own failure.
        failure: Box<TypeFailure>,
    },
}

impl TypeFailure {
    /// Create an invalid type failure for `actual`.
    pub fn invalid_type(expected: impl Into<String>, actual: &Value) -> Self {
        Self::InvalidType {
            expected: expected.into(),
            actual: actual.inspect(),
        }
    }

    /// Wrap this failure as the failure of element `index` of a list.
    pub fn at_element(self, index: usize) -> Self {
        Self::Element {
            index,
            failure: Box::new(self),
        }
    }

    /// Tag this failure with the attribute `key` of the `owner` type.
    pub fn into_struct_error(self, owner: &str, key: &str) -> StructError {
        match self {
            TypeFailure::InvalidType { expected, actual } => {
                StructError::invalid_type(owner, key, expected, actual)
            }
            TypeFailure::Nested(err) => err.nested_in(owner, key),
            TypeFailure::Element { index, failure } => {
                let mut err = failure.into_struct_error(owner, key);
                err.path.insert(1, PathSegment::Element(index));
                err
            }
        }
    }
}

impl From<StructError> for TypeFailure {
    fn from(err: StructError) -> Self {
        TypeFailure::Nested(Box::new(err))
    }
}

// ─── Declaration Failures ────────────────────────────────────────────

/// Errors raised while declaring attributes on a struct type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclarationError {
    /// The attribute name is already declared on this type.
    #[error("attribute :{name} has already been defined on {type_name}")]
    RepeatedAttribute {
        /// The declaring type.
        type_name: String,
        /// The repeated attribute name.
        name: String,
    },

    /// The auto-generated nested type name is already taken in the namespace.
    #[error("can't create nested attribute - `{namespace}::{constant}` already defined")]
    NestedTypeCollision {
        /// The declaring type, acting as namespace.
        namespace: String,
        /// The computed nested type name.
        constant: String,
    },

    /// Neither a descriptor nor an inline block was supplied.
    #[error("you must supply a type or a block to attribute :{name} on {type_name}")]
    MissingDefinition {
        /// The declaring type.
        type_name: String,
        /// The attribute being declared.
        name: String,
    },

    /// An inline block was combined with a descriptor that can hold neither
    /// a struct schema nor a struct member.
    #[error("{descriptor} cannot hold an inline struct for attribute :{name} on {type_name}")]
    InvalidMember {
        /// The declaring type.
        type_name: String,
        /// The attribute being declared.
        name: String,
        /// Name of the base descriptor.
        descriptor: String,
    },
}

// ─── Access Failures ─────────────────────────────────────────────────

/// Keyed access for a name outside an instance's attribute set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("missing attribute :{name} on {type_name}")]
pub struct MissingAttributeError {
    /// The instance's type.
    pub type_name: String,
    /// The requested attribute name.
    pub name: String,
}

// ─── Umbrella ────────────────────────────────────────────────────────

/// Top-level error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    /// Construction failed.
    #[error(transparent)]
    Struct(#[from] StructError),

    /// Declaration failed.
    #[error(transparent)]
    Declaration(#[from] DeclarationError),

    /// Keyed access failed.
    #[error(transparent)]
    MissingAttribute(#[from] MissingAttributeError),
}
