//! # Attributes
//!
//! An attribute pairs a name with a type descriptor. Attributes are
//! immutable once declared; redeclaring a name in a subtype replaces the
//! attribute for that subtype only.

use std::fmt;
use std::sync::Arc;

use crate::descriptor::{Descriptor, IntoDescriptor};

/// A named, typed field of a struct schema.
#[derive(Clone)]
pub struct Attribute {
    name: String,
    descriptor: Descriptor,
    omittable: bool,
}

impl Attribute {
    /// A required attribute: the key must be present unless the descriptor
    /// has a default.
    pub fn new(name: impl Into<String>, descriptor: impl IntoDescriptor) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into_descriptor(),
            omittable: false,
        }
    }

    /// An attribute whose key may be left out of the input entirely.
    pub fn omittable(name: impl Into<String>, descriptor: impl IntoDescriptor) -> Self {
        Self {
            omittable: true,
            ..Self::new(name, descriptor)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn has_default(&self) -> bool {
        self.descriptor.default_value().is_some()
    }

    pub fn is_omittable(&self) -> bool {
        self.omittable
    }
}

impl PartialEq for Attribute {
    /// Attributes are equal when they share a name and the very same
    /// descriptor.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.omittable == other.omittable
            && Arc::as_ptr(&self.descriptor) as *const () == Arc::as_ptr(&other.descriptor) as *const ()
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.descriptor.name())
            .field("omittable", &self.omittable)
            .finish()
    }
}
