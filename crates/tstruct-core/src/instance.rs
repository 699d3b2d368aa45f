//! # Struct Instances
//!
//! An [`Instance`] is an immutable value object: a struct type plus the
//! validated attribute mapping produced by its constructor. Instances are
//! reference-counted, so passing an instance back through a constructor
//! returns the very same allocation.
//!
//! ## Access
//!
//! - [`Instance::get`] reads the attribute mapping directly and works
//!   whether or not a reader method exists.
//! - [`Instance::read`] dispatches through the type's method registry, so
//!   user-defined methods shadow generated readers.
//!
//! ## Export
//!
//! [`Instance::to_mapping`] unwraps nested instances, lists and mappings
//! recursively into plain data. `to_json` and the `Serialize` impl export
//! the same shape.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::error::{MissingAttributeError, StructError};
use crate::struct_type::{Method, StructType};
use crate::value::{serialize_mapping, Mapping, Value};

/// A validated, immutable struct value.
#[derive(Clone)]
pub struct Instance {
    inner: Arc<InstanceInner>,
}

struct InstanceInner {
    struct_type: StructType,
    attributes: Mapping,
}

impl Instance {
    pub(crate) fn new(struct_type: StructType, attributes: Mapping) -> Self {
        Self {
            inner: Arc::new(InstanceInner {
                struct_type,
                attributes,
            }),
        }
    }

    pub fn struct_type(&self) -> &StructType {
        &self.inner.struct_type
    }

    pub fn type_name(&self) -> &str {
        self.inner.struct_type.name()
    }

    /// Validated attributes in declaration order.
    pub fn attributes(&self) -> &Mapping {
        &self.inner.attributes
    }

    /// Keyed access to a validated attribute.
    ///
    /// # Errors
    ///
    /// Returns [`MissingAttributeError`] when `name` is not in this
    /// instance's attribute set, including omittable attributes that were
    /// left out of the input.
    pub fn get(&self, name: &str) -> Result<&Value, MissingAttributeError> {
        self.inner
            .attributes
            .get(name)
            .ok_or_else(|| MissingAttributeError {
                type_name: self.type_name().to_string(),
                name: name.to_string(),
            })
    }

    /// Invoke the method `name` on this instance.
    ///
    /// Returns `None` when neither the type nor its ancestors define such a
    /// method. A generated reader for an omitted attribute yields
    /// [`Value::Null`].
    pub fn read(&self, name: &str) -> Option<Value> {
        match self.struct_type().find_method(name)? {
            Method::Reader(attribute) => Some(
                self.inner
                    .attributes
                    .get(&attribute)
                    .cloned()
                    .unwrap_or(Value::Null),
            ),
            Method::Custom(method) => Some(method(self)),
        }
    }

    /// Export as a plain mapping with no nested instances.
    pub fn to_mapping(&self) -> Mapping {
        self.inner
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.to_plain()))
            .collect()
    }

    /// Export as a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.inner
                .attributes
                .iter()
                .map(|(name, value)| (name.clone(), value.to_json()))
                .collect(),
        )
    }

    /// Build a new instance from this one's attributes overlaid with
    /// `changes`. The receiver is left untouched.
    ///
    /// # Errors
    ///
    /// Fails exactly like the type's constructor would on the merged
    /// mapping.
    pub fn with_changes<I, K, V>(&self, changes: I) -> Result<Instance, StructError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged = self.inner.attributes.clone();
        for (name, value) in changes {
            merged.insert(name.into(), value.into());
        }
        self.struct_type().construct_mapping(&merged)
    }

    /// Whether both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Instance) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.inner.struct_type == other.inner.struct_type
                && self.inner.attributes == other.inner.attributes)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}", self.type_name())?;
        for (name, value) in &self.inner.attributes {
            write!(f, " {name}={}", value.inspect())?;
        }
        f.write_str(">")
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_mapping(&self.to_mapping(), serializer)
    }
}
