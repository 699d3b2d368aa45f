//! # Schema — Ordered Attribute Collections
//!
//! A schema is an insertion-ordered mapping of attribute name to
//! [`Attribute`]. Order affects export and error reporting only.
//!
//! ## Merge
//!
//! `parent.merge(&child)` keeps every parent attribute in place, replaces
//! same-named ones with the child's version without moving them, and
//! appends child-only attributes. Merging down an inheritance chain one
//! level at a time gives the same schema as merging the flattened chain.
//!
//! ## Validation
//!
//! Attributes are validated in declaration order and the first failure
//! stops validation. Keys in the input but not in the schema are dropped.

use indexmap::IndexMap;

use crate::attribute::Attribute;
use crate::error::StructError;
use crate::value::Mapping;

/// Ordered mapping of attribute name to attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: IndexMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a schema from attributes; later duplicates replace earlier ones
    /// in place.
    pub fn from_attributes(attributes: impl IntoIterator<Item = Attribute>) -> Self {
        let mut schema = Self::new();
        for attribute in attributes {
            schema.insert(attribute);
        }
        schema
    }

    pub(crate) fn insert(&mut self, attribute: Attribute) {
        self.attributes
            .insert(attribute.name().to_string(), attribute);
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Merge `child` over this schema.
    pub fn merge(&self, child: &Schema) -> Schema {
        let mut attributes = self.attributes.clone();
        for (name, attribute) in &child.attributes {
            // IndexMap::insert keeps the position of an existing key.
            attributes.insert(name.clone(), attribute.clone());
        }
        Schema { attributes }
    }

    /// Keys of `raw` that are not declared in this schema, in input order.
    pub fn unexpected_keys(&self, raw: &Mapping) -> Vec<String> {
        raw.keys()
            .filter(|key| !self.attributes.contains_key(key.as_str()))
            .cloned()
            .collect()
    }

    /// Validate `raw` against every attribute, on behalf of type `owner`.
    ///
    /// # Errors
    ///
    /// Returns the first failure in declaration order: a missing required
    /// key, or a value its descriptor rejected (tagged with the attribute
    /// name and `owner`).
    pub fn validate(&self, owner: &str, raw: &Mapping) -> Result<Mapping, StructError> {
        let mut output = Mapping::with_capacity(self.attributes.len());

        for (name, attribute) in &self.attributes {
            let descriptor = attribute.descriptor();
            let present = raw
                .get(name)
                .filter(|value| !(value.is_null() && descriptor.null_as_absent()));

            match present {
                Some(value) => {
                    let validated = descriptor
                        .validate(value)
                        .map_err(|failure| failure.into_struct_error(owner, name))?;
                    output.insert(name.clone(), validated);
                }
                None => {
                    if let Some(default) = descriptor.default_value() {
                        output.insert(name.clone(), default);
                    } else if !attribute.is_omittable() {
                        return Err(StructError::missing_key(owner, name));
                    }
                }
            }
        }

        Ok(output)
    }
}
