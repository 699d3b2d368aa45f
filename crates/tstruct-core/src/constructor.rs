//! # Constructor Pipeline
//!
//! Turns raw input into a validated [`Instance`] of a [`StructType`].
//!
//! ## Steps
//!
//! 1. An instance of the target type or any of its subtypes is returned
//!    unchanged: no copy, no re-validation.
//! 2. An instance of an unrelated type is treated as raw input: its
//!    attribute mapping is validated from scratch.
//! 3. Anything other than a mapping is rejected with `NotAMapping`.
//! 4. The key transform, if any, rewrites the input keys. A strict type
//!    then rejects keys outside its schema.
//! 5. The effective schema validates the mapping; the result becomes a new
//!    instance.
//!
//! Construction is all-or-nothing. No partially built instance is ever
//! observable.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::config::InputMode;
use crate::error::{FailureKind, StructError};
use crate::instance::Instance;
use crate::struct_type::StructType;
use crate::value::{Mapping, Value};

impl StructType {
    /// Construct an instance from `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`StructError`] naming this type, the failing attribute
    /// path, and the nested type where the failure was detected.
    pub fn construct(&self, input: impl Into<Value>) -> Result<Instance, StructError> {
        self.construct_value(&input.into())
    }

    /// Alias for [`StructType::construct`].
    pub fn call(&self, input: impl Into<Value>) -> Result<Instance, StructError> {
        self.construct(input)
    }

    /// Construct an instance from a JSON document.
    pub fn construct_json(&self, json: &serde_json::Value) -> Result<Instance, StructError> {
        self.construct_value(&Value::from(json))
    }

    /// Construct an instance from an empty mapping, so every attribute
    /// takes its default.
    pub fn construct_default(&self) -> Result<Instance, StructError> {
        self.construct_mapping(&Mapping::new())
    }

    pub(crate) fn construct_value(&self, input: &Value) -> Result<Instance, StructError> {
        match input {
            Value::Struct(instance) if instance.struct_type().is_subtype_of(self) => {
                trace!(
                    type_name = %self.name(),
                    instance_type = %instance.struct_type().name(),
                    "passing instance through"
                );
                Ok(instance.clone())
            }
            Value::Struct(instance) => {
                trace!(
                    type_name = %self.name(),
                    instance_type = %instance.struct_type().name(),
                    "re-validating instance of unrelated type"
                );
                self.construct_mapping(instance.attributes())
            }
            Value::Map(raw) => self.construct_mapping(raw),
            other => Err(self.reject(StructError::new(
                self.name(),
                FailureKind::NotAMapping {
                    actual: other.inspect(),
                },
            ))),
        }
    }

    pub(crate) fn construct_mapping(&self, raw: &Mapping) -> Result<Instance, StructError> {
        let raw = match self.key_transform() {
            Some(transform) => Cow::Owned(
                raw.iter()
                    .map(|(key, value)| (transform(key.as_str()), value.clone()))
                    .collect::<Mapping>(),
            ),
            None => Cow::Borrowed(raw),
        };

        let schema = self.schema();
        if self.mode() == InputMode::Strict {
            let keys = schema.unexpected_keys(&raw);
            if !keys.is_empty() {
                return Err(self.reject(StructError::new(
                    self.name(),
                    FailureKind::UnexpectedKeys { keys },
                )));
            }
        }

        let attributes = schema
            .validate(self.name(), &raw)
            .map_err(|err| self.reject(err))?;
        trace!(
            type_name = %self.name(),
            attributes = attributes.len(),
            "constructed instance"
        );
        Ok(Instance::new(self.clone(), attributes))
    }

    fn reject(&self, err: StructError) -> StructError {
        debug!(type_name = %self.name(), error = %err, "construction failed");
        err
    }
}
