//! # Type Descriptor Contract
//!
//! A type descriptor validates and coerces one raw value. The engine never
//! inspects descriptors beyond this trait: primitive types, modifiers such
//! as defaults, and container types all live outside this crate.
//!
//! Struct types are themselves descriptors, which is how nested structs
//! are validated.

use std::fmt;
use std::sync::Arc;

use crate::error::TypeFailure;
use crate::struct_type::StructType;
use crate::value::Value;

/// Validates and coerces a single raw value.
pub trait TypeDescriptor: fmt::Debug + Send + Sync {
    /// Name used in error messages, e.g. `strict.string`.
    fn name(&self) -> String;

    /// Validate `raw`, returning the typed value or a failure.
    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure>;

    /// Value used when the attribute's key is absent from the input.
    ///
    /// Called once per construction, so producers can return fresh values.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Whether the descriptor rejects mismatched values without coercion.
    fn is_strict(&self) -> bool {
        false
    }

    /// Whether a present `null` counts as an absent key.
    fn null_as_absent(&self) -> bool {
        false
    }

    /// The struct type behind this descriptor, if it is one.
    fn as_struct_type(&self) -> Option<&StructType> {
        None
    }

    /// A copy of this container descriptor holding `member` values.
    ///
    /// Containers (such as arrays) return `Some`; everything else cannot
    /// hold an inline struct.
    fn with_member(&self, _member: Descriptor) -> Option<Descriptor> {
        None
    }

    /// A copy of this descriptor with its struct type swapped for `nested`.
    ///
    /// Struct types return `nested` itself; wrappers around a struct type
    /// return themselves wrapped around `nested`. Used when an inline block
    /// extends a struct-typed base.
    fn with_struct_type(&self, _nested: Descriptor) -> Option<Descriptor> {
        None
    }
}

/// Shared handle to a type descriptor.
pub type Descriptor = Arc<dyn TypeDescriptor>;

/// Conversion into a shared [`Descriptor`].
pub trait IntoDescriptor {
    fn into_descriptor(self) -> Descriptor;
}

impl IntoDescriptor for Descriptor {
    fn into_descriptor(self) -> Descriptor {
        self
    }
}

impl<T: TypeDescriptor + 'static> IntoDescriptor for T {
    fn into_descriptor(self) -> Descriptor {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Anything;

    impl TypeDescriptor for Anything {
        fn name(&self) -> String {
            "any".to_string()
        }

        fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
            Ok(raw.clone())
        }
    }

    #[test]
    fn test_default_contract() {
        let d = Anything.into_descriptor();
        assert!(d.default_value().is_none());
        assert!(!d.is_strict());
        assert!(!d.null_as_absent());
        assert!(d.as_struct_type().is_none());
        assert!(d.with_member(Anything.into_descriptor()).is_none());
        assert!(d.with_struct_type(Anything.into_descriptor()).is_none());
    }

    #[test]
    fn test_shared_descriptor_is_not_rewrapped() {
        let d = Anything.into_descriptor();
        let again = Arc::clone(&d).into_descriptor();
        assert!(std::ptr::eq(
            Arc::as_ptr(&d) as *const (),
            Arc::as_ptr(&again) as *const ()
        ));
    }
}
