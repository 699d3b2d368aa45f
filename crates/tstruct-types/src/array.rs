//! # Array Descriptors
//!
//! `array()` accepts any list. `array().of(member)` validates every element
//! with `member`; failures report the element index. An array declared with
//! an inline struct block becomes an array of the nested struct type via
//! [`TypeDescriptor::with_member`].

use std::sync::Arc;

use tstruct_core::{Descriptor, IntoDescriptor, TypeDescriptor, TypeFailure, Value};

/// A list descriptor, optionally typed by a member descriptor.
#[derive(Debug, Clone, Default)]
pub struct ArrayOf {
    member: Option<Descriptor>,
}

impl ArrayOf {
    /// Typed copy of this array.
    pub fn of(self, member: impl IntoDescriptor) -> Self {
        Self {
            member: Some(member.into_descriptor()),
        }
    }

    /// Alias for [`ArrayOf::of`].
    pub fn member(self, member: impl IntoDescriptor) -> Self {
        self.of(member)
    }

    pub fn member_type(&self) -> Option<&Descriptor> {
        self.member.as_ref()
    }
}

/// An untyped array.
pub fn array() -> ArrayOf {
    ArrayOf::default()
}

/// An array whose elements are validated by `member`.
pub fn array_of(member: impl IntoDescriptor) -> ArrayOf {
    array().of(member)
}

impl TypeDescriptor for ArrayOf {
    fn name(&self) -> String {
        match &self.member {
            Some(member) => format!("array<{}>", member.name()),
            None => "array".to_string(),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        let items = raw
            .as_list()
            .ok_or_else(|| TypeFailure::invalid_type(self.name(), raw))?;
        let Some(member) = &self.member else {
            return Ok(raw.clone());
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| member.validate(item).map_err(|f| f.at_element(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }

    fn is_strict(&self) -> bool {
        true
    }

    fn with_member(&self, member: Descriptor) -> Option<Descriptor> {
        Some(Arc::new(self.clone().of(member)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{coercible, strict};

    #[test]
    fn test_untyped_array_accepts_any_list() {
        let list = Value::List(vec![Value::Int(1), Value::from("a")]);
        assert_eq!(array().validate(&list).unwrap(), list);
        assert!(array().validate(&Value::from("a")).is_err());
        assert_eq!(array().name(), "array");
    }

    #[test]
    fn test_member_coercion() {
        let ints = array().of(coercible::integer());
        let out = ints
            .validate(&Value::List(vec![Value::from("1"), Value::Int(2)]))
            .unwrap();
        assert_eq!(out, Value::List(vec![Value::Int(1), Value::Int(2)]));
        assert_eq!(ints.name(), "array<coercible.integer>");
    }

    #[test]
    fn test_element_failure_carries_index() {
        let strings = array_of(strict::string());
        let err = strings
            .validate(&Value::List(vec![Value::from("a"), Value::Int(2)]))
            .unwrap_err();
        assert!(matches!(err, TypeFailure::Element { index: 1, .. }));
    }

    #[test]
    fn test_with_member_types_the_array() {
        let typed = array()
            .with_member(strict::string().into_descriptor())
            .unwrap();
        assert_eq!(typed.name(), "array<strict.string>");
        assert_eq!(
            array().member(strict::integer()).name(),
            array_of(strict::integer()).name()
        );
    }
}
