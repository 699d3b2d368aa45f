//! # Descriptor Modifiers
//!
//! Wrappers that change how an inner descriptor treats absent, null, or
//! out-of-range values. Each wrapper delegates validation to the inner
//! descriptor and adjusts exactly one aspect of the contract.
//!
//! ```ignore
//! use tstruct_types::{strict, DescriptorExt};
//!
//! let admin = strict::boolean().default(false);
//! let role = strict::string().included_in(["user", "admin"]);
//! let created = strict::integer().default_with(|| now().into());
//! ```

use std::fmt;
use std::sync::Arc;

use tstruct_core::{Descriptor, IntoDescriptor, StructType, TypeDescriptor, TypeFailure, Value};

// ─── Defaults ────────────────────────────────────────────────────────

/// Value used for an absent key.
#[derive(Clone)]
pub enum DefaultValue {
    /// The same value every time.
    Constant(Value),
    /// A producer called once per construction.
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl DefaultValue {
    pub fn evaluate(&self) -> Value {
        match self {
            DefaultValue::Constant(value) => value.clone(),
            DefaultValue::Producer(produce) => produce(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Constant(value) => write!(f, "Constant({})", value.inspect()),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// A descriptor with a fallback for absent keys.
///
/// Defaults are used as given; they are not run through the inner
/// descriptor.
#[derive(Debug, Clone)]
pub struct Defaulted {
    inner: Descriptor,
    default: DefaultValue,
}

impl TypeDescriptor for Defaulted {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        self.inner.validate(raw)
    }

    fn default_value(&self) -> Option<Value> {
        Some(self.default.evaluate())
    }

    fn is_strict(&self) -> bool {
        self.inner.is_strict()
    }

    fn null_as_absent(&self) -> bool {
        self.inner.null_as_absent()
    }

    fn as_struct_type(&self) -> Option<&StructType> {
        self.inner.as_struct_type()
    }

    fn with_member(&self, member: Descriptor) -> Option<Descriptor> {
        self.rewrap(self.inner.with_member(member)?)
    }

    fn with_struct_type(&self, nested: Descriptor) -> Option<Descriptor> {
        self.rewrap(self.inner.with_struct_type(nested)?)
    }
}

impl Defaulted {
    fn rewrap(&self, inner: Descriptor) -> Option<Descriptor> {
        Some(Arc::new(Defaulted {
            inner,
            default: self.default.clone(),
        }))
    }
}

// ─── Optional ────────────────────────────────────────────────────────

/// Accepts `null` in addition to whatever the inner descriptor accepts.
///
/// The key itself is still required unless the attribute is omittable or
/// the inner descriptor has a default.
#[derive(Debug, Clone)]
pub struct Optional {
    inner: Descriptor,
}

impl TypeDescriptor for Optional {
    fn name(&self) -> String {
        format!("optional.{}", self.inner.name())
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        match raw {
            Value::Null => Ok(Value::Null),
            other => self.inner.validate(other),
        }
    }

    fn default_value(&self) -> Option<Value> {
        self.inner.default_value()
    }

    fn is_strict(&self) -> bool {
        self.inner.is_strict()
    }

    fn null_as_absent(&self) -> bool {
        self.inner.null_as_absent()
    }

    fn as_struct_type(&self) -> Option<&StructType> {
        self.inner.as_struct_type()
    }

    fn with_member(&self, member: Descriptor) -> Option<Descriptor> {
        let inner = self.inner.with_member(member)?;
        Some(Arc::new(Optional { inner }))
    }

    fn with_struct_type(&self, nested: Descriptor) -> Option<Descriptor> {
        let inner = self.inner.with_struct_type(nested)?;
        Some(Arc::new(Optional { inner }))
    }
}

// ─── Enumerations ────────────────────────────────────────────────────

/// Restricts the inner descriptor's output to a fixed set of values.
#[derive(Debug, Clone)]
pub struct Included {
    inner: Descriptor,
    allowed: Vec<Value>,
}

impl Included {
    pub fn allowed(&self) -> &[Value] {
        &self.allowed
    }
}

impl TypeDescriptor for Included {
    fn name(&self) -> String {
        let allowed: Vec<String> = self.allowed.iter().map(Value::inspect).collect();
        format!("{} included in [{}]", self.inner.name(), allowed.join(", "))
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        let value = self.inner.validate(raw)?;
        if self.allowed.contains(&value) {
            Ok(value)
        } else {
            Err(TypeFailure::invalid_type(self.name(), raw))
        }
    }

    fn default_value(&self) -> Option<Value> {
        self.inner.default_value()
    }

    fn is_strict(&self) -> bool {
        self.inner.is_strict()
    }

    fn null_as_absent(&self) -> bool {
        self.inner.null_as_absent()
    }

    fn as_struct_type(&self) -> Option<&StructType> {
        self.inner.as_struct_type()
    }

    fn with_member(&self, member: Descriptor) -> Option<Descriptor> {
        self.rewrap(self.inner.with_member(member)?)
    }

    fn with_struct_type(&self, nested: Descriptor) -> Option<Descriptor> {
        self.rewrap(self.inner.with_struct_type(nested)?)
    }
}

impl Included {
    fn rewrap(&self, inner: Descriptor) -> Option<Descriptor> {
        Some(Arc::new(Included {
            inner,
            allowed: self.allowed.clone(),
        }))
    }
}

// ─── Null as absent ──────────────────────────────────────────────────

/// Treats a present `null` as if the key were absent, so the inner
/// descriptor's default applies.
#[derive(Debug, Clone)]
pub struct AbsentWhenNull {
    inner: Descriptor,
}

impl TypeDescriptor for AbsentWhenNull {
    fn name(&self) -> String {
        self.inner.name()
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        self.inner.validate(raw)
    }

    fn default_value(&self) -> Option<Value> {
        self.inner.default_value()
    }

    fn is_strict(&self) -> bool {
        self.inner.is_strict()
    }

    fn null_as_absent(&self) -> bool {
        true
    }

    fn as_struct_type(&self) -> Option<&StructType> {
        self.inner.as_struct_type()
    }

    fn with_member(&self, member: Descriptor) -> Option<Descriptor> {
        let inner = self.inner.with_member(member)?;
        Some(Arc::new(AbsentWhenNull { inner }))
    }

    fn with_struct_type(&self, nested: Descriptor) -> Option<Descriptor> {
        let inner = self.inner.with_struct_type(nested)?;
        Some(Arc::new(AbsentWhenNull { inner }))
    }
}

// ─── Builder methods ─────────────────────────────────────────────────

/// Builder methods available on every descriptor.
pub trait DescriptorExt: IntoDescriptor + Sized {
    /// Use `value` when the key is absent.
    fn default(self, value: impl Into<Value>) -> Defaulted {
        Defaulted {
            inner: self.into_descriptor(),
            default: DefaultValue::Constant(value.into()),
        }
    }

    /// Call `produce` for a fresh value each time the key is absent.
    fn default_with(self, produce: impl Fn() -> Value + Send + Sync + 'static) -> Defaulted {
        Defaulted {
            inner: self.into_descriptor(),
            default: DefaultValue::Producer(Arc::new(produce)),
        }
    }

    fn optional(self) -> Optional {
        Optional {
            inner: self.into_descriptor(),
        }
    }

    fn included_in<I, V>(self, values: I) -> Included
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Included {
            inner: self.into_descriptor(),
            allowed: values.into_iter().map(Into::into).collect(),
        }
    }

    fn absent_when_null(self) -> AbsentWhenNull {
        AbsentWhenNull {
            inner: self.into_descriptor(),
        }
    }
}

impl<T: IntoDescriptor> DescriptorExt for T {}
