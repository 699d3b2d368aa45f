//! # Primitive Descriptors
//!
//! Scalar descriptors in two flavours. Strict primitives accept only the
//! exact value kind. Coercible primitives additionally convert well-formed
//! representations of that kind and reject everything else; they never
//! invent a value (`"abc"` is not an integer, `2.5` is not an integer).

use std::fmt;

use tstruct_core::{TypeDescriptor, TypeFailure, Value};

/// The value kind a primitive produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Bool,
    /// A plain mapping.
    Hash,
    /// Anything at all.
    Any,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Hash => "hash",
            PrimitiveKind::Any => "any",
        };
        f.write_str(s)
    }
}

/// Whether mismatched values are converted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coercion {
    Strict,
    Coercible,
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::Strict => f.write_str("strict"),
            Coercion::Coercible => f.write_str("coercible"),
        }
    }
}

/// A scalar (or untyped) descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Primitive {
    kind: PrimitiveKind,
    coercion: Coercion,
}

impl Primitive {
    pub const fn new(kind: PrimitiveKind, coercion: Coercion) -> Self {
        Self { kind, coercion }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    pub fn coercion(&self) -> Coercion {
        self.coercion
    }

    fn matches(&self, raw: &Value) -> bool {
        matches!(
            (self.kind, raw),
            (PrimitiveKind::Any, _)
                | (PrimitiveKind::String, Value::String(_))
                | (PrimitiveKind::Integer, Value::Int(_))
                | (PrimitiveKind::Float, Value::Float(_))
                | (PrimitiveKind::Bool, Value::Bool(_))
                | (PrimitiveKind::Hash, Value::Map(_))
        )
    }

    fn coerce(&self, raw: &Value) -> Option<Value> {
        match self.kind {
            PrimitiveKind::String => coerce_string(raw),
            PrimitiveKind::Integer => coerce_integer(raw),
            PrimitiveKind::Float => coerce_float(raw),
            PrimitiveKind::Bool => coerce_bool(raw),
            PrimitiveKind::Hash | PrimitiveKind::Any => None,
        }
    }
}

impl TypeDescriptor for Primitive {
    fn name(&self) -> String {
        match self.kind {
            PrimitiveKind::Any => "any".to_string(),
            kind => format!("{}.{kind}", self.coercion),
        }
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        if self.matches(raw) {
            return Ok(raw.clone());
        }
        let coerced = match self.coercion {
            Coercion::Strict => None,
            Coercion::Coercible => self.coerce(raw),
        };
        coerced.ok_or_else(|| TypeFailure::invalid_type(self.name(), raw))
    }

    fn is_strict(&self) -> bool {
        self.coercion == Coercion::Strict
    }
}

// ─── Coercion rules ──────────────────────────────────────────────────

fn coerce_string(raw: &Value) -> Option<Value> {
    match raw {
        Value::Int(n) => Some(Value::String(n.to_string())),
        Value::Float(f) => Some(Value::String(format!("{f:?}"))),
        Value::Bool(b) => Some(Value::String(b.to_string())),
        _ => None,
    }
}

fn coerce_integer(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(s) => s.trim().parse::<i64>().ok().map(Value::Int),
        // i64::MAX rounds up to 2^63 as a float, hence the strict bound.
        Value::Float(f)
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
        {
            Some(Value::Int(*f as i64))
        }
        _ => None,
    }
}

fn coerce_float(raw: &Value) -> Option<Value> {
    match raw {
        Value::Int(n) => Some(Value::Float(*n as f64)),
        Value::String(s) => s.trim().parse::<f64>().ok().map(Value::Float),
        _ => None,
    }
}

fn coerce_bool(raw: &Value) -> Option<Value> {
    match raw {
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" | "1" => Some(Value::Bool(true)),
            "false" | "f" | "no" | "n" | "off" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
        Value::Int(1) => Some(Value::Bool(true)),
        Value::Int(0) => Some(Value::Bool(false)),
        _ => None,
    }
}

// ─── Constructors ────────────────────────────────────────────────────

/// Primitives that reject any value of the wrong kind.
pub mod strict {
    use super::{Coercion, Primitive, PrimitiveKind};

    pub const fn string() -> Primitive {
        Primitive::new(PrimitiveKind::String, Coercion::Strict)
    }

    pub const fn integer() -> Primitive {
        Primitive::new(PrimitiveKind::Integer, Coercion::Strict)
    }

    pub const fn float() -> Primitive {
        Primitive::new(PrimitiveKind::Float, Coercion::Strict)
    }

    pub const fn boolean() -> Primitive {
        Primitive::new(PrimitiveKind::Bool, Coercion::Strict)
    }

    pub const fn hash() -> Primitive {
        Primitive::new(PrimitiveKind::Hash, Coercion::Strict)
    }
}

/// Primitives that convert well-formed representations of their kind.
pub mod coercible {
    use super::{Coercion, Primitive, PrimitiveKind};

    pub const fn string() -> Primitive {
        Primitive::new(PrimitiveKind::String, Coercion::Coercible)
    }

    pub const fn integer() -> Primitive {
        Primitive::new(PrimitiveKind::Integer, Coercion::Coercible)
    }

    pub const fn float() -> Primitive {
        Primitive::new(PrimitiveKind::Float, Coercion::Coercible)
    }

    pub const fn boolean() -> Primitive {
        Primitive::new(PrimitiveKind::Bool, Coercion::Coercible)
    }
}

/// Accepts every value unchanged.
pub const fn any() -> Primitive {
    Primitive::new(PrimitiveKind::Any, Coercion::Coercible)
}
