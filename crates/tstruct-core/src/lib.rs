//! # tstruct-core — Typed-Struct Schema Engine
//!
//! Declares composite data types as a named, ordered set of attributes,
//! each carrying a type descriptor that validates and coerces raw input.
//! Raw string-keyed mappings are turned into immutable struct instances,
//! or rejected with a structured error naming the offending key and type.
//!
//! ## Pipeline
//!
//! - **Declaration** (`struct_type.rs`): attributes accumulate into a
//!   per-type own schema. Subtypes see their ancestors' attributes through a
//!   merge-on-read effective schema, so attributes added to a base type after
//!   a subtype exists are still visible to the subtype.
//!
//! - **Validation** (`schema.rs`): every attribute in declaration order is
//!   validated by its descriptor; absent keys fall back to defaults; unknown
//!   keys are dropped.
//!
//! - **Construction** (`constructor.rs`): instances of the target type or any
//!   subtype pass through unchanged; everything else is validated as a raw
//!   mapping. Construction is all-or-nothing.
//!
//! - **Instances** (`instance.rs`): keyed access, generated readers,
//!   re-derivation with `with_changes`, and export to plain nested mappings.
//!
//! ## Crate Policy
//!
//! - The type-descriptor library is not part of this crate. Anything that
//!   implements [`TypeDescriptor`] can be attached to an attribute.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod attribute;
pub mod config;
pub mod constructor;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod schema;
pub mod struct_type;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use attribute::Attribute;
pub use config::{InputMode, StructConfig};
pub use descriptor::{Descriptor, IntoDescriptor, TypeDescriptor};
pub use error::{
    AttributePath, DeclarationError, Error, FailureKind, MissingAttributeError, PathSegment,
    StructError, TypeFailure,
};
pub use instance::Instance;
pub use schema::Schema;
pub use struct_type::{Block, Constant, Definition, KeyTransform, Method, MethodFn, StructType};
pub use value::{Mapping, Value};
