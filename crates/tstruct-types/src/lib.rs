//! # tstruct-types — Reference Type Descriptors
//!
//! A small descriptor library for `tstruct-core`. The engine only relies on
//! the [`TypeDescriptor`](tstruct_core::TypeDescriptor) contract; this crate
//! provides the descriptors most schemas need.
//!
//! ## Primitives (`primitive`)
//!
//! - [`strict`]: accept only values of the exact kind (`strict::string()`,
//!   `strict::integer()`, ...).
//! - [`coercible`]: convert compatible representations, such as `"21"` into
//!   `21` for `coercible::integer()`.
//! - [`any`]: accepts every value unchanged.
//!
//! ## Modifiers (`modifiers`)
//!
//! [`DescriptorExt`] adds builder methods to every descriptor:
//! `default`, `default_with`, `optional`, `included_in`, and
//! `absent_when_null`.
//!
//! ## Containers (`array`)
//!
//! [`array()`] with `.of(member)` (alias `.member(member)`), or
//! [`array_of`]. An untyped array combined with an inline block becomes an
//! array of the nested struct type.
//!
//! ## Crate Policy
//!
//! - Depends only on `tstruct-core`.
//! - Descriptors are immutable; every builder method returns a new one.

pub mod array;
pub mod modifiers;
pub mod primitive;

pub use array::{array, array_of, ArrayOf};
pub use modifiers::{AbsentWhenNull, DefaultValue, Defaulted, DescriptorExt, Included, Optional};
pub use primitive::{any, coercible, strict, Coercion, Primitive, PrimitiveKind};
