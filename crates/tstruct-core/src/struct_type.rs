//! # Struct Types — Declaration and Inheritance
//!
//! A [`StructType`] is the definition-time handle for one struct: its own
//! declared attributes, an optional parent type, a namespace for nested
//! types, and a registry of instance methods.
//!
//! ## Inheritance
//!
//! Types form a parent-pointer DAG. A type's effective schema is the merge
//! of its parent's *current* effective schema with its own schema, computed
//! on read. The merged schema is memoized together with the revision of
//! every type on the ancestor chain; any declaration on an ancestor bumps
//! that ancestor's revision and the next read recomputes. Attributes added
//! to a base type after a subtype was declared are therefore visible to the
//! subtype on its next construction call.
//!
//! ## Publication
//!
//! Declarations build a complete new own schema and swap it in under a
//! write lock, then bump the revision. Readers see either the old or the
//! new schema in its entirety. A declaration that fails leaves the type
//! untouched.
//!
//! ## Readers
//!
//! Declaring an attribute registers a reader method of the same name unless
//! a method of that name already exists on the type or an ancestor. Methods
//! defined with [`StructType::define_method`] always take precedence.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::attribute::Attribute;
use crate::config::{InputMode, StructConfig};
use crate::descriptor::{Descriptor, IntoDescriptor, TypeDescriptor};
use crate::error::{DeclarationError, TypeFailure};
use crate::instance::Instance;
use crate::schema::Schema;
use crate::value::Value;

// ─── Definitions ─────────────────────────────────────────────────────

/// Inline schema block: declares attributes on a freshly created nested type.
pub type Block<'a> = Box<dyn FnOnce(&StructType) -> Result<(), DeclarationError> + 'a>;

/// What an attribute declaration is made of.
pub enum Definition<'a> {
    /// Nothing was supplied. Always rejected.
    Empty,
    /// An explicit type descriptor.
    Type(Descriptor),
    /// An inline nested schema with no base descriptor.
    Block(Block<'a>),
    /// An inline nested schema on top of a base descriptor. A struct-typed
    /// base is extended; a container base receives the nested type as its
    /// member.
    Extending(Descriptor, Block<'a>),
}

impl<'a> Definition<'a> {
    pub fn block(
        block: impl FnOnce(&StructType) -> Result<(), DeclarationError> + 'a,
    ) -> Self {
        Definition::Block(Box::new(block))
    }

    pub fn extending(
        base: impl IntoDescriptor,
        block: impl FnOnce(&StructType) -> Result<(), DeclarationError> + 'a,
    ) -> Self {
        Definition::Extending(base.into_descriptor(), Box::new(block))
    }
}

impl<'a, D: IntoDescriptor> From<D> for Definition<'a> {
    fn from(descriptor: D) -> Self {
        Definition::Type(descriptor.into_descriptor())
    }
}

impl fmt::Debug for Definition<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Definition::Empty => f.write_str("Definition::Empty"),
            Definition::Type(d) => write!(f, "Definition::Type({})", d.name()),
            Definition::Block(_) => f.write_str("Definition::Block(..)"),
            Definition::Extending(d, _) => write!(f, "Definition::Extending({}, ..)", d.name()),
        }
    }
}

// ─── Namespace and Methods ───────────────────────────────────────────

/// An entity registered in a struct type's namespace.
#[derive(Clone)]
pub enum Constant {
    /// A nested struct type.
    Struct(StructType),
    /// Any other named entity, described for diagnostics.
    Other(String),
}

impl fmt::Debug for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Struct(t) => write!(f, "Constant::Struct({})", t.name()),
            Constant::Other(d) => write!(f, "Constant::Other({d})"),
        }
    }
}

/// User-defined instance method.
pub type MethodFn = Arc<dyn Fn(&Instance) -> Value + Send + Sync>;

/// Rewrites input keys before validation.
pub type KeyTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// An entry in a struct type's method registry.
#[derive(Clone)]
pub enum Method {
    /// Generated reader for the named attribute.
    Reader(String),
    /// User-defined method.
    Custom(MethodFn),
}

impl fmt::Debug for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Reader(name) => write!(f, "Method::Reader({name})"),
            Method::Custom(_) => f.write_str("Method::Custom(..)"),
        }
    }
}

// ─── Struct Type ─────────────────────────────────────────────────────

/// A declared struct type. Cloning yields another handle to the same type.
#[derive(Clone)]
pub struct StructType {
    inner: Arc<TypeInner>,
}

struct TypeInner {
    name: String,
    parent: Option<StructType>,
    config: StructConfig,
    revision: AtomicU64,
    own: RwLock<Arc<Schema>>,
    namespace: RwLock<IndexMap<String, Constant>>,
    methods: RwLock<IndexMap<String, Method>>,
    key_transform: RwLock<Option<KeyTransform>>,
    effective: RwLock<Option<CachedSchema>>,
}

/// Effective schema stamped with the ancestor revisions it was built from.
struct CachedSchema {
    stamp: Vec<u64>,
    schema: Arc<Schema>,
}

impl StructType {
    /// Define a new root type in permissive input mode.
    pub fn define(name: impl Into<String>) -> Self {
        Self::with_config(name, StructConfig::default())
    }

    /// Define a new root type with explicit configuration.
    pub fn with_config(name: impl Into<String>, config: StructConfig) -> Self {
        Self::build(name.into(), None, config)
    }

    /// Define a subtype inheriting this type's attributes and configuration.
    pub fn extend(&self, name: impl Into<String>) -> Self {
        Self::build(name.into(), Some(self.clone()), self.inner.config.clone())
    }

    /// Define a subtype with its own configuration.
    pub fn extend_with_config(&self, name: impl Into<String>, config: StructConfig) -> Self {
        Self::build(name.into(), Some(self.clone()), config)
    }

    fn build(name: String, parent: Option<StructType>, config: StructConfig) -> Self {
        debug!(
            type_name = %name,
            parent = parent.as_ref().map(StructType::name),
            mode = ?config.input_mode,
            "defined struct type"
        );
        Self {
            inner: Arc::new(TypeInner {
                name,
                parent,
                config,
                revision: AtomicU64::new(0),
                own: RwLock::new(Arc::new(Schema::new())),
                namespace: RwLock::new(IndexMap::new()),
                methods: RwLock::new(IndexMap::new()),
                key_transform: RwLock::new(None),
                effective: RwLock::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn parent(&self) -> Option<&StructType> {
        self.inner.parent.as_ref()
    }

    pub fn config(&self) -> &StructConfig {
        &self.inner.config
    }

    pub fn mode(&self) -> InputMode {
        self.inner.config.input_mode
    }

    /// This type followed by its ancestors, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &StructType> {
        std::iter::successors(Some(self), |t| t.parent())
    }

    /// Whether this type is `other` or inherits from it.
    pub fn is_subtype_of(&self, other: &StructType) -> bool {
        self.ancestors().any(|t| t == other)
    }

    /// Shared handle to this type as a descriptor.
    pub fn descriptor(&self) -> Descriptor {
        self.clone().into_descriptor()
    }

    // ─── Schema access ───────────────────────────────────────────────

    /// Attributes declared on this type itself, excluding inherited ones.
    pub fn own_schema(&self) -> Arc<Schema> {
        Arc::clone(&self.inner.own.read())
    }

    /// Current effective schema, merged across all ancestors.
    pub fn schema(&self) -> Arc<Schema> {
        let stamp = self.revision_stamp();
        if let Some(cached) = self.inner.effective.read().as_ref() {
            if cached.stamp == stamp {
                return Arc::clone(&cached.schema);
            }
        }

        let own = self.own_schema();
        let schema = match self.parent() {
            Some(parent) => Arc::new(parent.schema().merge(&own)),
            None => own,
        };
        *self.inner.effective.write() = Some(CachedSchema {
            stamp,
            schema: Arc::clone(&schema),
        });
        schema
    }

    fn revision_stamp(&self) -> Vec<u64> {
        self.ancestors()
            .map(|t| t.inner.revision.load(Ordering::Acquire))
            .collect()
    }

    fn bump_revision(&self) {
        self.inner.revision.fetch_add(1, Ordering::AcqRel);
    }

    pub fn attribute_names(&self) -> Vec<String> {
        self.schema().keys().map(String::from).collect()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.schema().contains(name)
    }

    // ─── Declaration ─────────────────────────────────────────────────

    /// Declare a required attribute. Returns `self` for chaining.
    ///
    /// # Errors
    ///
    /// - `RepeatedAttribute` if `name` is already declared on this type
    ///   (inherited attributes may be redeclared).
    /// - `MissingDefinition` for [`Definition::Empty`].
    /// - `NestedTypeCollision` if an inline block's nested type name is
    ///   already taken in this type's namespace.
    /// - `InvalidMember` if an inline block is combined with a descriptor
    ///   that is neither a struct type nor a container.
    pub fn attribute<'a>(
        &self,
        name: &str,
        definition: impl Into<Definition<'a>>,
    ) -> Result<&Self, DeclarationError> {
        self.declare(name, definition.into(), false)
    }

    /// Declare an attribute whose key may be absent from the input.
    pub fn attribute_optional<'a>(
        &self,
        name: &str,
        definition: impl Into<Definition<'a>>,
    ) -> Result<&Self, DeclarationError> {
        self.declare(name, definition.into(), true)
    }

    /// Copy every attribute of `other`'s effective schema onto this type.
    ///
    /// Either all attributes are copied or none are.
    pub fn attributes_from(&self, other: &StructType) -> Result<&Self, DeclarationError> {
        let source = other.schema();
        {
            let mut own = self.inner.own.write();
            let mut next = (**own).clone();
            for attribute in source.iter() {
                if next.contains(attribute.name()) {
                    return Err(self.repeated(attribute.name()));
                }
                next.insert(attribute.clone());
            }
            *own = Arc::new(next);
        }
        for attribute in source.iter() {
            self.register_reader(attribute.name());
        }
        self.bump_revision();
        debug!(
            type_name = %self.name(),
            source = %other.name(),
            count = source.len(),
            "copied attributes"
        );
        Ok(self)
    }

    fn declare(
        &self,
        name: &str,
        definition: Definition<'_>,
        omittable: bool,
    ) -> Result<&Self, DeclarationError> {
        if self.inner.own.read().contains(name) {
            return Err(self.repeated(name));
        }

        let (descriptor, nested) = match definition {
            Definition::Empty => {
                return Err(DeclarationError::MissingDefinition {
                    type_name: self.name().to_string(),
                    name: name.to_string(),
                })
            }
            Definition::Type(descriptor) => (descriptor, None),
            Definition::Block(block) => self.define_nested(name, None, block)?,
            Definition::Extending(base, block) => self.define_nested(name, Some(base), block)?,
        };

        let attribute = if omittable {
            Attribute::omittable(name, descriptor)
        } else {
            Attribute::new(name, descriptor)
        };
        self.publish(attribute, nested)?;
        Ok(self)
    }

    /// Create the nested type for an inline block and run the block on it.
    ///
    /// Nothing is registered on `self` here; [`Self::publish`] does that.
    fn define_nested(
        &self,
        attribute: &str,
        base: Option<Descriptor>,
        block: Block<'_>,
    ) -> Result<(Descriptor, Option<(String, StructType)>), DeclarationError> {
        let base_type = base
            .as_ref()
            .and_then(|b| b.as_struct_type())
            .cloned();
        let container = match (&base, &base_type) {
            (Some(b), None) => Some(Arc::clone(b)),
            _ => None,
        };

        let constant = nested_type_name(attribute, container.is_some());
        if self.inner.namespace.read().contains_key(&constant) {
            return Err(self.collision(&constant));
        }

        let qualified = format!("{}::{}", self.name(), constant);
        let nested = match base_type {
            Some(base_type) => base_type.extend(qualified),
            None => StructType::with_config(qualified, self.inner.config.clone()),
        };
        if nested.key_transform().is_none() {
            if let Some(transform) = self.key_transform() {
                *nested.inner.key_transform.write() = Some(transform);
            }
        }
        block(&nested)?;

        let descriptor = match (&base, container) {
            (_, Some(container)) => container.with_member(nested.descriptor()).ok_or_else(|| {
                DeclarationError::InvalidMember {
                    type_name: self.name().to_string(),
                    name: attribute.to_string(),
                    descriptor: container.name(),
                }
            })?,
            // Keep the base's modifiers (defaults, optional) around the nested type.
            (Some(base), None) => base
                .with_struct_type(nested.descriptor())
                .unwrap_or_else(|| nested.descriptor()),
            (None, None) => nested.descriptor(),
        };

        debug!(
            type_name = %self.name(),
            attribute,
            nested = %nested.name(),
            "defined nested struct type"
        );
        Ok((descriptor, Some((constant, nested))))
    }

    /// Atomically add `attribute` (and its nested type) to this type.
    fn publish(
        &self,
        attribute: Attribute,
        nested: Option<(String, StructType)>,
    ) -> Result<(), DeclarationError> {
        let name = attribute.name().to_string();
        {
            let mut own = self.inner.own.write();
            if own.contains(&name) {
                return Err(self.repeated(&name));
            }
            if let Some((constant, nested_type)) = nested {
                let mut namespace = self.inner.namespace.write();
                if namespace.contains_key(&constant) {
                    return Err(self.collision(&constant));
                }
                namespace.insert(constant, Constant::Struct(nested_type));
            }
            let mut next = (**own).clone();
            next.insert(attribute);
            *own = Arc::new(next);
        }

        self.register_reader(&name);
        // Revision moves only after the new schema is visible.
        self.bump_revision();
        debug!(type_name = %self.name(), attribute = %name, "declared attribute");
        Ok(())
    }

    fn repeated(&self, name: &str) -> DeclarationError {
        DeclarationError::RepeatedAttribute {
            type_name: self.name().to_string(),
            name: name.to_string(),
        }
    }

    fn collision(&self, constant: &str) -> DeclarationError {
        DeclarationError::NestedTypeCollision {
            namespace: self.name().to_string(),
            constant: constant.to_string(),
        }
    }

    // ─── Namespace ───────────────────────────────────────────────────

    /// Register a non-struct entity under `name` in this type's namespace.
    pub fn define_constant(&self, name: impl Into<String>, description: impl Into<String>) -> &Self {
        self.inner
            .namespace
            .write()
            .insert(name.into(), Constant::Other(description.into()));
        self
    }

    pub fn constant(&self, name: &str) -> Option<Constant> {
        self.inner.namespace.read().get(name).cloned()
    }

    /// The nested struct type registered under `name`, if any.
    pub fn nested_type(&self, name: &str) -> Option<StructType> {
        match self.constant(name)? {
            Constant::Struct(t) => Some(t),
            Constant::Other(_) => None,
        }
    }

    // ─── Methods ─────────────────────────────────────────────────────

    /// Define an instance method, replacing any generated reader of the
    /// same name on this type.
    pub fn define_method(
        &self,
        name: impl Into<String>,
        method: impl Fn(&Instance) -> Value + Send + Sync + 'static,
    ) -> &Self {
        self.inner
            .methods
            .write()
            .insert(name.into(), Method::Custom(Arc::new(method)));
        self
    }

    /// Remove a method from this type's own registry.
    pub fn remove_method(&self, name: &str) -> Option<Method> {
        self.inner.methods.write().shift_remove(name)
    }

    /// Resolve `name` on this type, then on its ancestors.
    pub fn find_method(&self, name: &str) -> Option<Method> {
        self.ancestors()
            .find_map(|t| t.inner.methods.read().get(name).cloned())
    }

    fn register_reader(&self, name: &str) {
        if self.find_method(name).is_some() {
            return;
        }
        self.inner
            .methods
            .write()
            .insert(name.to_string(), Method::Reader(name.to_string()));
    }

    // ─── Key transformation ──────────────────────────────────────────

    /// Rewrite every input key with `transform` before validation.
    /// Subtypes inherit the transform unless they set their own.
    pub fn transform_keys(&self, transform: impl Fn(&str) -> String + Send + Sync + 'static) -> &Self {
        *self.inner.key_transform.write() = Some(Arc::new(transform));
        self
    }

    pub(crate) fn key_transform(&self) -> Option<KeyTransform> {
        self.ancestors()
            .find_map(|t| t.inner.key_transform.read().clone())
    }
}

impl TypeDescriptor for StructType {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn validate(&self, raw: &Value) -> Result<Value, TypeFailure> {
        match raw {
            Value::Map(_) | Value::Struct(_) => self
                .construct_value(raw)
                .map(Value::Struct)
                .map_err(TypeFailure::from),
            // Reported against the enclosing attribute, not as a nested failure.
            other => Err(TypeFailure::invalid_type(self.inner.name.clone(), other)),
        }
    }

    fn is_strict(&self) -> bool {
        self.mode() == InputMode::Strict
    }

    fn as_struct_type(&self) -> Option<&StructType> {
        Some(self)
    }

    fn with_struct_type(&self, nested: Descriptor) -> Option<Descriptor> {
        Some(nested)
    }
}

impl PartialEq for StructType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for StructType {}

impl Hash for StructType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state);
    }
}

impl fmt::Debug for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructType")
            .field("name", &self.inner.name)
            .field("parent", &self.parent().map(StructType::name))
            .field("mode", &self.mode())
            .field("attributes", &self.attribute_names())
            .finish()
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inner.name)
    }
}

// ─── Nested type naming ──────────────────────────────────────────────

/// `home_address` becomes `HomeAddress`; container members are singular,
/// so `roles` becomes `Role`.
fn nested_type_name(attribute: &str, singular: bool) -> String {
    let base = if singular {
        singularize(attribute)
    } else {
        attribute.to_string()
    };
    base.split('_')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect()
}

fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        format!("{stem}y")
    } else if word.ends_with("ss") {
        word.to_string()
    } else if let Some(stem) = word.strip_suffix('s') {
        stem.to_string()
    } else {
        word.to_string()
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
