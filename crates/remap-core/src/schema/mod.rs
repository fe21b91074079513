//! Schema data model: an ordered mapping from destination field names to
//! tagged field specs.
//!
//! A schema describes how every destination field is derived from a source
//! record. Each entry carries an explicit [`FieldKind`] discriminant that is
//! established once, at construction time through [`SchemaBuilder`], and never
//! re-derived by inspecting the spec's shape at map time. Entry order is
//! significant: it fixes phase-1 processing order, and the order of computed
//! fields among themselves in phase 2.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

pub mod builder;
pub mod hook;

pub use builder::SchemaBuilder;
pub use hook::{Computed, Transform, Validator};

use crate::path::SourcePath;
use serde_json::Value;

/// How one destination field is produced.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A bare source field name copied as-is. Always required, never
    /// validated or transformed; no dot-path support.
    Alias(String),
    /// Resolved from a (possibly dot-delimited) source path, then optionally
    /// validated and transformed.
    Value(ValueSpec),
    /// A sub-schema applied recursively to the object found at `from`.
    Nested(NestedSpec),
    /// Derived from the partial destination and the source record; deferred
    /// to phase 2 regardless of declaration position.
    Computed(ComputedSpec),
}

/// Spec for a validated/transformed field.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub from: SourcePath,
    pub validate: Option<Validator>,
    pub transform: Option<Transform>,
    pub default: Option<Value>,
    pub required: bool,
    pub nullable: bool,
}

impl ValueSpec {
    /// A required, non-nullable field read from `from`, with no hooks.
    pub fn new(from: impl Into<SourcePath>) -> Self {
        Self {
            from: from.into(),
            validate: None,
            transform: None,
            default: None,
            required: true,
            nullable: false,
        }
    }

    /// Attach a pre-built validation hook.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validate = Some(validator);
        self
    }

    /// Attach a synchronous validator function.
    pub fn validate<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.validator(Validator::from_fn(f))
    }

    /// Attach an asynchronous validator function.
    pub fn validate_async<F>(self, f: F) -> Self
    where
        F: for<'a> Fn(&'a Value) -> futures::future::BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.validator(Validator::from_async(f))
    }

    /// Attach a pre-built transform hook.
    pub fn transformer(mut self, transform: Transform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Attach a synchronous transform function `(value, source) -> value`.
    pub fn transform<F>(self, f: F) -> Self
    where
        F: Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.transformer(Transform::from_fn(f))
    }

    /// Attach an asynchronous transform function.
    pub fn transform_async<F>(self, f: F) -> Self
    where
        F: for<'a> Fn(Value, &'a Value) -> futures::future::BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.transformer(Transform::from_async(f))
    }

    /// Value to use when the source path resolves to absent, or when the
    /// field fails under `skip_invalid`.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether absence (with no default) is an error. Defaults to true.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Whether a present null is accepted. Defaults to false.
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Spec for a nested-schema field.
#[derive(Debug, Clone)]
pub struct NestedSpec {
    pub from: SourcePath,
    pub schema: Schema,
    pub required: bool,
    pub default: Option<Value>,
}

impl NestedSpec {
    /// A required nested field mapping the object at `from` through `schema`.
    pub fn new(from: impl Into<SourcePath>, schema: Schema) -> Self {
        Self {
            from: from.into(),
            schema,
            required: true,
            default: None,
        }
    }

    /// Value to use when the source path resolves to absent or null.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Whether absence (with no default) is an error. Defaults to true.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Spec for a computed field.
#[derive(Debug, Clone)]
pub struct ComputedSpec {
    pub compute: Computed,
    pub default: Option<Value>,
}

impl ComputedSpec {
    pub fn new(compute: Computed) -> Self {
        Self {
            compute,
            default: None,
        }
    }

    /// Value assigned when the hook fails under `skip_invalid`.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// One `(destination name, field kind)` schema entry.
#[derive(Debug, Clone)]
pub struct SchemaEntry {
    name: String,
    kind: FieldKind,
}

impl SchemaEntry {
    /// Destination field name this entry produces.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tagged spec describing how the field is produced.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Root source key this entry reads, for the strict-mode scan. Computed
    /// entries contribute nothing.
    pub(crate) fn root_source(&self) -> Option<&str> {
        match &self.kind {
            FieldKind::Alias(alias) => Some(alias),
            FieldKind::Value(spec) => Some(spec.from.root()),
            FieldKind::Nested(spec) => Some(spec.from.root()),
            FieldKind::Computed(_) => None,
        }
    }

    /// Default recorded on the spec, if the variant carries one. Aliases are
    /// always mandatory and never have a default.
    pub(crate) fn default_value(&self) -> Option<&Value> {
        match &self.kind {
            FieldKind::Alias(_) => None,
            FieldKind::Value(spec) => spec.default.as_ref(),
            FieldKind::Nested(spec) => spec.default.as_ref(),
            FieldKind::Computed(spec) => spec.default.as_ref(),
        }
    }
}

/// An ordered schema: the declarative description of one destination record.
///
/// Every destination field the caller cares about must have exactly one entry;
/// declaring the same name twice leaves the later entry overwriting the
/// earlier one's output.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[SchemaEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn from_entries(entries: Vec<SchemaEntry>) -> Self {
        Self { entries }
    }

    pub(crate) fn entry(name: String, kind: FieldKind) -> SchemaEntry {
        SchemaEntry { name, kind }
    }
}
