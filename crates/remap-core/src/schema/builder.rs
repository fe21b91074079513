//! Schema construction.
//!
//! The builder is the only way to create schema entries, which is what makes
//! field classification infallible at map time: each entry's kind is fixed by
//! the constructor method that created it.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

use super::hook::Computed;
use super::{ComputedSpec, FieldKind, NestedSpec, Schema, SchemaEntry, ValueSpec};
use futures::future::BoxFuture;
use serde_json::{Map, Value};

/// Builds a [`Schema`] entry by entry, in declaration order.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    entries: Vec<SchemaEntry>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A direct alias: copy `source[alias]` verbatim. Always mandatory.
    pub fn alias(mut self, name: impl Into<String>, alias: impl Into<String>) -> Self {
        self.entries
            .push(Schema::entry(name.into(), FieldKind::Alias(alias.into())));
        self
    }

    /// A validated/transformed field described by a [`ValueSpec`].
    pub fn value(mut self, name: impl Into<String>, spec: ValueSpec) -> Self {
        self.entries
            .push(Schema::entry(name.into(), FieldKind::Value(spec)));
        self
    }

    /// A nested field: the sub-object at `spec.from` mapped through
    /// `spec.schema`.
    pub fn nested(mut self, name: impl Into<String>, spec: NestedSpec) -> Self {
        self.entries
            .push(Schema::entry(name.into(), FieldKind::Nested(spec)));
        self
    }

    /// A computed field derived by a synchronous function
    /// `(partial destination, source) -> value`.
    pub fn computed<F>(self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Map<String, Value>, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        self.computed_spec(name, ComputedSpec::new(Computed::from_fn(compute)))
    }

    /// A computed field derived by an asynchronous function.
    pub fn computed_async<F>(self, name: impl Into<String>, compute: F) -> Self
    where
        F: for<'a> Fn(&'a Map<String, Value>, &'a Value) -> BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        self.computed_spec(name, ComputedSpec::new(Computed::from_async(compute)))
    }

    /// A computed field with full control over the spec (e.g. a default).
    pub fn computed_spec(mut self, name: impl Into<String>, spec: ComputedSpec) -> Self {
        self.entries
            .push(Schema::entry(name.into(), FieldKind::Computed(spec)));
        self
    }

    pub fn build(self) -> Schema {
        Schema::from_entries(self.entries)
    }
}
