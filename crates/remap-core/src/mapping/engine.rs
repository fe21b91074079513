//! Synchronous two-phase mapping engine.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

use super::options::{Diagnostic, MapOptions};
use crate::error::{ErrorCause, MapError};
use crate::schema::{ComputedSpec, FieldKind, NestedSpec, Schema, SchemaEntry, ValueSpec};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Map one source record through a schema, producing one destination record.
///
/// The algorithm runs in two mandatory, never interleaved phases:
///
/// 1. Non-computed fields in schema declaration order. Aliases are read
///    directly off the source; value specs resolve their dot-path, then run
///    validate and transform; nested specs recurse with the same options.
/// 2. Computed fields, in declaration order among themselves, each observing
///    the accumulator as populated so far (earlier computed fields included).
///
/// If `options.strict` is set, a third pass emits a non-fatal diagnostic for
/// source root keys no schema entry references; it never changes the result.
///
/// # Errors
///
/// Fail-fast per field by default: the first failing field aborts the call
/// with a [`MapError`] naming the destination field and source path, and the
/// partial destination is discarded. With `options.skip_invalid` the failing
/// field is omitted (or assigned its spec's default) and processing continues.
pub fn map(source: &Value, schema: &Schema, options: &MapOptions) -> crate::Result<Value> {
    let mut dest = Map::new();
    let mut deferred: Vec<(&str, &ComputedSpec)> = Vec::new();

    // Phase 1: computed entries are deferred regardless of position.
    for entry in schema.entries() {
        let produced = match entry.kind() {
            FieldKind::Computed(spec) => {
                deferred.push((entry.name(), spec));
                continue;
            }
            FieldKind::Alias(alias) => produce_alias(entry.name(), alias, source).map(Some),
            FieldKind::Value(spec) => produce_value(entry.name(), spec, source),
            FieldKind::Nested(spec) => produce_nested(entry.name(), spec, source, options),
        };
        commit(entry, produced, &mut dest, options)?;
    }

    // Phase 2: each committed value is visible to later computed fields.
    for (name, spec) in deferred {
        let produced = spec.compute.apply_sync(&dest, source);
        commit_computed(name, produced, spec, &mut dest, options)?;
    }

    if options.strict {
        report_unreferenced(source, schema, options);
    }

    Ok(Value::Object(dest))
}

/// Fold one phase-1 outcome into the accumulator, honoring `skip_invalid`.
pub(crate) fn commit(
    entry: &SchemaEntry,
    produced: Result<Option<Value>, MapError>,
    dest: &mut Map<String, Value>,
    options: &MapOptions,
) -> crate::Result<()> {
    match produced {
        Ok(Some(value)) => {
            dest.insert(entry.name().to_string(), value);
            Ok(())
        }
        // Optional field absent: left unset, distinguishable by key presence.
        Ok(None) => Ok(()),
        Err(err) => {
            if options.skip_invalid {
                if let Some(default) = entry.default_value() {
                    dest.insert(entry.name().to_string(), default.clone());
                }
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

/// Fold one phase-2 outcome into the accumulator, honoring `skip_invalid`.
pub(crate) fn commit_computed(
    name: &str,
    produced: Result<Value, ErrorCause>,
    spec: &ComputedSpec,
    dest: &mut Map<String, Value>,
    options: &MapOptions,
) -> crate::Result<()> {
    match produced {
        Ok(value) => {
            dest.insert(name.to_string(), value);
            Ok(())
        }
        Err(cause) => {
            if options.skip_invalid {
                if let Some(default) = &spec.default {
                    dest.insert(name.to_string(), default.clone());
                }
                Ok(())
            } else {
                Err(MapError::computed(name, cause))
            }
        }
    }
}

pub(crate) fn produce_alias(field: &str, alias: &str, source: &Value) -> crate::Result<Value> {
    source
        .get(alias)
        .cloned()
        .ok_or_else(|| MapError::new(field, Some(alias), ErrorCause::Missing, None))
}

fn produce_value(field: &str, spec: &ValueSpec, source: &Value) -> Result<Option<Value>, MapError> {
    let from = spec.from.as_str();
    let resolved = match spec.from.resolve(source) {
        Some(value) => value,
        None => {
            if let Some(default) = &spec.default {
                return Ok(Some(default.clone()));
            }
            if spec.required {
                return Err(MapError::new(field, Some(from), ErrorCause::Missing, None));
            }
            return Ok(None);
        }
    };

    if resolved.is_null() && !spec.nullable {
        return Err(MapError::new(
            field,
            Some(from),
            ErrorCause::NotNullable,
            Some(Value::Null),
        ));
    }

    let mut value = resolved.clone();
    if let Some(validator) = &spec.validate {
        value = validator
            .apply_sync(&value)
            .map_err(|cause| MapError::new(field, Some(from), cause, Some(resolved.clone())))?;
    }
    if let Some(transform) = &spec.transform {
        value = transform
            .apply_sync(value, source)
            .map_err(|cause| MapError::new(field, Some(from), cause, Some(resolved.clone())))?;
    }
    Ok(Some(value))
}

fn produce_nested(
    field: &str,
    spec: &NestedSpec,
    source: &Value,
    options: &MapOptions,
) -> Result<Option<Value>, MapError> {
    let from = spec.from.as_str();
    let sub = match spec.from.resolve(source) {
        Some(value) if !value.is_null() => value,
        // Absent and null collapse for nested specs.
        _ => {
            if let Some(default) = &spec.default {
                return Ok(Some(default.clone()));
            }
            if spec.required {
                return Err(MapError::new(
                    field,
                    Some(from),
                    ErrorCause::MissingNested,
                    None,
                ));
            }
            return Ok(None);
        }
    };

    if !sub.is_object() {
        return Err(MapError::new(
            field,
            Some(from),
            ErrorCause::NotAnObject,
            Some(sub.clone()),
        ));
    }

    let mapped = map(sub, &spec.schema, options).map_err(|inner| {
        MapError::new(
            field,
            Some(from),
            ErrorCause::Nested {
                source: Box::new(inner),
            },
            None,
        )
    })?;
    Ok(Some(mapped))
}

/// Strict-mode scan: root keys of the source the schema never reads.
pub(crate) fn report_unreferenced(source: &Value, schema: &Schema, options: &MapOptions) {
    let Some(object) = source.as_object() else {
        return;
    };
    let referenced: HashSet<&str> = schema
        .entries()
        .iter()
        .filter_map(SchemaEntry::root_source)
        .collect();
    let unreferenced: Vec<String> = object
        .keys()
        .filter(|key| !referenced.contains(key.as_str()))
        .cloned()
        .collect();
    if !unreferenced.is_empty() {
        options.emit(Diagnostic::UnreferencedSourceFields {
            fields: unreferenced,
        });
    }
}
