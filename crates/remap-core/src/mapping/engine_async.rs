//! Asynchronous mapping engine.
//!
//! Mirrors the synchronous engine's phase structure and error semantics
//! exactly; the only difference is that validators, transforms, and computed
//! hooks may suspend. Phase-1 fields are still awaited strictly in schema
//! declaration order (sequential per field, so side effects inside hooks stay
//! deterministic), nested sub-mappings are awaited before their containing
//! field commits, and phase 1 completes in full before phase 2 starts.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

use super::engine::{commit, commit_computed, produce_alias, report_unreferenced};
use super::options::MapOptions;
use crate::error::{ErrorCause, MapError};
use crate::schema::{ComputedSpec, FieldKind, NestedSpec, Schema, ValueSpec};
use futures::future::BoxFuture;
use serde_json::{Map, Value};

/// Asynchronous counterpart of [`map`](super::map).
///
/// Semantics match the synchronous engine field for field; see its
/// documentation for the phase algorithm and failure rules. There is no
/// timeout anywhere: a hook that never settles stalls this call indefinitely.
pub async fn map_async(
    source: &Value,
    schema: &Schema,
    options: &MapOptions,
) -> crate::Result<Value> {
    map_boxed(source, schema, options).await
}

// Boxed for recursion through nested schemas.
fn map_boxed<'a>(
    source: &'a Value,
    schema: &'a Schema,
    options: &'a MapOptions,
) -> BoxFuture<'a, crate::Result<Value>> {
    Box::pin(async move {
        let mut dest = Map::new();
        let mut deferred: Vec<(&str, &ComputedSpec)> = Vec::new();

        for entry in schema.entries() {
            let produced = match entry.kind() {
                FieldKind::Computed(spec) => {
                    deferred.push((entry.name(), spec));
                    continue;
                }
                FieldKind::Alias(alias) => produce_alias(entry.name(), alias, source).map(Some),
                FieldKind::Value(spec) => produce_value(entry.name(), spec, source).await,
                FieldKind::Nested(spec) => {
                    produce_nested(entry.name(), spec, source, options).await
                }
            };
            commit(entry, produced, &mut dest, options)?;
        }

        for (name, spec) in deferred {
            let produced = spec.compute.apply(&dest, source).await;
            commit_computed(name, produced, spec, &mut dest, options)?;
        }

        if options.strict {
            report_unreferenced(source, schema, options);
        }

        Ok(Value::Object(dest))
    })
}

async fn produce_value(
    field: &str,
    spec: &ValueSpec,
    source: &Value,
) -> Result<Option<Value>, MapError> {
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
            .apply(&value)
            .await
            .map_err(|cause| MapError::new(field, Some(from), cause, Some(resolved.clone())))?;
    }
    if let Some(transform) = &spec.transform {
        value = transform
            .apply(value, source)
            .await
            .map_err(|cause| MapError::new(field, Some(from), cause, Some(resolved.clone())))?;
    }
    Ok(Some(value))
}

async fn produce_nested(
    field: &str,
    spec: &NestedSpec,
    source: &Value,
    options: &MapOptions,
) -> Result<Option<Value>, MapError> {
    let from = spec.from.as_str();
    let sub = match spec.from.resolve(source) {
        Some(value) if !value.is_null() => value,
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

    let mapped = map_boxed(sub, &spec.schema, options)
        .await
        .map_err(|inner| {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::map;
    use crate::schema::{Computed, NestedSpec};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn parse_number(value: &Value) -> BoxFuture<'_, anyhow::Result<Value>> {
        Box::pin(async move {
            match value {
                Value::Number(_) => Ok(value.clone()),
                Value::String(text) => Ok(json!(text.trim().parse::<f64>()?)),
                other => anyhow::bail!("expected a number, got {other}"),
            }
        })
    }

    #[tokio::test]
    async fn test_async_validator_runs() {
        let schema = Schema::builder()
            .value("price", ValueSpec::new("precio").validate_async(parse_number))
            .build();
        let dest = map_async(&json!({"precio": "9.5"}), &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(dest, json!({"price": 9.5}));
    }

    #[tokio::test]
    async fn test_sync_hooks_also_run_in_async_engine() {
        let schema = Schema::builder()
            .value(
                "n",
                ValueSpec::new("n").transform(|value, _| {
                    let n = value.as_i64().ok_or_else(|| anyhow::anyhow!("not int"))?;
                    Ok(json!(n + 1))
                }),
            )
            .build();
        let dest = map_async(&json!({"n": 1}), &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(dest, json!({"n": 2}));
    }

    #[tokio::test]
    async fn test_rejection_becomes_step_failure() {
        fn reject(_: &Value) -> BoxFuture<'_, anyhow::Result<Value>> {
            Box::pin(async move { anyhow::bail!("rejected downstream") })
        }
        let schema = Schema::builder()
            .value("n", ValueSpec::new("n").validate_async(reject))
            .build();
        let err = map_async(&json!({"n": 1}), &schema, &MapOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.field, "n");
        assert!(matches!(err.cause, ErrorCause::Validation { .. }));
    }

    #[tokio::test]
    async fn test_phase_one_side_effects_stay_in_declaration_order() {
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&order);
        let second = Arc::clone(&order);
        let schema = Schema::builder()
            .value(
                "a",
                ValueSpec::new("a").validate_async(move |value: &Value| {
                    let order = Arc::clone(&first);
                    let value = value.clone();
                    Box::pin(async move {
                        tokio::task::yield_now().await;
                        order.lock().unwrap().push("a");
                        Ok(value)
                    })
                }),
            )
            .value(
                "b",
                ValueSpec::new("b").validate_async(move |value: &Value| {
                    let order = Arc::clone(&second);
                    let value = value.clone();
                    Box::pin(async move {
                        order.lock().unwrap().push("b");
                        Ok(value)
                    })
                }),
            )
            .build();

        map_async(&json!({"a": 1, "b": 2}), &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(*order.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_phase_two_sees_awaited_phase_one_values() {
        let schema = Schema::builder()
            .computed("doubled", |dest, _| {
                let n = dest
                    .get("price")
                    .and_then(Value::as_f64)
                    .ok_or_else(|| anyhow::anyhow!("price not mapped yet"))?;
                Ok(json!(n * 2.0))
            })
            .value("price", ValueSpec::new("precio").validate_async(parse_number))
            .build();
        let dest = map_async(&json!({"precio": "2.5"}), &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(dest["doubled"], json!(5.0));
    }

    #[tokio::test]
    async fn test_nested_sub_mapping_is_awaited() {
        let inner = Schema::builder()
            .value("price", ValueSpec::new("precio").validate_async(parse_number))
            .build();
        let schema = Schema::builder()
            .nested("item", NestedSpec::new("articulo", inner))
            .build();
        let source = json!({"articulo": {"precio": "3.5"}});
        let dest = map_async(&source, &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(dest, json!({"item": {"price": 3.5}}));
    }

    #[tokio::test]
    async fn test_nested_absent_with_default_uses_default() {
        let inner = Schema::builder()
            .value("price", ValueSpec::new("precio").validate_async(parse_number))
            .build();
        let schema = Schema::builder()
            .nested(
                "item",
                NestedSpec::new("articulo", inner).default_value(json!({"price": 0})),
            )
            .build();
        let dest = map_async(&json!({}), &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(dest, json!({"item": {"price": 0}}));
    }

    #[tokio::test]
    async fn test_skip_invalid_omits_failure_and_defaults_computed() {
        fn reject(_: &Value) -> BoxFuture<'_, anyhow::Result<Value>> {
            Box::pin(async move { anyhow::bail!("rejected") })
        }
        let total = ComputedSpec::new(Computed::from_fn(|dest, _| {
            let price = dest
                .get("price")
                .and_then(Value::as_f64)
                .ok_or_else(|| anyhow::anyhow!("price not mapped"))?;
            Ok(json!(price * 2.0))
        }))
        .default_value(json!(0));
        let schema = Schema::builder()
            .alias("id", "id")
            .value("price", ValueSpec::new("precio").validate_async(reject))
            .computed_spec("total", total)
            .build();

        let dest = map_async(
            &json!({"id": "A", "precio": "9.5"}),
            &schema,
            &MapOptions::default().skip_invalid(true),
        )
        .await
        .unwrap();

        // price is omitted, and the dependent computed field falls back to
        // its configured default.
        assert_eq!(dest, json!({"id": "A", "total": 0}));
    }

    #[tokio::test]
    async fn test_matches_sync_engine_for_sync_schemas() {
        let schema = Schema::builder()
            .alias("id", "identifier")
            .value("n", ValueSpec::new("nested.n").default_value(json!(0)))
            .computed("tag", |_, _| Ok(json!("t")))
            .build();
        let source = json!({"identifier": "x", "nested": {"n": 7}});
        let sync_dest = map(&source, &schema, &MapOptions::default()).unwrap();
        let async_dest = map_async(&source, &schema, &MapOptions::default())
            .await
            .unwrap();
        assert_eq!(sync_dest, async_dest);
    }
}
