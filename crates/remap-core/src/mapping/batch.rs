//! Batch runners: per-item failure isolation across a sequence of records.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

use super::engine::map;
use super::engine_async::map_async;
use super::options::MapOptions;
use crate::error::MapError;
use crate::schema::Schema;
use futures::future::join_all;
use serde_json::Value;

/// One failed item in a batch run.
#[derive(Debug)]
pub struct BatchError {
    /// Position in the original input sequence, not in `data`.
    pub index: usize,
    /// The source item that failed.
    pub item: Value,
    /// The mapping failure.
    pub error: MapError,
}

/// Outcome of a batch run.
///
/// `data` holds the successes in input order; every failure is recorded once
/// in `errors`, so `data.len() + errors.len()` always equals the input length.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub data: Vec<Value>,
    pub errors: Vec<BatchError>,
}

/// Map a sequence of source records, isolating per-item failures.
///
/// Each item gets a fresh accumulator. A failing item is recorded in
/// `errors` and never stops processing of subsequent items; this isolation is
/// independent of (and orthogonal to) `options.skip_invalid`, which controls
/// failure tolerance *within* one item.
pub fn map_batch(items: &[Value], schema: &Schema, options: &MapOptions) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();
    for (index, item) in items.iter().enumerate() {
        match map(item, schema, options) {
            Ok(value) => outcome.data.push(value),
            Err(error) => outcome.errors.push(BatchError {
                index,
                item: item.clone(),
                error,
            }),
        }
    }
    outcome
}

/// Asynchronous batch runner with true fan-out.
///
/// All items' mapping operations are started together and joined, success or
/// failure, before this returns; one item's rejection never cancels sibling
/// items' in-flight work. Ordering guarantees match [`map_batch`].
pub async fn map_batch_async(
    items: &[Value],
    schema: &Schema,
    options: &MapOptions,
) -> BatchOutcome {
    let results = join_all(items.iter().map(|item| map_async(item, schema, options))).await;

    let mut outcome = BatchOutcome::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(value) => outcome.data.push(value),
            Err(error) => outcome.errors.push(BatchError {
                index,
                item: items[index].clone(),
                error,
            }),
        }
    }
    outcome
}
