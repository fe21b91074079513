//! Mapping engine: schema-driven derivation of destination records.
//!
//! This module houses the core two-phase evaluation algorithm in both its
//! synchronous ([`map`]) and asynchronous ([`map_async`]) forms, the batch
//! runners built on top of them ([`map_batch`], [`map_batch_async`]), and the
//! per-call [`MapOptions`].
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

pub mod batch;
pub mod engine;
pub mod engine_async;
pub mod options;

pub use batch::{map_batch, map_batch_async, BatchError, BatchOutcome};
pub use engine::map;
pub use engine_async::map_async;
pub use options::{Diagnostic, DiagnosticSink, MapOptions};
