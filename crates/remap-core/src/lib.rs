//! Remap Core - declarative, schema-driven object-to-object mapping
//!
//! Given a source record (any `serde_json::Value`) and a [`Schema`] describing
//! how each destination field is derived, the engine produces a validated,
//! transformed destination record.
//!
//! # Main Components
//!
//! - **Schema**: an ordered, tagged description of every destination field
//!   (direct alias, validated/transformed value, nested sub-schema, or
//!   computed), built through [`SchemaBuilder`]
//! - **Mapping Engine**: two-phase evaluation — direct/validated fields first,
//!   computed fields second — in synchronous ([`map`]) and asynchronous
//!   ([`map_async`]) forms
//! - **Batch Runners**: [`map_batch`] / [`map_batch_async`] apply the engine
//!   across a sequence with per-item failure isolation
//! - **Error Model**: structured [`MapError`]s binding destination field,
//!   source path, cause, and offending value
//!
//! # Example
//!
//! ```
//! use remap_core::transforms::numeric;
//! use remap_core::{map, MapOptions, Schema, ValueSpec};
//! use serde_json::{json, Value};
//!
//! # fn main() -> Result<(), remap_core::MapError> {
//! let schema = Schema::builder()
//!     .alias("id", "identifier")
//!     .value("price", ValueSpec::new("unit_price").validator(numeric()))
//!     .computed("label", |dest, _source| {
//!         let id = dest.get("id").and_then(Value::as_str).unwrap_or("?");
//!         Ok(json!(format!("#{id}")))
//!     })
//!     .build();
//!
//! let source = json!({"identifier": "A-1", "unit_price": "9.5"});
//! let dest = map(&source, &schema, &MapOptions::default())?;
//!
//! assert_eq!(dest["price"], json!(9.5));
//! assert_eq!(dest["label"], json!("#A-1"));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod mapping;
pub mod path;
pub mod schema;
pub mod transforms;

// Re-export main types for convenience
pub use error::{ErrorCause, MapError, Result};
pub use mapping::{
    map, map_async, map_batch, map_batch_async, BatchError, BatchOutcome, Diagnostic,
    DiagnosticSink, MapOptions,
};
pub use path::SourcePath;
pub use schema::{
    Computed, ComputedSpec, FieldKind, NestedSpec, Schema, SchemaBuilder, Transform, Validator,
    ValueSpec,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }
}
