//! Error types for the Remap core library
//!
//! This module defines the structured mapping failure type and its cause
//! taxonomy, using thiserror for ergonomic error definitions and anyhow for
//! the flexible errors caller-supplied hooks return.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Underlying cause of a single field's mapping failure
#[derive(Error, Debug)]
pub enum ErrorCause {
    /// Required field absent from the source with no default
    #[error("required field missing from source")]
    Missing,

    /// Required nested value absent (or null) with no default
    #[error("required nested value missing from source")]
    MissingNested,

    /// Value present but null where nullable was not permitted
    #[error("field is null but not marked nullable")]
    NotNullable,

    /// Nested spec resolved to something a sub-schema cannot be applied to
    #[error("nested source value is not an object")]
    NotAnObject,

    /// A supplied validator rejected the value
    #[error("validation failed: {source}")]
    Validation {
        #[source]
        source: anyhow::Error,
    },

    /// A supplied transform raised while converting an already-validated value
    #[error("transform failed: {source}")]
    Transform {
        #[source]
        source: anyhow::Error,
    },

    /// A computed function raised while deriving a destination-only field
    #[error("computed field failed: {source}")]
    Computed {
        #[source]
        source: anyhow::Error,
    },

    /// A recursive sub-mapping failed; the inner error names the sub-field
    #[error("nested mapping failed: {source}")]
    Nested {
        #[source]
        source: Box<MapError>,
    },

    /// An asynchronous hook was reached by the synchronous engine
    #[error("asynchronous hook invoked from the synchronous engine; use map_async")]
    AsyncHook,
}

/// A structured mapping failure bound to one destination field.
///
/// Carries the destination field name, the source field or dot-path the value
/// came from (`None` for computed fields), the underlying [`ErrorCause`], and
/// the offending raw value when one was resolved before the failure. All four
/// remain inspectable after catch; the rendered message deterministically
/// combines field, source indicator, and cause.
#[derive(Debug)]
pub struct MapError {
    /// Destination field that failed
    pub field: String,
    /// Source field or dot-path; `None` for computed fields
    pub source_field: Option<String>,
    /// Underlying cause
    pub cause: ErrorCause,
    /// Offending raw value, when one was resolved before the failure
    pub source_value: Option<Value>,
}

impl MapError {
    pub(crate) fn new(
        field: &str,
        source_field: Option<&str>,
        cause: ErrorCause,
        source_value: Option<Value>,
    ) -> Self {
        Self {
            field: field.to_string(),
            source_field: source_field.map(str::to_string),
            cause,
            source_value,
        }
    }

    pub(crate) fn computed(field: &str, cause: ErrorCause) -> Self {
        Self::new(field, None, cause, None)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_field {
            Some(from) => write!(
                f,
                "mapping failed for field \"{}\" from \"{}\": {}",
                self.field, from, self.cause
            ),
            None => write!(
                f,
                "mapping failed for field \"{}\" (computed): {}",
                self.field, self.cause
            ),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}

/// Convenience type alias for Results using our MapError type
pub type Result<T> = std::result::Result<T, MapError>;
