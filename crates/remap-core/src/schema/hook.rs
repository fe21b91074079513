//! Caller-supplied hook functions: validators, transforms, and computed fields.
//!
//! Hooks come in a synchronous and an asynchronous flavor. The asynchronous
//! flavor is an explicit enum variant returning a boxed future, so "may
//! suspend" is part of the hook's type rather than something sniffed at
//! runtime. The synchronous engine refuses asynchronous hooks with
//! [`ErrorCause::AsyncHook`]; the asynchronous engine runs both.
//!
//! Copyright (c) 2025 Remap Team
//! Licensed under the MIT OR Apache-2.0 license

use crate::error::ErrorCause;
use futures::future::BoxFuture;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

type SyncValidateFn = dyn Fn(&Value) -> anyhow::Result<Value> + Send + Sync;
type AsyncValidateFn =
    dyn for<'a> Fn(&'a Value) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync;

type SyncTransformFn = dyn Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync;
type AsyncTransformFn =
    dyn for<'a> Fn(Value, &'a Value) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync;

type SyncComputeFn = dyn Fn(&Map<String, Value>, &Value) -> anyhow::Result<Value> + Send + Sync;
type AsyncComputeFn = dyn for<'a> Fn(&'a Map<String, Value>, &'a Value) -> BoxFuture<'a, anyhow::Result<Value>>
    + Send
    + Sync;

/// A validation hook: inspects a resolved source value and returns the value
/// to carry forward (validators may normalize, e.g. parse a numeric string).
#[derive(Clone)]
pub enum Validator {
    Sync(Arc<SyncValidateFn>),
    Async(Arc<AsyncValidateFn>),
}

impl Validator {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Validator::Sync(Arc::new(f))
    }

    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Value) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync + 'static,
    {
        Validator::Async(Arc::new(f))
    }

    pub(crate) fn apply_sync(&self, value: &Value) -> Result<Value, ErrorCause> {
        match self {
            Validator::Sync(f) => f(value).map_err(|err| ErrorCause::Validation { source: err }),
            Validator::Async(_) => Err(ErrorCause::AsyncHook),
        }
    }

    pub(crate) async fn apply(&self, value: &Value) -> Result<Value, ErrorCause> {
        match self {
            Validator::Sync(f) => f(value).map_err(|err| ErrorCause::Validation { source: err }),
            Validator::Async(f) => f(value)
                .await
                .map_err(|err| ErrorCause::Validation { source: err }),
        }
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validator::Sync(_) => f.write_str("Validator::Sync(..)"),
            Validator::Async(_) => f.write_str("Validator::Async(..)"),
        }
    }
}

/// A transform hook: converts an already-validated value, with read access to
/// the whole source record.
#[derive(Clone)]
pub enum Transform {
    Sync(Arc<SyncTransformFn>),
    Async(Arc<AsyncTransformFn>),
}

impl Transform {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Value, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Transform::Sync(Arc::new(f))
    }

    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(Value, &'a Value) -> BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Transform::Async(Arc::new(f))
    }

    pub(crate) fn apply_sync(&self, value: Value, source: &Value) -> Result<Value, ErrorCause> {
        match self {
            Transform::Sync(f) => {
                f(value, source).map_err(|err| ErrorCause::Transform { source: err })
            }
            Transform::Async(_) => Err(ErrorCause::AsyncHook),
        }
    }

    pub(crate) async fn apply(&self, value: Value, source: &Value) -> Result<Value, ErrorCause> {
        match self {
            Transform::Sync(f) => {
                f(value, source).map_err(|err| ErrorCause::Transform { source: err })
            }
            Transform::Async(f) => f(value, source)
                .await
                .map_err(|err| ErrorCause::Transform { source: err }),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Sync(_) => f.write_str("Transform::Sync(..)"),
            Transform::Async(_) => f.write_str("Transform::Async(..)"),
        }
    }
}

/// A computed hook: derives a destination-only field from the partial
/// destination accumulator and the source record.
#[derive(Clone)]
pub enum Computed {
    Sync(Arc<SyncComputeFn>),
    Async(Arc<AsyncComputeFn>),
}

impl Computed {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Map<String, Value>, &Value) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Computed::Sync(Arc::new(f))
    }

    pub fn from_async<F>(f: F) -> Self
    where
        F: for<'a> Fn(&'a Map<String, Value>, &'a Value) -> BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Computed::Async(Arc::new(f))
    }

    pub(crate) fn apply_sync(
        &self,
        dest: &Map<String, Value>,
        source: &Value,
    ) -> Result<Value, ErrorCause> {
        match self {
            Computed::Sync(f) => {
                f(dest, source).map_err(|err| ErrorCause::Computed { source: err })
            }
            Computed::Async(_) => Err(ErrorCause::AsyncHook),
        }
    }

    pub(crate) async fn apply(
        &self,
        dest: &Map<String, Value>,
        source: &Value,
    ) -> Result<Value, ErrorCause> {
        match self {
            Computed::Sync(f) => {
                f(dest, source).map_err(|err| ErrorCause::Computed { source: err })
            }
            Computed::Async(f) => f(dest, source)
                .await
                .map_err(|err| ErrorCause::Computed { source: err }),
        }
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Computed::Sync(_) => f.write_str("Computed::Sync(..)"),
            Computed::Async(_) => f.write_str("Computed::Async(..)"),
        }
    }
}
