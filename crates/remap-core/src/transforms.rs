//! Built-in validators and transforms.
//!
//! A small catalog of common hooks so the engine is usable out of the box.
//! The engine itself has no registry and no knowledge of this module; these
//! are ordinary hook constructors callers attach to schema entries, exactly
//! like hand-written ones.

use crate::schema::{Transform, Validator};
use anyhow::{anyhow, bail};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// Accepts JSON numbers as-is and parses numeric strings into numbers.
///
/// Integer-looking strings become integers, everything else numeric becomes
/// a float.
pub fn numeric() -> Validator {
    Validator::from_fn(|value| match value {
        Value::Number(_) => Ok(value.clone()),
        Value::String(text) => {
            let trimmed = text.trim();
            if let Ok(int) = trimmed.parse::<i64>() {
                return Ok(Value::from(int));
            }
            let float: f64 = trimmed
                .parse()
                .map_err(|_| anyhow!("\"{text}\" is not numeric"))?;
            serde_json::Number::from_f64(float)
                .map(Value::Number)
                .ok_or_else(|| anyhow!("\"{text}\" is not a finite number"))
        }
        other => bail!("expected a number, got {other}"),
    })
}

/// Accepts strings with at least one non-whitespace character.
pub fn non_empty_string() -> Validator {
    Validator::from_fn(|value| match value {
        Value::String(text) if !text.trim().is_empty() => Ok(value.clone()),
        Value::String(_) => bail!("string is empty"),
        other => bail!("expected a string, got {other}"),
    })
}

/// Accepts only values present in `allowed`.
pub fn one_of(allowed: Vec<Value>) -> Validator {
    Validator::from_fn(move |value| {
        if allowed.contains(value) {
            Ok(value.clone())
        } else {
            bail!("{value} is not one of the allowed values")
        }
    })
}

/// Accepts strings matching `pattern`.
pub fn matches(pattern: Regex) -> Validator {
    Validator::from_fn(move |value| match value {
        Value::String(text) if pattern.is_match(text) => Ok(value.clone()),
        Value::String(text) => bail!("\"{text}\" does not match /{pattern}/"),
        other => bail!("expected a string, got {other}"),
    })
}

/// Maps string values through a lookup table, with an optional fallback for
/// unmapped inputs. No table hit and no fallback is a transform failure.
pub fn enum_map(table: HashMap<String, Value>, fallback: Option<Value>) -> Transform {
    Transform::from_fn(move |value, _source| {
        let key = value
            .as_str()
            .ok_or_else(|| anyhow!("expected a string, got {value}"))?;
        if let Some(mapped) = table.get(key) {
            return Ok(mapped.clone());
        }
        fallback
            .clone()
            .ok_or_else(|| anyhow!("no mapping for \"{key}\""))
    })
}

/// Uppercases a string value.
pub fn uppercase() -> Transform {
    Transform::from_fn(|value, _source| {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected a string, got {value}"))?;
        Ok(Value::String(text.to_uppercase()))
    })
}

/// Trims surrounding whitespace from a string value.
pub fn trim() -> Transform {
    Transform::from_fn(|value, _source| {
        let text = value
            .as_str()
            .ok_or_else(|| anyhow!("expected a string, got {value}"))?;
        Ok(Value::String(text.trim().to_string()))
    })
}

/// Multiplies a numeric value by `factor`.
pub fn scale(factor: f64) -> Transform {
    Transform::from_fn(move |value, _source| {
        let number = value
            .as_f64()
            .ok_or_else(|| anyhow!("expected a number, got {value}"))?;
        serde_json::Number::from_f64(number * factor)
            .map(Value::Number)
            .ok_or_else(|| anyhow!("scaled value is not finite"))
    })
}
