//! Dot-path addressing into nested source records.

use serde_json::Value;
use std::fmt;

/// An ordered-segment path into a nested source record.
///
/// Parsed once from a dot-delimited string such as `"customer.address.city"`.
/// A literal `.` inside a field name is unsupported: there is no escaping
/// syntax, and such a name will always be split into separate segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePath {
    segments: Vec<String>,
    raw: String,
}

impl SourcePath {
    /// Parse a dot-delimited path into its segments.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
            raw: path.to_string(),
        }
    }

    /// The first segment: the root key this path reads off the source object.
    pub fn root(&self) -> &str {
        &self.segments[0]
    }

    /// The original dot-delimited form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk the source record segment by segment.
    ///
    /// Returns `None` (absent) the moment the current node is null, is not an
    /// object, or lacks the next segment as a key. Absence is a value, never a
    /// panic, which is what lets callers apply defaults and required-checks
    /// uniformly. A null sitting at the final segment is present:
    /// `Some(Value::Null)`.
    pub fn resolve<'a>(&self, source: &'a Value) -> Option<&'a Value> {
        let mut current = source;
        for segment in &self.segments {
            if current.is_null() {
                return None;
            }
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

impl From<&str> for SourcePath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<String> for SourcePath {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl fmt::Display for SourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
