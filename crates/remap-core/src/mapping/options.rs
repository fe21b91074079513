//! Options controlling a single map call, plus the diagnostic side-channel.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A non-fatal diagnostic emitted by the engine.
///
/// Diagnostics are advisory only: they never become errors and never change
/// the mapped value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Diagnostic {
    /// Strict mode: root keys of the source object that no schema entry
    /// references.
    UnreferencedSourceFields { fields: Vec<String> },
}

/// Injectable sink for diagnostics, so hosts can route, suppress, or assert
/// on them in tests. When no sink is registered, diagnostics fall back to the
/// `log` facade at warn level.
pub type DiagnosticSink = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Options for one `map` / `map_async` call.
#[derive(Clone, Default)]
pub struct MapOptions {
    /// Emit a diagnostic for source root keys the schema never references.
    pub strict: bool,
    /// Convert per-field failures into omissions (or the spec's default)
    /// instead of aborting the whole call.
    pub skip_invalid: bool,
    diagnostics: Option<DiagnosticSink>,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    /// Register a diagnostic sink replacing the default `log` fallback.
    pub fn with_diagnostics<F>(mut self, sink: F) -> Self
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        self.diagnostics = Some(Arc::new(sink));
        self
    }

    pub(crate) fn emit(&self, diagnostic: Diagnostic) {
        match &self.diagnostics {
            Some(sink) => sink(&diagnostic),
            None => match &diagnostic {
                Diagnostic::UnreferencedSourceFields { fields } => {
                    log::warn!("source fields not referenced by schema: {:?}", fields);
                }
            },
        }
    }
}

impl fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field("strict", &self.strict)
            .field("skip_invalid", &self.skip_invalid)
            .field("diagnostics", &self.diagnostics.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_defaults_are_off() {
        let options = MapOptions::default();
        assert!(!options.strict);
        assert!(!options.skip_invalid);
    }

    #[test]
    fn test_sink_receives_diagnostics() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&seen);
        let options = MapOptions::new().with_diagnostics(move |diagnostic| {
            captured.lock().unwrap().push(diagnostic.clone());
        });

        options.emit(Diagnostic::UnreferencedSourceFields {
            fields: vec!["extra".to_string()],
        });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0],
            Diagnostic::UnreferencedSourceFields {
                fields: vec!["extra".to_string()]
            }
        );
    }
}
