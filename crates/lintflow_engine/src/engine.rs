//! The seam between the pipeline and a linting engine.
//!
//! Rule evaluation, configuration discovery and formatter rendering all live
//! behind [`LintEngine`]; the pipeline only ever talks to these traits.

use std::cell::OnceCell;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::result::LintResult;

/// Rules metadata exposed to formatters, keyed by rule id.
pub type RulesMeta = Map<String, Value>;

/// Errors reported by a linting engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Formatter error.
    #[error("Formatter error: {0}")]
    Formatter(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a formatter error.
    pub fn formatter(message: impl Into<String>) -> Self {
        Self::Formatter(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

/// Options handed to the engine factory.
///
/// An open key/value map: the pipeline reads and writes the handful of keys
/// it understands and forwards everything else untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineOptions(Map<String, Value>);

impl EngineOptions {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Returns the raw value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Sets a key to a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Returns true if no options are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The configuration file override, when set.
    pub fn override_config_file(&self) -> Option<&str> {
        self.0.get("override_config_file").and_then(Value::as_str)
    }

    /// The inline configuration override, when set.
    pub fn override_config(&self) -> Option<&Map<String, Value>> {
        self.0.get("override_config").and_then(Value::as_object)
    }

    /// Whether fix mode is enabled.
    pub fn fix(&self) -> bool {
        self.0.get("fix").and_then(Value::as_bool).unwrap_or(false)
    }

    /// Lintable extensions, when restricted. Non-string entries are skipped.
    pub fn extensions(&self) -> Option<Vec<&str>> {
        let list = self.0.get("extensions")?.as_array()?;
        Some(list.iter().filter_map(Value::as_str).collect())
    }

    /// A view of the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for EngineOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A linting engine consumed as a black box.
pub trait LintEngine: Send + Sync {
    /// Lints source text for a path.
    ///
    /// `Ok(None)` means the engine produced no result for this file; the
    /// pipeline passes such a file through unchanged.
    fn lint_text(&self, contents: &str, path: &Path) -> Result<Option<LintResult>, EngineError>;

    /// Returns true if the engine's ignore configuration excludes the path.
    fn is_path_ignored(&self, path: &Path) -> Result<bool, EngineError>;

    /// Loads a formatter by name.
    fn load_formatter(&self, name: &str) -> Result<Box<dyn LoadedFormatter>, EngineError>;

    /// Metadata for the rules that produced the given results.
    fn rules_meta(&self, _results: &[LintResult]) -> RulesMeta {
        RulesMeta::new()
    }
}

/// A formatter resolved by the engine.
pub trait LoadedFormatter: Send + Sync {
    /// Renders results to text.
    fn format(
        &self,
        results: &[LintResult],
        context: &FormatContext<'_>,
    ) -> Result<String, EngineError>;
}

impl fmt::Debug for dyn LoadedFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn LoadedFormatter")
    }
}

/// Context handed to formatters.
///
/// Rules metadata is looked up from the engine on first access and cached
/// for the rest of the call.
pub struct FormatContext<'a> {
    engine: &'a dyn LintEngine,
    results: &'a [LintResult],
    rules_meta: OnceCell<RulesMeta>,
}

impl<'a> FormatContext<'a> {
    /// Creates a context over a result set.
    pub fn new(engine: &'a dyn LintEngine, results: &'a [LintResult]) -> Self {
        Self {
            engine,
            results,
            rules_meta: OnceCell::new(),
        }
    }

    /// The results being formatted.
    pub fn results(&self) -> &[LintResult] {
        self.results
    }

    /// Rules metadata, computed on first access.
    pub fn rules_meta(&self) -> &RulesMeta {
        self.rules_meta
            .get_or_init(|| self.engine.rules_meta(self.results))
    }
}
