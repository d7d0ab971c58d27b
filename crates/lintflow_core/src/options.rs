//! Option migration.
//!
//! The pipeline accepts a backward-compatible option surface: a bare
//! configuration-file path, or a key/value map mixing engine-native options
//! with legacy keys from older releases. [`migrate`] normalizes that surface
//! into the `{engine_options, quiet, warn_ignored}` triple the rest of the
//! pipeline works with, rejecting option shapes the streaming model cannot
//! support.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use lintflow_engine::{EngineOptions, LintMessage, LintResult};

use crate::error::PipelineError;

/// Predicate deciding whether a message survives quiet filtering.
///
/// Receives the message, its index, and the result that owns it.
pub type MessageFilter = Arc<dyn Fn(&LintMessage, usize, &LintResult) -> bool + Send + Sync>;

/// How findings are filtered before a result is attached.
#[derive(Clone, Default)]
pub enum Quiet {
    /// Keep every message.
    #[default]
    Off,
    /// Keep error messages only.
    Enabled,
    /// Keep messages the predicate accepts.
    Filter(MessageFilter),
}

impl fmt::Debug for Quiet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => f.write_str("Off"),
            Self::Enabled => f.write_str("Enabled"),
            Self::Filter(_) => f.write_str("Filter(..)"),
        }
    }
}

/// The raw, not-yet-migrated option surface.
///
/// Built from a bare config-file path, a JSON(C) document, or the builder
/// methods. The quiet predicate exists only on the programmatic surface; the
/// data surface takes a boolean `quiet` key.
#[derive(Clone, Default)]
pub struct RawOptions {
    config_file: Option<String>,
    entries: Map<String, Value>,
    quiet_filter: Option<MessageFilter>,
}

impl RawOptions {
    /// Creates an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The bare config-file shorthand.
    pub fn config_file(path: impl Into<String>) -> Self {
        Self {
            config_file: Some(path.into()),
            ..Self::default()
        }
    }

    /// Builds options from a JSON value: a string is the config-file
    /// shorthand, an object is the option map.
    pub fn from_value(value: Value) -> Result<Self, PipelineError> {
        match value {
            Value::String(path) => Ok(Self::config_file(path)),
            Value::Object(entries) => Ok(Self {
                entries,
                ..Self::default()
            }),
            Value::Null => Ok(Self::default()),
            other => Err(PipelineError::invalid_options(format!(
                "options must be a string or an object, got {other}"
            ))),
        }
    }

    /// Parses options from a JSON-with-comments document.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let value = jsonc_parser::parse_to_serde_value(json, &Default::default())
            .map_err(|e| PipelineError::invalid_options(format!("Failed to parse options: {e}")))?
            .unwrap_or(Value::Null);
        Self::from_value(value)
    }

    /// Loads options from a JSON-with-comments file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Sets one option key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Installs a programmatic quiet predicate. Wins over a `quiet` key.
    pub fn quiet_with(
        mut self,
        filter: impl Fn(&LintMessage, usize, &LintResult) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.quiet_filter = Some(Arc::new(filter));
        self
    }
}

impl From<&str> for RawOptions {
    fn from(path: &str) -> Self {
        Self::config_file(path)
    }
}

impl From<String> for RawOptions {
    fn from(path: String) -> Self {
        Self::config_file(path)
    }
}

impl fmt::Debug for RawOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawOptions")
            .field("config_file", &self.config_file)
            .field("entries", &self.entries)
            .field("quiet_filter", &self.quiet_filter.as_ref().map(|_| ".."))
            .finish()
    }
}

/// The migrated option triple.
#[derive(Debug, Clone)]
pub struct NormalizedOptions {
    /// Options forwarded to the engine factory.
    pub engine_options: EngineOptions,
    /// Quiet filtering mode.
    pub quiet: Quiet,
    /// Whether skipped files get a synthesized warning attached.
    pub warn_ignored: Option<bool>,
}

/// How a legacy key converts into its `override_config` form.
enum Conversion {
    /// Value moves verbatim under the target name.
    Move,
    /// An array of `"name"` / `"name:value"` strings becomes a name-to-bool
    /// map; entries without an explicit value use `default`.
    ListToMap { default: bool },
}

/// Legacy keys folded into `override_config`, in checking order.
const LEGACY_CONFIG_KEYS: [(&str, &str, Conversion); 7] = [
    ("envs", "env", Conversion::ListToMap { default: true }),
    ("globals", "globals", Conversion::ListToMap { default: false }),
    ("ignore_pattern", "ignore_patterns", Conversion::Move),
    ("parser", "parser", Conversion::Move),
    ("parser_options", "parser_options", Conversion::Move),
    ("plugins", "plugins", Conversion::Move),
    ("rules", "rules", Conversion::Move),
];

/// Options the streaming pipeline cannot honor, in checking order.
const FORBIDDEN_KEYS: [&str; 6] = [
    "cache",
    "cache_file",
    "cache_location",
    "cache_strategy",
    "glob_input_paths",
    "error_on_unmatched_pattern",
];

/// Normalizes the raw option surface.
///
/// Fails with [`PipelineError::InvalidOptions`] when a forbidden key is
/// present or a value has the wrong shape; all forbidden keys are reported
/// in one error.
pub fn migrate(raw: RawOptions) -> Result<NormalizedOptions, PipelineError> {
    let RawOptions {
        config_file,
        mut entries,
        quiet_filter,
    } = raw;

    if let Some(path) = config_file {
        let mut engine_options = EngineOptions::new();
        engine_options.insert("override_config_file", path);
        return Ok(NormalizedOptions {
            engine_options,
            quiet: quiet_filter.map(Quiet::Filter).unwrap_or_default(),
            warn_ignored: None,
        });
    }

    let forbidden: Vec<&str> = FORBIDDEN_KEYS
        .iter()
        .copied()
        .filter(|key| entries.contains_key(*key))
        .collect();
    if !forbidden.is_empty() {
        return Err(PipelineError::invalid_options(format!(
            "unsupported option(s): {}",
            forbidden.join(", ")
        )));
    }

    // Older releases called the engine-native `override_config_file` option
    // `config_file`. The native name wins when both are given.
    if let Some(value) = entries.remove("config_file")
        && !entries.contains_key("override_config_file")
    {
        entries.insert("override_config_file".to_string(), value);
    }

    let warn_ignored = take_bool(&mut entries, "warn_ignored")?;
    let warn_file_ignored = take_bool(&mut entries, "warn_file_ignored")?;
    let warn_ignored = warn_ignored.or(warn_file_ignored);

    let quiet = match (quiet_filter, take_bool(&mut entries, "quiet")?) {
        (Some(filter), _) => Quiet::Filter(filter),
        (None, Some(true)) => Quiet::Enabled,
        (None, _) => Quiet::Off,
    };

    let (mut override_config, had_object) = match entries.remove("override_config") {
        None | Some(Value::Null) => (Map::new(), false),
        Some(Value::Object(map)) => (map, true),
        Some(_) => {
            return Err(PipelineError::invalid_options(
                "`override_config` must be an object",
            ));
        }
    };

    for (source, target, conversion) in LEGACY_CONFIG_KEYS {
        let Some(value) = entries.remove(source) else {
            continue;
        };
        let converted = match conversion {
            Conversion::Move => value,
            Conversion::ListToMap { default } => list_to_map(source, value, default)?,
        };
        // The legacy key wins over an explicit override_config field.
        override_config.insert(target.to_string(), converted);
    }

    if had_object || !override_config.is_empty() {
        entries.insert("override_config".to_string(), Value::Object(override_config));
    }

    let engine_options = EngineOptions::from(entries);
    debug!(
        "Migrated options: {} engine option(s), quiet {:?}, warn_ignored {:?}",
        engine_options.len(),
        quiet,
        warn_ignored
    );

    Ok(NormalizedOptions {
        engine_options,
        quiet,
        warn_ignored,
    })
}

/// Removes a key that must hold a boolean when present.
fn take_bool(entries: &mut Map<String, Value>, key: &str) -> Result<Option<bool>, PipelineError> {
    match entries.remove(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(value)),
        Some(_) => Err(PipelineError::invalid_options(format!(
            "`{key}` must be a boolean"
        ))),
    }
}

/// Converts a `["name", "name:value"]` list into a name-to-bool map.
///
/// An explicit value enables the name only when it is the literal `true`.
/// The reserved name `__proto__` is dropped so the map stays safe to hand to
/// JavaScript consumers.
fn list_to_map(key: &str, value: Value, default: bool) -> Result<Value, PipelineError> {
    let Value::Array(items) = value else {
        return Err(PipelineError::invalid_options(format!(
            "`{key}` must be an array of strings"
        )));
    };

    let mut map = Map::new();
    for item in items {
        let Value::String(entry) = item else {
            return Err(PipelineError::invalid_options(format!(
                "`{key}` entries must be strings"
            )));
        };
        let (name, explicit) = match entry.split_once(':') {
            Some((name, value)) => (name, Some(value)),
            None => (entry.as_str(), None),
        };
        if name == "__proto__" {
            continue;
        }
        let enabled = match explicit {
            Some(value) => value == "true",
            None => default,
        };
        map.insert(name.to_string(), Value::Bool(enabled));
    }

    Ok(Value::Object(map))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    fn migrate_value(value: Value) -> Result<NormalizedOptions, PipelineError> {
        migrate(RawOptions::from_value(value).unwrap())
    }

    #[test]
    fn bare_path_becomes_override_config_file() {
        let normalized = migrate("eslint.config.js".into()).unwrap();

        assert_eq!(
            normalized.engine_options.override_config_file(),
            Some("eslint.config.js")
        );
        assert_eq!(normalized.engine_options.len(), 1);
        assert!(matches!(normalized.quiet, Quiet::Off));
        assert_eq!(normalized.warn_ignored, None);
    }

    #[rstest]
    #[case::cache(json!({ "cache": true }), "cache")]
    #[case::cache_location(json!({ "cache_location": ".cache" }), "cache_location")]
    #[case::glob(json!({ "glob_input_paths": false }), "glob_input_paths")]
    fn forbidden_keys_are_rejected(#[case] options: Value, #[case] key: &str) {
        let error = migrate_value(options).unwrap_err();

        assert!(matches!(error, PipelineError::InvalidOptions(_)));
        assert!(error.to_string().contains(key));
    }

    #[test]
    fn all_forbidden_keys_are_reported_in_table_order() {
        let error = migrate_value(json!({
            "cache_file": ".cache",
            "cache": true,
            "error_on_unmatched_pattern": true,
        }))
        .unwrap_err();

        assert!(
            error
                .to_string()
                .contains("cache, cache_file, error_on_unmatched_pattern")
        );
    }

    #[test]
    fn globals_list_converts_with_default_false() {
        let normalized = migrate_value(json!({ "globals": ["$", "jQuery:true"] })).unwrap();

        let config = normalized.engine_options.override_config().unwrap();
        assert_eq!(config["globals"], json!({ "$": false, "jQuery": true }));
    }

    #[test]
    fn envs_list_converts_with_default_true() {
        let normalized =
            migrate_value(json!({ "envs": ["browser", "node:false", "es6:yes"] })).unwrap();

        let config = normalized.engine_options.override_config().unwrap();
        assert_eq!(
            config["env"],
            json!({ "browser": true, "node": false, "es6": false })
        );
    }

    #[test]
    fn proto_entries_are_dropped() {
        let normalized =
            migrate_value(json!({ "globals": ["__proto__", "__proto__:true", "$"] })).unwrap();

        let config = normalized.engine_options.override_config().unwrap();
        assert_eq!(config["globals"], json!({ "$": false }));
    }

    #[test]
    fn non_string_list_entries_are_rejected() {
        let error = migrate_value(json!({ "globals": ["$", 7] })).unwrap_err();
        assert!(error.to_string().contains("entries must be strings"));
    }

    #[test]
    fn non_array_list_value_is_rejected() {
        let error = migrate_value(json!({ "envs": "browser" })).unwrap_err();
        assert!(error.to_string().contains("must be an array"));
    }

    #[test]
    fn legacy_keys_move_under_override_config() {
        let normalized = migrate_value(json!({
            "parser": "@babel/eslint-parser",
            "rules": { "no-console": "warn" },
            "ignore_pattern": ["dist/**"],
        }))
        .unwrap();

        let config = normalized.engine_options.override_config().unwrap();
        assert_eq!(config["parser"], json!("@babel/eslint-parser"));
        assert_eq!(config["rules"], json!({ "no-console": "warn" }));
        assert_eq!(config["ignore_patterns"], json!(["dist/**"]));
    }

    #[test]
    fn legacy_key_wins_over_explicit_override_config_field() {
        let normalized = migrate_value(json!({
            "override_config": { "parser": "espree", "env": { "node": true } },
            "parser": "@babel/eslint-parser",
        }))
        .unwrap();

        let config = normalized.engine_options.override_config().unwrap();
        assert_eq!(config["parser"], json!("@babel/eslint-parser"));
        assert_eq!(config["env"], json!({ "node": true }));
    }

    #[test]
    fn explicit_override_config_survives_without_legacy_keys() {
        let normalized = migrate_value(json!({ "override_config": { "rules": {} } })).unwrap();

        assert!(normalized.engine_options.override_config().is_some());
    }

    #[test]
    fn override_config_must_be_an_object() {
        let error = migrate_value(json!({ "override_config": [1, 2] })).unwrap_err();
        assert!(error.to_string().contains("must be an object"));
    }

    #[test]
    fn config_file_is_renamed() {
        let normalized = migrate_value(json!({ "config_file": "legacy.json" })).unwrap();

        assert_eq!(
            normalized.engine_options.override_config_file(),
            Some("legacy.json")
        );
        assert!(normalized.engine_options.get("config_file").is_none());
    }

    #[test]
    fn native_name_wins_over_config_file() {
        let normalized = migrate_value(json!({
            "config_file": "legacy.json",
            "override_config_file": "native.json",
        }))
        .unwrap();

        assert_eq!(
            normalized.engine_options.override_config_file(),
            Some("native.json")
        );
    }

    #[test]
    fn warn_ignored_wins_over_older_synonym() {
        let normalized = migrate_value(json!({
            "warn_ignored": false,
            "warn_file_ignored": true,
        }))
        .unwrap();

        assert_eq!(normalized.warn_ignored, Some(false));
        assert!(normalized.engine_options.get("warn_ignored").is_none());
        assert!(normalized.engine_options.get("warn_file_ignored").is_none());
    }

    #[test]
    fn older_warn_synonym_still_works_alone() {
        let normalized = migrate_value(json!({ "warn_file_ignored": true })).unwrap();
        assert_eq!(normalized.warn_ignored, Some(true));
    }

    #[rstest]
    #[case::enabled(json!(true), true)]
    #[case::disabled(json!(false), false)]
    fn quiet_boolean_forms(#[case] value: Value, #[case] enabled: bool) {
        let normalized = migrate_value(json!({ "quiet": value })).unwrap();

        match normalized.quiet {
            Quiet::Enabled => assert!(enabled),
            Quiet::Off => assert!(!enabled),
            Quiet::Filter(_) => panic!("no predicate was installed"),
        }
    }

    #[test]
    fn quiet_must_be_boolean_in_data_form() {
        let error = migrate_value(json!({ "quiet": "yes" })).unwrap_err();
        assert!(error.to_string().contains("`quiet` must be a boolean"));
    }

    #[test]
    fn programmatic_quiet_predicate_wins() {
        let raw = RawOptions::new()
            .set("quiet", true)
            .quiet_with(|message, _, _| message.fatal);

        let normalized = migrate(raw).unwrap();
        assert!(matches!(normalized.quiet, Quiet::Filter(_)));
    }

    #[test]
    fn unclaimed_keys_pass_through() {
        let normalized = migrate_value(json!({
            "fix": true,
            "extensions": ["js"],
            "custom_engine_knob": 7,
        }))
        .unwrap();

        assert!(normalized.engine_options.fix());
        assert_eq!(normalized.engine_options.get("custom_engine_knob"), Some(&json!(7)));
        assert!(normalized.engine_options.override_config().is_none());
    }

    #[test]
    fn from_json_accepts_comments() {
        let raw = RawOptions::from_json(
            r#"{
                // enable automatic fixing
                "fix": true,
                "quiet": true, // errors only
            }"#,
        )
        .unwrap();

        let normalized = migrate(raw).unwrap();
        assert!(normalized.engine_options.fix());
        assert!(matches!(normalized.quiet, Quiet::Enabled));
    }

    #[test]
    fn from_value_rejects_scalars() {
        let error = RawOptions::from_value(json!(42)).unwrap_err();
        assert!(error.to_string().contains("string or an object"));
    }

    #[test]
    fn empty_document_is_an_empty_surface() {
        let raw = RawOptions::from_json("").unwrap();
        let normalized = migrate(raw).unwrap();
        assert!(normalized.engine_options.is_empty());
    }
}
