//! Scripted engine for exercising pipelines without a real engine.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{
    EngineError, EngineOptions, FormatContext, LintEngine, LoadedFormatter, RulesMeta,
};
use crate::fix::apply_fixes;
use crate::message::LintMessage;
use crate::result::LintResult;

/// What the engine replays for a matching path.
enum Script {
    Messages(Vec<LintMessage>),
    LintError(String),
    ConfigError(String),
}

/// Formatter function registered on a [`StaticEngine`].
pub type ScriptedFormatterFn =
    Arc<dyn Fn(&[LintResult], &FormatContext<'_>) -> Result<String, EngineError> + Send + Sync>;

/// An engine that replays canned results.
///
/// Scripts are keyed by path suffix so callers can lint files under
/// temporary directories. The `fix` engine option is honored through
/// [`apply_fixes`]: fixed messages are removed from the result and the fixed
/// text lands in `output`, leaving unfixable messages behind.
///
/// A `compact` formatter (one `path: E error(s), W warning(s)` line per
/// result with findings) is registered out of the box, also under the
/// conventional default name `stylish`.
pub struct StaticEngine {
    options: EngineOptions,
    scripts: Vec<(PathBuf, Script)>,
    ignored: Vec<PathBuf>,
    formatters: HashMap<String, ScriptedFormatterFn>,
    rules_meta: RulesMeta,
}

impl StaticEngine {
    /// Creates a scripted engine over the given options.
    pub fn new(options: &EngineOptions) -> Self {
        let compact: ScriptedFormatterFn = Arc::new(compact_format);
        let mut formatters = HashMap::new();
        formatters.insert("compact".to_string(), Arc::clone(&compact));
        formatters.insert("stylish".to_string(), compact);

        Self {
            options: options.clone(),
            scripts: Vec::new(),
            ignored: Vec::new(),
            formatters,
            rules_meta: RulesMeta::new(),
        }
    }

    /// Scripts messages for any path ending with `path`.
    pub fn with_messages(mut self, path: impl Into<PathBuf>, messages: Vec<LintMessage>) -> Self {
        self.scripts.push((path.into(), Script::Messages(messages)));
        self
    }

    /// Scripts a lint failure for any path ending with `path`.
    pub fn with_lint_error(mut self, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        self.scripts
            .push((path.into(), Script::LintError(message.into())));
        self
    }

    /// Scripts a configuration failure for any path ending with `path`.
    pub fn with_config_error(
        mut self,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        self.scripts
            .push((path.into(), Script::ConfigError(message.into())));
        self
    }

    /// Marks any path ending with `path` as ignored.
    pub fn with_ignored(mut self, path: impl Into<PathBuf>) -> Self {
        self.ignored.push(path.into());
        self
    }

    /// Registers a named formatter.
    pub fn with_formatter(
        mut self,
        name: impl Into<String>,
        formatter: impl Fn(&[LintResult], &FormatContext<'_>) -> Result<String, EngineError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.formatters.insert(name.into(), Arc::new(formatter));
        self
    }

    /// Sets the rules metadata returned to formatters.
    pub fn with_rules_meta(mut self, rules_meta: RulesMeta) -> Self {
        self.rules_meta = rules_meta;
        self
    }

    fn script_for(&self, path: &Path) -> Option<&Script> {
        self.scripts
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map(|(_, script)| script)
    }
}

impl LintEngine for StaticEngine {
    fn lint_text(&self, contents: &str, path: &Path) -> Result<Option<LintResult>, EngineError> {
        match self.script_for(path) {
            None => Ok(None),
            Some(Script::LintError(message)) => Err(EngineError::internal(message.clone())),
            Some(Script::ConfigError(message)) => Err(EngineError::config(message.clone())),
            Some(Script::Messages(messages)) => {
                let mut result = LintResult::new(path, messages.clone());
                if self.options.fix() {
                    let outcome = apply_fixes(contents, &result.messages);
                    if outcome.modified {
                        result.messages.retain(|message| message.fix.is_none());
                        result.recount();
                        result.output = Some(outcome.fixed_content);
                    }
                }
                Ok(Some(result))
            }
        }
    }

    fn is_path_ignored(&self, path: &Path) -> Result<bool, EngineError> {
        Ok(self.ignored.iter().any(|suffix| path.ends_with(suffix)))
    }

    fn load_formatter(&self, name: &str) -> Result<Box<dyn LoadedFormatter>, EngineError> {
        let formatter = self
            .formatters
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::formatter(format!("Unknown formatter: {name}")))?;
        Ok(Box::new(ScriptedFormatter(formatter)))
    }

    fn rules_meta(&self, _results: &[LintResult]) -> RulesMeta {
        self.rules_meta.clone()
    }
}

struct ScriptedFormatter(ScriptedFormatterFn);

impl LoadedFormatter for ScriptedFormatter {
    fn format(
        &self,
        results: &[LintResult],
        context: &FormatContext<'_>,
    ) -> Result<String, EngineError> {
        (self.0)(results, context)
    }
}

fn compact_format(
    results: &[LintResult],
    _context: &FormatContext<'_>,
) -> Result<String, EngineError> {
    let lines: Vec<String> = results
        .iter()
        .filter(|result| !result.messages.is_empty())
        .map(|result| {
            format!(
                "{}: {} error(s), {} warning(s)",
                result.file_path.display(),
                result.error_count,
                result.warning_count
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
