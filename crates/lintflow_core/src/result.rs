//! Pure operations over lint results.

use std::cmp::Ordering;
use std::path::{Component, Path};

use lintflow_engine::{LintMessage, LintResult, Severity, Span};

/// Warning attached to hidden files skipped by the engine.
pub const HIDDEN_FILE_WARNING: &str =
    "File ignored by default because it is hidden. Use a negated ignore pattern to override.";

/// Warning attached to files under `node_modules` skipped by the engine.
pub const NODE_MODULES_WARNING: &str =
    "File ignored by default because it is inside node_modules. Use a negated ignore pattern to override.";

/// Warning attached to files skipped by an ignore pattern.
pub const IGNORE_PATTERN_WARNING: &str =
    "File ignored because of a matching ignore pattern. Disable the ignore setting to override.";

/// Builds a new result keeping only the messages the predicate accepts.
///
/// The predicate sees each message, its index, and the result that owns it.
/// All five counts are recomputed; `file_path`, `output` and `fixed` carry
/// over. The input result is left untouched.
pub fn filter_result<F>(result: &LintResult, predicate: F) -> LintResult
where
    F: Fn(&LintMessage, usize, &LintResult) -> bool,
{
    let messages: Vec<LintMessage> = result
        .messages
        .iter()
        .enumerate()
        .filter(|(index, message)| predicate(message, *index, result))
        .map(|(_, message)| message.clone())
        .collect();

    let mut filtered = LintResult::new(result.file_path.clone(), messages);
    filtered.output = result.output.clone();
    filtered.fixed = result.fixed;
    filtered
}

/// Builds the result attached to a file the engine ignored.
///
/// Carries exactly one warning whose text names the most specific reason the
/// path (relative to `base`) is ignored: hidden path segment, then a
/// `node_modules` segment, then a generic ignore pattern.
pub fn synthesize_ignored_result(path: &Path, base: &Path) -> LintResult {
    let relative = path.strip_prefix(base).unwrap_or(path);

    let text = if has_hidden_segment(relative) {
        HIDDEN_FILE_WARNING
    } else if relative.components().any(|c| c.as_os_str() == "node_modules") {
        NODE_MODULES_WARNING
    } else {
        IGNORE_PATTERN_WARNING
    };

    let message = LintMessage::new(text, Span::new(0, 0)).with_severity(Severity::Warning);
    LintResult::new(path, vec![message])
}

/// True when any normal segment starts with a dot.
///
/// `Component::ParentDir` is a distinct variant, so `..` never counts.
fn has_hidden_segment(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

/// Orders results by file path, for deterministic formatter input.
pub fn compare_by_path(a: &LintResult, b: &LintResult) -> Ordering {
    a.file_path.as_os_str().cmp(b.file_path.as_os_str())
}
