//! Per-file lint results.

use std::ops::AddAssign;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::message::LintMessage;

/// Message counts broken down by classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageCounts {
    /// Number of error messages.
    pub error_count: usize,
    /// Number of warning messages.
    pub warning_count: usize,
    /// Number of error messages carrying a fix.
    pub fixable_error_count: usize,
    /// Number of warning messages carrying a fix.
    pub fixable_warning_count: usize,
    /// Number of fatal error messages.
    pub fatal_error_count: usize,
}

impl MessageCounts {
    /// Tallies the counts over a message sequence in one pass.
    pub fn tally(messages: &[LintMessage]) -> Self {
        let mut counts = Self::default();
        for message in messages {
            if message.is_error() {
                counts.error_count += 1;
            }
            if message.is_warning() {
                counts.warning_count += 1;
            }
            if message.is_fixable_error() {
                counts.fixable_error_count += 1;
            }
            if message.is_fixable_warning() {
                counts.fixable_warning_count += 1;
            }
            if message.is_fatal_error() {
                counts.fatal_error_count += 1;
            }
        }
        counts
    }
}

impl AddAssign for MessageCounts {
    fn add_assign(&mut self, other: Self) {
        self.error_count += other.error_count;
        self.warning_count += other.warning_count;
        self.fixable_error_count += other.fixable_error_count;
        self.fixable_warning_count += other.fixable_warning_count;
        self.fatal_error_count += other.fatal_error_count;
    }
}

/// The result of linting a single file.
///
/// The five count fields always reflect the current message sequence; any
/// code that changes `messages` must call [`LintResult::recount`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintResult {
    /// Path of the linted file.
    pub file_path: PathBuf,

    /// Findings, in source order.
    pub messages: Vec<LintMessage>,

    /// Number of error messages.
    pub error_count: usize,

    /// Number of warning messages.
    pub warning_count: usize,

    /// Number of error messages carrying a fix.
    pub fixable_error_count: usize,

    /// Number of warning messages carrying a fix.
    pub fixable_warning_count: usize,

    /// Number of fatal error messages.
    pub fatal_error_count: usize,

    /// Source text after engine fixes, when the engine produced any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Whether fixed output has been applied to the file contents.
    #[serde(default)]
    pub fixed: bool,
}

impl LintResult {
    /// Creates a result, tallying the counts from the messages.
    pub fn new(file_path: impl Into<PathBuf>, messages: Vec<LintMessage>) -> Self {
        let mut result = Self {
            file_path: file_path.into(),
            messages,
            error_count: 0,
            warning_count: 0,
            fixable_error_count: 0,
            fixable_warning_count: 0,
            fatal_error_count: 0,
            output: None,
            fixed: false,
        };
        result.recount();
        result
    }

    /// Creates a result with no findings.
    pub fn empty(file_path: impl Into<PathBuf>) -> Self {
        Self::new(file_path, Vec::new())
    }

    /// Attaches engine-fixed output text.
    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Re-tallies the counts after the message sequence changed.
    pub fn recount(&mut self) {
        let counts = MessageCounts::tally(&self.messages);
        self.error_count = counts.error_count;
        self.warning_count = counts.warning_count;
        self.fixable_error_count = counts.fixable_error_count;
        self.fixable_warning_count = counts.fixable_warning_count;
        self.fatal_error_count = counts.fatal_error_count;
    }

    /// Current counts as a standalone value.
    pub fn counts(&self) -> MessageCounts {
        MessageCounts {
            error_count: self.error_count,
            warning_count: self.warning_count,
            fixable_error_count: self.fixable_error_count,
            fixable_warning_count: self.fixable_warning_count,
            fatal_error_count: self.fatal_error_count,
        }
    }

    /// Returns true if the result carries any error messages.
    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}
