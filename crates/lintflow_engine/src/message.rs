//! Message types for lint findings.

use serde::{Deserialize, Serialize};

use crate::span::{Location, Span};

/// Severity level of a lint message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Rule switched off - produces no findings.
    Off,
    /// Warning - should be reviewed.
    Warning,
    /// Error - must be fixed.
    #[default]
    Error,
}

impl Severity {
    /// Returns the numeric level (0 = off, 1 = warning, 2 = error).
    #[inline]
    pub const fn level(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Warning => 1,
            Self::Error => 2,
        }
    }

    /// Converts a numeric level back into a severity.
    pub const fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(Self::Off),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

/// A single finding reported by the engine.
///
/// The pipeline inspects only `severity`, `fatal` and the presence of `fix`;
/// the text and location fields are opaque payload carried to formatters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LintMessage {
    /// The rule that produced this message, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,

    /// The message text.
    pub message: String,

    /// Byte span in the source.
    pub span: Span,

    /// Line/column location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<Location>,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Whether this finding halted further analysis of the file.
    #[serde(default)]
    pub fatal: bool,

    /// Optional fix for this message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl LintMessage {
    /// Creates a new error-severity message.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            rule_id: None,
            message: message.into(),
            span,
            loc: None,
            severity: Severity::Error,
            fatal: false,
            fix: None,
        }
    }

    /// Sets the rule id.
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the location.
    pub fn with_location(mut self, loc: Location) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Sets the fatal flag.
    pub fn with_fatal(mut self, fatal: bool) -> Self {
        self.fatal = fatal;
        self
    }

    /// Sets an auto-fix.
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Returns true if this message is an error.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Returns true if this message is a warning.
    #[inline]
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Returns true if this message is an error carrying a fix.
    #[inline]
    pub fn is_fixable_error(&self) -> bool {
        self.is_error() && self.fix.is_some()
    }

    /// Returns true if this message is a warning carrying a fix.
    #[inline]
    pub fn is_fixable_warning(&self) -> bool {
        self.is_warning() && self.fix.is_some()
    }

    /// Returns true if this message is a fatal error.
    #[inline]
    pub fn is_fatal_error(&self) -> bool {
        self.is_error() && self.fatal
    }
}

/// An auto-fix for a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fix {
    /// The byte span to replace.
    pub span: Span,

    /// The replacement text.
    pub text: String,
}

impl Fix {
    /// Creates a new fix.
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            span,
            text: text.into(),
        }
    }

    /// Creates a fix that inserts text at a position.
    pub fn insert(offset: u32, text: impl Into<String>) -> Self {
        Self {
            span: Span::new(offset, offset),
            text: text.into(),
        }
    }

    /// Creates a fix that deletes a span.
    pub fn delete(span: Span) -> Self {
        Self {
            span,
            text: String::new(),
        }
    }
}
