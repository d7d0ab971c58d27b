//! Pipeline error types.

use std::path::PathBuf;

use thiserror::Error;

use lintflow_engine::EngineError;

/// Boxed error type accepted from consumer-supplied hooks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while a pipeline runs.
///
/// Every error crossing a stage boundary is a `PipelineError`. Fatal errors
/// abort the run; non-fatal ones drop the offending file and are recorded in
/// [`PipelineRun::failures`](crate::PipelineRun::failures).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The option surface was malformed.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The engine failed while linting one file.
    #[error("Failed to lint {path}: {source}")]
    Lint {
        /// The file being linted.
        path: PathBuf,
        /// The underlying engine error.
        #[source]
        source: EngineError,
    },

    /// An error-count gate tripped.
    #[error("{0}")]
    Gate(String),

    /// A consumer-supplied hook failed.
    #[error("Stage '{stage}' failed: {source}")]
    Hook {
        /// The stage the hook was registered on.
        stage: &'static str,
        /// The hook's error.
        #[source]
        source: BoxError,
    },

    /// The engine failed outside a per-file lint.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// A per-file content problem.
    #[error("File error: {0}")]
    File(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Creates an invalid-options error.
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions(message.into())
    }

    /// Creates a per-file lint error.
    pub fn lint(path: impl Into<PathBuf>, source: EngineError) -> Self {
        Self::Lint {
            path: path.into(),
            source,
        }
    }

    /// Creates a gate error.
    pub fn gate(message: impl Into<String>) -> Self {
        Self::Gate(message.into())
    }

    /// Creates a hook error.
    pub fn hook(stage: &'static str, source: BoxError) -> Self {
        Self::Hook { stage, source }
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Returns true if this error aborts the whole run.
    ///
    /// Per-file problems (a lint failure, an unreadable or non-UTF-8 file)
    /// drop that file and let the stream continue. An engine configuration
    /// error is fatal even when raised per file: every later file would fail
    /// the same way.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Lint { source, .. } => matches!(source, EngineError::Config(_)),
            Self::File(_) => false,
            _ => true,
        }
    }
}
