//! The in-flight file unit.

use std::path::{Path, PathBuf};

use lintflow_engine::LintResult;

use crate::error::PipelineError;

/// A file flowing through the pipeline.
///
/// Contents are raw bytes; UTF-8 is checked at the linting boundary so a
/// binary file degrades to a per-file failure instead of aborting the run.
/// Only the lint stage mutates `contents` (when applying fixed output).
#[derive(Debug, Clone)]
pub struct FileItem {
    /// Path of the file.
    pub path: PathBuf,
    /// Base directory the file was collected under.
    pub base: PathBuf,
    /// Current contents.
    pub contents: Vec<u8>,
    /// The attached lint result, once the lint stage has run.
    pub lint: Option<LintResult>,
}

impl FileItem {
    /// Creates a file item.
    pub fn new(
        path: impl Into<PathBuf>,
        base: impl Into<PathBuf>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            path: path.into(),
            base: base.into(),
            contents: contents.into(),
            lint: None,
        }
    }

    /// The contents as text.
    ///
    /// Fails with a non-fatal [`PipelineError::File`] when the contents are
    /// not valid UTF-8.
    pub fn contents_str(&self) -> Result<&str, PipelineError> {
        std::str::from_utf8(&self.contents).map_err(|_| {
            PipelineError::file(format!("{} is not valid UTF-8", self.path.display()))
        })
    }

    /// Replaces the contents with fixed text.
    pub fn set_contents(&mut self, contents: impl Into<String>) {
        self.contents = contents.into().into_bytes();
    }

    /// The path relative to the base directory, when it applies.
    pub fn relative_path(&self) -> &Path {
        self.path.strip_prefix(&self.base).unwrap_or(&self.path)
    }
}
