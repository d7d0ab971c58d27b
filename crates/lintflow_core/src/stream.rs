//! The stage protocol and the pipeline driver.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::file::FileItem;

/// A pipeline stage.
///
/// `on_file` runs once per file, in arrival order; `on_end` runs once after
/// the last file, in pipe order across stages. A file finishes every stage
/// before the next file enters the first one.
pub trait Stage: Send {
    /// Name used in logs and hook error attribution.
    fn name(&self) -> &'static str;

    /// Processes one file.
    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError>;

    /// Flushes after the last file.
    fn on_end(&mut self) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// A stage built from closures.
pub struct Transform {
    name: &'static str,
    on_file: Box<dyn FnMut(&mut FileItem) -> Result<(), PipelineError> + Send>,
    on_end: Option<Box<dyn FnOnce() -> Result<(), PipelineError> + Send>>,
}

/// Adapts a per-file closure into a stage.
pub fn transform(
    name: &'static str,
    on_file: impl FnMut(&mut FileItem) -> Result<(), PipelineError> + Send + 'static,
) -> Transform {
    Transform {
        name,
        on_file: Box::new(on_file),
        on_end: None,
    }
}

/// Adapts a per-file closure plus an end-of-stream closure into a stage.
pub fn transform_with_end(
    name: &'static str,
    on_file: impl FnMut(&mut FileItem) -> Result<(), PipelineError> + Send + 'static,
    on_end: impl FnOnce() -> Result<(), PipelineError> + Send + 'static,
) -> Transform {
    Transform {
        name,
        on_file: Box::new(on_file),
        on_end: Some(Box::new(on_end)),
    }
}

impl Stage for Transform {
    fn name(&self) -> &'static str {
        self.name
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        (self.on_file)(file)
    }

    fn on_end(&mut self) -> Result<(), PipelineError> {
        match self.on_end.take() {
            Some(on_end) => on_end(),
            None => Ok(()),
        }
    }
}

/// Result type for [`Pipeline::run`].
pub type RunResult = Result<PipelineRun, PipelineError>;

/// What a completed run produced.
#[derive(Debug)]
pub struct PipelineRun {
    /// Files that made it through every stage, in order.
    pub files: Vec<FileItem>,
    /// Files dropped by a recoverable error, with the error.
    pub failures: Vec<(PathBuf, PipelineError)>,
}

impl PipelineRun {
    /// Returns true if no file was dropped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// An ordered chain of stages.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    pub fn pipe(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Drives the files through every stage, then flushes.
    ///
    /// A non-fatal stage error drops that file into `failures` and the
    /// stream continues. A fatal error aborts immediately: no further file
    /// reaches any stage, and output already produced is not rolled back.
    pub fn run(mut self, files: Vec<FileItem>) -> RunResult {
        let mut survivors = Vec::with_capacity(files.len());
        let mut failures = Vec::new();

        'files: for mut file in files {
            debug!("Processing {}", file.path.display());
            for stage in &mut self.stages {
                if let Err(error) = stage.on_file(&mut file) {
                    if error.is_fatal() {
                        return Err(error);
                    }
                    warn!(
                        "Stage '{}' dropped {}: {}",
                        stage.name(),
                        file.path.display(),
                        error
                    );
                    failures.push((file.path.clone(), error));
                    continue 'files;
                }
            }
            survivors.push(file);
        }

        for stage in &mut self.stages {
            stage.on_end()?;
        }

        Ok(PipelineRun {
            files: survivors,
            failures,
        })
    }
}
