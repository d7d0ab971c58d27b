//! The linting stage and the engine handle behind it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use lintflow_engine::{EngineError, EngineOptions, LintEngine};
use tracing::debug;

use crate::error::PipelineError;
use crate::file::FileItem;
use crate::format::{FormatAllStage, FormatEachStage, FormatterRef, OutputSink};
use crate::options::{NormalizedOptions, Quiet, RawOptions, migrate};
use crate::result::{filter_result, synthesize_ignored_result};
use crate::stream::Stage;

/// Owns the engine and the migrated options for one pipeline run.
///
/// Construction migrates the raw options and builds the engine through the
/// supplied factory, so malformed options and factory failures surface here,
/// before any file is processed. The stages returned by [`Linter::stage`],
/// [`Linter::format_all`] and [`Linter::format_each`] share one engine
/// handle.
pub struct Linter {
    engine: Arc<dyn LintEngine>,
    options: NormalizedOptions,
}

impl fmt::Debug for Linter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linter")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Linter {
    /// Migrates `raw` and builds the engine from the migrated options.
    pub fn new<E, F>(raw: impl Into<RawOptions>, factory: F) -> Result<Self, PipelineError>
    where
        E: LintEngine + 'static,
        F: FnOnce(&EngineOptions) -> Result<E, EngineError>,
    {
        let options = migrate(raw.into())?;
        let engine = factory(&options.engine_options)?;
        Ok(Self {
            engine: Arc::new(engine),
            options,
        })
    }

    /// A new handle to the shared engine.
    pub fn engine(&self) -> Arc<dyn LintEngine> {
        Arc::clone(&self.engine)
    }

    /// The migrated options.
    pub fn options(&self) -> &NormalizedOptions {
        &self.options
    }

    /// The stage that lints each file and attaches its result.
    pub fn stage(&self) -> LinterStage {
        LinterStage {
            engine: Arc::clone(&self.engine),
            options: self.options.clone(),
        }
    }

    /// A stage that formats the whole result set once at end of stream.
    pub fn format_all(
        &self,
        formatter: impl Into<FormatterRef>,
        sink: OutputSink,
    ) -> FormatAllStage {
        FormatAllStage::new(Arc::clone(&self.engine), formatter.into(), sink)
    }

    /// A stage that formats each file's result as it passes through.
    pub fn format_each(
        &self,
        formatter: impl Into<FormatterRef>,
        sink: OutputSink,
    ) -> FormatEachStage {
        FormatEachStage::new(Arc::clone(&self.engine), formatter.into(), sink)
    }
}

/// Per-file stage built by [`Linter::stage`].
pub struct LinterStage {
    engine: Arc<dyn LintEngine>,
    options: NormalizedOptions,
}

impl LinterStage {
    /// True when an `extensions` restriction or the engine's ignore rules
    /// exclude the path.
    fn should_skip(&self, path: &Path) -> Result<bool, PipelineError> {
        if !self.lintable(path) {
            return Ok(true);
        }
        self.engine
            .is_path_ignored(path)
            .map_err(|error| PipelineError::lint(path, error))
    }

    fn lintable(&self, path: &Path) -> bool {
        let Some(extensions) = self.options.engine_options.extensions() else {
            return true;
        };
        let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        extensions
            .iter()
            .any(|allowed| allowed.trim_start_matches('.') == extension)
    }
}

impl Stage for LinterStage {
    fn name(&self) -> &'static str {
        "lint"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if self.should_skip(&file.path)? {
            debug!("Skipping {}", file.path.display());
            if self.options.warn_ignored == Some(true) {
                file.lint = Some(synthesize_ignored_result(&file.path, &file.base));
            }
            return Ok(());
        }

        let contents = file.contents_str()?.to_owned();
        let outcome = self
            .engine
            .lint_text(&contents, &file.path)
            .map_err(|error| PipelineError::lint(&file.path, error))?;
        // No result means the engine had nothing to say about the file.
        let Some(mut result) = outcome else {
            return Ok(());
        };

        if let Some(output) = &result.output {
            file.set_contents(output.clone());
            result.fixed = true;
        }

        let result = match &self.options.quiet {
            Quiet::Off => result,
            Quiet::Enabled => filter_result(&result, |message, _, _| message.is_error()),
            Quiet::Filter(filter) => filter_result(&result, filter.as_ref()),
        };
        file.lint = Some(result);
        Ok(())
    }
}
