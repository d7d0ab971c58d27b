//! Formatter resolution and output dispatch.

use std::io::Write;
use std::sync::Arc;

use lintflow_engine::{EngineError, FormatContext, LintEngine, LintResult, LoadedFormatter};
use tracing::info;

use crate::error::PipelineError;
use crate::file::FileItem;
use crate::result::compare_by_path;
use crate::stream::Stage;

/// Function form of a formatter.
pub type FormatterFn =
    Box<dyn Fn(&[LintResult], &FormatContext<'_>) -> Result<String, EngineError> + Send + Sync>;

/// How a formatter is designated.
///
/// Resolution is lazy: a `Name` is looked up through the engine's formatter
/// loader the first time the stage needs it.
pub enum FormatterRef {
    /// Resolved through [`LintEngine::load_formatter`].
    Name(String),
    /// Used as-is.
    Loaded(Box<dyn LoadedFormatter>),
    /// Wrapped into a formatter that sorts results by path before calling
    /// the function.
    Fn(FormatterFn),
}

impl FormatterRef {
    /// Wraps a formatter function.
    pub fn from_fn(
        formatter: impl Fn(&[LintResult], &FormatContext<'_>) -> Result<String, EngineError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::Fn(Box::new(formatter))
    }
}

/// The engine's conventional default formatter.
impl Default for FormatterRef {
    fn default() -> Self {
        Self::Name("stylish".to_string())
    }
}

impl From<&str> for FormatterRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for FormatterRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<Box<dyn LoadedFormatter>> for FormatterRef {
    fn from(formatter: Box<dyn LoadedFormatter>) -> Self {
        Self::Loaded(formatter)
    }
}

struct FnFormatter(FormatterFn);

impl LoadedFormatter for FnFormatter {
    fn format(
        &self,
        results: &[LintResult],
        context: &FormatContext<'_>,
    ) -> Result<String, EngineError> {
        let mut sorted = results.to_vec();
        sorted.sort_by(compare_by_path);
        (self.0)(&sorted, context)
    }
}

/// Where formatted output goes.
pub enum OutputSink {
    /// The logging layer, one `info!` per chunk.
    Log,
    /// A writer; every chunk is written as one line.
    Writer(Box<dyn Write + Send>),
    /// A consumer function.
    Fn(Box<dyn FnMut(&str) + Send>),
}

impl OutputSink {
    /// Sends output to a writer.
    pub fn writer(writer: impl Write + Send + 'static) -> Self {
        Self::Writer(Box::new(writer))
    }

    /// Sends output to a consumer function.
    pub fn from_fn(consumer: impl FnMut(&str) + Send + 'static) -> Self {
        Self::Fn(Box::new(consumer))
    }

    /// Writes one formatted chunk.
    pub fn write(&mut self, text: &str) -> Result<(), PipelineError> {
        match self {
            Self::Log => info!("{text}"),
            Self::Writer(writer) => writeln!(writer, "{text}")?,
            Self::Fn(consumer) => consumer(text),
        }
        Ok(())
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::Log
    }
}

/// The resolution and writing half shared by both formatting stages.
struct Dispatch {
    engine: Arc<dyn LintEngine>,
    formatter: Option<FormatterRef>,
    loaded: Option<Box<dyn LoadedFormatter>>,
    sink: OutputSink,
}

impl Dispatch {
    fn new(engine: Arc<dyn LintEngine>, formatter: FormatterRef, sink: OutputSink) -> Self {
        Self {
            engine,
            formatter: Some(formatter),
            loaded: None,
            sink,
        }
    }

    fn ensure_loaded(&mut self) -> Result<(), PipelineError> {
        if let Some(reference) = self.formatter.take() {
            let loaded = match reference {
                FormatterRef::Name(name) => self.engine.load_formatter(&name)?,
                FormatterRef::Loaded(formatter) => formatter,
                FormatterRef::Fn(function) => Box::new(FnFormatter(function)),
            };
            self.loaded = Some(loaded);
        }
        Ok(())
    }

    fn format_and_write(&mut self, results: &[LintResult]) -> Result<(), PipelineError> {
        self.ensure_loaded()?;
        let Some(formatter) = &self.loaded else {
            return Ok(());
        };
        let context = FormatContext::new(self.engine.as_ref(), results);
        let output = formatter.format(results, &context)?;
        if !output.is_empty() {
            self.sink.write(&output)?;
        }
        Ok(())
    }
}

/// End-of-stream stage formatting the whole result set once.
///
/// Results are collected as files pass through and sorted by path before
/// formatting; an empty stream produces no output at all.
pub struct FormatAllStage {
    dispatch: Dispatch,
    results: Vec<LintResult>,
}

impl FormatAllStage {
    /// Creates the stage. Usually built through [`crate::Linter::format_all`].
    pub fn new(engine: Arc<dyn LintEngine>, formatter: FormatterRef, sink: OutputSink) -> Self {
        Self {
            dispatch: Dispatch::new(engine, formatter, sink),
            results: Vec::new(),
        }
    }
}

impl Stage for FormatAllStage {
    fn name(&self) -> &'static str {
        "format_all"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint {
            self.results.push(result.clone());
        }
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), PipelineError> {
        if self.results.is_empty() {
            return Ok(());
        }
        self.results.sort_by(compare_by_path);
        self.dispatch.format_and_write(&self.results)
    }
}

/// Per-file stage formatting each result as it passes through.
pub struct FormatEachStage {
    dispatch: Dispatch,
}

impl FormatEachStage {
    /// Creates the stage. Usually built through [`crate::Linter::format_each`].
    pub fn new(engine: Arc<dyn LintEngine>, formatter: FormatterRef, sink: OutputSink) -> Self {
        Self {
            dispatch: Dispatch::new(engine, formatter, sink),
        }
    }
}

impl Stage for FormatEachStage {
    fn name(&self) -> &'static str {
        "format_each"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint {
            self.dispatch.format_and_write(std::slice::from_ref(result))?;
        }
        Ok(())
    }
}
