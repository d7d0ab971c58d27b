//! # lintflow_core
//!
//! Streaming lint pipeline over a pluggable engine.
//!
//! This crate provides:
//! - Option migration from the legacy surface (`RawOptions` -> `migrate`)
//! - The stage protocol and the sequential pipeline driver
//! - The linting stage, aggregation hooks, failure gates and formatter
//!   dispatch
//! - File collection and fixed-output write-back
//!
//! ## Example
//!
//! ```rust,ignore
//! use lintflow_core::{Linter, OutputSink, Pipeline, RawOptions, collect_files, fail_after_error};
//!
//! let linter = Linter::new(RawOptions::new().set("fix", true), build_engine)?;
//! let files = collect_files(".", &["src/**/*.js".to_string()])?;
//! let run = Pipeline::new()
//!     .pipe(linter.stage())
//!     .pipe(linter.format_all("stylish", OutputSink::default()))
//!     .pipe(fail_after_error())
//!     .run(files)?;
//! ```

mod aggregate;
mod error;
mod file;
mod format;
mod gate;
mod linter;
mod options;
mod result;
mod source;
mod stream;

pub use aggregate::{
    AllResults, EachResult, ResultCollection, all_results, each_result, try_all_results,
    try_each_result,
};
pub use error::{BoxError, PipelineError};
pub use file::FileItem;
pub use format::{FormatAllStage, FormatEachStage, FormatterFn, FormatterRef, OutputSink};
pub use gate::{FailAfterError, FailOnError, fail_after_error, fail_on_error};
pub use linter::{Linter, LinterStage};
pub use options::{MessageFilter, NormalizedOptions, Quiet, RawOptions, migrate};
pub use result::{
    HIDDEN_FILE_WARNING, IGNORE_PATTERN_WARNING, NODE_MODULES_WARNING, compare_by_path,
    filter_result, synthesize_ignored_result,
};
pub use source::{WriteFixed, collect_files, write_fixed};
pub use stream::{
    Pipeline, PipelineRun, RunResult, Stage, Transform, transform, transform_with_end,
};

pub use lintflow_engine::{
    EngineError, EngineOptions, Fix, FormatContext, LintEngine, LintMessage, LintResult,
    LoadedFormatter, Location, MessageCounts, Position, RulesMeta, Severity, Span,
};
