//! # lintflow_engine
//!
//! Data model and engine-facing traits for the lintflow pipeline.
//!
//! This crate provides:
//! - The lint data model: messages, severities, per-file results and counts
//! - The `LintEngine` and `LoadedFormatter` traits the pipeline consumes
//! - Fix application shared by engine implementations (`apply_fixes`)
//! - A scripted `StaticEngine` for tests (behind the `test-utils` feature)

mod engine;
mod fix;
mod message;
mod result;
mod span;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use engine::{
    EngineError, EngineOptions, FormatContext, LintEngine, LoadedFormatter, RulesMeta,
};
pub use fix::{FixOutcome, apply_fixes};
pub use message::{Fix, LintMessage, Severity};
pub use result::{LintResult, MessageCounts};
pub use span::{Location, Position, Span};
