//! Stages that turn error counts into run failure.

use lintflow_engine::MessageCounts;

use crate::error::PipelineError;
use crate::file::FileItem;
use crate::stream::Stage;

/// Stage built by [`fail_on_error`].
pub struct FailOnError;

/// A gate that fails the run at the first file whose result carries errors.
///
/// The failure is fatal, so no later file reaches any stage.
pub fn fail_on_error() -> FailOnError {
    FailOnError
}

impl Stage for FailOnError {
    fn name(&self) -> &'static str {
        "fail_on_error"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint
            && result.has_errors()
        {
            return Err(PipelineError::gate(format!(
                "{}: {} lint error(s)",
                file.path.display(),
                result.error_count
            )));
        }
        Ok(())
    }
}

/// Stage built by [`fail_after_error`].
pub struct FailAfterError {
    counts: MessageCounts,
}

/// A gate that lets every file pass and fails the run at end of stream when
/// the accumulated error total is non-zero.
pub fn fail_after_error() -> FailAfterError {
    FailAfterError {
        counts: MessageCounts::default(),
    }
}

impl Stage for FailAfterError {
    fn name(&self) -> &'static str {
        "fail_after_error"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint {
            self.counts += result.counts();
        }
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), PipelineError> {
        if self.counts.error_count > 0 {
            return Err(PipelineError::gate(format!(
                "Failed with {} lint error(s)",
                self.counts.error_count
            )));
        }
        Ok(())
    }
}
