//! Result aggregation and the consumer hook stages.

use lintflow_engine::{LintResult, MessageCounts};

use crate::error::{BoxError, PipelineError};
use crate::file::FileItem;
use crate::stream::Stage;

/// Results accumulated over one pipeline run, with running totals.
///
/// The collection is appended to while the stream flows and handed to the
/// [`all_results`] hook read-only at end of stream.
#[derive(Debug, Clone, Default)]
pub struct ResultCollection {
    results: Vec<LintResult>,
    counts: MessageCounts,
}

impl ResultCollection {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a result, folding its counts into the totals.
    pub fn push(&mut self, result: LintResult) {
        self.counts += result.counts();
        self.results.push(result);
    }

    /// The collected results, in arrival order.
    pub fn results(&self) -> &[LintResult] {
        &self.results
    }

    /// Number of collected results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// The totals summed over all collected results.
    pub fn counts(&self) -> MessageCounts {
        self.counts
    }

    /// Total number of error messages across all results.
    pub fn error_count(&self) -> usize {
        self.counts.error_count
    }

    /// Consumes the collection, returning the results.
    pub fn into_results(self) -> Vec<LintResult> {
        self.results
    }
}

type EachAction = Box<dyn FnMut(&LintResult) -> Result<(), BoxError> + Send>;
type AllAction = Box<dyn FnOnce(&ResultCollection) -> Result<(), BoxError> + Send>;

/// Stage built by [`each_result`] / [`try_each_result`].
pub struct EachResult {
    action: EachAction,
}

/// A stage invoking `action` for every file carrying a result.
///
/// Files without a result pass through untouched.
pub fn each_result(mut action: impl FnMut(&LintResult) + Send + 'static) -> EachResult {
    EachResult {
        action: Box::new(move |result| {
            action(result);
            Ok(())
        }),
    }
}

/// Fallible form of [`each_result`]; a hook error is fatal to the run.
pub fn try_each_result<E>(
    mut action: impl FnMut(&LintResult) -> Result<(), E> + Send + 'static,
) -> EachResult
where
    E: Into<BoxError>,
{
    EachResult {
        action: Box::new(move |result| action(result).map_err(Into::into)),
    }
}

impl Stage for EachResult {
    fn name(&self) -> &'static str {
        "each_result"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint {
            (self.action)(result).map_err(|source| PipelineError::hook("each_result", source))?;
        }
        Ok(())
    }
}

/// Stage built by [`all_results`] / [`try_all_results`].
pub struct AllResults {
    collection: ResultCollection,
    action: Option<AllAction>,
}

/// A stage collecting every attached result and invoking `action` once with
/// the whole collection at end of stream.
///
/// The hook fires even when the stream carried no results.
pub fn all_results(action: impl FnOnce(&ResultCollection) + Send + 'static) -> AllResults {
    AllResults {
        collection: ResultCollection::new(),
        action: Some(Box::new(move |collection| {
            action(collection);
            Ok(())
        })),
    }
}

/// Fallible form of [`all_results`]; a hook error fails the run.
pub fn try_all_results<E>(
    action: impl FnOnce(&ResultCollection) -> Result<(), E> + Send + 'static,
) -> AllResults
where
    E: Into<BoxError>,
{
    AllResults {
        collection: ResultCollection::new(),
        action: Some(Box::new(move |collection| {
            action(collection).map_err(Into::into)
        })),
    }
}

impl Stage for AllResults {
    fn name(&self) -> &'static str {
        "all_results"
    }

    fn on_file(&mut self, file: &mut FileItem) -> Result<(), PipelineError> {
        if let Some(result) = &file.lint {
            self.collection.push(result.clone());
        }
        Ok(())
    }

    fn on_end(&mut self) -> Result<(), PipelineError> {
        if let Some(action) = self.action.take() {
            action(&self.collection).map_err(|source| PipelineError::hook("all_results", source))?;
        }
        Ok(())
    }
}
