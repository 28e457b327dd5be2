use crate::language::{Language, SUPPORTED_IDS};
use std::time::Duration;
use thiserror::Error;

/// An error that occurs while preparing or running a submission.
///
/// Failures raised by the submitted code itself while a test case runs are
/// not represented here; the generated driver records those as data inside
/// its result list and the batch keeps going.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The requested language id is not part of the supported set.
    #[error("Unsupported language '{0}'. Supported: {supported}", supported = SUPPORTED_IDS)]
    UnsupportedLanguage(String),

    /// The submission carried no test cases, so there is nothing to run.
    #[error("No test cases provided")]
    NoTestCases,

    /// No entry point was supplied and none could be extracted from the source.
    #[error("could not determine the entry point in the submitted {0} source; supply functionName explicitly")]
    UnknownEntryPoint(Language),

    /// The interpreter needed for local execution could not be located.
    #[error("local {language} runtime unavailable: {detail}")]
    RuntimeUnavailable { language: Language, detail: String },

    /// The driver never ran to completion: spawn failure, a broken remote
    /// call, a nonzero driver exit, or a failed compile stage.
    #[error("execution failed: {0}")]
    Transport(String),

    /// Execution exceeded the allowed wall-clock budget and was abandoned.
    #[error("execution timed out after {0:?}")]
    ExecuteTimeout(Duration),

    /// The executed driver printed no parseable result array.
    ///
    /// Distinct from [`HarnessError::Transport`]: the driver ran and exited
    /// cleanly, but its output could not be interpreted.
    #[error("could not read the driver verdicts: {0}")]
    UnparsableOutput(String),

    /// The driver reported a different number of verdicts than test cases.
    #[error("the driver reported {got} results for {expected} test cases")]
    ResultCount { expected: usize, got: usize },
}
