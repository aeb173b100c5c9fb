//! Error types for experiment execution and aggregation.
//!
//! Only configuration problems and pool-level failures abort a run.
//! Anything that happens after an algorithm has been invoked is recovered
//! locally: failed trials become [`TrialFailure`](crate::trial::TrialFailure)
//! placeholders and rendering problems are logged.

use thiserror::Error;

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    /// The experiment was configured incorrectly; nothing was executed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A statistic was requested over an empty measurement sequence.
    #[error("cannot summarize an empty measurement sequence ({context})")]
    EmptyMeasurements {
        /// What was being summarized.
        context: String,
    },

    /// Results were collected for a problem that was never registered.
    #[error("problem '{0}' is not registered in the experiment set")]
    UnknownProblem(String),

    /// The worker pool could not be created.
    #[error("worker pool failure: {0}")]
    Pool(String),

    /// Snapshot (de)serialization failed.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid experiment configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("repetitions must be at least 1, got {0}")]
    InvalidRepetitions(usize),

    #[error("parallelism must be at least 1, got {0}")]
    InvalidParallelism(usize),

    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),

    #[error("algorithm '{0}' is registered twice")]
    DuplicateAlgorithm(String),

    #[error("problem '{0}' is registered twice")]
    DuplicateProblem(String),

    #[error("no problems to experiment on")]
    NoProblems,

    #[error("no algorithms registered")]
    NoAlgorithms,
}

/// A solution could not be shown or saved.
///
/// Never aborts result collection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to render solution: {0}")]
pub struct RenderError(pub String);

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError(e.to_string())
    }
}
