//! Experiment orchestration, collected results and their publication.
//!
//! An experiment runs every registered algorithm on every problem
//! instance, `repetitions` times each, and keeps the results per
//! (problem, algorithm) pair in an [`ExperimentSet`].
//!
//! # Components
//!
//! - [`ExperimentConfig`]: explicit configuration record
//! - [`ExperimentRunner`]: multiplexes trials and collects their results
//! - [`ExperimentSet`]: the Result Collector, one [`ExperimentRecord`] per
//!   problem
//! - [`ExperimentReport`]: value, time and problem statistics tables
//! - [`StorageSink`]: where saved outputs go ([`FsSink`], [`MemorySink`])
//! - [`snapshot`]: JSON persistence of a whole experiment set
//!
//! # Example
//!
//! ```ignore
//! use u_experiment::experiment::*;
//!
//! let mut runner = ExperimentRunner::new();
//! runner.register("Greedy", Arc::new(Greedy))?;
//!
//! let config = ExperimentConfig::statistical().with_output_dir("output");
//! let problems = vec![ProblemInstance::new("1", instance).with_known_value(56.0)];
//! let set = runner.perform(problems, &config, &FsSink)?;
//!
//! snapshot::save(&set, &config.snapshot_path(), &FsSink)?;
//! let report = ExperimentReport::publish(&set, &config, &FsSink);
//! ```

mod config;
mod record;
mod report;
mod runner;
mod sink;
pub mod snapshot;

pub use config::{ExperimentConfig, OutputToggle, SNAPSHOT_FILE};
pub use record::{AlgorithmTrials, ExperimentRecord, ExperimentSet, ManualReference, TrialResultSet};
pub use report::{
    ExperimentReport, MANUAL_PLOT_FILE, PROBLEM_STATS_FILE, TIME_RESULTS_FILE, VALUE_RESULTS_FILE,
};
pub use runner::{ExperimentRunner, ProblemInstance};
pub use sink::{FsSink, MemorySink, StorageSink};
