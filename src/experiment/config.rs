//! Experiment configuration.
//!
//! [`ExperimentConfig`] is the single record controlling how trials are
//! multiplexed and what is shown or saved afterwards. It is passed by
//! reference into the orchestration entry points; nothing is read from
//! global state.

use crate::error::ConfigError;
use crate::stats::display_label;
use crate::trial::{MeasureFlags, RenderOptions, TrialOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File name of the experiment snapshot inside the output directory.
pub const SNAPSHOT_FILE: &str = "experiments.json";

/// Whether an output is displayed, saved, both, or neither.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputToggle {
    pub show: bool,
    pub save: bool,
}

impl OutputToggle {
    pub const OFF: OutputToggle = OutputToggle {
        show: false,
        save: false,
    };

    pub const SHOW: OutputToggle = OutputToggle {
        show: true,
        save: false,
    };

    pub const SAVE: OutputToggle = OutputToggle {
        show: false,
        save: true,
    };

    pub const BOTH: OutputToggle = OutputToggle {
        show: true,
        save: true,
    };

    pub fn is_active(self) -> bool {
        self.show || self.save
    }
}

/// Configuration for an experiment run.
///
/// # Defaults
///
/// ```
/// use u_experiment::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::default();
/// assert_eq!(config.repetitions, 1);
/// assert_eq!(config.parallelism, 1);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_experiment::experiment::{ExperimentConfig, OutputToggle};
///
/// let config = ExperimentConfig::default()
///     .with_repetitions(10)
///     .with_parallelism(4)
///     .with_time_division(true)
///     .with_result_tables(OutputToggle::SAVE)
///     .with_output_dir("results/knapsack");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Trials per (problem, algorithm) pair.
    pub repetitions: usize,

    /// Worker count; 1 runs every trial on the calling thread.
    pub parallelism: usize,

    /// Side-channel measurements requested from every algorithm.
    ///
    /// Measuring can slow algorithms down slightly.
    pub measure: MeasureFlags,

    /// Rendering of every trial's solution.
    pub solution_plots: OutputToggle,

    /// Rendering of the manual reference solutions.
    pub manual_solution_plots: OutputToggle,

    /// Problem statistics table.
    pub problem_stats: OutputToggle,

    /// Aggregated value and time tables.
    pub result_tables: OutputToggle,

    /// Annotate rendered items with value and weight.
    ///
    /// Meaningful for knapsack-packing instances, not for pure packing.
    pub show_value_and_weight: bool,

    /// Root directory of everything saved.
    pub output_dir: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            repetitions: 1,
            parallelism: 1,
            measure: MeasureFlags::default(),
            solution_plots: OutputToggle::OFF,
            manual_solution_plots: OutputToggle::OFF,
            problem_stats: OutputToggle::OFF,
            result_tables: OutputToggle::OFF,
            show_value_and_weight: true,
            output_dir: PathBuf::from("output"),
        }
    }
}

impl ExperimentConfig {
    /// Preset for statistically meaningful comparisons: 10 repetitions on
    /// 10 workers with every measurement enabled, tables saved.
    pub fn statistical() -> Self {
        Self {
            repetitions: 10,
            parallelism: 10,
            measure: MeasureFlags::new(true, true),
            result_tables: OutputToggle::SAVE,
            ..Self::default()
        }
    }

    pub fn with_repetitions(mut self, n: usize) -> Self {
        self.repetitions = n;
        self
    }

    pub fn with_parallelism(mut self, n: usize) -> Self {
        self.parallelism = n;
        self
    }

    /// Requests per-task time breakdowns.
    pub fn with_time_division(mut self, enabled: bool) -> Self {
        self.measure.time_division = enabled;
        self
    }

    /// Requests value-evolution traces.
    pub fn with_value_evolution(mut self, enabled: bool) -> Self {
        self.measure.value_evolution = enabled;
        self
    }

    pub fn with_solution_plots(mut self, toggle: OutputToggle) -> Self {
        self.solution_plots = toggle;
        self
    }

    pub fn with_manual_solution_plots(mut self, toggle: OutputToggle) -> Self {
        self.manual_solution_plots = toggle;
        self
    }

    pub fn with_problem_stats(mut self, toggle: OutputToggle) -> Self {
        self.problem_stats = toggle;
        self
    }

    pub fn with_result_tables(mut self, toggle: OutputToggle) -> Self {
        self.result_tables = toggle;
        self
    }

    pub fn with_show_value_and_weight(mut self, enabled: bool) -> Self {
        self.show_value_and_weight = enabled;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::InvalidRepetitions(self.repetitions));
        }
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism(self.parallelism));
        }
        Ok(())
    }

    /// Directory holding the outputs of one problem.
    pub fn problem_dir(&self, problem: &str) -> PathBuf {
        self.output_dir.join(problem)
    }

    /// Default snapshot location.
    pub fn snapshot_path(&self) -> PathBuf {
        self.output_dir.join(SNAPSHOT_FILE)
    }

    /// Trial options for running `algorithm` on `problem`.
    pub fn trial_options(&self, problem: &str, algorithm: &str) -> TrialOptions {
        TrialOptions {
            flags: self.measure,
            render: RenderOptions {
                show: self.solution_plots.show,
                save_dir: self.solution_plots.save.then(|| self.problem_dir(problem)),
                title: Some(format!("{} - {algorithm} solution", display_label(problem))),
                show_item_value_and_weight: self.show_value_and_weight,
            },
        }
    }
}
