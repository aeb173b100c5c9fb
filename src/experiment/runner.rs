//! Experiment orchestration: every algorithm on every problem.

use super::config::ExperimentConfig;
use super::record::{ExperimentSet, ManualReference};
use super::sink::StorageSink;
use crate::error::{ConfigError, Result};
use crate::problem::Problem;
use crate::trial::{Algorithm, BatchScheduler, TrialBuilder, TrialResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A named problem instance with its optional reference.
pub struct ProblemInstance<P: Problem> {
    pub name: String,
    pub problem: Arc<P>,
    pub manual: ManualReference<P::Solution>,
}

impl<P: Problem> ProblemInstance<P> {
    pub fn new(name: impl Into<String>, problem: P) -> Self {
        Self {
            name: name.into(),
            problem: Arc::new(problem),
            manual: ManualReference::Unknown,
        }
    }

    /// Attaches a reference solution.
    pub fn with_manual_solution(mut self, solution: P::Solution) -> Self {
        self.manual = ManualReference::Solution(solution);
        self
    }

    /// Attaches a known reference value.
    pub fn with_known_value(mut self, value: f64) -> Self {
        self.manual = ManualReference::KnownValue(value);
        self
    }
}

/// Runs a roster of algorithms over a set of problems.
///
/// # Usage
///
/// ```ignore
/// let mut runner = ExperimentRunner::new();
/// runner.register("Greedy", Arc::new(Greedy))?;
/// runner.register("Evolutionary", Arc::new(Evolutionary::default()))?;
///
/// let config = ExperimentConfig::default().with_repetitions(10).with_parallelism(4);
/// let set = runner.perform(problems, &config, &FsSink)?;
/// let report = ExperimentReport::publish(&set, &config, &FsSink);
/// ```
pub struct ExperimentRunner<P: Problem> {
    algorithms: Vec<(String, Arc<dyn Algorithm<P>>)>,
}

impl<P: Problem> Default for ExperimentRunner<P> {
    fn default() -> Self {
        Self {
            algorithms: Vec::new(),
        }
    }
}

impl<P: Problem> ExperimentRunner<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an algorithm under `name`. Algorithms run in registration order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateAlgorithm`] if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        algorithm: Arc<dyn Algorithm<P>>,
    ) -> Result<()> {
        let name = name.into();
        if self.algorithms.iter().any(|(n, _)| *n == name) {
            return Err(ConfigError::DuplicateAlgorithm(name).into());
        }
        self.algorithms.push((name, algorithm));
        Ok(())
    }

    pub fn algorithm_names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.iter().map(|(n, _)| n.as_str())
    }

    /// Runs the algorithm registered as `algorithm` on `problem`,
    /// `config.repetitions` times with `config.parallelism` workers.
    ///
    /// Results are in trial order. Failed trials are part of the results.
    ///
    /// # Errors
    ///
    /// Configuration errors (including [`ConfigError::UnknownAlgorithm`])
    /// and worker pool failures.
    pub fn execute(
        &self,
        algorithm: &str,
        problem_name: &str,
        problem: &Arc<P>,
        config: &ExperimentConfig,
    ) -> Result<Vec<TrialResult<P::Solution>>> {
        config.validate()?;
        let (name, handle) = self
            .algorithms
            .iter()
            .find(|(n, _)| n == algorithm)
            .ok_or_else(|| ConfigError::UnknownAlgorithm(algorithm.to_string()))?;

        let descriptors = TrialBuilder::build(
            Arc::clone(handle),
            name,
            Arc::clone(problem),
            config.repetitions,
            config.parallelism,
            &config.trial_options(problem_name, name),
        )?;
        BatchScheduler::schedule(&descriptors, config.parallelism)
    }

    /// Runs every registered algorithm on every problem and collects the
    /// results.
    ///
    /// When solution plots are saved, each problem's output directory is
    /// prepared through `sink` before its trials start; a failure there is
    /// logged and the trials still run. Failed trials are reported once
    /// everything has run.
    ///
    /// # Errors
    ///
    /// Configuration errors, detected before any trial executes, and
    /// worker pool failures.
    pub fn perform(
        &self,
        problems: Vec<ProblemInstance<P>>,
        config: &ExperimentConfig,
        sink: &dyn StorageSink,
    ) -> Result<ExperimentSet<P>> {
        config.validate()?;
        if self.algorithms.is_empty() {
            return Err(ConfigError::NoAlgorithms.into());
        }
        if problems.is_empty() {
            return Err(ConfigError::NoProblems.into());
        }
        for (i, p) in problems.iter().enumerate() {
            if problems[..i].iter().any(|q| q.name == p.name) {
                return Err(ConfigError::DuplicateProblem(p.name.clone()).into());
            }
        }

        let start = Instant::now();
        let mut set = ExperimentSet::new();

        for instance in problems {
            let ProblemInstance {
                name,
                problem,
                manual,
            } = instance;
            set.register(name.as_str(), Arc::clone(&problem), manual)?;

            if config.solution_plots.save {
                let dir = config.problem_dir(&name);
                if let Err(e) = sink.prepare_dir(&dir) {
                    warn!(
                        problem = %name,
                        dir = %dir.display(),
                        "cannot prepare plot directory: {e}"
                    );
                }
            }

            for (algorithm, _) in &self.algorithms {
                let results = self.execute(algorithm, &name, &problem, config)?;
                let failed = results.iter().filter(|r| r.is_failure()).count();
                info!(
                    problem = %name,
                    algorithm = %algorithm,
                    trials = results.len(),
                    failed,
                    "algorithm finished"
                );
                set.collect(&name, algorithm, results)?;
            }
        }

        info!(
            seconds = start.elapsed().as_secs_f64(),
            "total experimental calculation time"
        );
        for (problem, algorithm, failure) in set.failures() {
            warn!(problem, algorithm, "{failure}");
        }
        Ok(set)
    }
}
