//! Collected trial results, per problem and algorithm.

use crate::error::{ConfigError, Error, Result};
use crate::problem::{Problem, Solution};
use crate::trial::{float_repr, TimeDivision, TrialFailure, TrialResult, ValueEvolution};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Known reference for a problem, used as the "Manual" column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ManualReference<S> {
    /// A full, typically hand-built or optimal, solution.
    Solution(S),
    /// Only the reference value is known.
    KnownValue(f64),
    /// No reference exists.
    Unknown,
}

impl<S> Default for ManualReference<S> {
    fn default() -> Self {
        ManualReference::Unknown
    }
}

impl<S: Solution> ManualReference<S> {
    /// Reference value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            ManualReference::Solution(s) => Some(s.value()),
            ManualReference::KnownValue(v) => Some(*v),
            ManualReference::Unknown => None,
        }
    }

    pub fn solution(&self) -> Option<&S> {
        match self {
            ManualReference::Solution(s) => Some(s),
            _ => None,
        }
    }
}

/// Results of every trial of one algorithm on one problem.
///
/// Holds parallel sequences indexed by trial: solutions, values,
/// value evolutions, elapsed times and time divisions all have the same
/// length and follow trial order. A failed trial keeps its slot with
/// `None` placeholders, so `len()` always equals the number of trials run.
///
/// Deserialization rejects sets whose sequences disagree in length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "RawTrialResultSet<S>",
    bound(deserialize = "S: Deserialize<'de>")
)]
pub struct TrialResultSet<S> {
    solutions: Vec<Option<S>>,
    values: Vec<Option<f64>>,
    value_evolutions: Vec<Option<ValueEvolution>>,
    times: Vec<f64>,
    #[serde(serialize_with = "float_repr::divisions::serialize")]
    time_divisions: Vec<Option<TimeDivision>>,
    failures: Vec<TrialFailure>,
}

#[derive(Deserialize)]
struct RawTrialResultSet<S> {
    solutions: Vec<Option<S>>,
    values: Vec<Option<f64>>,
    value_evolutions: Vec<Option<ValueEvolution>>,
    times: Vec<f64>,
    #[serde(deserialize_with = "float_repr::divisions::deserialize")]
    time_divisions: Vec<Option<TimeDivision>>,
    failures: Vec<TrialFailure>,
}

impl<S> TryFrom<RawTrialResultSet<S>> for TrialResultSet<S> {
    type Error = String;

    fn try_from(raw: RawTrialResultSet<S>) -> std::result::Result<Self, String> {
        let len = raw.times.len();
        let lengths = [
            ("solutions", raw.solutions.len()),
            ("values", raw.values.len()),
            ("value_evolutions", raw.value_evolutions.len()),
            ("time_divisions", raw.time_divisions.len()),
        ];
        if let Some((field, n)) = lengths.into_iter().find(|&(_, n)| n != len) {
            return Err(format!("{field} has {n} entries, times has {len}"));
        }
        if raw.failures.len() > len {
            return Err(format!(
                "{} failures recorded for {len} trials",
                raw.failures.len()
            ));
        }
        if let Some(f) = raw.failures.iter().find(|f| f.trial >= len) {
            return Err(format!("failure of trial {} outside {len} trials", f.trial));
        }
        Ok(Self {
            solutions: raw.solutions,
            values: raw.values,
            value_evolutions: raw.value_evolutions,
            times: raw.times,
            time_divisions: raw.time_divisions,
            failures: raw.failures,
        })
    }
}

impl<S> Default for TrialResultSet<S> {
    fn default() -> Self {
        Self {
            solutions: Vec::new(),
            values: Vec::new(),
            value_evolutions: Vec::new(),
            times: Vec::new(),
            time_divisions: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<S> TrialResultSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one trial, splitting it across the parallel sequences.
    pub fn push(&mut self, result: TrialResult<S>) {
        let TrialResult {
            solution,
            value,
            value_evolution,
            elapsed_time_ms,
            time_division,
            failure,
        } = result;
        self.solutions.push(solution);
        self.values.push(value);
        self.value_evolutions.push(value_evolution);
        self.times.push(elapsed_time_ms);
        self.time_divisions.push(time_division);
        if let Some(failure) = failure {
            self.failures.push(failure);
        }
    }

    /// Number of trials recorded, failed ones included.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn solutions(&self) -> &[Option<S>] {
        &self.solutions
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Values of successful trials only, in trial order.
    pub fn successful_values(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    pub fn value_evolutions(&self) -> &[Option<ValueEvolution>] {
        &self.value_evolutions
    }

    /// Elapsed milliseconds of every trial.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn time_divisions(&self) -> &[Option<TimeDivision>] {
        &self.time_divisions
    }

    pub fn failures(&self) -> &[TrialFailure] {
        &self.failures
    }
}

impl<S> Extend<TrialResult<S>> for TrialResultSet<S> {
    fn extend<T: IntoIterator<Item = TrialResult<S>>>(&mut self, iter: T) {
        for result in iter {
            self.push(result);
        }
    }
}

/// Trials of one named algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmTrials<S> {
    pub name: String,
    pub trials: TrialResultSet<S>,
}

/// Everything recorded about one problem instance.
#[derive(Serialize, Deserialize)]
#[serde(bound(
    serialize = "P: Serialize, P::Solution: Serialize",
    deserialize = "P: Deserialize<'de>, P::Solution: Deserialize<'de>"
))]
pub struct ExperimentRecord<P: Problem> {
    name: String,
    problem: Arc<P>,
    manual: ManualReference<P::Solution>,
    algorithms: Vec<AlgorithmTrials<P::Solution>>,
}

impl<P> fmt::Debug for ExperimentRecord<P>
where
    P: Problem + fmt::Debug,
    P::Solution: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExperimentRecord")
            .field("name", &self.name)
            .field("problem", &self.problem)
            .field("manual", &self.manual)
            .field("algorithms", &self.algorithms)
            .finish()
    }
}

impl<P: Problem> ExperimentRecord<P> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn problem(&self) -> &Arc<P> {
        &self.problem
    }

    pub fn manual(&self) -> &ManualReference<P::Solution> {
        &self.manual
    }

    /// Algorithm names in the order their results were first collected.
    pub fn algorithm_names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.iter().map(|a| a.name.as_str())
    }

    pub fn algorithms(&self) -> &[AlgorithmTrials<P::Solution>] {
        &self.algorithms
    }

    /// Trials of `algorithm`, if it ran on this problem.
    pub fn trials(&self, algorithm: &str) -> Option<&TrialResultSet<P::Solution>> {
        self.algorithms
            .iter()
            .find(|a| a.name == algorithm)
            .map(|a| &a.trials)
    }
}

/// All experiment records, in problem registration order.
///
/// Only the orchestrating thread mutates the set, after each batch of
/// trials has returned.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "P: Serialize, P::Solution: Serialize",
    deserialize = "P: Deserialize<'de>, P::Solution: Deserialize<'de>"
))]
pub struct ExperimentSet<P: Problem> {
    records: Vec<ExperimentRecord<P>>,
}

impl<P: Problem> Default for ExperimentSet<P> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<P> fmt::Debug for ExperimentSet<P>
where
    P: Problem + fmt::Debug,
    P::Solution: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.records).finish()
    }
}

impl<P: Problem> ExperimentSet<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a problem instance under `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateProblem`] if `name` is already registered.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        problem: Arc<P>,
        manual: ManualReference<P::Solution>,
    ) -> Result<()> {
        let name = name.into();
        if self.record(&name).is_some() {
            return Err(ConfigError::DuplicateProblem(name).into());
        }
        self.records.push(ExperimentRecord {
            name,
            problem,
            manual,
            algorithms: Vec::new(),
        });
        Ok(())
    }

    /// Appends `results` under (`problem`, `algorithm`).
    ///
    /// The first call for a pair creates its empty [`TrialResultSet`];
    /// later calls append to it.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownProblem`] if `problem` was never registered.
    pub fn collect(
        &mut self,
        problem: &str,
        algorithm: &str,
        results: impl IntoIterator<Item = TrialResult<P::Solution>>,
    ) -> Result<()> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.name == problem)
            .ok_or_else(|| Error::UnknownProblem(problem.to_string()))?;

        let index = match record.algorithms.iter().position(|a| a.name == algorithm) {
            Some(i) => i,
            None => {
                record.algorithms.push(AlgorithmTrials {
                    name: algorithm.to_string(),
                    trials: TrialResultSet::new(),
                });
                record.algorithms.len() - 1
            }
        };
        record.algorithms[index].trials.extend(results);
        Ok(())
    }

    pub fn records(&self) -> &[ExperimentRecord<P>] {
        &self.records
    }

    pub fn record(&self, name: &str) -> Option<&ExperimentRecord<P>> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn problem_names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every failed trial as `(problem, algorithm, failure)`.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str, &TrialFailure)> {
        self.records.iter().flat_map(|r| {
            r.algorithms.iter().flat_map(move |a| {
                a.trials
                    .failures()
                    .iter()
                    .map(move |f| (r.name.as_str(), a.name.as_str(), f))
            })
        })
    }
}
