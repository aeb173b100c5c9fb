//! Algorithm capability interface and per-trial result records.
//!
//! Algorithms differ in which side channels they can report: some can
//! break their running time down by internal task, some can trace the
//! evolution of their solution value, some both, some neither. Instead of
//! branching on what an algorithm returns, each algorithm declares its
//! [`Capabilities`] once and always answers with an [`AlgorithmOutput`].
//! The trial runner turns that into the fixed-shape [`TrialResult`].

use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Time spent per internal task label, in milliseconds.
pub type TimeDivision = BTreeMap<String, f64>;

/// Error returned by an algorithm that could not produce a solution.
pub type AlgorithmError = Box<dyn std::error::Error + Send + Sync>;

/// Intermediate solution quality over an algorithm's iterations.
///
/// Entries may be non-finite (e.g. `-inf` for an infeasible individual);
/// they are persisted as `"NaN"`, `"inf"` or `"-inf"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValueEvolution {
    /// Best (or current) value after each iteration.
    Trace(#[serde(with = "super::float_repr::trace")] Vec<f64>),
    /// Fitness of every individual of the population at each generation.
    Population(#[serde(with = "super::float_repr::population")] Vec<Vec<f64>>),
}

impl ValueEvolution {
    /// Number of recorded iterations or generations.
    pub fn len(&self) -> usize {
        match self {
            ValueEvolution::Trace(v) => v.len(),
            ValueEvolution::Population(g) => g.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Side channels an algorithm is able to report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Accepts the time-breakdown flag.
    pub time_division: bool,
    /// Accepts the value-evolution flag.
    pub value_evolution: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        time_division: false,
        value_evolution: false,
    };

    pub const ALL: Capabilities = Capabilities {
        time_division: true,
        value_evolution: true,
    };
}

/// Measurements requested for a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MeasureFlags {
    /// Request a per-task time breakdown.
    pub time_division: bool,
    /// Request a value-evolution trace.
    pub value_evolution: bool,
}

impl MeasureFlags {
    pub fn new(time_division: bool, value_evolution: bool) -> Self {
        Self {
            time_division,
            value_evolution,
        }
    }

    /// Keeps only the flags the algorithm declares support for.
    pub fn restrict_to(self, caps: Capabilities) -> MeasureFlags {
        MeasureFlags {
            time_division: self.time_division && caps.time_division,
            value_evolution: self.value_evolution && caps.value_evolution,
        }
    }
}

/// What an algorithm hands back for one invocation.
#[derive(Debug, Clone)]
pub struct AlgorithmOutput<S> {
    /// The solution found, if any.
    pub solution: Option<S>,
    pub time_division: Option<TimeDivision>,
    pub value_evolution: Option<ValueEvolution>,
}

impl<S> AlgorithmOutput<S> {
    /// Output carrying a solution and no side channels.
    pub fn solution(solution: S) -> Self {
        Self {
            solution: Some(solution),
            time_division: None,
            value_evolution: None,
        }
    }

    /// Output of an invocation that found nothing.
    pub fn empty() -> Self {
        Self {
            solution: None,
            time_division: None,
            value_evolution: None,
        }
    }

    pub fn with_time_division(mut self, division: TimeDivision) -> Self {
        self.time_division = Some(division);
        self
    }

    pub fn with_value_evolution(mut self, evolution: ValueEvolution) -> Self {
        self.value_evolution = Some(evolution);
        self
    }
}

/// A candidate algorithm under comparison.
///
/// The engine treats an algorithm as an opaque callable: it is invoked
/// with the problem and the subset of requested [`MeasureFlags`] that
/// its [`capabilities`](Algorithm::capabilities) allow. Outputs for flags
/// that were not passed are discarded.
///
/// Errors and panics raised by [`solve`](Algorithm::solve) are contained
/// to the trial that raised them.
///
/// # Implementing
///
/// ```ignore
/// struct Greedy;
///
/// impl Algorithm<MyProblem> for Greedy {
///     fn capabilities(&self) -> Capabilities {
///         Capabilities { time_division: true, value_evolution: false }
///     }
///
///     fn solve(&self, problem: &MyProblem, flags: MeasureFlags)
///         -> Result<AlgorithmOutput<MySolution>, AlgorithmError>
///     {
///         let solution = greedy_fill(problem);
///         let mut out = AlgorithmOutput::solution(solution);
///         if flags.time_division {
///             out = out.with_time_division(timings);
///         }
///         Ok(out)
///     }
/// }
/// ```
pub trait Algorithm<P: Problem>: Send + Sync {
    /// Side channels this algorithm can report. Defaults to none.
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }

    /// Solves `problem`, honoring the given measurement flags.
    fn solve(
        &self,
        problem: &P,
        flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<P::Solution>, AlgorithmError>;
}

/// Why a trial produced no solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialFailure {
    /// Zero-based trial index within its (problem, algorithm) request.
    pub trial: usize,
    pub reason: String,
}

impl fmt::Display for TrialFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trial #{} failed: {}", self.trial + 1, self.reason)
    }
}

/// Fixed-shape record of one trial.
///
/// `value` is `None` exactly when `solution` is `None`. `value_evolution`
/// and `time_division` are only present when the matching flag was both
/// requested and supported.
#[derive(Debug, Clone)]
pub struct TrialResult<S> {
    pub solution: Option<S>,
    pub value: Option<f64>,
    pub value_evolution: Option<ValueEvolution>,
    /// Wall-clock time around the whole invocation, in milliseconds.
    pub elapsed_time_ms: f64,
    pub time_division: Option<TimeDivision>,
    /// Set when the trial failed; kept for the end-of-experiment report.
    pub failure: Option<TrialFailure>,
}

impl<S> TrialResult<S> {
    /// A failed trial: no solution, no value, only the measured time.
    pub fn failed(trial: usize, reason: impl Into<String>, elapsed_time_ms: f64) -> Self {
        Self {
            solution: None,
            value: None,
            value_evolution: None,
            elapsed_time_ms,
            time_division: None,
            failure: Some(TrialFailure {
                trial,
                reason: reason.into(),
            }),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.solution.is_none()
    }
}
