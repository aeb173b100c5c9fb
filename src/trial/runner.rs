//! Execution of a single trial.

use super::descriptor::TrialDescriptor;
use super::types::{AlgorithmOutput, TrialResult};
use crate::problem::{Problem, Solution};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, warn};

/// Runs one trial descriptor and normalizes its outcome.
///
/// # Usage
///
/// ```ignore
/// let result = TrialRunner::run(&descriptor);
/// if let Some(value) = result.value {
///     println!("value {value} in {} ms", result.elapsed_time_ms);
/// }
/// ```
pub struct TrialRunner;

impl TrialRunner {
    /// Executes `descriptor` and returns its [`TrialResult`].
    ///
    /// The algorithm receives only the requested flags it supports.
    /// Elapsed time is measured around the whole invocation. An error,
    /// a panic, a missing solution or a non-finite value all yield a
    /// failed result that still carries the elapsed time; this function
    /// never panics because of the algorithm.
    ///
    /// When a solution exists and rendering was requested, the solution
    /// is rendered afterwards. Rendering failures are logged and leave the
    /// result untouched.
    pub fn run<P: Problem>(descriptor: &TrialDescriptor<P>) -> TrialResult<P::Solution> {
        let index = descriptor.index();
        let honored = descriptor
            .flags()
            .restrict_to(descriptor.algorithm().capabilities());

        let start = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            descriptor.algorithm().solve(descriptor.problem(), honored)
        }));
        let elapsed_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        let output = match outcome {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Self::fail(descriptor, e.to_string(), elapsed_time_ms);
            }
            Err(payload) => {
                let reason = format!("panicked: {}", panic_message(payload.as_ref()));
                return Self::fail(descriptor, reason, elapsed_time_ms);
            }
        };

        let AlgorithmOutput {
            solution,
            time_division,
            value_evolution,
        } = output;

        let Some(solution) = solution else {
            return Self::fail(descriptor, "no solution returned", elapsed_time_ms);
        };
        let value = solution.value();
        if !value.is_finite() {
            return Self::fail(
                descriptor,
                format!("invalid solution value {value}"),
                elapsed_time_ms,
            );
        }

        debug!(
            algorithm = descriptor.algorithm_name(),
            trial = index,
            value,
            elapsed_time_ms,
            "trial finished"
        );

        if descriptor.render().is_requested() {
            Self::render(descriptor, &solution);
        }

        TrialResult {
            solution: Some(solution),
            value: Some(value),
            value_evolution: value_evolution.filter(|_| honored.value_evolution),
            elapsed_time_ms,
            time_division: time_division.filter(|_| honored.time_division),
            failure: None,
        }
    }

    fn fail<P: Problem>(
        descriptor: &TrialDescriptor<P>,
        reason: impl Into<String>,
        elapsed_time_ms: f64,
    ) -> TrialResult<P::Solution> {
        let result = TrialResult::failed(descriptor.index(), reason, elapsed_time_ms);
        if let Some(failure) = &result.failure {
            warn!(algorithm = descriptor.algorithm_name(), "{failure}");
        }
        result
    }

    fn render<P: Problem>(descriptor: &TrialDescriptor<P>, solution: &P::Solution) {
        let save_path = descriptor.save_path();
        let request = descriptor.render_request(save_path.as_deref());
        let rendered = panic::catch_unwind(AssertUnwindSafe(|| solution.visualize(&request)));
        match rendered {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(
                algorithm = descriptor.algorithm_name(),
                trial = descriptor.index(),
                "{e}"
            ),
            Err(payload) => warn!(
                algorithm = descriptor.algorithm_name(),
                trial = descriptor.index(),
                "renderer panicked: {}",
                panic_message(payload.as_ref())
            ),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
