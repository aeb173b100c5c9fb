//! Trial execution and statistical aggregation for comparing optimization
//! algorithms across problem instances.
//!
//! The crate repeatedly runs candidate algorithms against problem
//! instances, collects a fixed-shape result per run and reduces the
//! results into comparison tables:
//!
//! - **Trials** ([`trial`]): a "run algorithm A on problem P, N times"
//!   request becomes N self-contained descriptors, executed sequentially
//!   or in fixed-size batches on a bounded worker pool. Results always
//!   come back in trial order; errors and panics inside an algorithm
//!   become failed-trial placeholders instead of aborting the experiment.
//! - **Experiments** ([`experiment`]): every algorithm on every problem,
//!   results collected per (problem, algorithm), optional JSON snapshots
//!   and report publication through a storage sink.
//! - **Statistics** ([`stats`]): mean, standard deviation, min, median
//!   and max per (algorithm, problem), with a manual reference column for
//!   solution values.
//! - **Problems** ([`problem`]): the read contract algorithms and
//!   statistics consume, plus per-instance descriptive statistics.
//!
//! # Architecture
//!
//! Algorithms, problem construction and rendering stay outside the
//! crate, behind the [`trial::Algorithm`], [`problem::Problem`] and
//! [`problem::Solution`] traits. The library installs no `tracing`
//! subscriber; applications choose their own.

pub mod error;
pub mod experiment;
pub mod problem;
pub mod stats;
pub mod trial;

#[cfg(test)]
mod fixtures;

pub use error::{ConfigError, Error, RenderError, Result};
