//! Trial execution.
//!
//! A trial is one execution of one algorithm against one problem. This
//! module turns a "run algorithm A on problem P, N times" request into
//! results:
//!
//! 1. [`TrialBuilder`] fans the request out into N self-contained
//!    [`TrialDescriptor`]s sharing the problem read-only.
//! 2. [`TrialRunner`] executes one descriptor, times it, contains its
//!    failures and normalizes the output into a [`TrialResult`].
//! 3. [`BatchScheduler`] runs descriptors sequentially or in fixed-size
//!    batches on a worker pool, always returning results in input order.
//!
//! # Core Traits
//!
//! - [`Algorithm`]: a candidate algorithm and its declared [`Capabilities`]

mod descriptor;
pub(crate) mod float_repr;
mod runner;
mod scheduler;
mod types;

pub use descriptor::{RenderOptions, TrialBuilder, TrialDescriptor, TrialOptions};
pub use runner::TrialRunner;
pub use scheduler::{batch_sizes, BatchScheduler};
pub use types::{
    Algorithm, AlgorithmError, AlgorithmOutput, Capabilities, MeasureFlags, TimeDivision,
    TrialFailure, TrialResult, ValueEvolution,
};
