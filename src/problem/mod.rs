//! Problem and solution read contract.
//!
//! The experiment engine consumes problem instances and solutions through
//! the [`Problem`] and [`Solution`] traits only. Building instances,
//! checking feasibility and drawing solutions belong to the implementors.
//!
//! [`ProblemStats`] and [`ProblemStatsTable`] describe how demanding each
//! instance is relative to a reference solution.

mod stats;
mod types;

pub use stats::{ProblemStats, ProblemStatsRow, ProblemStatsTable, PROBLEM_STATS_FIELDS};
pub use types::{Container, Item, ItemId, Placement, Problem, RenderRequest, Solution};
