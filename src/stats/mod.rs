//! Statistics Aggregator.
//!
//! [`summarize`] reduces a sequence of measurements to
//! (mean, std, min, median, max) at a precision chosen per [`Concept`].
//! [`build_table`] lays those summaries out as a two-level
//! (algorithm, statistic) table with one row per problem.

mod summary;
mod table;

pub use summary::{describe, round_to, summarize, Concept, Statistic, Summary};
pub use table::{build_table, display_label, ColumnKey, StatsRow, StatsTable, MANUAL_COLUMN};
