//! Descriptive statistics of problem instances and their reference
//! solutions.

use super::types::{Problem, Solution};
use crate::stats::{describe, display_label, round_to, summarize};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Column labels of [`ProblemStatsTable`], in order.
pub const PROBLEM_STATS_FIELDS: [&str; 7] = [
    "Item num.",
    "Opt. % item num. in cont.",
    "Opt. % item value in cont.",
    "Item weight % of max weight",
    "Item area % of max area",
    "Cont. weight satur. %",
    "Cont. area satur. %",
];

/// Per-problem figures, measured against a reference solution.
///
/// Percentages are rounded to 2 decimals. A percentage whose denominator
/// is zero is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    pub item_count: usize,
    pub placed_items_pct: Option<f64>,
    pub placed_value_pct: Option<f64>,
    pub item_weight_pct: Option<f64>,
    pub item_area_pct: Option<f64>,
    pub weight_saturation_pct: Option<f64>,
    pub area_saturation_pct: Option<f64>,
}

impl ProblemStats {
    /// Measures `problem` against `solution`.
    ///
    /// Placed item ids unknown to the problem are ignored.
    pub fn compute<P: Problem>(problem: &P, solution: &P::Solution) -> Self {
        let items = problem.items();
        let container = problem.container();

        let total_value: f64 = items.values().map(|i| i.value).sum();
        let total_weight: f64 = items.values().map(|i| i.weight).sum();
        let total_area: f64 = items.values().map(|i| i.area).sum();

        let placed: Vec<_> = solution
            .placed_items()
            .keys()
            .filter_map(|id| items.get(id))
            .collect();
        let placed_value: f64 = placed.iter().map(|i| i.value).sum();
        let placed_weight: f64 = placed.iter().map(|i| i.weight).sum();
        let placed_area: f64 = placed.iter().map(|i| i.area).sum();

        Self {
            item_count: items.len(),
            placed_items_pct: percent(placed.len() as f64, items.len() as f64),
            placed_value_pct: percent(placed_value, total_value),
            item_weight_pct: percent(total_weight, container.max_weight),
            item_area_pct: percent(total_area, container.area),
            weight_saturation_pct: percent(placed_weight, container.max_weight),
            area_saturation_pct: percent(placed_area, container.area),
        }
    }

    /// All figures in [`PROBLEM_STATS_FIELDS`] order.
    pub fn to_row(&self) -> [Option<f64>; 7] {
        [
            Some(self.item_count as f64),
            self.placed_items_pct,
            self.placed_value_pct,
            self.item_weight_pct,
            self.item_area_pct,
            self.weight_saturation_pct,
            self.area_saturation_pct,
        ]
    }
}

fn percent(part: f64, whole: f64) -> Option<f64> {
    (whole != 0.0).then(|| round_to(part / whole * 100.0, 2))
}

/// A row of [`ProblemStatsTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatsRow {
    pub label: String,
    pub cells: [Option<f64>; 7],
}

/// Problem statistics followed by per-column summary rows.
///
/// Summary rows are `Min`, `Max`, `Mean`, `Std` and
/// `Std / (max - min) %`, each over the problems with a value in that
/// column. `Std` follows the sample convention (0 for a single problem);
/// the normalized spread is `None` when `max == min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStatsTable {
    pub problems: Vec<ProblemStatsRow>,
    pub summary: Vec<ProblemStatsRow>,
}

impl ProblemStatsTable {
    /// Builds the table from `(problem name, stats)` pairs.
    pub fn build<'a>(entries: impl IntoIterator<Item = (&'a str, ProblemStats)>) -> Self {
        let problems: Vec<ProblemStatsRow> = entries
            .into_iter()
            .map(|(name, stats)| ProblemStatsRow {
                label: name.to_string(),
                cells: stats.to_row(),
            })
            .collect();

        let mut min = [None; 7];
        let mut max = [None; 7];
        let mut mean = [None; 7];
        let mut std = [None; 7];
        let mut spread = [None; 7];
        for col in 0..PROBLEM_STATS_FIELDS.len() {
            let column: Vec<f64> = problems.iter().filter_map(|r| r.cells[col]).collect();
            let (Ok(s), Ok(raw)) = (summarize(&column, 2), describe(&column)) else {
                continue;
            };
            min[col] = Some(s.min);
            max[col] = Some(s.max);
            mean[col] = Some(s.mean);
            std[col] = Some(s.std);
            // ratio of unrounded figures
            spread[col] = percent(raw.std, raw.max - raw.min);
        }

        let summary = [
            ("Min", min),
            ("Max", max),
            ("Mean", mean),
            ("Std", std),
            ("Std / (max - min) %", spread),
        ]
        .into_iter()
        .map(|(label, cells)| ProblemStatsRow {
            label: label.to_string(),
            cells,
        })
        .collect();

        Self { problems, summary }
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl fmt::Display for ProblemStatsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<22}", "")?;
        for field in PROBLEM_STATS_FIELDS {
            write!(f, " | {field}")?;
        }
        writeln!(f)?;
        let problem_rows = self.problems.iter().map(|r| (display_label(&r.label), r));
        let summary_rows = self
            .summary
            .iter()
            .map(|r| (Cow::Borrowed(r.label.as_str()), r));
        for (label, row) in problem_rows.chain(summary_rows) {
            write!(f, "{label:<22}")?;
            for (cell, field) in row.cells.iter().zip(PROBLEM_STATS_FIELDS) {
                match cell {
                    Some(v) => write!(f, " | {v:>width$}", width = field.len())?,
                    None => write!(f, " | {:>width$}", "-", width = field.len())?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
