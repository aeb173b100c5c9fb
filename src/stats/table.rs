//! Two-level (algorithm × statistic) result tables.

use super::summary::{summarize, Concept, Statistic};
use crate::experiment::ExperimentSet;
use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// Algorithm label of the reference-solution column.
pub const MANUAL_COLUMN: &str = "Manual";

/// Display label of a problem: short names read as "Problem <name>".
///
/// Only used when printing; tables are keyed by the raw name.
pub fn display_label(name: &str) -> Cow<'_, str> {
    if name.chars().count() < 5 {
        Cow::Owned(format!("Problem {name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Column key: an (algorithm, statistic) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub algorithm: String,
    pub statistic: Statistic,
}

/// One problem's cells, aligned with [`StatsTable::columns`].
///
/// A `None` cell is a placeholder: the algorithm did not run on this
/// problem, none of its trials succeeded, or no reference value exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRow {
    pub problem: String,
    pub cells: Vec<Option<f64>>,
}

/// Summary statistics of every algorithm on every problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    pub concept: Concept,
    pub columns: Vec<ColumnKey>,
    pub rows: Vec<StatsRow>,
}

impl StatsTable {
    /// Row of `problem`, by raw problem name.
    pub fn row(&self, problem: &str) -> Option<&StatsRow> {
        self.rows.iter().find(|r| r.problem == problem)
    }

    /// Cell at (`problem`, `algorithm`, `statistic`).
    ///
    /// `None` for unknown keys as well as for placeholder cells.
    pub fn get(&self, problem: &str, algorithm: &str, statistic: Statistic) -> Option<f64> {
        let col = self
            .columns
            .iter()
            .position(|c| c.algorithm == algorithm && c.statistic == statistic)?;
        self.row(problem)?.cells[col]
    }

    /// Distinct algorithm labels, in column order.
    pub fn algorithms(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for c in &self.columns {
            if names.last() != Some(&c.algorithm.as_str()) {
                names.push(&c.algorithm);
            }
        }
        names
    }
}

/// Builds the `concept` table of an experiment set.
///
/// Rows follow problem registration order. Columns hold the five
/// [`Statistic::SUMMARY`] statistics for every algorithm that ran on any
/// problem, in first-seen order. For [`Concept::Value`] a trailing
/// (`"Manual"`, `"optim."`) column holds the unrounded reference value.
///
/// Failed trials are excluded from value statistics; their elapsed time
/// still counts toward time statistics.
pub fn build_table<P: Problem>(set: &ExperimentSet<P>, concept: Concept) -> StatsTable {
    let mut algorithms: Vec<&str> = Vec::new();
    for record in set.records() {
        for name in record.algorithm_names() {
            if !algorithms.contains(&name) {
                algorithms.push(name);
            }
        }
    }

    let mut columns: Vec<ColumnKey> = algorithms
        .iter()
        .flat_map(|&algorithm| {
            Statistic::SUMMARY.iter().map(move |&statistic| ColumnKey {
                algorithm: algorithm.to_string(),
                statistic,
            })
        })
        .collect();
    if concept == Concept::Value {
        columns.push(ColumnKey {
            algorithm: MANUAL_COLUMN.to_string(),
            statistic: Statistic::Optimum,
        });
    }

    let rows = set
        .records()
        .iter()
        .map(|record| {
            let mut cells = Vec::with_capacity(columns.len());
            for &algorithm in &algorithms {
                let measurements: Vec<f64> = match record.trials(algorithm) {
                    Some(trials) => match concept {
                        Concept::Value => trials.successful_values(),
                        Concept::Time => trials.times().to_vec(),
                    },
                    None => Vec::new(),
                };
                match summarize(&measurements, concept.precision()) {
                    Ok(summary) => cells.extend(summary.to_array().map(Some)),
                    Err(e) => {
                        warn!(
                            problem = record.name(),
                            algorithm, "placeholder {concept} statistics: {e}"
                        );
                        cells.extend([None; 5]);
                    }
                }
            }
            if concept == Concept::Value {
                cells.push(record.manual().value());
            }
            StatsRow {
                problem: record.name().to_string(),
                cells,
            }
        })
        .collect();

    StatsTable {
        concept,
        columns,
        rows,
    }
}

impl fmt::Display for StatsTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const LABEL_WIDTH: usize = 16;
        const CELL_WIDTH: usize = 10;

        write!(f, "{:<LABEL_WIDTH$}", "Algorithm")?;
        let mut previous: Option<&str> = None;
        for c in &self.columns {
            let shown = if previous == Some(c.algorithm.as_str()) {
                ""
            } else {
                c.algorithm.as_str()
            };
            write!(f, " {shown:>CELL_WIDTH$}")?;
            previous = Some(&c.algorithm);
        }
        writeln!(f)?;

        write!(f, "{:<LABEL_WIDTH$}", "Statistic")?;
        for c in &self.columns {
            write!(f, " {:>CELL_WIDTH$}", c.statistic.label())?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<LABEL_WIDTH$}", display_label(&row.problem))?;
            for cell in &row.cells {
                match cell {
                    Some(v) => write!(f, " {v:>CELL_WIDTH$}")?,
                    None => write!(f, " {:>CELL_WIDTH$}", "-")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
