//! Report publication: aggregated tables shown and/or saved after a run.

use super::config::ExperimentConfig;
use super::record::ExperimentSet;
use super::sink::StorageSink;
use crate::error::Error;
use crate::problem::{Problem, ProblemStats, ProblemStatsTable, RenderRequest, Solution};
use crate::stats::{build_table, display_label, Concept, StatsTable};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use tracing::{info, warn};

/// File name of the saved value table.
pub const VALUE_RESULTS_FILE: &str = "value_results.json";
/// File name of the saved time table.
pub const TIME_RESULTS_FILE: &str = "time_results.json";
/// File name of the saved problem statistics table.
pub const PROBLEM_STATS_FILE: &str = "problem_stats.json";
/// File name of a manual reference rendering, inside the problem directory.
pub const MANUAL_PLOT_FILE: &str = "manual_solution.png";

/// Derived views of an experiment set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperimentReport {
    pub value_table: StatsTable,
    pub time_table: StatsTable,
    /// Only problems whose manual reference is a full solution appear.
    pub problem_stats: ProblemStatsTable,
}

impl ExperimentReport {
    /// Computes every table from `set`. Nothing is written.
    pub fn build<P: Problem>(set: &ExperimentSet<P>) -> Self {
        let stats: Vec<(&str, ProblemStats)> = set
            .records()
            .iter()
            .filter_map(|r| {
                let manual = r.manual().solution()?;
                Some((r.name(), ProblemStats::compute::<P>(r.problem(), manual)))
            })
            .collect();

        Self {
            value_table: build_table(set, Concept::Value),
            time_table: build_table(set, Concept::Time),
            problem_stats: ProblemStatsTable::build(stats),
        }
    }

    /// Builds the report and shows or saves each part as `config` asks.
    ///
    /// Showing logs the table at `info` level. Saved tables are JSON files
    /// directly under `config.output_dir`. Storage and rendering failures
    /// are logged and skipped; the report is returned regardless.
    pub fn publish<P: Problem>(
        set: &ExperimentSet<P>,
        config: &ExperimentConfig,
        sink: &dyn StorageSink,
    ) -> Self {
        let report = Self::build(set);

        if config.manual_solution_plots.is_active() {
            render_manual_solutions(set, config, sink);
        }

        if config.problem_stats.show && !report.problem_stats.is_empty() {
            info!("problem statistics\n{}", report.problem_stats);
        }
        if config.problem_stats.save && !report.problem_stats.is_empty() {
            save_json(sink, &config.output_dir.join(PROBLEM_STATS_FILE), &report.problem_stats);
        }

        for table in [&report.value_table, &report.time_table] {
            if config.result_tables.show {
                info!("{} statistics\n{table}", table.concept);
            }
            if config.result_tables.save {
                let file = match table.concept {
                    Concept::Value => VALUE_RESULTS_FILE,
                    Concept::Time => TIME_RESULTS_FILE,
                };
                save_json(sink, &config.output_dir.join(file), table);
            }
        }

        report
    }
}

fn save_json<T: Serialize>(sink: &dyn StorageSink, path: &Path, value: &T) {
    let written = serde_json::to_vec_pretty(value)
        .map_err(Error::from)
        .and_then(|bytes| Ok(sink.write(path, &bytes)?));
    match written {
        Ok(()) => info!(path = %path.display(), "saved table"),
        Err(e) => warn!(path = %path.display(), "cannot save table: {e}"),
    }
}

fn render_manual_solutions<P: Problem>(
    set: &ExperimentSet<P>,
    config: &ExperimentConfig,
    sink: &dyn StorageSink,
) {
    for record in set.records() {
        let Some(solution) = record.manual().solution() else {
            continue;
        };
        let dir = config.problem_dir(record.name());
        let save_path = if config.manual_solution_plots.save {
            match sink.prepare_dir(&dir) {
                Ok(()) => Some(dir.join(MANUAL_PLOT_FILE)),
                Err(e) => {
                    warn!(
                        problem = record.name(),
                        dir = %dir.display(),
                        "cannot prepare plot directory: {e}"
                    );
                    None
                }
            }
        } else {
            None
        };
        if !config.manual_solution_plots.show && save_path.is_none() {
            continue;
        }

        let title = format!("{} - Manual solution", display_label(record.name()));
        let request = RenderRequest {
            show: config.manual_solution_plots.show,
            save_path: save_path.as_deref(),
            title: Some(title.as_str()),
            show_item_value_and_weight: config.show_value_and_weight,
        };
        if let Err(e) = render(solution, &request) {
            warn!(problem = record.name(), "manual solution rendering failed: {e}");
        }
    }
}

fn render<S: Solution>(solution: &S, request: &RenderRequest<'_>) -> Result<(), String> {
    match catch_unwind(AssertUnwindSafe(|| solution.visualize(request))) {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("renderer panicked".to_string()),
    }
}
