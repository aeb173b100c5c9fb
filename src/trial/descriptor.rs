//! Trial descriptors: one self-contained unit of work per repetition.

use super::scheduler::batch_sizes;
use super::types::{Algorithm, MeasureFlags};
use crate::error::{ConfigError, Result};
use crate::problem::{Problem, RenderRequest};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// How a trial's solution should be rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Display each solution as soon as it is found.
    pub show: bool,
    /// Directory solution images are saved to; `None` disables saving.
    pub save_dir: Option<PathBuf>,
    /// Title override passed to the renderer.
    pub title: Option<String>,
    /// Annotate items with their value and weight.
    pub show_item_value_and_weight: bool,
}

impl RenderOptions {
    /// Whether a render call is needed at all.
    pub fn is_requested(&self) -> bool {
        self.show || self.save_dir.is_some()
    }
}

/// Per-trial options shared by every repetition of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialOptions {
    pub flags: MeasureFlags,
    pub render: RenderOptions,
}

/// Everything needed to run one trial, in isolation.
///
/// The problem is shared behind an [`Arc`] and never mutated, so the same
/// instance backs every descriptor of a request and every worker thread.
pub struct TrialDescriptor<P: Problem> {
    algorithm: Arc<dyn Algorithm<P>>,
    algorithm_name: Arc<str>,
    problem: Arc<P>,
    render: RenderOptions,
    flags: MeasureFlags,
    index: usize,
}

impl<P: Problem> Clone for TrialDescriptor<P> {
    fn clone(&self) -> Self {
        Self {
            algorithm: Arc::clone(&self.algorithm),
            algorithm_name: Arc::clone(&self.algorithm_name),
            problem: Arc::clone(&self.problem),
            render: self.render.clone(),
            flags: self.flags,
            index: self.index,
        }
    }
}

impl<P: Problem> fmt::Debug for TrialDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrialDescriptor")
            .field("algorithm_name", &self.algorithm_name)
            .field("index", &self.index)
            .field("flags", &self.flags)
            .field("render", &self.render)
            .finish()
    }
}

impl<P: Problem> TrialDescriptor<P> {
    pub fn algorithm(&self) -> &dyn Algorithm<P> {
        self.algorithm.as_ref()
    }

    pub fn algorithm_name(&self) -> &str {
        &self.algorithm_name
    }

    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// The shared problem handle.
    pub fn problem_arc(&self) -> &Arc<P> {
        &self.problem
    }

    /// Requested measurements, before capability filtering.
    pub fn flags(&self) -> MeasureFlags {
        self.flags
    }

    pub fn render(&self) -> &RenderOptions {
        &self.render
    }

    /// Zero-based position of this trial within its request.
    pub fn index(&self) -> usize {
        self.index
    }

    /// File the solution image of this trial is saved to, if saving.
    ///
    /// `<save_dir>/<algorithm lowercased>_exec<index + 1>_solution.png`
    pub fn save_path(&self) -> Option<PathBuf> {
        self.render.save_dir.as_ref().map(|dir| {
            dir.join(format!(
                "{}_exec{}_solution.png",
                self.algorithm_name.to_lowercase(),
                self.index + 1
            ))
        })
    }

    /// Render request for the solution this trial produced.
    pub(crate) fn render_request<'a>(
        &'a self,
        save_path: Option<&'a std::path::Path>,
    ) -> RenderRequest<'a> {
        RenderRequest {
            show: self.render.show,
            save_path,
            title: self.render.title.as_deref(),
            show_item_value_and_weight: self.render.show_item_value_and_weight,
        }
    }
}

/// Fans a single "run this algorithm N times" request out into trials.
pub struct TrialBuilder;

impl TrialBuilder {
    /// Builds `repetitions` descriptors for running `algorithm` on `problem`.
    ///
    /// Descriptors are identical apart from their index. `parallelism`
    /// only shapes the batch plan reported in the logs; execution is left
    /// to the [`BatchScheduler`](super::BatchScheduler).
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidRepetitions`] when `repetitions` is 0.
    pub fn build<P: Problem>(
        algorithm: Arc<dyn Algorithm<P>>,
        name: &str,
        problem: Arc<P>,
        repetitions: usize,
        parallelism: usize,
        options: &TrialOptions,
    ) -> Result<Vec<TrialDescriptor<P>>> {
        if repetitions < 1 {
            return Err(ConfigError::InvalidRepetitions(repetitions).into());
        }

        debug!(
            algorithm = name,
            repetitions,
            batches = ?batch_sizes(repetitions, parallelism),
            "built trial plan"
        );

        let algorithm_name: Arc<str> = Arc::from(name);
        Ok((0..repetitions)
            .map(|index| TrialDescriptor {
                algorithm: Arc::clone(&algorithm),
                algorithm_name: Arc::clone(&algorithm_name),
                problem: Arc::clone(&problem),
                render: options.render.clone(),
                flags: options.flags,
                index,
            })
            .collect())
    }
}
