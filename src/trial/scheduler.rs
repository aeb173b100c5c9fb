//! Sequential or batch-parallel execution of trial descriptors.

use super::descriptor::TrialDescriptor;
use super::runner::TrialRunner;
use super::types::TrialResult;
use crate::error::{Error, Result};
use crate::problem::Problem;
use rayon::prelude::*;
use tracing::debug;

/// Sizes of the batches `total` trials are split into for `parallelism`
/// workers: consecutive batches of `parallelism`, the last one possibly
/// smaller. A parallelism of 0 or 1 is a single sequential batch.
///
/// ```
/// use u_experiment::trial::batch_sizes;
///
/// assert_eq!(batch_sizes(7, 3), vec![3, 3, 1]);
/// assert_eq!(batch_sizes(5, 5), vec![5]);
/// assert_eq!(batch_sizes(4, 1), vec![4]);
/// ```
pub fn batch_sizes(total: usize, parallelism: usize) -> Vec<usize> {
    if total == 0 {
        return Vec::new();
    }
    if parallelism <= 1 {
        return vec![total];
    }
    let full = total / parallelism;
    let mut sizes = vec![parallelism; full];
    if total % parallelism > 0 {
        sizes.push(total % parallelism);
    }
    sizes
}

/// Drives the [`TrialRunner`] over a sequence of descriptors.
///
/// # Execution model
///
/// - `parallelism <= 1`: every descriptor runs on the calling thread, in
///   input order.
/// - `parallelism > 1`: a dedicated pool of `parallelism` worker threads
///   is created. Descriptors are dispatched in consecutive batches of
///   `parallelism`; each batch is awaited in full before the next one is
///   issued.
///
/// Whatever the mode, the i-th result belongs to the i-th descriptor.
/// Workers only read the shared problem; results are handed back to the
/// calling thread, which is the only one assembling them.
///
/// # Limitations
///
/// There is no per-trial timeout and no mid-batch cancellation. A trial
/// that never returns blocks its batch, and therefore the whole schedule,
/// indefinitely.
pub struct BatchScheduler;

impl BatchScheduler {
    /// Runs `descriptors` and returns their results in input order.
    ///
    /// # Errors
    ///
    /// [`Error::Pool`] if the worker pool cannot be created. Trial-level
    /// failures never surface here; they are part of the results.
    pub fn schedule<P: Problem>(
        descriptors: &[TrialDescriptor<P>],
        parallelism: usize,
    ) -> Result<Vec<TrialResult<P::Solution>>> {
        if parallelism <= 1 {
            return Ok(descriptors.iter().map(TrialRunner::run).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|i| format!("trial-worker-{i}"))
            .build()
            .map_err(|e| Error::Pool(e.to_string()))?;

        let mut results = Vec::with_capacity(descriptors.len());
        for (batch, chunk) in descriptors.chunks(parallelism).enumerate() {
            debug!(batch, size = chunk.len(), "dispatching batch");
            let batch_results: Vec<TrialResult<P::Solution>> =
                pool.install(|| chunk.par_iter().map(TrialRunner::run).collect());
            results.extend(batch_results);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{failing, greedy, knapsack, panicking, Knapsack, Packing};
    use crate::trial::{
        Algorithm, AlgorithmError, AlgorithmOutput, MeasureFlags, TrialBuilder, TrialOptions,
    };
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Returns a solution whose value is the invocation number, sleeping
    /// less for later invocations so that completion order is reversed
    /// within a batch.
    struct Countdown {
        calls: AtomicUsize,
        threads: Mutex<Vec<String>>,
    }

    impl Countdown {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                threads: Mutex::new(Vec::new()),
            }
        }
    }

    impl Algorithm<Knapsack> for Countdown {
        fn solve(
            &self,
            _problem: &Knapsack,
            _flags: MeasureFlags,
        ) -> std::result::Result<AlgorithmOutput<Packing>, AlgorithmError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            self.threads.lock().unwrap().push(
                std::thread::current()
                    .name()
                    .unwrap_or("unnamed")
                    .to_string(),
            );
            std::thread::sleep(Duration::from_millis(5 * (4 - (n % 4)) as u64));
            Ok(AlgorithmOutput::solution(Packing {
                value: n as f64,
                placed: BTreeMap::new(),
            }))
        }
    }

    fn descriptors(
        algorithm: Arc<dyn Algorithm<Knapsack>>,
        n: usize,
    ) -> Vec<TrialDescriptor<Knapsack>> {
        TrialBuilder::build(
            algorithm,
            "Algo",
            Arc::new(knapsack()),
            n,
            1,
            &TrialOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_batch_sizes() {
        assert_eq!(batch_sizes(7, 3), vec![3, 3, 1]);
        assert_eq!(batch_sizes(6, 3), vec![3, 3]);
        assert_eq!(batch_sizes(2, 5), vec![2]);
        assert_eq!(batch_sizes(3, 0), vec![3]);
        assert!(batch_sizes(0, 4).is_empty());
    }

    #[test]
    fn test_sequential_runs_in_order() {
        let algorithm = Arc::new(Countdown::new());
        let results = BatchScheduler::schedule(&descriptors(algorithm.clone(), 5), 1).unwrap();

        let values: Vec<f64> = results.iter().map(|r| r.value.unwrap()).collect();
        assert_eq!(values, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // sequential mode never leaves the calling thread
        let threads = algorithm.threads.lock().unwrap();
        assert!(threads.iter().all(|t| !t.starts_with("trial-worker-")));
    }

    #[test]
    fn test_parallel_preserves_submission_order() {
        let results = BatchScheduler::schedule(&descriptors(greedy(), 7), 3).unwrap();
        assert_eq!(results.len(), 7);
        assert!(results.iter().all(|r| r.value == Some(56.0)));

        // failures are positional too
        let mut mixed = descriptors(greedy(), 2);
        mixed.extend(descriptors(failing(), 1));
        mixed.extend(descriptors(greedy(), 1));
        let results = BatchScheduler::schedule(&mixed, 2).unwrap();
        let ok: Vec<bool> = results.iter().map(|r| !r.is_failure()).collect();
        assert_eq!(ok, vec![true, true, false, true]);
    }

    #[test]
    fn test_parallel_runs_on_pool_workers() {
        let algorithm = Arc::new(Countdown::new());
        let results = BatchScheduler::schedule(&descriptors(algorithm.clone(), 6), 3).unwrap();
        assert_eq!(results.len(), 6);

        let threads = algorithm.threads.lock().unwrap();
        assert_eq!(threads.len(), 6);
        assert!(threads.iter().all(|t| t.starts_with("trial-worker-")));

        // batches are awaited in full: the second batch starts only after
        // all three invocations of the first one
        let first_batch: Vec<f64> = results[..3].iter().map(|r| r.value.unwrap()).collect();
        assert!(first_batch.iter().all(|&v| v < 3.0));
        let second_batch: Vec<f64> = results[3..].iter().map(|r| r.value.unwrap()).collect();
        assert!(second_batch.iter().all(|&v| v >= 3.0));
    }

    #[test]
    fn test_panic_does_not_affect_siblings() {
        let mut mixed = descriptors(greedy(), 2);
        mixed.extend(descriptors(panicking(), 1));
        mixed.extend(descriptors(greedy(), 3));

        let results = BatchScheduler::schedule(&mixed, 3).unwrap();
        assert_eq!(results.len(), 6);
        assert!(results[2].is_failure());
        for (i, r) in results.iter().enumerate() {
            if i != 2 {
                assert_eq!(r.value, Some(56.0), "trial {i} should be unaffected");
            }
        }
    }

    #[test]
    fn test_empty_schedule() {
        let results = BatchScheduler::schedule::<Knapsack>(&[], 4).unwrap();
        assert!(results.is_empty());
    }
}
