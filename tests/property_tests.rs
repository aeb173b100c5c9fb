//! Property-based tests for statistical reduction and scheduling order.
//!
//! Run with ProptestConfig::with_cases; scheduling properties use fewer
//! cases since every case spins up a worker pool.

mod common;

use common::{constant, shelf};
use proptest::prelude::*;
use std::sync::Arc;
use u_experiment::stats::{round_to, summarize};
use u_experiment::trial::{batch_sizes, BatchScheduler, TrialBuilder, TrialOptions};

// ============================================================================
// Strategies
// ============================================================================

fn arb_measurements() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1.0e6f64..1.0e6, 1..64)
}

fn arb_trials() -> impl Strategy<Value = Vec<(f64, u64)>> {
    proptest::collection::vec((0.0f64..1000.0, 0u64..4), 1..10)
}

// ============================================================================
// Summary properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: min <= median <= max and mean lies within [min, max]
    #[test]
    fn prop_summary_is_ordered(xs in arb_measurements(), precision in 0u32..4) {
        let s = summarize(&xs, precision).unwrap();
        prop_assert!(s.min <= s.median);
        prop_assert!(s.median <= s.max);
        prop_assert!(s.min <= s.mean && s.mean <= s.max);
        prop_assert!(s.std >= 0.0);
    }

    /// Property: extremes are the rounded extremes of the input
    #[test]
    fn prop_summary_extremes(xs in arb_measurements()) {
        let s = summarize(&xs, 2).unwrap();
        let min = xs.iter().copied().fold(f64::INFINITY, f64::min);
        let max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert_eq!(s.min, round_to(min, 2));
        prop_assert_eq!(s.max, round_to(max, 2));
    }

    /// Property: summarize([x]) = (x, 0, x, x, x)
    #[test]
    fn prop_single_measurement(x in -1.0e6f64..1.0e6) {
        let s = summarize(&[x], 2).unwrap();
        let r = round_to(x, 2);
        prop_assert_eq!(s.to_array(), [r, 0.0, r, r, r]);
    }

    /// Property: summaries do not depend on measurement order
    #[test]
    fn prop_summary_order_independent(mut xs in arb_measurements()) {
        let before = summarize(&xs, 2).unwrap();
        xs.reverse();
        let after = summarize(&xs, 2).unwrap();
        prop_assert_eq!(before.min, after.min);
        prop_assert_eq!(before.median, after.median);
        prop_assert_eq!(before.max, after.max);
    }

    /// Property: batches cover every trial, none larger than parallelism
    #[test]
    fn prop_batch_sizes_partition(total in 1usize..200, parallelism in 2usize..16) {
        let sizes = batch_sizes(total, parallelism);
        prop_assert_eq!(sizes.iter().sum::<usize>(), total);
        prop_assert_eq!(sizes.len(), total.div_ceil(parallelism));
        prop_assert!(sizes.iter().all(|&s| s >= 1 && s <= parallelism));
    }

    /// Property: parallelism 0 or 1 runs everything as one sequential batch
    #[test]
    fn prop_batch_sizes_sequential(total in 1usize..200, parallelism in 0usize..=1) {
        prop_assert_eq!(batch_sizes(total, parallelism), vec![total]);
    }
}

// ============================================================================
// Scheduling properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: for parallelism in {1, 2, N} the i-th result belongs to
    /// the i-th descriptor
    #[test]
    fn prop_schedule_preserves_order(trials in arb_trials()) {
        let problem = Arc::new(shelf());
        let descriptors: Vec<_> = trials
            .iter()
            .flat_map(|&(value, delay)| {
                TrialBuilder::build(
                    constant(value, delay),
                    "Constant",
                    Arc::clone(&problem),
                    1,
                    1,
                    &TrialOptions::default(),
                )
                .unwrap()
            })
            .collect();
        let expected: Vec<Option<f64>> = trials.iter().map(|&(v, _)| Some(v)).collect();

        for parallelism in [1, 2, trials.len()] {
            let results = BatchScheduler::schedule(&descriptors, parallelism).unwrap();
            let values: Vec<Option<f64>> = results.iter().map(|r| r.value).collect();
            prop_assert_eq!(&values, &expected);
        }
    }
}
