//! Shared fixtures for integration tests: a small knapsack-packing
//! instance and a handful of algorithms with known behavior.

#![allow(dead_code)]

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use u_experiment::problem::{Container, Item, ItemId, Placement, Problem, Solution};
use u_experiment::trial::{
    Algorithm, AlgorithmError, AlgorithmOutput, Capabilities, MeasureFlags, TimeDivision,
    ValueEvolution,
};

/// Installs a test-writer subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shelf {
    pub items: BTreeMap<ItemId, Item>,
    pub container: Container,
}

impl Problem for Shelf {
    type Solution = Load;

    fn items(&self) -> &BTreeMap<ItemId, Item> {
        &self.items
    }

    fn container(&self) -> &Container {
        &self.container
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub value: f64,
    pub placed: BTreeMap<ItemId, Placement>,
}

impl Load {
    pub fn of(shelf: &Shelf, ids: &[ItemId]) -> Self {
        Self {
            value: ids.iter().map(|id| shelf.items[id].value).sum(),
            placed: ids.iter().map(|&id| (id, Placement::default())).collect(),
        }
    }

    /// A reference solution carrying only a value.
    pub fn valued(value: f64) -> Self {
        Self {
            value,
            placed: BTreeMap::new(),
        }
    }
}

impl Solution for Load {
    fn value(&self) -> f64 {
        self.value
    }

    fn placed_items(&self) -> &BTreeMap<ItemId, Placement> {
        &self.placed
    }
}

/// Ten items of decreasing value density; at most six fit by weight.
pub fn shelf() -> Shelf {
    let items = (0..10)
        .map(|id| {
            let value = 20.0 - id as f64;
            (id, Item::new(value, 10.0 + id as f64, 1.5))
        })
        .collect();
    Shelf {
        items,
        container: Container::new(75.0, 20.0),
    }
}

/// Takes items in id order while they fit.
pub struct FirstFit;

impl Algorithm<Shelf> for FirstFit {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn solve(
        &self,
        shelf: &Shelf,
        flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Load>, AlgorithmError> {
        let start = Instant::now();
        let (chosen, trace) = fill(shelf, shelf.items.keys().copied().collect());

        let mut out = AlgorithmOutput::solution(Load::of(shelf, &chosen));
        if flags.time_division {
            let mut division = TimeDivision::new();
            division.insert("fill".into(), start.elapsed().as_secs_f64() * 1000.0);
            out = out.with_time_division(division);
        }
        if flags.value_evolution {
            out = out.with_value_evolution(ValueEvolution::Trace(trace));
        }
        Ok(out)
    }
}

/// Fills the shelf in a random item order.
pub struct RandomFill;

impl Algorithm<Shelf> for RandomFill {
    fn capabilities(&self) -> Capabilities {
        Capabilities {
            time_division: false,
            value_evolution: true,
        }
    }

    fn solve(
        &self,
        shelf: &Shelf,
        flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Load>, AlgorithmError> {
        let mut order: Vec<ItemId> = shelf.items.keys().copied().collect();
        order.shuffle(&mut rand::rng());
        let (chosen, trace) = fill(shelf, order);

        let out = AlgorithmOutput::solution(Load::of(shelf, &chosen));
        Ok(if flags.value_evolution {
            out.with_value_evolution(ValueEvolution::Trace(trace))
        } else {
            out
        })
    }
}

/// Returns `value` after sleeping `delay_ms`.
pub struct Constant {
    pub value: f64,
    pub delay_ms: u64,
}

impl Algorithm<Shelf> for Constant {
    fn solve(
        &self,
        _shelf: &Shelf,
        _flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Load>, AlgorithmError> {
        std::thread::sleep(Duration::from_millis(self.delay_ms));
        Ok(AlgorithmOutput::solution(Load::valued(self.value)))
    }
}

/// Never finds a solution.
pub struct Unreliable;

impl Algorithm<Shelf> for Unreliable {
    fn solve(
        &self,
        _shelf: &Shelf,
        _flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Load>, AlgorithmError> {
        Ok(AlgorithmOutput::empty())
    }
}

pub fn first_fit() -> Arc<dyn Algorithm<Shelf>> {
    Arc::new(FirstFit)
}

pub fn random_fill() -> Arc<dyn Algorithm<Shelf>> {
    Arc::new(RandomFill)
}

pub fn constant(value: f64, delay_ms: u64) -> Arc<dyn Algorithm<Shelf>> {
    Arc::new(Constant { value, delay_ms })
}

pub fn unreliable() -> Arc<dyn Algorithm<Shelf>> {
    Arc::new(Unreliable)
}

fn fill(shelf: &Shelf, order: Vec<ItemId>) -> (Vec<ItemId>, Vec<f64>) {
    let mut weight = 0.0;
    let mut area = 0.0;
    let mut value = 0.0;
    let mut chosen = Vec::new();
    let mut trace = Vec::new();
    for id in order {
        let item = &shelf.items[&id];
        if weight + item.weight <= shelf.container.max_weight
            && area + item.area <= shelf.container.area
        {
            weight += item.weight;
            area += item.area;
            value += item.value;
            chosen.push(id);
        }
        trace.push(value);
    }
    (chosen, trace)
}

/// Unique scratch directory under the system temp dir.
pub fn scratch_dir(tag: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("u-experiment-{tag}-{}", std::process::id()))
}
