//! Small knapsack-packing fixtures shared by unit tests.

use crate::problem::{Container, Item, ItemId, Placement, Problem, Solution};
use crate::trial::{
    Algorithm, AlgorithmError, AlgorithmOutput, Capabilities, MeasureFlags, TimeDivision,
    ValueEvolution,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Knapsack {
    pub items: BTreeMap<ItemId, Item>,
    pub container: Container,
}

impl Problem for Knapsack {
    type Solution = Packing;

    fn items(&self) -> &BTreeMap<ItemId, Item> {
        &self.items
    }

    fn container(&self) -> &Container {
        &self.container
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Packing {
    pub value: f64,
    pub placed: BTreeMap<ItemId, Placement>,
}

impl Packing {
    pub fn with_items(problem: &Knapsack, ids: &[ItemId]) -> Self {
        let placed: BTreeMap<ItemId, Placement> =
            ids.iter().map(|&id| (id, Placement::default())).collect();
        let value = ids.iter().map(|id| problem.items[id].value).sum();
        Self { value, placed }
    }
}

impl Solution for Packing {
    fn value(&self) -> f64 {
        self.value
    }

    fn placed_items(&self) -> &BTreeMap<ItemId, Placement> {
        &self.placed
    }
}

/// Three big squares, one small square and three thin strips in an
/// L-shaped container.
pub fn knapsack() -> Knapsack {
    let mut items = BTreeMap::new();
    for id in 0..3 {
        items.insert(id, Item::new(10.0, 10.0, 2.25));
    }
    items.insert(3, Item::new(5.0, 5.0, 1.0));
    for id in 4..7 {
        items.insert(id, Item::new(7.0, 8.0, 0.6));
    }
    Knapsack {
        items,
        container: Container::new(100.0, 28.88),
    }
}

/// Deterministic value/weight-ratio greedy with every side channel.
pub struct Greedy;

impl Algorithm<Knapsack> for Greedy {
    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn solve(
        &self,
        problem: &Knapsack,
        flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Packing>, AlgorithmError> {
        let mut order: Vec<(&ItemId, &Item)> = problem.items.iter().collect();
        order.sort_by(|a, b| {
            (b.1.value / b.1.weight)
                .total_cmp(&(a.1.value / a.1.weight))
                .then(a.0.cmp(b.0))
        });

        let mut weight = 0.0;
        let mut area = 0.0;
        let mut chosen = Vec::new();
        let mut trace = Vec::new();
        for (&id, item) in order {
            if weight + item.weight <= problem.container.max_weight
                && area + item.area <= problem.container.area
            {
                weight += item.weight;
                area += item.area;
                chosen.push(id);
            }
            trace.push(chosen.iter().map(|id| problem.items[id].value).sum());
        }

        let mut out = AlgorithmOutput::solution(Packing::with_items(problem, &chosen));
        if flags.time_division {
            let mut division = TimeDivision::new();
            division.insert("sorting".into(), 0.0);
            division.insert("placement".into(), 0.0);
            out = out.with_time_division(division);
        }
        if flags.value_evolution {
            out = out.with_value_evolution(ValueEvolution::Trace(trace));
        }
        Ok(out)
    }
}

pub fn greedy() -> Arc<dyn Algorithm<Knapsack>> {
    Arc::new(Greedy)
}

/// Always reports an error.
pub struct Failing;

impl Algorithm<Knapsack> for Failing {
    fn solve(
        &self,
        _problem: &Knapsack,
        _flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Packing>, AlgorithmError> {
        Err("no feasible placement".into())
    }
}

pub fn failing() -> Arc<dyn Algorithm<Knapsack>> {
    Arc::new(Failing)
}

/// Panics on every invocation.
pub struct Panicking;

impl Algorithm<Knapsack> for Panicking {
    fn solve(
        &self,
        _problem: &Knapsack,
        _flags: MeasureFlags,
    ) -> Result<AlgorithmOutput<Packing>, AlgorithmError> {
        panic!("solver exploded")
    }
}

pub fn panicking() -> Arc<dyn Algorithm<Knapsack>> {
    Arc::new(Panicking)
}
