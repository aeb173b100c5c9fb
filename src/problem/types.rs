//! Read contract for problem instances and their solutions.
//!
//! The experiment engine never builds, mutates or solves problems itself.
//! It reads item and container attributes for statistics, reads a
//! solution's value and placements, and asks a solution to render itself.

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Identifier of an item within its problem.
pub type ItemId = usize;

/// An item that may be placed in the container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Value gained when the item is placed.
    pub value: f64,
    /// Weight counted against the container's capacity.
    pub weight: f64,
    /// Area of the item's shape.
    pub area: f64,
}

impl Item {
    pub fn new(value: f64, weight: f64, area: f64) -> Self {
        Self {
            value,
            weight,
            area,
        }
    }
}

/// The container items are packed into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Maximum total weight of placed items.
    pub max_weight: f64,
    /// Area of the container's shape.
    pub area: f64,
}

impl Container {
    pub fn new(max_weight: f64, area: f64) -> Self {
        Self { max_weight, area }
    }
}

/// Where and how an item was placed.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
}

/// Parameters of a single render call.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Display the rendering immediately.
    pub show: bool,
    /// Write the rendering to this file.
    pub save_path: Option<&'a Path>,
    /// Title override.
    pub title: Option<&'a str>,
    /// Annotate items with their value and weight.
    pub show_item_value_and_weight: bool,
}

/// A problem instance shared read-only by every trial.
///
/// # Thread Safety
///
/// `Problem` must be `Send + Sync`: the batch scheduler hands the same
/// instance to every worker of the pool.
pub trait Problem: Send + Sync {
    /// The solution type algorithms produce for this problem.
    type Solution: Solution;

    /// All items of the instance, keyed by id.
    fn items(&self) -> &BTreeMap<ItemId, Item>;

    /// The container.
    fn container(&self) -> &Container;
}

/// A solution produced by an algorithm (or by hand).
pub trait Solution: Clone + Send + Sync {
    /// Total value of the placed items.
    fn value(&self) -> f64;

    /// Items placed in the container, keyed by item id.
    fn placed_items(&self) -> &BTreeMap<ItemId, Placement>;

    /// Shows and/or saves a rendering of the solution.
    ///
    /// The default implementation renders nothing.
    fn visualize(&self, request: &RenderRequest<'_>) -> Result<(), RenderError> {
        let _ = request;
        Ok(())
    }
}
