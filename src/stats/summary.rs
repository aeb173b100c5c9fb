//! Five-number reduction of a measurement sequence.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The measurement a statistics table is built over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    /// Final solution value of each trial.
    Value,
    /// Wall-clock time of each trial, in milliseconds.
    Time,
}

impl Concept {
    /// Decimal digits statistics of this concept are rounded to.
    ///
    /// Values keep 2 decimals; times are whole milliseconds.
    pub fn precision(self) -> u32 {
        match self {
            Concept::Value => 2,
            Concept::Time => 0,
        }
    }

    /// Lower-case key, used for file names.
    pub fn key(self) -> &'static str {
        match self {
            Concept::Value => "value",
            Concept::Time => "time",
        }
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concept::Value => f.write_str("Value"),
            Concept::Time => f.write_str("Time"),
        }
    }
}

/// A statistic column of a results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    Mean,
    Std,
    Min,
    Median,
    Max,
    /// Value of the manual/reference solution.
    Optimum,
}

impl Statistic {
    /// The five statistics produced by [`summarize`], in column order.
    pub const SUMMARY: [Statistic; 5] = [
        Statistic::Mean,
        Statistic::Std,
        Statistic::Min,
        Statistic::Median,
        Statistic::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Mean => "mean",
            Statistic::Std => "std",
            Statistic::Min => "min",
            Statistic::Median => "med",
            Statistic::Max => "max",
            Statistic::Optimum => "optim.",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mean, standard deviation, min, median and max of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator); 0 for one sample.
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl Summary {
    /// Returns the statistic selected by `stat`.
    ///
    /// [`Statistic::Optimum`] is not part of a summary and yields `None`.
    pub fn get(&self, stat: Statistic) -> Option<f64> {
        match stat {
            Statistic::Mean => Some(self.mean),
            Statistic::Std => Some(self.std),
            Statistic::Min => Some(self.min),
            Statistic::Median => Some(self.median),
            Statistic::Max => Some(self.max),
            Statistic::Optimum => None,
        }
    }

    /// The five statistics in [`Statistic::SUMMARY`] order.
    pub fn to_array(&self) -> [f64; 5] {
        [self.mean, self.std, self.min, self.median, self.max]
    }
}

/// Reduces `measurements` to a [`Summary`] rounded to `precision` decimals.
///
/// Conventions:
/// - the standard deviation is the sample one; a single measurement has
///   a standard deviation of exactly 0,
/// - the median of an even-length sample is the mean of the two central
///   values,
/// - rounding is half away from zero.
///
/// Measurements are expected to be finite; callers exclude failed trials
/// before summarizing.
///
/// # Errors
///
/// Returns [`Error::EmptyMeasurements`] when `measurements` is empty.
///
/// # Examples
///
/// ```
/// use u_experiment::stats::summarize;
///
/// let s = summarize(&[1.0, 2.0, 3.0, 10.0], 2).unwrap();
/// assert_eq!(s.mean, 4.0);
/// assert_eq!(s.median, 2.5);
/// assert_eq!(s.min, 1.0);
/// assert_eq!(s.max, 10.0);
/// ```
pub fn summarize(measurements: &[f64], precision: u32) -> Result<Summary> {
    let s = describe(measurements).map_err(|_| Error::EmptyMeasurements {
        context: format!("{precision}-decimal summary"),
    })?;
    Ok(Summary {
        mean: round_to(s.mean, precision),
        std: round_to(s.std, precision),
        min: round_to(s.min, precision),
        median: round_to(s.median, precision),
        max: round_to(s.max, precision),
    })
}

/// Unrounded [`Summary`] of `measurements`, same conventions as
/// [`summarize`].
///
/// Use this when the statistics feed further arithmetic, so rounding is
/// applied once to the final figure.
///
/// # Errors
///
/// Returns [`Error::EmptyMeasurements`] when `measurements` is empty.
pub fn describe(measurements: &[f64]) -> Result<Summary> {
    if measurements.is_empty() {
        return Err(Error::EmptyMeasurements {
            context: "unrounded summary".to_string(),
        });
    }

    let mut sorted = measurements.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let min = sorted[0];
    let max = sorted[n - 1];
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let mean = (sorted.iter().sum::<f64>() / n as f64).clamp(min, max);
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|x| (x - mean) * (x - mean)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        0.0
    };

    Ok(Summary {
        mean,
        std,
        min,
        median,
        max,
    })
}

/// Rounds `x` to `digits` decimal digits, half away from zero.
pub fn round_to(x: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (x * factor).round() / factor
}
