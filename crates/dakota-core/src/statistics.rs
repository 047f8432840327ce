//! Reductions applied to a model output series

use crate::error::DakotaError;
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// Summary statistic that reduces a series to one response value.
///
/// Names follow numpy (`mean`, `median`, `amin`, ...). Any NaN in the
/// series, or an empty series, yields NaN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Median,
    Min,
    Max,
    /// Population standard deviation
    Std,
    /// Population variance
    Var,
    Sum,
    /// Peak to peak (max - min)
    Ptp,
}

impl FromStr for Statistic {
    type Err = DakotaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mean" => Ok(Statistic::Mean),
            "median" => Ok(Statistic::Median),
            "min" | "amin" => Ok(Statistic::Min),
            "max" | "amax" => Ok(Statistic::Max),
            "std" => Ok(Statistic::Std),
            "var" => Ok(Statistic::Var),
            "sum" => Ok(Statistic::Sum),
            "ptp" => Ok(Statistic::Ptp),
            other => Err(DakotaError::UnknownStatistic(other.to_string())),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Statistic::Mean => "mean",
            Statistic::Median => "median",
            Statistic::Min => "min",
            Statistic::Max => "max",
            Statistic::Std => "std",
            Statistic::Var => "var",
            Statistic::Sum => "sum",
            Statistic::Ptp => "ptp",
        };
        f.write_str(name)
    }
}

impl Statistic {
    pub fn compute(&self, values: &[f64]) -> f64 {
        if values.is_empty() || values.iter().any(|v| v.is_nan()) {
            return f64::NAN;
        }

        let n = values.len() as f64;
        let sum: f64 = values.iter().sum();
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = || {
            let mean = sum / n;
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
        };

        match self {
            Statistic::Mean => sum / n,
            Statistic::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Statistic::Min => min,
            Statistic::Max => max,
            Statistic::Std => variance().sqrt(),
            Statistic::Var => variance(),
            Statistic::Sum => sum,
            Statistic::Ptp => max - min,
        }
    }
}

/// Parse `name` and reduce `values` with it.
pub fn compute_statistic(name: &str, values: &[f64]) -> Result<f64> {
    Ok(name.parse::<Statistic>()?.compute(values))
}
