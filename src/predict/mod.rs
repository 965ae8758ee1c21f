//! Gap filling for months without basket/CPI data.
//!
//! A `TrendEstimator` fits a model mapping a month's case count to its total
//! spending index; `fill_missing` trains one on the complete months of a series
//! and writes its predictions into the incomplete ones. Estimators are
//! interchangeable: the series builder only sees the traits.

use serde::Serialize;

use crate::error::DataError;

pub mod fill;
pub mod linear;
pub mod mean;

pub use fill::{GapFillReport, fill_missing};
pub use linear::{LinearModel, LinearTrend};
pub use mean::{MeanModel, MeanTrend};

/// One training observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSample {
    /// Monthly case count.
    pub x: f64,
    /// Total spending index.
    pub y: f64,
}

/// Held-out diagnostics recorded while fitting.
///
/// Informational only: a poor score never prevents the model from being used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Validation {
    pub train_size: usize,
    pub test_size: usize,
    pub rmse: Option<f64>,
    pub r_squared: Option<f64>,
}

/// A fitted trend.
pub trait TrendModel {
    fn predict(&self, x: f64) -> f64;

    fn validation(&self) -> Option<&Validation> {
        None
    }

    /// Short description for logs and reports.
    fn describe(&self) -> String;
}

/// Fits a `TrendModel` from samples.
pub trait TrendEstimator {
    type Model: TrendModel;

    /// Fit on `samples`. Empty input fails with `DataError::NoTrainingData`.
    fn fit(&self, samples: &[TrendSample]) -> Result<Self::Model, DataError>;
}
