//! Flat trend: every gap gets the mean observed total.

use crate::error::DataError;
use crate::predict::{TrendEstimator, TrendModel, TrendSample};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MeanTrend;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanModel {
    pub mean: f64,
}

impl TrendModel for MeanModel {
    fn predict(&self, _x: f64) -> f64 {
        self.mean
    }

    fn describe(&self) -> String {
        format!("mean: csi = {:.4}", self.mean)
    }
}

impl TrendEstimator for MeanTrend {
    type Model = MeanModel;

    fn fit(&self, samples: &[TrendSample]) -> Result<MeanModel, DataError> {
        if samples.is_empty() {
            return Err(DataError::NoTrainingData);
        }
        let mean = samples.iter().map(|s| s.y).sum::<f64>() / samples.len() as f64;
        Ok(MeanModel { mean })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_the_mean_everywhere() {
        let model = MeanTrend
            .fit(&[TrendSample { x: 1.0, y: 2.0 }, TrendSample { x: 9.0, y: 4.0 }])
            .unwrap();
        assert_eq!(model.predict(0.0), 3.0);
        assert_eq!(model.predict(1e6), 3.0);
        assert!(model.validation().is_none());
    }
}
