//! Least-squares line on case counts.
//!
//! Cases and totals are centered on their training means and the slope is
//! solved on the centered column; the intercept then puts the line through the
//! means. When every training month has the same case count the slope is 0 and
//! every prediction is the training mean. Before fitting, samples are shuffled
//! with a fixed seed and split 75/25; the model is fitted on the training part
//! and scored on the held-out part.

use nalgebra::{DMatrix, DVector};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::DataError;
use crate::math::{r_squared, rmse, solve_least_squares};
use crate::predict::{TrendEstimator, TrendModel, TrendSample, Validation};

/// Default share of samples held out for validation.
pub const DEFAULT_TEST_FRACTION: f64 = 0.25;

/// Linear trend estimator with a seeded train/test split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTrend {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for LinearTrend {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: 0,
        }
    }
}

impl LinearTrend {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    pub slope: f64,
    pub intercept: f64,
    pub validation: Option<Validation>,
}

impl TrendModel for LinearModel {
    fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    fn validation(&self) -> Option<&Validation> {
        self.validation.as_ref()
    }

    fn describe(&self) -> String {
        format!("linear: csi = {:.6e} * cases + {:.4}", self.slope, self.intercept)
    }
}

impl TrendEstimator for LinearTrend {
    type Model = LinearModel;

    fn fit(&self, samples: &[TrendSample]) -> Result<LinearModel, DataError> {
        if samples.is_empty() {
            return Err(DataError::NoTrainingData);
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(DataError::TrendFit(format!(
                "test fraction {} outside [0, 1)",
                self.test_fraction
            )));
        }

        let (train_idx, test_idx) = split_indices(samples.len(), self.test_fraction, self.seed);
        let train: Vec<TrendSample> = train_idx.iter().map(|&i| samples[i]).collect();
        let (slope, intercept) = fit_line(&train)?;

        let mut model = LinearModel {
            slope,
            intercept,
            validation: None,
        };

        let observed: Vec<f64> = test_idx.iter().map(|&i| samples[i].y).collect();
        let predicted: Vec<f64> = test_idx.iter().map(|&i| model.predict(samples[i].x)).collect();
        model.validation = Some(Validation {
            train_size: train.len(),
            test_size: test_idx.len(),
            rmse: rmse(&observed, &predicted),
            r_squared: r_squared(&observed, &predicted),
        });

        debug!(slope, intercept, train = train.len(), test = test_idx.len(), "fitted linear trend");
        Ok(model)
    }
}

/// Shuffle `0..n` with `seed` and split off `ceil(n * test_fraction)` test indices.
///
/// When the split would leave nothing to train on, every index is used for
/// training and the test set is empty.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut idx: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    idx.shuffle(&mut rng);

    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return (idx, Vec::new());
    }

    let train = idx.split_off(n_test);
    (train, idx)
}

fn fit_line(samples: &[TrendSample]) -> Result<(f64, f64), DataError> {
    let n = samples.len() as f64;
    let x_mean = samples.iter().map(|s| s.x).sum::<f64>() / n;
    let y_mean = samples.iter().map(|s| s.y).sum::<f64>() / n;

    let x = DMatrix::from_iterator(samples.len(), 1, samples.iter().map(|s| s.x - x_mean));
    let y = DVector::from_iterator(samples.len(), samples.iter().map(|s| s.y - y_mean));

    if x.iter().all(|v| *v == 0.0) {
        return Ok((0.0, y_mean));
    }

    // Near-constant columns fall below the solver tolerance and also give slope 0.
    let beta = solve_least_squares(&x, &y)
        .ok_or_else(|| DataError::TrendFit("least squares system is ill-conditioned".to_string()))?;
    let slope = beta[0];
    Ok((slope, y_mean - slope * x_mean))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(xs: &[f64], slope: f64, intercept: f64) -> Vec<TrendSample> {
        xs.iter()
            .map(|&x| TrendSample {
                x,
                y: slope * x + intercept,
            })
            .collect()
    }

    #[test]
    fn recovers_an_exact_line() {
        let samples = line(&[100.0, 2_000.0, 15_000.0, 40_000.0, 90_000.0, 120_000.0, 5.0, 700.0], 1e-4, 85.0);
        let model = LinearTrend::default().fit(&samples).unwrap();
        assert!((model.slope - 1e-4).abs() < 1e-9, "slope {}", model.slope);
        assert!((model.intercept - 85.0).abs() < 1e-6, "intercept {}", model.intercept);

        let v = model.validation().unwrap();
        assert_eq!((v.train_size, v.test_size), (6, 2));
        assert!(v.rmse.unwrap() < 1e-6);
    }

    #[test]
    fn split_is_seeded_and_disjoint() {
        let (train_a, test_a) = split_indices(20, 0.25, 0);
        let (train_b, test_b) = split_indices(20, 0.25, 0);
        assert_eq!((train_a.clone(), test_a.clone()), (train_b, test_b));
        assert_eq!(test_a.len(), 5);
        assert_eq!(train_a.len(), 15);

        let mut all: Vec<usize> = train_a.into_iter().chain(test_a).collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn single_sample_trains_on_everything() {
        let (train, test) = split_indices(1, 0.25, 0);
        assert_eq!(train, vec![0]);
        assert!(test.is_empty());

        let model = LinearTrend::default()
            .fit(&[TrendSample { x: 500.0, y: 90.0 }])
            .unwrap();
        assert_eq!(model.slope, 0.0);
        assert!((model.predict(500.0) - 90.0).abs() < 1e-9);
        assert!((model.predict(0.0) - 90.0).abs() < 1e-9);
        assert!((model.predict(50_000.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn identical_case_counts_predict_their_mean() {
        let samples = [
            TrendSample { x: 10.0, y: 1.0 },
            TrendSample { x: 10.0, y: 3.0 },
            TrendSample { x: 10.0, y: 2.0 },
            TrendSample { x: 10.0, y: 2.0 },
        ];
        let model = LinearTrend {
            test_fraction: 0.0,
            seed: 0,
        }
        .fit(&samples)
        .unwrap();
        assert_eq!(model.slope, 0.0);
        assert!((model.predict(10.0) - 2.0).abs() < 1e-9);
        assert!((model.predict(0.0) - 2.0).abs() < 1e-9);
        assert!((model.predict(5_000.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn line_passes_through_training_means() {
        let samples = [
            TrendSample { x: 1_000.0, y: 100.0 },
            TrendSample { x: 3_000.0, y: 104.0 },
            TrendSample { x: 2_000.0, y: 101.0 },
        ];
        let model = LinearTrend {
            test_fraction: 0.0,
            seed: 0,
        }
        .fit(&samples)
        .unwrap();
        assert!((model.slope - 0.002).abs() < 1e-12, "slope {}", model.slope);
        assert!((model.predict(2_000.0) - 305.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_input_has_no_training_data() {
        assert!(matches!(
            LinearTrend::default().fit(&[]),
            Err(DataError::NoTrainingData)
        ));
    }

    #[test]
    fn invalid_test_fraction() {
        let t = LinearTrend {
            test_fraction: 1.0,
            seed: 0,
        };
        assert!(matches!(
            t.fit(&[TrendSample { x: 1.0, y: 1.0 }]),
            Err(DataError::TrendFit(_))
        ));
    }
}
