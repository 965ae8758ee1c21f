//! Fill incomplete months with a trend fitted on complete ones.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::{Month, TOTAL_KEY};
use crate::error::DataError;
use crate::predict::{TrendEstimator, TrendModel, TrendSample, Validation};

/// What a gap-fill pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct GapFillReport {
    /// Number of complete months offered to the estimator.
    pub trained_on: usize,
    /// Months that received an estimated total, ascending.
    pub filled: Vec<NaiveDate>,
    pub validation: Option<Validation>,
    pub model: String,
}

/// Replace every empty `csi` in `months` with `{"Total": prediction}`.
///
/// Months that already have a spending index are left untouched. Fails with
/// `DataError::NoTrainingData` when no month has one.
pub fn fill_missing<E: TrendEstimator>(
    months: &mut [Month],
    estimator: &E,
) -> Result<GapFillReport, DataError> {
    let samples: Vec<TrendSample> = months
        .iter()
        .filter_map(|m| {
            m.csi_total().map(|y| TrendSample {
                x: m.covid_cases as f64,
                y,
            })
        })
        .collect();

    let model = estimator.fit(&samples)?;

    let mut filled = Vec::new();
    for month in months.iter_mut().filter(|m| m.csi.is_empty()) {
        let value = model.predict(month.covid_cases as f64);
        if !value.is_finite() {
            return Err(DataError::NonFinitePrediction { month: month.month });
        }
        month.csi.insert(TOTAL_KEY.to_string(), value);
        filled.push(month.month);
    }

    let validation = model.validation().cloned();
    if let Some(v) = &validation {
        if v.test_size == 0 {
            warn!(train = v.train_size, "too few complete months for a held-out score");
        }
    }
    info!(
        trained_on = samples.len(),
        filled = filled.len(),
        model = %model.describe(),
        rmse = ?validation.as_ref().and_then(|v| v.rmse),
        r_squared = ?validation.as_ref().and_then(|v| v.r_squared),
        "filled missing months"
    );

    Ok(GapFillReport {
        trained_on: samples.len(),
        filled,
        validation,
        model: model.describe(),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::predict::{LinearTrend, MeanTrend};

    fn month(m: u32, cases: u64, total: Option<f64>) -> Month {
        let mut csi = BTreeMap::new();
        if let Some(t) = total {
            csi.insert("Food".to_string(), t);
            csi.insert(TOTAL_KEY.to_string(), t);
        }
        Month {
            month: NaiveDate::from_ymd_opt(2020, m, 1).unwrap(),
            covid_cases: cases,
            unemployment_rate: 8.0,
            baskets: BTreeMap::new(),
            cpi: BTreeMap::new(),
            csi,
        }
    }

    #[test]
    fn fills_only_empty_months() {
        let mut months = vec![
            month(1, 0, Some(80.0)),
            month(2, 100, Some(81.0)),
            month(3, 200, None),
            month(4, 300, Some(83.0)),
            month(5, 400, Some(84.0)),
            month(6, 500, None),
        ];
        let before = months.clone();

        let report = fill_missing(&mut months, &LinearTrend::default()).unwrap();
        assert_eq!(report.trained_on, 4);
        assert_eq!(report.filled, vec![before[2].month, before[5].month]);

        for (old, new) in before.iter().zip(&months) {
            if old.csi.is_empty() {
                assert_eq!(new.csi.len(), 1);
                assert!(new.csi_total().unwrap().is_finite());
            } else {
                assert_eq!(old, new);
            }
        }
        // Training data lies on csi = 80 + 0.01 * cases.
        assert!((months[2].csi_total().unwrap() - 82.0).abs() < 1e-6);
        assert!((months[5].csi_total().unwrap() - 85.0).abs() < 1e-6);
        assert!(months[2].is_estimated());
    }

    #[test]
    fn flat_history_fills_with_its_level() {
        let mut months = vec![
            month(1, 1_000, Some(100.0)),
            month(2, 0, None),
            month(3, 3_000, Some(100.0)),
            month(4, 50_000, None),
        ];
        fill_missing(&mut months, &LinearTrend::default()).unwrap();
        assert!((months[1].csi_total().unwrap() - 100.0).abs() < 1e-9);
        assert!((months[3].csi_total().unwrap() - 100.0).abs() < 1e-9);

        let mut months = vec![
            month(1, 500, Some(100.0)),
            month(2, 500, Some(100.0)),
            month(3, 500, Some(100.0)),
            month(4, 500, Some(100.0)),
            month(5, 0, None),
            month(6, 5_000, None),
        ];
        fill_missing(&mut months, &LinearTrend::default()).unwrap();
        assert!((months[4].csi_total().unwrap() - 100.0).abs() < 1e-9);
        assert!((months[5].csi_total().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn nothing_to_fill_is_fine() {
        let mut months = vec![month(1, 10, Some(80.0)), month(2, 20, Some(81.0))];
        let before = months.clone();
        let report = fill_missing(&mut months, &LinearTrend::default()).unwrap();
        assert!(report.filled.is_empty());
        assert_eq!(months, before);
    }

    #[test]
    fn no_complete_months_is_an_error() {
        let mut months = vec![month(1, 10, None), month(2, 20, None)];
        let err = fill_missing(&mut months, &LinearTrend::default()).unwrap_err();
        assert!(matches!(err, DataError::NoTrainingData));
        assert!(months.iter().all(|m| m.csi.is_empty()));
    }

    #[test]
    fn estimators_are_interchangeable() {
        let mut months = vec![month(1, 10, Some(80.0)), month(2, 20, Some(90.0)), month(3, 1_000, None)];
        let report = fill_missing(&mut months, &MeanTrend).unwrap();
        assert_eq!(months[2].csi_total(), Some(85.0));
        assert!(report.model.starts_with("mean"));
    }

    #[test]
    fn seeded_fill_is_deterministic() {
        let base: Vec<Month> = (1..=12)
            .map(|m| {
                let cases = u64::from(m) * 137 % 1_000;
                let total = if m % 4 == 0 { None } else { Some(70.0 + cases as f64 * 0.003 + f64::from(m % 3)) };
                month(m, cases, total)
            })
            .collect();
        let mut a = base.clone();
        let mut b = base;
        fill_missing(&mut a, &LinearTrend::default()).unwrap();
        fill_missing(&mut b, &LinearTrend::default()).unwrap();
        assert_eq!(a, b);
    }
}
