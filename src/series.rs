//! Month series builder.
//!
//! For each calendar month in an inclusive range, joins the four datasets into
//! a `Month` and derives its spending index. Gap filling, when requested, runs
//! once over the finished series.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::domain::Month;
use crate::domain::calendar::{first_of_month, month_range};
use crate::error::DataError;
use crate::extract::{
    BasketMarkers, read_baskets_data, read_covid_data, read_cpi_data, read_unemployment_data,
};
use crate::index::compute_csi;
use crate::io::Datasets;
use crate::predict::{GapFillReport, TrendEstimator, fill_missing};

/// Inclusive month range; both ends are normalized to the first of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: first_of_month(start),
            end: first_of_month(end),
        }
    }

    pub fn months(&self) -> Vec<NaiveDate> {
        month_range(self.start, self.end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let d = first_of_month(date);
        self.start <= d && d <= self.end
    }
}

/// A built series plus the gap-fill report, if filling ran.
#[derive(Debug, Clone)]
pub struct SeriesOutput {
    pub months: Vec<Month>,
    pub fill: Option<GapFillReport>,
}

/// Join and derive one month.
pub fn build_month(
    datasets: &Datasets,
    month: NaiveDate,
    markers: &BasketMarkers,
) -> Result<Month, DataError> {
    let month = first_of_month(month);
    let covid_cases = read_covid_data(&datasets.covid, month)?;
    let unemployment_rate = read_unemployment_data(&datasets.unemployment, month)?;
    let baskets = read_baskets_data(&datasets.baskets, month, markers)?;
    let cpi = read_cpi_data(&datasets.cpi, month)?;
    let csi = compute_csi(&baskets, &cpi, month)?;

    debug!(%month, covid_cases, baskets = baskets.len(), cpi = cpi.len(), "built month");
    Ok(Month {
        month,
        covid_cases,
        unemployment_rate,
        baskets,
        cpi,
        csi,
    })
}

/// Build the ascending month series for `range` without gap filling.
///
/// A reversed range yields an empty series.
pub fn load_months(
    datasets: &Datasets,
    range: MonthRange,
    markers: &BasketMarkers,
) -> Result<Vec<Month>, DataError> {
    range
        .months()
        .into_iter()
        .map(|m| build_month(datasets, m, markers))
        .collect()
}

/// Build the series for `range`, filling incomplete months with `estimator`
/// when `fill_missing_months` is set.
pub fn build_series<E: TrendEstimator>(
    datasets: &Datasets,
    range: MonthRange,
    fill_missing_months: bool,
    estimator: &E,
) -> Result<SeriesOutput, DataError> {
    let markers = BasketMarkers::default();
    let mut months = load_months(datasets, range, &markers)?;

    let complete = months.iter().filter(|m| m.is_complete()).count();
    info!(
        start = %range.start,
        end = %range.end,
        months = months.len(),
        complete,
        incomplete = months.len() - complete,
        "built month series"
    );

    let fill = if fill_missing_months && !months.is_empty() {
        Some(fill_missing(&mut months, estimator)?)
    } else {
        None
    };

    Ok(SeriesOutput { months, fill })
}
