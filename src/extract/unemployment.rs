//! Monthly unemployment rate.
//!
//! The dataset is one row per month, fully populated and in chronological
//! order from January 1960, so a month's row is found by its offset from that
//! anchor rather than by scanning dates.

use chrono::NaiveDate;

use crate::domain::DatasetKind;
use crate::domain::calendar::months_between;
use crate::error::DataError;
use crate::extract::RowRef;
use crate::io::RawRow;

/// First month covered by the unemployment dataset.
pub const UNEMPLOYMENT_ANCHOR: NaiveDate = match NaiveDate::from_ymd_opt(1960, 1, 1) {
    Some(d) => d,
    None => panic!("invalid anchor month"),
};

const COL_RATE: usize = 1;

/// Unemployment rate for `month`.
///
/// Months outside the dataset are a caller error and fail with
/// `DataError::UnemploymentOutOfRange`.
pub fn read_unemployment_data(rows: &[RawRow], month: NaiveDate) -> Result<f64, DataError> {
    let offset = months_between(UNEMPLOYMENT_ANCHOR, month);
    let fields = usize::try_from(offset)
        .ok()
        .and_then(|idx| rows.get(idx).map(|r| (idx, r)));
    let Some((idx, fields)) = fields else {
        return Err(DataError::UnemploymentOutOfRange {
            month,
            offset,
            rows: rows.len(),
        });
    };
    RowRef::new(DatasetKind::Unemployment, idx, fields).f64(COL_RATE)
}
