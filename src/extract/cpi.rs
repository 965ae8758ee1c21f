//! Monthly consumer price index per commodity.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::DatasetKind;
use crate::error::DataError;
use crate::extract::{row_refs, sanitize_name};
use crate::io::RawRow;

/// Geography label of the national rows.
pub const NATIONAL_GEO: &str = "Canada";

const COL_DATE: usize = 0;
const COL_GEO: usize = 1;
const COL_COMMODITY: usize = 3;
const COL_VALUE: usize = 10;

/// National CPI for `month`, keyed by sanitized commodity name.
///
/// Returns an empty mapping when the month is absent.
pub fn read_cpi_data(rows: &[RawRow], month: NaiveDate) -> Result<BTreeMap<String, f64>, DataError> {
    let mut cpi = BTreeMap::new();
    for row in row_refs(DatasetKind::Cpi, rows) {
        if row.month(COL_DATE)? != month || row.get(COL_GEO)? != NATIONAL_GEO {
            continue;
        }
        let key = sanitize_name(row.get(COL_COMMODITY)?);
        cpi.insert(key, row.f64(COL_VALUE)?);
    }
    Ok(cpi)
}
