//! Monthly COVID-19 case counts.
//!
//! Rows are keyed by region and month; the national aggregate has region
//! code `1`. A month can span several rows (e.g. weekly reports), so the
//! national rows for the month are summed. Individual rows may be negative
//! (corrections to earlier reports); only the monthly total must not be.

use chrono::NaiveDate;

use crate::domain::DatasetKind;
use crate::error::DataError;
use crate::extract::row_refs;
use crate::io::RawRow;

/// Region code of the national aggregate.
pub const NATIONAL_REGION_CODE: i64 = 1;

const COL_REGION: usize = 0;
const COL_DATE: usize = 3;
const COL_CASES: usize = 15;

/// Total national case count for `month` (0 when no row matches).
pub fn read_covid_data(rows: &[RawRow], month: NaiveDate) -> Result<u64, DataError> {
    let mut total = 0i64;
    for row in row_refs(DatasetKind::Covid, rows) {
        if row.i64(COL_REGION)? != NATIONAL_REGION_CODE {
            continue;
        }
        if row.month(COL_DATE)? != month {
            continue;
        }
        total = total.saturating_add(row.i64(COL_CASES)?);
    }
    u64::try_from(total).map_err(|_| DataError::NegativeCaseTotal { month, total })
}
