//! Monthly extraction from raw dataset rows.
//!
//! Each extractor pulls one field of a `Month` out of its dataset for a target
//! month. Column positions are fixed per dataset (see the `COL_*` constants in
//! each submodule). A month that is absent from a dataset is not an error: the
//! extractor returns zero or an empty mapping. Malformed fields are.

use chrono::NaiveDate;

use crate::domain::DatasetKind;
use crate::domain::calendar::parse_year_month;
use crate::error::DataError;
use crate::io::RawRow;

pub mod baskets;
pub mod covid;
pub mod cpi;
pub mod names;
pub mod unemployment;

pub use baskets::{BasketMarkers, BasketRole, read_baskets_data, tag_basket_rows};
pub use covid::read_covid_data;
pub use cpi::read_cpi_data;
pub use names::sanitize_name;
pub use unemployment::{UNEMPLOYMENT_ANCHOR, read_unemployment_data};

/// Borrowed view of one row, carrying enough context for error messages.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RowRef<'a> {
    dataset: DatasetKind,
    /// 1-based data row number (header excluded).
    row: usize,
    fields: &'a [String],
}

impl<'a> RowRef<'a> {
    pub(crate) fn new(dataset: DatasetKind, index: usize, fields: &'a RawRow) -> Self {
        Self {
            dataset,
            row: index + 1,
            fields,
        }
    }

    pub(crate) fn get(&self, column: usize) -> Result<&'a str, DataError> {
        self.fields
            .get(column)
            .map(String::as_str)
            .ok_or(DataError::MissingColumn {
                dataset: self.dataset,
                row: self.row,
                column,
            })
    }

    pub(crate) fn month(&self, column: usize) -> Result<NaiveDate, DataError> {
        let raw = self.get(column)?;
        parse_year_month(raw).ok_or_else(|| self.invalid(column, raw, "expected YYYY-MM"))
    }

    pub(crate) fn f64(&self, column: usize) -> Result<f64, DataError> {
        let raw = self.get(column)?;
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            Ok(_) => Err(self.invalid(column, raw, "not finite")),
            Err(e) => Err(self.invalid(column, raw, &e.to_string())),
        }
    }

    pub(crate) fn i64(&self, column: usize) -> Result<i64, DataError> {
        let raw = self.get(column)?;
        raw.trim()
            .parse::<i64>()
            .map_err(|e| self.invalid(column, raw, &e.to_string()))
    }

    fn invalid(&self, column: usize, value: &str, reason: &str) -> DataError {
        DataError::Parse {
            dataset: self.dataset,
            row: self.row,
            column,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Iterate `rows` as `RowRef`s.
pub(crate) fn row_refs(
    dataset: DatasetKind,
    rows: &[RawRow],
) -> impl Iterator<Item = RowRef<'_>> {
    rows.iter()
        .enumerate()
        .map(move |(idx, fields)| RowRef::new(dataset, idx, fields))
}

#[cfg(test)]
pub(crate) fn row(fields: &[&str]) -> RawRow {
    fields.iter().map(|s| s.to_string()).collect()
}
