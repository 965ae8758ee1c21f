//! Consumer spending index (CSI).
//!
//! `csi[c] = basket_weight[c] / 100 * cpi[c]` for every commodity except the
//! aggregate "All-items" basket, plus `csi["Total"]` = the sum over commodities.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{ALL_ITEMS_KEY, Basket, TOTAL_KEY};
use crate::error::DataError;

/// Compute the spending index for one month.
///
/// An empty basket mapping yields an empty index (no `"Total"`). A basket with
/// no CPI entry is a misaligned join and fails with `DataError::MissingCpi`.
pub fn compute_csi(
    baskets: &BTreeMap<String, Basket>,
    cpi: &BTreeMap<String, f64>,
    month: NaiveDate,
) -> Result<BTreeMap<String, f64>, DataError> {
    let mut csi = BTreeMap::new();
    if baskets.is_empty() {
        return Ok(csi);
    }

    for (commodity, basket) in baskets {
        if commodity == ALL_ITEMS_KEY {
            continue;
        }
        let price = cpi.get(commodity).ok_or_else(|| DataError::MissingCpi {
            commodity: commodity.clone(),
            month,
        })?;
        csi.insert(commodity.clone(), (basket.weight / 100.0) * price);
    }

    let total: f64 = csi.values().sum();
    csi.insert(TOTAL_KEY.to_string(), total);
    Ok(csi)
}
