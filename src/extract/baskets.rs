//! Monthly basket weights.
//!
//! The basket file lists, per month, each top-level basket followed by its
//! sub-categories, with no explicit parent column. Top-level rows are
//! recognized by their coordinate: the file's coordinates for the top-level
//! baskets follow a known sequence (`BasketMarkers`), and a row starts a new
//! basket when its coordinate equals the next expected marker.
//!
//! Extraction runs in two passes:
//! 1. `tag_basket_rows` assigns each row of the month a `BasketRole`
//!    (this is the only place the marker sequence and row order matter)
//! 2. `group_baskets` folds tagged rows into `Basket`s
//!
//! A different boundary rule only has to produce tagged rows.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{Basket, DatasetKind};
use crate::error::DataError;
use crate::extract::{row_refs, sanitize_name};
use crate::io::RawRow;

const COL_DATE: usize = 0;
const COL_LABEL: usize = 3;
const COL_COORDINATE: usize = 9;
const COL_WEIGHT: usize = 10;

/// Coordinates of the top-level baskets, in file order.
pub const DEFAULT_BASKET_MARKERS: [f64; 8] = [1.1, 1.2, 1.21, 1.35, 1.67, 1.83, 1.92, 1.117];

/// Ordered coordinates identifying top-level basket rows.
#[derive(Debug, Clone, PartialEq)]
pub struct BasketMarkers(Vec<f64>);

impl BasketMarkers {
    pub fn new(markers: Vec<f64>) -> Self {
        Self(markers)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl Default for BasketMarkers {
    fn default() -> Self {
        Self(DEFAULT_BASKET_MARKERS.to_vec())
    }
}

/// Whether a row starts a basket or belongs to the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketRole {
    TopLevel,
    Category,
}

/// A basket row of the target month with its role resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedBasketRow<'a> {
    pub role: BasketRole,
    pub label: &'a str,
    pub weight: f64,
}

/// Tag the rows of `month`, in file order.
pub fn tag_basket_rows<'a>(
    rows: &'a [RawRow],
    month: NaiveDate,
    markers: &BasketMarkers,
) -> Result<Vec<TaggedBasketRow<'a>>, DataError> {
    let expected = markers.as_slice();
    let mut next = 0usize;
    let mut tagged = Vec::new();

    for row in row_refs(DatasetKind::Baskets, rows) {
        if row.month(COL_DATE)? != month {
            continue;
        }

        let is_marker = next < expected.len() && row.f64(COL_COORDINATE)? == expected[next];
        let role = if is_marker {
            next += 1;
            BasketRole::TopLevel
        } else {
            BasketRole::Category
        };

        tagged.push(TaggedBasketRow {
            role,
            label: row.get(COL_LABEL)?,
            weight: row.f64(COL_WEIGHT)?,
        });
    }

    Ok(tagged)
}

/// Fold tagged rows into baskets keyed by sanitized commodity name.
pub fn group_baskets(
    tagged: &[TaggedBasketRow<'_>],
    month: NaiveDate,
) -> Result<BTreeMap<String, Basket>, DataError> {
    let mut baskets: BTreeMap<String, Basket> = BTreeMap::new();
    let mut current: Option<String> = None;

    for row in tagged {
        match row.role {
            BasketRole::TopLevel => {
                let key = sanitize_name(row.label);
                baskets.insert(key.clone(), Basket::new(row.label, row.weight));
                current = Some(key);
            }
            BasketRole::Category => {
                let basket = current
                    .as_ref()
                    .and_then(|key| baskets.get_mut(key))
                    .ok_or_else(|| DataError::OrphanCategory {
                        label: row.label.to_string(),
                        month,
                    })?;
                basket.categories.insert(row.label.to_string(), row.weight);
            }
        }
    }

    Ok(baskets)
}

/// Basket weights for `month` (empty when the month is absent).
pub fn read_baskets_data(
    rows: &[RawRow],
    month: NaiveDate,
    markers: &BasketMarkers,
) -> Result<BTreeMap<String, Basket>, DataError> {
    let tagged = tag_basket_rows(rows, month, markers)?;
    group_baskets(&tagged, month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::row;

    fn basket_row(date: &str, label: &str, coordinate: &str, weight: &str) -> RawRow {
        row(&[date, "Canada", "2016A000011124", label, "Percent", "239", "units", "0", "v1", coordinate, weight])
    }

    fn ym(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn month_rows(date: &str) -> Vec<RawRow> {
        vec![
            basket_row(date, "All-items", "1.1", "100"),
            basket_row(date, "Food 5", "1.2", "16.48"),
            basket_row(date, "Food purchased from stores", "1.3", "11.27"),
            basket_row(date, "Food purchased from restaurants", "1.20", "5.21"),
            basket_row(date, "Shelter 6", "1.21", "29.55"),
            basket_row(date, "Rented accommodation", "1.22", "7.14"),
        ]
    }

    #[test]
    fn groups_categories_under_their_basket() {
        let mut rows = month_rows("2020-01");
        rows.extend(month_rows("2021-01"));
        let baskets = read_baskets_data(&rows, ym(2021, 1), &BasketMarkers::default()).unwrap();

        assert_eq!(baskets.len(), 3);
        assert_eq!(baskets["Allitems"].weight, 100.0);
        assert!(baskets["Allitems"].categories.is_empty());

        let food = &baskets["Food "];
        assert_eq!(food.name, "Food 5");
        assert_eq!(food.weight, 16.48);
        assert_eq!(food.categories.len(), 2);
        assert_eq!(food.categories["Food purchased from restaurants"], 5.21);

        assert_eq!(baskets["Shelter "].categories["Rented accommodation"], 7.14);
    }

    #[test]
    fn markers_are_matched_in_sequence() {
        // "1.21" only starts a basket once "1.1" and "1.2" have been seen.
        let rows = vec![
            basket_row("2020-01", "All-items", "1.1", "100"),
            basket_row("2020-01", "Early", "1.21", "3"),
            basket_row("2020-01", "Food", "1.2", "16"),
        ];
        let tagged = tag_basket_rows(&rows, ym(2020, 1), &BasketMarkers::default()).unwrap();
        let roles: Vec<BasketRole> = tagged.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![BasketRole::TopLevel, BasketRole::Category, BasketRole::TopLevel]
        );
    }

    #[test]
    fn missing_month_is_empty() {
        let rows = month_rows("2020-01");
        let baskets = read_baskets_data(&rows, ym(2020, 2), &BasketMarkers::default()).unwrap();
        assert!(baskets.is_empty());
    }

    #[test]
    fn category_without_basket_is_an_error() {
        let rows = vec![basket_row("2020-01", "Stray", "1.5", "1")];
        let err = read_baskets_data(&rows, ym(2020, 1), &BasketMarkers::default()).unwrap_err();
        assert!(matches!(err, DataError::OrphanCategory { .. }));
    }

    #[test]
    fn custom_markers() {
        let rows = vec![
            basket_row("2020-01", "A", "2.1", "60"),
            basket_row("2020-01", "A1", "2.2", "60"),
            basket_row("2020-01", "B", "2.3", "40"),
        ];
        let markers = BasketMarkers::new(vec![2.1, 2.3]);
        let baskets = read_baskets_data(&rows, ym(2020, 1), &markers).unwrap();
        assert_eq!(baskets.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(baskets["A"].categories["A1"], 60.0);
    }
}
