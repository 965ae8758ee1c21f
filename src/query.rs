//! Queries served to the renderers and the interactive shell.
//!
//! - `filter_range`: copy of the months inside a date range
//! - `CategorySet`: the selected plottable categories, with toggle semantics
//! - `normalize`: each selected category rescaled onto the shared 0–10 display scale

use chrono::NaiveDate;

use crate::domain::{Category, Month};
use crate::math::min_max_scale;
use crate::series::MonthRange;

/// Shared display scale for normalized series.
pub const DISPLAY_MIN: f64 = 0.0;
pub const DISPLAY_MAX: f64 = 10.0;

/// Copy of the months of `months` that fall in `[start, end]`.
pub fn filter_range(months: &[Month], start: NaiveDate, end: NaiveDate) -> Vec<Month> {
    let range = MonthRange::new(start, end);
    months
        .iter()
        .filter(|m| range.contains(m.month))
        .cloned()
        .collect()
}

/// Ordered selection of categories.
///
/// Selecting a category that is already selected removes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySet {
    selected: Vec<Category>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a sequence of selections in order (toggle semantics).
    pub fn from_selections(selections: &[Category]) -> Self {
        let mut set = Self::new();
        for &c in selections {
            set.toggle(c);
        }
        set
    }

    /// Add `category`, or remove it if already selected. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, category: Category) -> bool {
        if let Some(pos) = self.selected.iter().position(|&c| c == category) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(category);
            true
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.selected.contains(&category)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected categories, in selection order.
    pub fn categories(&self) -> &[Category] {
        &self.selected
    }
}

/// One category's values, rescaled for display. `None` marks a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSeries {
    pub category: Category,
    pub points: Vec<(NaiveDate, Option<f64>)>,
}

/// Normalize each selected category of `months` onto `[DISPLAY_MIN, DISPLAY_MAX]`.
///
/// The output order follows the selection order.
pub fn normalize(months: &[Month], categories: &CategorySet) -> Vec<NormalizedSeries> {
    categories
        .categories()
        .iter()
        .map(|&category| {
            let raw: Vec<Option<f64>> = months.iter().map(|m| m.value(category)).collect();
            let scaled = min_max_scale(&raw, DISPLAY_MIN, DISPLAY_MAX);
            NormalizedSeries {
                category,
                points: months.iter().map(|m| m.month).zip(scaled).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::TOTAL_KEY;

    fn ym(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn months() -> Vec<Month> {
        (1..=4)
            .map(|m| Month {
                month: ym(2021, m),
                covid_cases: u64::from(m) * 10,
                unemployment_rate: 8.0,
                baskets: BTreeMap::new(),
                cpi: BTreeMap::new(),
                csi: if m == 2 {
                    BTreeMap::new()
                } else {
                    BTreeMap::from([(TOTAL_KEY.to_string(), f64::from(m))])
                },
            })
            .collect()
    }

    #[test]
    fn toggling_twice_cancels_out() {
        let mut set = CategorySet::new();
        assert!(set.toggle(Category::Csi));
        assert!(set.toggle(Category::CovidCases));
        assert!(!set.toggle(Category::Csi));
        assert_eq!(set.categories(), &[Category::CovidCases]);

        let set = CategorySet::from_selections(&[Category::Cpi, Category::Cpi, Category::Csi]);
        assert_eq!(set.categories(), &[Category::Csi]);
    }

    #[test]
    fn filter_returns_an_inclusive_copy() {
        let all = months();
        let sub = filter_range(&all, ym(2021, 2), ym(2021, 3));
        assert_eq!(sub.len(), 2);
        assert_eq!(sub[0], all[1]);
        assert!(filter_range(&all, ym(2022, 1), ym(2022, 5)).is_empty());
    }

    #[test]
    fn normalizes_each_category_independently() {
        let set = CategorySet::from_selections(&[Category::Csi, Category::CovidCases, Category::UnemploymentRate]);
        let out = normalize(&months(), &set);
        assert_eq!(out.len(), 3);

        assert_eq!(out[0].category, Category::Csi);
        let csi: Vec<Option<f64>> = out[0].points.iter().map(|p| p.1).collect();
        assert_eq!(csi[0], Some(0.0));
        assert_eq!(csi[1], None);
        assert!((csi[2].unwrap() - 20.0 / 3.0).abs() < 1e-12);
        assert_eq!(csi[3], Some(10.0));

        let cases: Vec<Option<f64>> = out[1].points.iter().map(|p| p.1).collect();
        assert_eq!(cases[0], Some(0.0));
        assert_eq!(cases[3], Some(10.0));

        assert!(out[2].points.iter().all(|p| p.1 == Some(0.0)));
    }
}
