//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built once per month by the series builder
//! - handed to the renderers / interactive shell
//! - exported to CSV/JSON

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reserved CSI key holding the sum over all commodity indices.
pub const TOTAL_KEY: &str = "Total";

/// Sanitized label of the aggregate "All-items" basket / CPI row.
///
/// Excluded from per-commodity CSI; its contribution is what `TOTAL_KEY` represents.
pub const ALL_ITEMS_KEY: &str = "Allitems";

/// The four source datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Covid,
    Unemployment,
    Baskets,
    Cpi,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Covid,
        DatasetKind::Unemployment,
        DatasetKind::Baskets,
        DatasetKind::Cpi,
    ];

    /// File name of the dataset inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DatasetKind::Covid => "covid-19_dataset.csv",
            DatasetKind::Unemployment => "unemployment-rate_dataset.csv",
            DatasetKind::Baskets => "weighted-baskets_dataset.csv",
            DatasetKind::Cpi => "consumer-price-index_dataset.csv",
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatasetKind::Covid => "covid",
            DatasetKind::Unemployment => "unemployment",
            DatasetKind::Baskets => "basket",
            DatasetKind::Cpi => "cpi",
        };
        f.write_str(name)
    }
}

/// A consumer basket: its overall weight plus the weights of its sub-categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Basket {
    /// Commodity label as it appears in the source file (unsanitized).
    pub name: String,
    /// Percentage weight of this basket in the overall index.
    pub weight: f64,
    pub categories: BTreeMap<String, f64>,
}

impl Basket {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
            categories: BTreeMap::new(),
        }
    }
}

/// One calendar month of joined data plus derived indices.
///
/// Invariants:
/// - `month` is always the first day of its month
/// - `csi` is empty iff the month has no basket data and was not gap-filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Month {
    #[serde(rename = "date")]
    pub month: NaiveDate,
    pub covid_cases: u64,
    pub unemployment_rate: f64,
    /// Keyed by sanitized commodity name.
    pub baskets: BTreeMap<String, Basket>,
    /// Keyed by sanitized commodity name (same keys as `baskets`).
    pub cpi: BTreeMap<String, f64>,
    /// Per-commodity spending index plus `TOTAL_KEY`.
    pub csi: BTreeMap<String, f64>,
}

impl Month {
    /// A month with a non-empty spending index (observed or estimated).
    pub fn is_complete(&self) -> bool {
        !self.csi.is_empty()
    }

    /// A month whose spending index was synthesized by the gap filler.
    pub fn is_estimated(&self) -> bool {
        self.baskets.is_empty() && self.csi.len() == 1 && self.csi.contains_key(TOTAL_KEY)
    }

    pub fn csi_total(&self) -> Option<f64> {
        self.csi.get(TOTAL_KEY).copied()
    }

    pub fn cpi_all_items(&self) -> Option<f64> {
        self.cpi.get(ALL_ITEMS_KEY).copied()
    }

    /// Plottable value for a category (`None` renders as a gap).
    pub fn value(&self, category: Category) -> Option<f64> {
        match category {
            Category::CovidCases => Some(self.covid_cases as f64),
            Category::UnemploymentRate => Some(self.unemployment_rate),
            Category::Cpi => self.cpi_all_items(),
            Category::Csi => self.csi_total(),
        }
    }
}

/// Plottable categories offered to the renderer / shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Category {
    CovidCases,
    UnemploymentRate,
    Cpi,
    Csi,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::CovidCases,
        Category::UnemploymentRate,
        Category::Cpi,
        Category::Csi,
    ];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Category::CovidCases => "Covid Cases",
            Category::UnemploymentRate => "Unemployment Rate",
            Category::Cpi => "CPI",
            Category::Csi => "CSI",
        }
    }

    /// Stable identifier (matches the serde / CLI spelling).
    pub fn key(self) -> &'static str {
        match self {
            Category::CovidCases => "covid_cases",
            Category::UnemploymentRate => "unemployment_rate",
            Category::Cpi => "cpi",
            Category::Csi => "csi",
        }
    }
}

/// Which trend estimator fills months without basket/CPI data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Least-squares line on monthly case counts.
    Linear,
    /// Mean of the observed totals (ignores case counts).
    Mean,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SeriesConfig {
    pub data_dir: PathBuf,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub fill_missing: bool,
    pub fill_strategy: FillStrategy,
    /// Seed for the held-out validation split of the linear estimator.
    pub split_seed: u64,
    pub categories: Vec<Category>,

    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}
