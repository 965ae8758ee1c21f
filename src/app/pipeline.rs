//! Shared "series pipeline" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load datasets -> extract per month -> CSI -> gap fill
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{FillStrategy, SeriesConfig};
use crate::error::{AppError, DataError};
use crate::io::{DatasetPaths, Datasets};
use crate::predict::{LinearTrend, MeanTrend};
use crate::series::{MonthRange, SeriesOutput, build_series};

/// Resolve the data directory, check the files exist, and read them.
pub fn load_datasets(config: &SeriesConfig) -> Result<Datasets, AppError> {
    let paths = DatasetPaths::new(&config.data_dir);
    paths.ensure_exist()?;
    Ok(Datasets::load(&paths)?)
}

/// Build the configured series from already loaded datasets.
///
/// This is what the TUI calls on every range/fill change; the datasets stay loaded.
pub fn run_series(config: &SeriesConfig, datasets: &Datasets) -> Result<SeriesOutput, DataError> {
    let range = MonthRange::new(config.start, config.end);
    match config.fill_strategy {
        FillStrategy::Linear => build_series(
            datasets,
            range,
            config.fill_missing,
            &LinearTrend::with_seed(config.split_seed),
        ),
        FillStrategy::Mean => build_series(datasets, range, config.fill_missing, &MeanTrend),
    }
}

/// Load datasets and build the series in one go.
pub fn run(config: &SeriesConfig) -> Result<SeriesOutput, AppError> {
    let datasets = load_datasets(config)?;
    Ok(run_series(config, &datasets)?)
}
