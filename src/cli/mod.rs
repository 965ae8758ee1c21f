//! Command-line parsing for the consumer spending index tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the extraction/index code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};

use crate::domain::calendar::parse_month_arg;
use crate::domain::{Category, FillStrategy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "csi", version, about = "Consumer Spending Index trends (COVID-19 vs spending)")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the month series, print a summary table, and optionally export it.
    Series(SeriesArgs),
    /// Render the selected categories as an ASCII chart.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same series pipeline as `csi series`, but keeps the
    /// datasets loaded and lets you change range and categories live.
    Tui(SeriesArgs),
}

/// Common options for building a series.
#[derive(Debug, Parser, Clone)]
pub struct SeriesArgs {
    /// First month of the range (YYYY-MM or YYYY-MM-DD).
    #[arg(long, value_parser = parse_month_arg, default_value = "2020-03")]
    pub start: NaiveDate,

    /// Last month of the range, inclusive (YYYY-MM or YYYY-MM-DD).
    #[arg(long, value_parser = parse_month_arg, default_value = "2021-10")]
    pub end: NaiveDate,

    /// Estimate CSI totals for months without basket/CPI data.
    #[arg(long)]
    pub fill: bool,

    /// Disable gap filling (the TUI fills by default).
    #[arg(long, conflicts_with = "fill")]
    pub no_fill: bool,

    /// Trend estimator used by --fill.
    #[arg(long, value_enum, default_value_t = FillStrategy::Linear)]
    pub fill_strategy: FillStrategy,

    /// Seed for the held-out validation split.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Category to show (repeatable; naming one twice deselects it).
    #[arg(short = 'c', long = "category", value_enum)]
    pub category: Vec<Category>,

    /// Directory holding the four dataset CSVs (else CSI_DATA_DIR, else ".").
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the series to CSV (one row per month).
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the full series (baskets, CPI, CSI maps) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

/// Options for plotting.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    #[command(flatten)]
    pub series: SeriesArgs,

    /// Plot a series JSON produced by `csi series --export-json` instead of the datasets.
    #[arg(long, value_name = "JSON")]
    pub input: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_defaults() {
        let cli = Cli::parse_from(["csi", "series"]);
        let Command::Series(args) = cli.command else {
            panic!("expected series");
        };
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2021, 10, 1).unwrap());
        assert!(!args.fill);
        assert_eq!(args.fill_strategy, FillStrategy::Linear);
        assert!(args.category.is_empty());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn repeated_categories_and_verbosity() {
        let cli = Cli::parse_from([
            "csi", "-vv", "plot", "--start", "2020-05-17", "-c", "csi", "--category", "covid_cases",
            "--fill", "--fill-strategy", "mean",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.series.start, NaiveDate::from_ymd_opt(2020, 5, 1).unwrap());
        assert_eq!(args.series.category, vec![Category::Csi, Category::CovidCases]);
        assert!(args.series.fill);
        assert_eq!(args.series.fill_strategy, FillStrategy::Mean);
        assert!(args.input.is_none());
    }

    #[test]
    fn category_values_use_serde_names() {
        for category in Category::ALL {
            let cli = Cli::parse_from(["csi", "series", "-c", category.key()]);
            let Command::Series(args) = cli.command else {
                panic!("expected series");
            };
            assert_eq!(args.category, vec![category]);
        }
        assert!(Cli::try_parse_from(["csi", "series", "-c", "unemployment-rate"]).is_err());
    }

    #[test]
    fn rejects_malformed_month() {
        assert!(Cli::try_parse_from(["csi", "series", "--start", "March"]).is_err());
        assert!(Cli::try_parse_from(["csi", "series", "--fill", "--no-fill"]).is_err());
    }
}
