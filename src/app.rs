//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - loads the four datasets
//! - builds (and optionally gap-fills) the month series
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, PlotArgs, SeriesArgs};
use crate::domain::{Category, Month, SeriesConfig};
use crate::error::AppError;
use crate::io::DatasetPaths;
use crate::logging::LogTarget;
use crate::query::{CategorySet, filter_range, normalize};

pub mod pipeline;

/// Entry point for the `csi` binary.
pub fn run() -> Result<(), AppError> {
    // `csi` and `csi --start 2020-06` behave like `csi tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    crate::logging::init_tracing(cli.verbose, log_target(&cli.command));

    match cli.command {
        Command::Series(args) => handle_series(args),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => handle_tui(args),
    }
}

/// The TUI draws on the alternate screen; log lines written there corrupt it.
fn log_target(command: &Command) -> LogTarget {
    match command {
        Command::Tui(_) => LogTarget::Discard,
        Command::Series(_) | Command::Plot(_) => LogTarget::Stderr,
    }
}

fn handle_series(args: SeriesArgs) -> Result<(), AppError> {
    let config = series_config_from_args(&args, false);
    let run = pipeline::run(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.months, run.fill.as_ref(), &config)
    );
    println!("{}", crate::report::format_series_table(&run.months));

    write_exports(&config, &run.months)
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let config = series_config_from_args(&args.series, false);

    let months = match &args.input {
        Some(path) => {
            let all = crate::io::read_series_json(path)?;
            filter_range(&all, config.start, config.end)
        }
        None => pipeline::run(&config)?.months,
    };

    let categories = CategorySet::from_selections(&config.categories);
    if categories.is_empty() {
        return Err(AppError::new(2, "No categories selected to plot."));
    }
    let series = normalize(&months, &categories);
    let plot = crate::plot::render_ascii_plot(&series, config.plot_width, config.plot_height);
    println!("{plot}");

    write_exports(&config, &months)
}

fn handle_tui(args: SeriesArgs) -> Result<(), AppError> {
    let config = series_config_from_args(&args, true);
    crate::tui::run(config)
}

fn write_exports(config: &SeriesConfig, months: &[Month]) -> Result<(), AppError> {
    if let Some(path) = &config.export_csv {
        crate::io::write_series_csv(path, months)?;
    }
    if let Some(path) = &config.export_json {
        crate::io::write_series_json(path, months)?;
    }
    Ok(())
}

/// Map CLI flags onto a `SeriesConfig`.
///
/// `fill_by_default` is the gap-fill setting when neither `--fill` nor
/// `--no-fill` is given. With no `--category`, every category is selected.
pub fn series_config_from_args(args: &SeriesArgs, fill_by_default: bool) -> SeriesConfig {
    let fill_missing = if args.fill {
        true
    } else if args.no_fill {
        false
    } else {
        fill_by_default
    };

    let categories = if args.category.is_empty() {
        Category::ALL.to_vec()
    } else {
        args.category.clone()
    };

    SeriesConfig {
        data_dir: DatasetPaths::resolve(args.data_dir.as_deref()).dir,
        start: args.start,
        end: args.end,
        fill_missing,
        fill_strategy: args.fill_strategy,
        split_seed: args.seed,
        categories,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

/// Rewrite argv so `csi` defaults to `csi tui`.
///
/// Rules:
/// - `csi`                       -> `csi tui`
/// - `csi --start 2020-06 ...`   -> `csi tui --start 2020-06 ...`
/// - `csi --help/--version/-h`   -> unchanged (show top-level help/version)
/// - `csi -v ...`                -> unchanged when a subcommand follows
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = |s: &str| matches!(s, "series" | "plot" | "tui");
    if argv.iter().skip(1).any(|a| is_subcommand(a)) {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}
