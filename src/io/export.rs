//! Export a month series to CSV or JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets: one row per month
//! with the four plottable values. The JSON carries the full records
//! (baskets, CPI and CSI maps included).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::Month;
use crate::error::AppError;

/// Write one CSV row per month.
pub fn write_series_csv(path: &Path, months: &[Month]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_csv_to(BufWriter::new(file), months)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn write_series_csv_to<W: Write>(mut out: W, months: &[Month]) -> std::io::Result<()> {
    writeln!(out, "date,covid_cases,unemployment_rate,cpi_all_items,csi_total,estimated")?;
    for m in months {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            m.month,
            m.covid_cases,
            m.unemployment_rate,
            fmt_opt(m.cpi_all_items()),
            fmt_opt(m.csi_total()),
            m.is_estimated(),
        )?;
    }
    out.flush()
}

/// Write the full series as pretty JSON.
pub fn write_series_json(path: &Path, months: &[Month]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    write_series_json_to(BufWriter::new(file), months)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON '{}': {e}", path.display())))
}

fn write_series_json_to<W: Write>(mut out: W, months: &[Month]) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut out, months)?;
    out.flush()
}

/// Read a series previously written by `write_series_json`.
pub fn read_series_json(path: &Path) -> Result<Vec<Month>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}
