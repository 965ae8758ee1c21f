//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the extraction/index code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{Month, SeriesConfig};
use crate::predict::GapFillReport;

/// Run header: range, month counts, and gap-fill diagnostics.
pub fn format_run_summary(months: &[Month], fill: Option<&GapFillReport>, config: &SeriesConfig) -> String {
    let mut out = String::new();

    out.push_str("=== csi - Consumer Spending Index ===\n");
    out.push_str(&format!(
        "Range: {} .. {}\n",
        config.start.format("%Y-%m"),
        config.end.format("%Y-%m")
    ));
    out.push_str(&format!("Data: {}\n", config.data_dir.display()));

    let observed = months.iter().filter(|m| m.is_complete() && !m.is_estimated()).count();
    let estimated = months.iter().filter(|m| m.is_estimated()).count();
    let missing = months.iter().filter(|m| !m.is_complete()).count();
    out.push_str(&format!(
        "Months: n={} | observed={observed} | estimated={estimated} | missing={missing}\n",
        months.len()
    ));

    match fill {
        Some(report) => {
            out.push_str(&format!(
                "Gap fill: {} (trained on {} months)\n",
                report.model, report.trained_on
            ));
            if let Some(v) = &report.validation {
                out.push_str(&format!(
                    "Validation: train={} test={} rmse={} r2={}\n",
                    v.train_size,
                    v.test_size,
                    fmt_opt(v.rmse, 4),
                    fmt_opt(v.r_squared, 3),
                ));
            }
        }
        None if config.fill_missing => out.push_str("Gap fill: nothing to fill\n"),
        None => out.push_str("Gap fill: off\n"),
    }

    out
}

/// One line per month with the four plottable values.
pub fn format_series_table(months: &[Month]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<8} {:>12} {:>8} {:>10} {:>10}\n",
        "month", "covid_cases", "unemp%", "cpi", "csi"
    ));
    for m in months {
        let csi = match m.csi_total() {
            Some(v) if m.is_estimated() => format!("{v:.2}*"),
            Some(v) => format!("{v:.2}"),
            None => "-".to_string(),
        };
        out.push_str(&format!(
            "{:<8} {:>12} {:>8.1} {:>10} {:>10}\n",
            m.month.format("%Y-%m"),
            m.covid_cases,
            m.unemployment_rate,
            fmt_opt(m.cpi_all_items(), 1),
            csi,
        ));
    }
    if months.iter().any(Month::is_estimated) {
        out.push_str("* estimated by gap fill\n");
    }
    out
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::{ALL_ITEMS_KEY, TOTAL_KEY};

    #[test]
    fn table_marks_estimated_months() {
        let months = vec![
            Month {
                month: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                covid_cases: 1200,
                unemployment_rate: 7.85,
                baskets: BTreeMap::new(),
                cpi: BTreeMap::from([(ALL_ITEMS_KEY.to_string(), 136.6)]),
                csi: BTreeMap::new(),
            },
            Month {
                month: NaiveDate::from_ymd_opt(2020, 4, 1).unwrap(),
                covid_cases: 30000,
                unemployment_rate: 13.0,
                baskets: BTreeMap::new(),
                cpi: BTreeMap::new(),
                csi: BTreeMap::from([(TOTAL_KEY.to_string(), 101.234)]),
            },
        ];
        let table = format_series_table(&months);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("2020-03"));
        assert!(lines[1].contains("136.6"));
        assert!(lines[1].trim_end().ends_with('-'));
        assert!(lines[2].trim_end().ends_with("101.23*"));
        assert_eq!(lines[3], "* estimated by gap fill");
    }
}
