//! Month arithmetic on `NaiveDate`s pinned to the first day of the month.

use chrono::{Datelike, Months, NaiveDate};

/// Normalize a date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month, so `with_day(1)` cannot fail.
    date.with_day(1).unwrap_or(date)
}

/// Build the first day of `year`-`month`, if the month is valid.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whole months from `from` to `to` (negative when `to` is earlier).
///
/// Days are ignored: both dates are treated as their month.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

/// First day of the month `n` months after `date`'s month.
pub fn add_months(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    first_of_month(date).checked_add_months(Months::new(n))
}

/// First day of the month `delta` months away from `date`'s month (either direction).
pub fn shift_months(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let n = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        first_of_month(date).checked_add_months(n)
    } else {
        first_of_month(date).checked_sub_months(n)
    }
}

/// Inclusive list of month starts from `start` to `end`.
///
/// Empty when `start` is after `end`.
pub fn month_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let span = months_between(start, end);
    if span < 0 {
        return Vec::new();
    }
    (0..=span as u32)
        .filter_map(|i| add_months(start, i))
        .collect()
}

/// Parse the year and month out of a `YYYY-MM[-...]` field.
///
/// Anything after the month component (a day, a time) is ignored.
pub fn parse_year_month(field: &str) -> Option<NaiveDate> {
    let mut parts = field.trim().split('-');
    let year = parts.next()?.trim().parse::<i32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    month_start(year, month)
}

/// Parse a CLI month argument: `YYYY-MM` or `YYYY-MM-DD` (day is dropped).
pub fn parse_month_arg(s: &str) -> Result<NaiveDate, String> {
    if let Ok(d) = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        return Ok(first_of_month(d));
    }
    parse_year_month(s)
        .filter(|_| s.trim().split('-').count() == 2)
        .ok_or_else(|| format!("Invalid month '{s}'. Expected YYYY-MM or YYYY-MM-DD."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(y: i32, m: u32) -> NaiveDate {
        month_start(y, m).unwrap()
    }

    #[test]
    fn shift_months_crosses_years() {
        assert_eq!(shift_months(ym(2020, 1), -1), Some(ym(2019, 12)));
        assert_eq!(shift_months(ym(2020, 1), 12), Some(ym(2021, 1)));
        assert_eq!(shift_months(NaiveDate::from_ymd_opt(2020, 3, 31).unwrap(), -1), Some(ym(2020, 2)));
    }

    #[test]
    fn range_is_inclusive_and_ascending() {
        let r = month_range(ym(2020, 3), ym(2020, 5));
        assert_eq!(r, vec![ym(2020, 3), ym(2020, 4), ym(2020, 5)]);
    }

    #[test]
    fn range_crosses_year_boundaries() {
        let r = month_range(ym(2020, 11), ym(2021, 2));
        assert_eq!(r.len(), 4);
        assert_eq!(r[2], ym(2021, 1));
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(month_range(ym(2021, 1), ym(2020, 1)).is_empty());
    }

    #[test]
    fn months_between_ignores_days() {
        let a = NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(1961, 2, 17).unwrap();
        assert_eq!(months_between(a, b), 13);
        assert_eq!(months_between(b, a), -13);
    }

    #[test]
    fn year_month_fields_accept_suffixes() {
        assert_eq!(parse_year_month("2020-03"), Some(ym(2020, 3)));
        assert_eq!(parse_year_month("2020-03-15"), Some(ym(2020, 3)));
        assert_eq!(parse_year_month("2020-3"), Some(ym(2020, 3)));
        assert_eq!(parse_year_month("2020-13"), None);
        assert_eq!(parse_year_month("March 2020"), None);
    }

    #[test]
    fn month_args() {
        assert_eq!(parse_month_arg("2021-10"), Ok(ym(2021, 10)));
        assert_eq!(parse_month_arg("2021-10-20"), Ok(ym(2021, 10)));
        assert!(parse_month_arg("2021").is_err());
        assert!(parse_month_arg("2021-10-20-1").is_err());
    }
}
