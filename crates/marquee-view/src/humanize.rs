#![forbid(unsafe_code)]

//! Display formatting for dates and runtimes.

use chrono::{DateTime, NaiveDate, Utc};

/// `125` → `"2h 5m"`, `55` → `"55m"`.
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    if hours == 0 {
        format!("{rest}m")
    } else {
        format!("{hours}h {rest}m")
    }
}

/// Card year, e.g. `"1955"`.
pub fn format_release_year(date: NaiveDate) -> String {
    date.format("%Y").to_string()
}

/// Popup release date, e.g. `"30 March 1945"`.
pub fn format_release_detailed(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Comment timestamp, e.g. `"2021/12/01 13:32"`. Absolute on purpose, so
/// templates stay pure functions of their data.
pub fn format_comment_date(date: DateTime<Utc>) -> String {
    date.format("%Y/%m/%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn runtime_formats() {
        assert_eq!(format_runtime(55), "55m");
        assert_eq!(format_runtime(60), "1h 0m");
        assert_eq!(format_runtime(115), "1h 55m");
    }

    #[test]
    fn release_dates() {
        let date = NaiveDate::from_ymd_opt(1945, 3, 30).unwrap();
        assert_eq!(format_release_year(date), "1945");
        assert_eq!(format_release_detailed(date), "30 March 1945");
    }

    #[test]
    fn comment_timestamp_is_absolute() {
        let date = Utc.with_ymd_and_hms(2021, 12, 1, 13, 32, 0).unwrap();
        assert_eq!(format_comment_date(date), "2021/12/01 13:32");
    }
}
