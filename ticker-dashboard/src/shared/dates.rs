//! Display formatting for payload dates
//!
//! Payload dates are ISO strings. The UI shows them as `dd MMM yyyy` with
//! Spanish month abbreviations (e.g., `05 ene 2024`).

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Parse an ISO date or date-time string into its calendar date
pub fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Format as `dd MMM yyyy`. Unparseable input is shown verbatim.
pub fn format_display_date(raw: &str) -> String {
    match parse_iso_date(raw) {
        Some(date) => format!(
            "{:02} {} {:04}",
            date.day(),
            MONTHS_ES[date.month0() as usize],
            date.year()
        ),
        None => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_plain_date() {
        assert_eq!(format_display_date("2024-01-05"), "05 ene 2024");
        assert_eq!(format_display_date("2023-12-31"), "31 dic 2023");
        assert_eq!(format_display_date("2024-08-15"), "15 ago 2024");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_display_date("2024-03-10T14:30:00Z"), "10 mar 2024");
        assert_eq!(format_display_date("2024-03-10T14:30:00"), "10 mar 2024");
        assert_eq!(format_display_date("2024-03-10T14:30:00.250"), "10 mar 2024");
    }

    #[test]
    fn test_unparseable_date_is_kept() {
        assert_eq!(format_display_date("yesterday"), "yesterday");
        assert_eq!(format_display_date(""), "");
    }
}
