//! Free-text air-date parsing and the canonical epoch representation.
//!
//! The air-date file carries lines like
//! `"A Walk in the Woods" (January 11, 1983)`; the title sits in the first
//! pair of double quotes and the date in a parenthesized "Month Day, Year"
//! fragment. Air dates are canonically stored as epoch seconds (UTC midnight
//! of the broadcast date); 0 means "not yet known".

use chrono::{DateTime, NaiveTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::error::IngestError;

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(([A-Za-z]+)\s+(\d+),\s+(\d{4})\)").expect("date regex"))
}

fn title_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("title regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AirDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl AirDate {
    /// Epoch seconds at UTC midnight. Rejects impossible calendar dates
    /// (e.g. February 30) that the lexical regex let through.
    pub fn epoch_seconds(&self) -> Result<i64, IngestError> {
        chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .ok_or_else(|| {
                IngestError::Parse(format!(
                    "impossible calendar date {}-{}-{}",
                    self.year, self.month, self.day
                ))
            })
            .map(|d| d.and_time(NaiveTime::MIN).and_utc().timestamp())
    }
}

/// Map a full English month name to 1-12, case-insensitively.
pub fn month_number(name: &str) -> Option<u32> {
    let n = match name.to_ascii_lowercase().as_str() {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}

/// Extract the parenthesized broadcast date from a free-text line.
pub fn parse_air_date(line: &str) -> Option<AirDate> {
    let caps = date_re().captures(line)?;
    let month = month_number(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = caps[3].parse().ok()?;
    Some(AirDate { year, month, day })
}

/// Episode title = content of the first pair of double quotes.
pub fn extract_title(line: &str) -> Option<String> {
    title_re()
        .captures(line)
        .map(|caps| caps[1].trim().to_string())
}

/// Human-readable form for API output, e.g. `January 11, 1983`.
/// The 0 placeholder (and anything non-representable) renders as None.
pub fn format_air_date(epoch: i64) -> Option<String> {
    if epoch <= 0 {
        return None;
    }
    DateTime::<Utc>::from_timestamp(epoch, 0).map(|dt| dt.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_title_and_date_from_line() {
        let line = r#"S01E01 "A Walk in the Woods" (January 11, 1983) first episode"#;
        assert_eq!(extract_title(line).as_deref(), Some("A Walk in the Woods"));
        assert_eq!(
            parse_air_date(line),
            Some(AirDate {
                year: 1983,
                month: 1,
                day: 11
            })
        );
    }

    #[test]
    fn date_match_ignores_trailing_text_inside_year() {
        let line = r#""Mount McKinley" (February 8, 1983)  note: snow"#;
        let d = parse_air_date(line).unwrap();
        assert_eq!((d.year, d.month, d.day), (1983, 2, 8));
    }

    #[test]
    fn missing_title_or_date_yields_none() {
        assert_eq!(extract_title("no quotes here (May 1, 1990)"), None);
        assert_eq!(parse_air_date(r#""Quoted" but no date"#), None);
        assert_eq!(parse_air_date(r#""Bad month" (Smarch 1, 1990)"#), None);
    }

    #[test]
    fn month_names_map_case_insensitively() {
        assert_eq!(month_number("January"), Some(1));
        assert_eq!(month_number("december"), Some(12));
        assert_eq!(month_number("MAY"), Some(5));
        assert_eq!(month_number("Jan"), None);
    }

    #[test]
    fn epoch_round_trips_through_display_format() {
        let epoch = AirDate {
            year: 1983,
            month: 1,
            day: 11,
        }
        .epoch_seconds()
        .unwrap();
        assert_eq!(epoch, 411_091_200);
        assert_eq!(format_air_date(epoch).as_deref(), Some("January 11, 1983"));
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        let d = AirDate {
            year: 1983,
            month: 2,
            day: 30,
        };
        assert!(d.epoch_seconds().is_err());
    }

    #[test]
    fn placeholder_epoch_has_no_display_date() {
        assert_eq!(format_air_date(0), None);
        assert_eq!(format_air_date(-5), None);
    }
}
