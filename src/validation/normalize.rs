use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref NON_DATE_CHARS: Regex = Regex::new(r"[^\d:/ -]").unwrap();
    static ref FIRST_NUMBER: Regex = Regex::new(r"\d+").unwrap();
    // chrono's %Y takes any digit count; years must be written in full.
    static ref YEAR_FIRST: Regex = Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}(?:$|\s)").unwrap();
    static ref YEAR_LAST: Regex = Regex::new(r"^\d{1,2}-\d{1,2}-\d{4}(?:$|\s)").unwrap();
}

#[derive(Clone, Copy)]
enum YearAt {
    First,
    Last,
}

// Day-month-year comes before month-day-year: "01-02-2023" is 1 February.
const NUMERIC_FORMATS: &[(&str, bool, YearAt)] = &[
    ("%d-%m-%Y %H:%M", true, YearAt::Last),
    ("%d-%m-%Y %H:%M:%S", true, YearAt::Last),
    ("%d-%m-%Y", false, YearAt::Last),
    ("%Y-%m-%d %H:%M", true, YearAt::First),
    ("%Y-%m-%d %H:%M:%S", true, YearAt::First),
    ("%Y-%m-%d", false, YearAt::First),
    ("%m-%d-%Y", false, YearAt::Last),
];

const MONTH_NAME_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y"];

/// Parse a date as written on a report, a device screen or a label.
///
/// Everything but digits, `:`, `/`, `-` and spaces is dropped, slashes become
/// hyphens and only the part before the first space is read. Time of day is
/// discarded. The error names the cleaned string.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let cleaned = NON_DATE_CHARS.replace_all(raw, "");
    let cleaned = cleaned.trim().replace('/', "-");
    let date_part = cleaned.split(' ').next().unwrap_or("");

    for (format, has_time, year_at) in NUMERIC_FORMATS {
        let shape = match year_at {
            YearAt::First => &*YEAR_FIRST,
            YearAt::Last => &*YEAR_LAST,
        };
        if !shape.is_match(date_part) {
            continue;
        }
        let parsed = if *has_time {
            NaiveDateTime::parse_from_str(date_part, format)
                .map(|datetime| datetime.date())
                .ok()
        } else {
            NaiveDate::parse_from_str(date_part, format).ok()
        };
        if let Some(date) = parsed {
            return Ok(date);
        }
    }

    if let Some(date) = parse_compact_date(date_part) {
        return Ok(date);
    }

    // Letters are gone from the cleaned string, so month names are read off the raw input.
    let trimmed = raw.trim();
    for format in MONTH_NAME_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    Err(format!("Unrecognized format: {}", cleaned))
}

// YYYYMMDD
fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let year = value[0..4].parse::<i32>().ok()?;
    let month = value[4..6].parse::<u32>().ok()?;
    let day = value[6..8].parse::<u32>().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Uppercase, then keep only `A-Z` and `0-9`. Comparison key only, never displayed.
pub fn normalize_serial(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Whole-value percentage as written on the verification report ("85" or "85.5").
pub fn parse_percentage(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// First run of digits in free text, e.g. "Capacité: 87 %" -> 87.
pub fn first_number(raw: &str) -> Option<f64> {
    FIRST_NUMBER
        .find(raw)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}
