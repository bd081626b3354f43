use log::debug;

use crate::models::{ComparisonResult, Counterpart};
use crate::validation::normalize::{normalize_serial, parse_date};

/// Serial equality after normalization. Raw values are kept for display.
pub fn compare_serials(counterpart: Counterpart, report_raw: &str, other_raw: &str) -> ComparisonResult {
    let is_match = normalize_serial(report_raw) == normalize_serial(other_raw);
    debug!(
        "Serial check {:?}: '{}' vs '{}' -> {}",
        counterpart, report_raw, other_raw, is_match
    );
    ComparisonResult::compared(counterpart, report_raw, other_raw, is_match, Vec::new())
}

/// Calendar-date equality. Any side that fails to parse records its error and
/// forces a mismatch.
pub fn compare_dates(counterpart: Counterpart, report_raw: &str, other_raw: &str) -> ComparisonResult {
    let report_date = parse_date(report_raw);
    let other_date = parse_date(other_raw);

    let (is_match, errors) = match (report_date, other_date) {
        (Ok(left), Ok(right)) => (left == right, Vec::new()),
        (left, right) => {
            let errors: Vec<String> = [left.err(), right.err()].into_iter().flatten().collect();
            (false, errors)
        }
    };
    debug!(
        "Date check {:?}: '{}' vs '{}' -> {} ({} errors)",
        counterpart,
        report_raw,
        other_raw,
        is_match,
        errors.len()
    );
    ComparisonResult::compared(counterpart, report_raw, other_raw, is_match, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serials_ignore_case_and_punctuation() {
        let result = compare_serials(Counterpart::Image, "ABC123", "abc-123");
        assert!(result.is_match);
        assert_eq!(result.report_value.as_deref(), Some("ABC123"));
        assert_eq!(result.counterpart_value.as_deref(), Some("abc-123"));
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_sentinel_serial_does_not_match_populated_value() {
        let result = compare_serials(Counterpart::Aed, "Non trouvé", "123456");
        assert!(!result.is_match);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_dates_compare_as_calendar_days() {
        let result = compare_dates(Counterpart::Aed, "01/02/2023 10:00", "2023-02-01");
        assert!(result.is_match);
        assert!(result.errors.is_empty());

        let result = compare_dates(Counterpart::Aed, "01/02/2023", "2023-02-02");
        assert!(!result.is_match);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_each_unparseable_side_records_an_error() {
        let result = compare_dates(Counterpart::Image, "Non trouvé", "garbage");
        assert!(!result.is_match);
        assert_eq!(result.errors.len(), 2);

        let result = compare_dates(Counterpart::Image, "2023-02-01", "bad");
        assert!(!result.is_match);
        assert_eq!(result.errors, vec!["Unrecognized format: ".to_string()]);
    }

    #[test]
    fn test_truncated_year_is_an_error_not_a_match() {
        let result = compare_dates(Counterpart::Image, "01/02/23", "01/02/0023");
        assert!(!result.is_match);
        assert_eq!(result.errors, vec!["Unrecognized format: 01-02-23".to_string()]);
    }
}
