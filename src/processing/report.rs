// Verification report ("rapport de vérification") text extraction.
// Input is the text layer of the PDF, one printed line per text line.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{FieldName, ReportField, ReportRecord, NOT_FOUND};

lazy_static! {
    static ref SITE_CODE: Regex = Regex::new(r"(?i)Code site\s+([A-Z0-9]+)").unwrap();
    static ref TRAILING_CHECK: Regex = Regex::new(r"\s*(?:Vérification|Validation).*$").unwrap();
    static ref DATE_IN_TEXT: Regex = Regex::new(r"\d{2}[/-]\d{2}[/-]\d{4}").unwrap();
    static ref DATE_WITH_TIME: Regex =
        Regex::new(r"\d{2}[/-]\d{2}[/-]\d{4}(?:\s+\d{2}:\d{2})?").unwrap();
    static ref NON_PERCENT_CHARS: Regex = Regex::new(r"[^\d.]").unwrap();

    static ref FIELD_PATTERNS: Vec<(ReportField, Regex)> = ReportField::all()
        .iter()
        .map(|field| {
            let label = regex::escape(field.label());
            let pattern = if field.is_serial() {
                format!(r"(?i){}[\s:]*([A-Za-z0-9\-]+)(?:\s|$)", label)
            } else {
                format!(r"(?i){}[\s:]*([^\n]*)", label)
            };
            (*field, Regex::new(&pattern).unwrap())
        })
        .collect();
}

pub struct ReportExtractor;

impl ReportExtractor {
    /// Every report field gets a value; fields that cannot be located hold
    /// [`NOT_FOUND`].
    pub fn extract(text: &str) -> ReportRecord {
        let lines: Vec<&str> = text.lines().collect();
        let mut record = ReportRecord::new();

        for (field, pattern) in FIELD_PATTERNS.iter() {
            let value = Self::find_value(&lines, *field, pattern)
                .map(|raw| Self::clean_value(*field, &raw))
                .unwrap_or_else(|| NOT_FOUND.to_string());
            debug!("Report field '{}' = '{}'", field.label(), value);
            record.insert(*field, value);
        }

        record
    }

    fn find_value(lines: &[&str], field: ReportField, pattern: &Regex) -> Option<String> {
        for (i, line) in lines.iter().enumerate() {
            let stripped = line.trim();

            if Self::line_starts_with_label(stripped, field) {
                if field == ReportField::SiteCode {
                    if let Some(captures) = SITE_CODE.captures(stripped) {
                        return Some(captures[1].to_string());
                    }
                    return Self::next_valid_line(lines, i, field);
                }

                let captured = pattern
                    .captures(stripped)
                    .and_then(|captures| captures.get(1))
                    .map(|m| m.as_str().trim())
                    .filter(|value| !value.is_empty());

                return match captured {
                    Some(value) if field.is_serial() => {
                        value.split_whitespace().next().map(str::to_string)
                    }
                    Some(value) => Some(value.to_string()),
                    None => Self::next_valid_line(lines, i, field),
                };
            }

            // The site code is often printed mid-line, e.g. in a header.
            if field == ReportField::SiteCode {
                if let Some(captures) = SITE_CODE.captures(stripped) {
                    return Some(captures[1].to_string());
                }
            }
        }
        None
    }

    /// Case-insensitive prefix match that ignores lines belonging to a longer
    /// label built on this one ("Date mise en service" vs "Date mise en service BATTERIE").
    fn line_starts_with_label(line: &str, field: ReportField) -> bool {
        let line = line.to_lowercase();
        let label = field.label().to_lowercase();
        if !line.starts_with(&label) {
            return false;
        }

        !ReportField::all().iter().any(|other| {
            let other_label = other.label().to_lowercase();
            other_label.len() > label.len()
                && other_label.starts_with(&label)
                && line.starts_with(&other_label)
        })
    }

    fn next_valid_line(lines: &[&str], start: usize, field: ReportField) -> Option<String> {
        lines
            .iter()
            .skip(start + 1)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .filter(|line| !line.contains("Vérification") && !line.contains("Validation"))
            .find(|line| !field.is_date() || DATE_IN_TEXT.is_match(line))
            .map(str::to_string)
    }

    fn clean_value(field: ReportField, raw: &str) -> String {
        let value = TRAILING_CHECK.replace(raw, "").to_string();

        if field.is_date() {
            if let Some(date) = DATE_WITH_TIME.find(&value) {
                return date.as_str().to_string();
            }
            value
        } else if field.is_percentage() {
            NON_PERCENT_CHARS.replace_all(&value, "").to_string()
        } else {
            value
        }
    }
}
