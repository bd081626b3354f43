// AED device report text extraction, one layout per device generation.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{AedField, AedReport, DeviceGeneration, FieldName, FieldRecord, GenerationRule};

lazy_static! {
    static ref G5_PATTERNS: Vec<(AedField, Regex)> =
        GenerationRule::for_generation(DeviceGeneration::G5)
            .fields
            .iter()
            .map(|field| {
                let pattern = format!(r"{}[\s:]*([^\n]*)", regex::escape(field.label()));
                (*field, Regex::new(&pattern).unwrap())
            })
            .collect();
}

pub struct AedExtractor;

impl AedExtractor {
    pub fn extract(text: &str, generation: DeviceGeneration) -> AedReport {
        let fields = match generation {
            DeviceGeneration::G5 => Self::extract_g5(text),
            DeviceGeneration::G3 => Self::extract_g3(text),
        };
        debug!("AED {} report: {} fields found", generation, fields.len());
        AedReport::new(generation, fields)
    }

    /// G5 reports print "label: value" on one line. Labels that never appear
    /// are left out of the record.
    pub fn extract_g5(text: &str) -> FieldRecord<AedField> {
        let mut record = FieldRecord::new();
        for (field, pattern) in G5_PATTERNS.iter() {
            if let Some(captures) = pattern.captures(text) {
                record.insert(*field, captures[1].trim());
            }
        }
        record
    }

    /// G3 reports print the value on the line after its label. The last
    /// occurrence of a label wins.
    pub fn extract_g3(text: &str) -> FieldRecord<AedField> {
        let fields = GenerationRule::for_generation(DeviceGeneration::G3).fields;
        let lines: Vec<&str> = text.split('\n').collect();
        let mut record = FieldRecord::new();

        for (i, line) in lines.iter().enumerate() {
            for field in fields {
                if Self::line_has_label(line, *field, fields) {
                    let value = lines.get(i + 1).map(|next| next.trim()).unwrap_or("");
                    record.insert(*field, value);
                }
            }
        }
        record
    }

    // "Date de mise en service batterie" must not also count as "Date de mise en service".
    fn line_has_label(line: &str, field: AedField, fields: &[AedField]) -> bool {
        let label = field.label();
        line.contains(label)
            && !fields.iter().any(|other| {
                let other_label = other.label();
                other_label.len() > label.len()
                    && other_label.contains(label)
                    && line.contains(other_label)
            })
    }
}
