use log::{debug, info};

use crate::models::{
    AedReport, ComparisonResult, ComparisonSet, ComparisonTopic, Counterpart, DeviceGeneration,
    GenerationRule, ReportField, ReportRecord,
};
use crate::utils::InspectionError;
use crate::validation::normalize::{first_number, parse_percentage};
use crate::validation::topic::{compare_dates, compare_serials};

/// Maximum gap, in percentage points, between the two battery gauges.
pub const BATTERY_LEVEL_TOLERANCE: f64 = 2.0;

/// Cross-checks the verification report against the AED's own report.
pub struct DeviceComparator;

impl DeviceComparator {
    /// Fails with [`InspectionError::MissingRecord`] when either record is absent
    /// or empty, or when the AED report was read with another generation's layout.
    pub fn compare(
        report: Option<&ReportRecord>,
        aed: Option<&AedReport>,
        generation: DeviceGeneration,
    ) -> Result<ComparisonSet, InspectionError> {
        let report = report
            .filter(|record| !record.is_empty())
            .ok_or_else(|| InspectionError::MissingRecord("verification report data".to_string()))?;
        let aed = aed
            .filter(|aed| aed.generation == generation && !aed.fields.is_empty())
            .ok_or_else(|| InspectionError::MissingRecord(format!("AED {} data", generation)))?;

        let rule = GenerationRule::for_generation(generation);
        let mut results = ComparisonSet::new();

        results.insert(
            ComparisonTopic::Serial,
            compare_serials(
                Counterpart::Aed,
                report.get(ReportField::DefibrillatorSerial),
                aed.fields.get(rule.serial),
            ),
        );

        results.insert(
            ComparisonTopic::ReportDate,
            compare_dates(
                Counterpart::Aed,
                report.get(ReportField::ReportDateTime),
                aed.fields.get(rule.report_date),
            ),
        );

        results.insert(
            ComparisonTopic::BatteryInstallDate,
            compare_dates(
                Counterpart::Aed,
                report.get(ReportField::BatteryInstallDate),
                aed.fields.get(rule.battery_install_date),
            ),
        );

        results.insert(
            ComparisonTopic::BatteryLevel,
            Self::compare_battery_level(
                report.get(ReportField::BatteryLevel),
                aed.fields.get(rule.battery_level),
            ),
        );

        let matched = results.values().filter(|result| result.is_match).count();
        info!(
            "Report vs AED {}: {}/{} topics match",
            generation,
            matched,
            results.len()
        );
        Ok(results)
    }

    /// Report side is a plain percentage, device side is free text whose first
    /// number is the remaining capacity.
    pub fn compare_battery_level(report_raw: &str, device_raw: &str) -> ComparisonResult {
        let report_level = match parse_percentage(report_raw) {
            Some(level) => level,
            None => {
                return ComparisonResult::invalid(
                    Counterpart::Aed,
                    format!(
                        "Invalid battery data: report level '{}' is not a number",
                        report_raw
                    ),
                )
            }
        };
        let device_level = match first_number(device_raw) {
            Some(level) => level,
            None => {
                return ComparisonResult::invalid(
                    Counterpart::Aed,
                    format!(
                        "Invalid battery data: no number in device level '{}'",
                        device_raw
                    ),
                )
            }
        };

        let is_match = (report_level - device_level).abs() <= BATTERY_LEVEL_TOLERANCE;
        debug!(
            "Battery level: report {}% vs device {}% -> {}",
            report_level, device_level, is_match
        );
        ComparisonResult::compared(
            Counterpart::Aed,
            &format!("{}%", report_level),
            &format!("{}%", device_level),
            is_match,
            Vec::new(),
        )
    }
}
