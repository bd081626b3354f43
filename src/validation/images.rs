use log::{debug, info};

use crate::models::{
    ComparisonSet, ComparisonTopic, Counterpart, ImageCategory, ImageRecord, ReportRecord,
};
use crate::utils::InspectionError;
use crate::validation::mapping::{ComponentFields, FieldMappingResolver};
use crate::validation::topic::{compare_dates, compare_serials};

/// Cross-checks the verification report against serials and dates read off
/// device photographs.
pub struct ImageComparator;

impl ImageComparator {
    /// Components without a photograph produce no topics. Pediatric electrode
    /// topics reuse the electrode photograph and only appear when the report
    /// says the pediatric electrodes were replaced.
    pub fn compare(
        report: Option<&ReportRecord>,
        images: &[ImageRecord],
    ) -> Result<ComparisonSet, InspectionError> {
        let report = report
            .filter(|record| !record.is_empty())
            .ok_or_else(|| InspectionError::MissingRecord("verification report data".to_string()))?;

        let mapping = FieldMappingResolver::resolve(report);
        let mut results = ComparisonSet::new();

        if let Some(battery) = Self::find(images, |category| category == ImageCategory::Battery) {
            Self::compare_component(
                &mut results,
                report,
                battery,
                mapping.battery,
                (ComparisonTopic::BatterySerial, ComparisonTopic::BatteryDate),
            );
        }

        if let Some(electrodes) = Self::find(images, |category| category == ImageCategory::Electrodes) {
            Self::compare_component(
                &mut results,
                report,
                electrodes,
                mapping.adult_electrodes,
                (ComparisonTopic::ElectrodeSerial, ComparisonTopic::ElectrodeDate),
            );
            if let Some(pediatric) = mapping.pediatric_electrodes {
                Self::compare_component(
                    &mut results,
                    report,
                    electrodes,
                    pediatric,
                    (
                        ComparisonTopic::PediatricElectrodeSerial,
                        ComparisonTopic::PediatricElectrodeDate,
                    ),
                );
            }
        }

        if let Some(defibrillator) = Self::find(images, |category| category.is_defibrillator()) {
            Self::compare_component(
                &mut results,
                report,
                defibrillator,
                mapping.defibrillator,
                (
                    ComparisonTopic::DefibrillatorSerial,
                    ComparisonTopic::DefibrillatorDate,
                ),
            );
        }

        let matched = results.values().filter(|result| result.is_match).count();
        info!(
            "Report vs images ({} images): {}/{} topics match",
            images.len(),
            matched,
            results.len()
        );
        Ok(results)
    }

    fn find(images: &[ImageRecord], accept: impl Fn(ImageCategory) -> bool) -> Option<&ImageRecord> {
        images.iter().find(|image| accept(image.category))
    }

    fn compare_component(
        results: &mut ComparisonSet,
        report: &ReportRecord,
        image: &ImageRecord,
        fields: ComponentFields,
        (serial_topic, date_topic): (ComparisonTopic, ComparisonTopic),
    ) {
        debug!(
            "Comparing {} photo against report fields {:?}",
            image.category.label(),
            fields
        );
        results.insert(
            serial_topic,
            compare_serials(
                Counterpart::Image,
                report.get(fields.serial),
                image.serial_or_sentinel(),
            ),
        );
        results.insert(
            date_topic,
            compare_dates(
                Counterpart::Image,
                report.get(fields.date),
                image.date_or_sentinel(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportField;

    fn report(pediatric_changed: &str) -> ReportRecord {
        ReportRecord::new()
            .with(ReportField::BatteryChanged, "Non")
            .with(ReportField::BatterySerial, "ABC123")
            .with(ReportField::BatteryFabricationDate, "15/03/2023")
            .with(ReportField::AdultElectrodesChanged, "Oui")
            .with(ReportField::NewElectrodesSerial, "EL-778899")
            .with(ReportField::NewElectrodesExpiry, "30/06/2026")
            .with(ReportField::PediatricElectrodesChanged, pediatric_changed)
            .with(ReportField::NewPediatricElectrodesSerial, "PED-1")
            .with(ReportField::NewPediatricElectrodesExpiry, "01/01/2027")
            .with(ReportField::DefibrillatorSerial, "1234567")
            .with(ReportField::DefibrillatorFabricationDate, "10/10/2019")
    }

    fn images() -> Vec<ImageRecord> {
        vec![
            ImageRecord::with_values(ImageCategory::Unclassified, None, None),
            ImageRecord::with_values(ImageCategory::Battery, Some("abc-123"), Some("2023-03-15")),
            ImageRecord::with_values(ImageCategory::Electrodes, Some("EL778899"), Some("2026-06-30")),
            ImageRecord::with_values(
                ImageCategory::DefibrillatorG5,
                Some("1234567"),
                Some("2019-10-10"),
            ),
        ]
    }

    #[test]
    fn test_battery_serial_normalized_equality() {
        let results = ImageComparator::compare(Some(&report("Non")), &images()).unwrap();
        let battery_serial = &results[&ComparisonTopic::BatterySerial];
        assert!(battery_serial.is_match);
        assert_eq!(battery_serial.report_value.as_deref(), Some("ABC123"));
        assert_eq!(battery_serial.counterpart_value.as_deref(), Some("abc-123"));
        assert!(results[&ComparisonTopic::BatteryDate].is_match);
    }

    #[test]
    fn test_replaced_electrodes_compare_new_fields() {
        let results = ImageComparator::compare(Some(&report("Non")), &images()).unwrap();
        assert!(results[&ComparisonTopic::ElectrodeSerial].is_match);
        assert!(results[&ComparisonTopic::ElectrodeDate].is_match);
        assert!(results[&ComparisonTopic::DefibrillatorSerial].is_match);
        assert!(results[&ComparisonTopic::DefibrillatorDate].is_match);
    }

    #[test]
    fn test_pediatric_topics_only_when_replaced() {
        let without = ImageComparator::compare(Some(&report("Non")), &images()).unwrap();
        assert!(!without.contains_key(&ComparisonTopic::PediatricElectrodeSerial));
        assert!(!without.contains_key(&ComparisonTopic::PediatricElectrodeDate));
        assert_eq!(without.len(), 6);

        let with = ImageComparator::compare(Some(&report("Oui")), &images()).unwrap();
        assert_eq!(with.len(), 8);
        // Same electrode photo, different report fields.
        let pediatric_serial = &with[&ComparisonTopic::PediatricElectrodeSerial];
        assert_eq!(pediatric_serial.counterpart_value.as_deref(), Some("EL778899"));
        assert!(!pediatric_serial.is_match);
    }

    #[test]
    fn test_components_without_photo_are_omitted() {
        let only_battery = vec![ImageRecord::with_values(
            ImageCategory::Battery,
            Some("ABC123"),
            None,
        )];
        let results = ImageComparator::compare(Some(&report("Oui")), &only_battery).unwrap();
        assert_eq!(results.len(), 2);

        let battery_date = &results[&ComparisonTopic::BatteryDate];
        assert_eq!(battery_date.counterpart_value.as_deref(), Some("Non trouvé"));
        assert!(!battery_date.is_match);
        assert_eq!(battery_date.errors.len(), 1);
    }

    #[test]
    fn test_first_photo_of_a_category_wins() {
        let mut photos = images();
        photos.insert(
            0,
            ImageRecord::with_values(ImageCategory::Battery, Some("ZZZ999"), Some("2020-01-01")),
        );
        let results = ImageComparator::compare(Some(&report("Non")), &photos).unwrap();
        assert!(!results[&ComparisonTopic::BatterySerial].is_match);
    }

    #[test]
    fn test_g3_defibrillator_photo_is_compared() {
        let photos = vec![ImageRecord::with_values(
            ImageCategory::DefibrillatorG3,
            Some("1234567"),
            Some("20191010"),
        )];
        let results = ImageComparator::compare(Some(&report("Non")), &photos).unwrap();
        assert!(results[&ComparisonTopic::DefibrillatorSerial].is_match);
        assert!(results[&ComparisonTopic::DefibrillatorDate].is_match);
    }

    #[test]
    fn test_missing_report_fails_fast() {
        let err = ImageComparator::compare(None, &images()).unwrap_err();
        assert!(matches!(err, InspectionError::MissingRecord(_)));
    }

    #[test]
    fn test_no_images_gives_empty_set() {
        let results = ImageComparator::compare(Some(&report("Oui")), &[]).unwrap();
        assert!(results.is_empty());
    }
}
