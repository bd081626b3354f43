use log::debug;

use crate::models::{ReportField, ReportRecord, FLAG_NO, FLAG_YES};

/// Report fields holding the authoritative serial and date of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentFields {
    pub serial: ReportField,
    pub date: ReportField,
}

/// Per-component choice of report fields to compare against photographs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub battery: ComponentFields,
    pub adult_electrodes: ComponentFields,
    /// `None` unless the pediatric electrodes were replaced.
    pub pediatric_electrodes: Option<ComponentFields>,
    pub defibrillator: ComponentFields,
}

/// Picks original or replacement fields from the report's change flags.
pub struct FieldMappingResolver;

impl FieldMappingResolver {
    pub fn resolve(report: &ReportRecord) -> FieldMapping {
        let battery = if report.get(ReportField::BatteryChanged) == FLAG_NO {
            ComponentFields {
                serial: ReportField::BatterySerial,
                date: ReportField::BatteryFabricationDate,
            }
        } else {
            ComponentFields {
                serial: ReportField::NewBatterySerial,
                date: ReportField::NewBatteryFabricationDate,
            }
        };

        let adult_electrodes = if report.get(ReportField::AdultElectrodesChanged) == FLAG_NO {
            ComponentFields {
                serial: ReportField::AdultElectrodesSerial,
                date: ReportField::AdultElectrodesExpiry,
            }
        } else {
            ComponentFields {
                serial: ReportField::NewElectrodesSerial,
                date: ReportField::NewElectrodesExpiry,
            }
        };

        let pediatric_electrodes =
            if report.get(ReportField::PediatricElectrodesChanged) == FLAG_YES {
                Some(ComponentFields {
                    serial: ReportField::NewPediatricElectrodesSerial,
                    date: ReportField::NewPediatricElectrodesExpiry,
                })
            } else {
                None
            };

        let mapping = FieldMapping {
            battery,
            adult_electrodes,
            pediatric_electrodes,
            defibrillator: ComponentFields {
                serial: ReportField::DefibrillatorSerial,
                date: ReportField::DefibrillatorFabricationDate,
            },
        };
        debug!("Resolved report field mapping: {:?}", mapping);
        mapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_FOUND;

    #[test]
    fn test_unchanged_components_use_original_fields() {
        let report = ReportRecord::new()
            .with(ReportField::BatteryChanged, "Non")
            .with(ReportField::AdultElectrodesChanged, "Non")
            .with(ReportField::PediatricElectrodesChanged, "Non");
        let mapping = FieldMappingResolver::resolve(&report);

        assert_eq!(mapping.battery.serial, ReportField::BatterySerial);
        assert_eq!(mapping.battery.date, ReportField::BatteryFabricationDate);
        assert_eq!(mapping.adult_electrodes.serial, ReportField::AdultElectrodesSerial);
        assert_eq!(mapping.adult_electrodes.date, ReportField::AdultElectrodesExpiry);
        assert_eq!(mapping.pediatric_electrodes, None);
    }

    #[test]
    fn test_replaced_components_use_new_fields() {
        let report = ReportRecord::new()
            .with(ReportField::BatteryChanged, "Oui")
            .with(ReportField::AdultElectrodesChanged, "Oui")
            .with(ReportField::PediatricElectrodesChanged, "Oui");
        let mapping = FieldMappingResolver::resolve(&report);

        assert_eq!(mapping.battery.serial, ReportField::NewBatterySerial);
        assert_eq!(mapping.battery.date, ReportField::NewBatteryFabricationDate);
        assert_eq!(mapping.adult_electrodes.serial, ReportField::NewElectrodesSerial);
        assert_eq!(mapping.adult_electrodes.date, ReportField::NewElectrodesExpiry);
        assert_eq!(
            mapping.pediatric_electrodes,
            Some(ComponentFields {
                serial: ReportField::NewPediatricElectrodesSerial,
                date: ReportField::NewPediatricElectrodesExpiry,
            })
        );
    }

    #[test]
    fn test_missing_flags_never_fail() {
        let report = ReportRecord::new();
        assert_eq!(report.get(ReportField::BatteryChanged), NOT_FOUND);

        let mapping = FieldMappingResolver::resolve(&report);
        // Only an explicit "Non" keeps the original battery.
        assert_eq!(mapping.battery.serial, ReportField::NewBatterySerial);
        assert_eq!(mapping.pediatric_electrodes, None);
        assert_eq!(mapping.defibrillator.serial, ReportField::DefibrillatorSerial);
        assert_eq!(
            mapping.defibrillator.date,
            ReportField::DefibrillatorFabricationDate
        );
    }

    #[test]
    fn test_flags_must_match_exactly() {
        let report = ReportRecord::new()
            .with(ReportField::BatteryChanged, "non")
            .with(ReportField::PediatricElectrodesChanged, "OUI");
        let mapping = FieldMappingResolver::resolve(&report);
        assert_eq!(mapping.battery.serial, ReportField::NewBatterySerial);
        assert_eq!(mapping.pediatric_electrodes, None);
    }
}
