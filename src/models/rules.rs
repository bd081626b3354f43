use crate::models::data::{ComparisonTopic, DeviceGeneration};
use crate::models::fields::AedField;

/// Where each device-report topic lives for one AED generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationRule {
    pub generation: DeviceGeneration,
    pub serial: AedField,
    pub report_date: AedField,
    pub battery_install_date: AedField,
    pub battery_level: AedField,
    pub fields: &'static [AedField],
}

const G5_FIELDS: &[AedField] = &[
    AedField::G5Serial,
    AedField::G5BatteryRemaining,
    AedField::G5BatteryInstallDate,
    AedField::G5CurrentErrors,
    AedField::G5DateTime,
];

const G3_FIELDS: &[AedField] = &[
    AedField::G3Serial,
    AedField::G3LastFailure,
    AedField::G3LotNumber,
    AedField::G3CommissioningDate,
    AedField::G3BatteryInstallDate,
    AedField::G3BatteryInitialCapacity,
    AedField::G3BatteryRemaining,
    AedField::G3SelfTest,
];

impl GenerationRule {
    pub fn for_generation(generation: DeviceGeneration) -> Self {
        match generation {
            DeviceGeneration::G5 => GenerationRule {
                generation,
                serial: AedField::G5Serial,
                report_date: AedField::G5DateTime,
                battery_install_date: AedField::G5BatteryInstallDate,
                battery_level: AedField::G5BatteryRemaining,
                fields: G5_FIELDS,
            },
            DeviceGeneration::G3 => GenerationRule {
                generation,
                serial: AedField::G3Serial,
                report_date: AedField::G3CommissioningDate,
                battery_install_date: AedField::G3BatteryInstallDate,
                battery_level: AedField::G3BatteryRemaining,
                fields: G3_FIELDS,
            },
        }
    }

    /// Device-report field compared for a topic, if the topic is a device topic.
    pub fn field_for(&self, topic: ComparisonTopic) -> Option<AedField> {
        match topic {
            ComparisonTopic::Serial => Some(self.serial),
            ComparisonTopic::ReportDate => Some(self.report_date),
            ComparisonTopic::BatteryInstallDate => Some(self.battery_install_date),
            ComparisonTopic::BatteryLevel => Some(self.battery_level),
            _ => None,
        }
    }
}
