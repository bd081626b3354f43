use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::fields::{AedField, FieldRecord, ReportField, NOT_FOUND};
use crate::utils::InspectionError;

/// Extracted verification report.
pub type ReportRecord = FieldRecord<ReportField>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeviceGeneration {
    #[default]
    G5,
    G3,
}

impl DeviceGeneration {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceGeneration::G5 => "G5",
            DeviceGeneration::G3 => "G3",
        }
    }
}

impl fmt::Display for DeviceGeneration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeviceGeneration {
    type Err = InspectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "G5" => Ok(DeviceGeneration::G5),
            "G3" => Ok(DeviceGeneration::G3),
            other => Err(InspectionError::InvalidConfig(format!(
                "Unknown device generation: {}",
                other
            ))),
        }
    }
}

/// Extracted AED device report, tagged with the layout it was read with.
#[derive(Debug, Clone, PartialEq)]
pub struct AedReport {
    pub generation: DeviceGeneration,
    pub fields: FieldRecord<AedField>,
}

impl AedReport {
    pub fn new(generation: DeviceGeneration, fields: FieldRecord<AedField>) -> Self {
        AedReport { generation, fields }
    }
}

/// Category assigned to a photograph by the external classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageCategory {
    #[serde(rename = "Batterie")]
    Battery,
    #[serde(rename = "Electrodes")]
    Electrodes,
    #[serde(rename = "Defibrillateur G5")]
    DefibrillatorG5,
    #[serde(rename = "Defibrillateur G3")]
    DefibrillatorG3,
    #[serde(rename = "Non classifié")]
    Unclassified,
    #[serde(rename = "Erreur de classification")]
    ClassificationError,
    #[serde(rename = "Erreur de traitement")]
    ProcessingError,
}

impl ImageCategory {
    /// Maps a classifier label onto a category by substring.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.contains("Defibrillateur") {
            if label.contains("G3") {
                Some(ImageCategory::DefibrillatorG3)
            } else {
                Some(ImageCategory::DefibrillatorG5)
            }
        } else if label.contains("Batterie") {
            Some(ImageCategory::Battery)
        } else if label.contains("Electrodes") {
            Some(ImageCategory::Electrodes)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImageCategory::Battery => "Batterie",
            ImageCategory::Electrodes => "Electrodes",
            ImageCategory::DefibrillatorG5 => "Defibrillateur G5",
            ImageCategory::DefibrillatorG3 => "Defibrillateur G3",
            ImageCategory::Unclassified => "Non classifié",
            ImageCategory::ClassificationError => "Erreur de classification",
            ImageCategory::ProcessingError => "Erreur de traitement",
        }
    }

    pub fn is_defibrillator(&self) -> bool {
        matches!(
            self,
            ImageCategory::DefibrillatorG5 | ImageCategory::DefibrillatorG3
        )
    }
}

/// One text detection from the OCR engine: corner points, text, confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDetection {
    pub bounding_box: Vec<[f64; 2]>,
    pub text: String,
    pub confidence: f64,
}

impl OcrDetection {
    pub fn new(text: impl Into<String>, confidence: f64) -> Self {
        OcrDetection {
            bounding_box: Vec::new(),
            text: text.into(),
            confidence,
        }
    }
}

/// Serial and date read off a classified photograph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "type")]
    pub category: ImageCategory,
    #[serde(default)]
    pub serial: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ImageRecord {
    pub fn new(category: ImageCategory) -> Self {
        ImageRecord {
            category,
            serial: None,
            date: None,
            source: None,
        }
    }

    pub fn with_values(category: ImageCategory, serial: Option<&str>, date: Option<&str>) -> Self {
        ImageRecord {
            category,
            serial: serial.map(str::to_string),
            date: date.map(str::to_string),
            source: None,
        }
    }

    pub fn serial_or_sentinel(&self) -> &str {
        self.serial.as_deref().unwrap_or(NOT_FOUND)
    }

    pub fn date_or_sentinel(&self) -> &str {
        self.date.as_deref().unwrap_or(NOT_FOUND)
    }
}

/// A single cross-checked fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonTopic {
    Serial,
    ReportDate,
    BatteryInstallDate,
    BatteryLevel,
    BatterySerial,
    BatteryDate,
    ElectrodeSerial,
    ElectrodeDate,
    PediatricElectrodeSerial,
    PediatricElectrodeDate,
    DefibrillatorSerial,
    DefibrillatorDate,
}

impl ComparisonTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonTopic::Serial => "serial",
            ComparisonTopic::ReportDate => "report_date",
            ComparisonTopic::BatteryInstallDate => "battery_install_date",
            ComparisonTopic::BatteryLevel => "battery_level",
            ComparisonTopic::BatterySerial => "battery_serial",
            ComparisonTopic::BatteryDate => "battery_date",
            ComparisonTopic::ElectrodeSerial => "electrode_serial",
            ComparisonTopic::ElectrodeDate => "electrode_date",
            ComparisonTopic::PediatricElectrodeSerial => "pediatric_electrode_serial",
            ComparisonTopic::PediatricElectrodeDate => "pediatric_electrode_date",
            ComparisonTopic::DefibrillatorSerial => "defibrillator_serial",
            ComparisonTopic::DefibrillatorDate => "defibrillator_date",
        }
    }

    /// "battery_install_date" -> "Battery Install Date"
    pub fn title(&self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ComparisonTopic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which source the report value was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counterpart {
    Aed,
    Image,
}

impl Counterpart {
    pub fn label(&self) -> &'static str {
        match self {
            Counterpart::Aed => "AED",
            Counterpart::Image => "Image",
        }
    }
}

/// Outcome of one topic.
///
/// A topic whose values could not be read at all carries no raw values and
/// exactly one error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub counterpart: Counterpart,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterpart_value: Option<String>,
    #[serde(rename = "match")]
    pub is_match: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ComparisonResult {
    pub fn compared(
        counterpart: Counterpart,
        report_value: &str,
        counterpart_value: &str,
        is_match: bool,
        errors: Vec<String>,
    ) -> Self {
        ComparisonResult {
            counterpart,
            report_value: Some(report_value.to_string()),
            counterpart_value: Some(counterpart_value.to_string()),
            is_match: is_match && errors.is_empty(),
            errors,
        }
    }

    pub fn invalid(counterpart: Counterpart, error: String) -> Self {
        ComparisonResult {
            counterpart,
            report_value: None,
            counterpart_value: None,
            is_match: false,
            errors: vec![error],
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.report_value.is_none() && self.counterpart_value.is_none()
    }
}

/// Topic -> result for one comparison entry point.
pub type ComparisonSet = BTreeMap<ComparisonTopic, ComparisonResult>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    MissingRecord,
    UnknownDocument,
    Unclassified,
    Extraction,
}

/// User-visible message raised while processing a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Notice {
            kind,
            message: message.into(),
        }
    }
}
