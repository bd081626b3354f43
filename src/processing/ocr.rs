use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;

use crate::models::OcrDetection;

lazy_static! {
    static ref G3_SERIAL: Regex = Regex::new(r"\b(\d{5,10})\b").unwrap();
    static ref G3_DATE: Regex = Regex::new(r"\b(\d{4}-\d{2}-\d{2}|\d{6})\b").unwrap();
    static ref ISO_DATE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").unwrap();
    static ref G5_SERIAL: Regex = Regex::new(r"([A-Za-z]*\s*[\dOo]+)").unwrap();
    // OCR frequently misreads the "LOT" marker printed on battery packs.
    static ref BATTERY_MARKER: Regex =
        Regex::new(r"(?i)\b(?:SN|LOT|Lon|Loz|Lo|LO|Lot|Lool|LOTI|Lotl|LOI|Lod)\b").unwrap();
    static ref BATTERY_SERIAL: Regex = Regex::new(
        r"\b(?:SN|LOT|Lon|Loz|Lot|Lotl|LoI|Lool|Lo|Lod|LO|LOTI|LOI)?\s*([0-9A-Za-z\-]{5,})\b"
    )
    .unwrap();
}

/// Serial and date read off a label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelValues {
    pub serial: Option<String>,
    pub date: Option<String>,
}

/// Reads serial numbers and dates out of OCR detections and barcodes.
pub struct OcrProcessor;

impl OcrProcessor {
    /// G3 rating plate: first 5-10 digit number and first date-like group.
    pub fn read_defibrillator_g3(detections: &[OcrDetection]) -> LabelValues {
        let mut values = LabelValues::default();
        for detection in detections {
            if values.serial.is_none() {
                values.serial = G3_SERIAL
                    .captures(&detection.text)
                    .map(|captures| captures[1].to_string());
            }
            if values.date.is_none() {
                values.date = G3_DATE
                    .captures(&detection.text)
                    .map(|captures| captures[1].to_string());
            }
        }
        debug!("G3 plate: {:?}", values);
        values
    }

    /// G5 rating plate: the serial is printed after an "SN" caption. The last
    /// ISO date wins.
    pub fn read_defibrillator_g5(detections: &[OcrDetection]) -> LabelValues {
        let mut values = LabelValues::default();
        let mut after_caption = false;

        for detection in detections {
            let text = detection.text.as_str();
            if text.contains("SN") || text.contains("Serial Number") {
                after_caption = true;
                continue;
            }
            if after_caption {
                if let Some(serial) = G5_SERIAL.find(text) {
                    values.serial = Some(Self::correct_serial_digits(serial.as_str()));
                    after_caption = false;
                }
            }
            if let Some(captures) = ISO_DATE.captures(text) {
                values.date = Some(captures[1].to_string());
            }
        }
        debug!("G5 plate: {:?}", values);
        values
    }

    /// Battery pack: the serial follows an "SN"/"LOT" marker. The last ISO
    /// date wins.
    pub fn read_battery(detections: &[OcrDetection]) -> LabelValues {
        let mut values = LabelValues::default();
        let mut after_marker = false;

        for detection in detections {
            let text = detection.text.as_str();
            if BATTERY_MARKER.is_match(text) {
                after_marker = true;
                continue;
            }
            if after_marker {
                if let Some(captures) = BATTERY_SERIAL.captures(text) {
                    values.serial = Some(captures[1].to_string());
                    after_marker = false;
                }
            }
            if let Some(date) = ISO_DATE.find(text) {
                values.date = Some(date.as_str().to_string());
            }
        }
        debug!("Battery label: {:?}", values);
        values
    }

    /// Electrode pouches carry two barcodes: serial first, expiry date second.
    pub fn read_electrode_barcodes(barcodes: &[String]) -> LabelValues {
        match barcodes {
            [serial, date, ..] => LabelValues {
                serial: Some(serial.clone()),
                date: Some(date.clone()),
            },
            [] => {
                warn!("No barcode detected in the electrode image");
                LabelValues::default()
            }
            _ => {
                warn!(
                    "Unexpected number of barcodes found: {}. Expected at least 2",
                    barcodes.len()
                );
                LabelValues::default()
            }
        }
    }

    // Digits on G5 plates are often read as the letter O.
    fn correct_serial_digits(serial: &str) -> String {
        serial.replace(['O', 'o'], "0")
    }
}
