use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::models::{ImageCategory, ImageRecord, OcrDetection};
use crate::processing::ocr::{LabelValues, OcrProcessor};

/// One prediction from the image classification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(rename = "class")]
    pub label: String,
    pub confidence: f64,
}

/// What the classification service returned for one photograph.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierOutput {
    Predictions(Vec<Prediction>),
    ClassificationFailed(String),
    ProcessingFailed(String),
}

/// Text and barcodes already recognized on a photograph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageEvidence {
    #[serde(default)]
    pub detections: Vec<OcrDetection>,
    #[serde(default)]
    pub barcodes: Vec<String>,
}

/// Turns classifier output plus recognized text into an [`ImageRecord`].
pub struct ImageClassifier {
    threshold: f64,
}

impl ImageClassifier {
    pub fn new(threshold: f64) -> Self {
        ImageClassifier { threshold }
    }

    /// First prediction strictly above the confidence threshold.
    pub fn detected_label<'a>(&self, predictions: &'a [Prediction]) -> Option<&'a str> {
        predictions
            .iter()
            .find(|prediction| prediction.confidence > self.threshold)
            .map(|prediction| prediction.label.as_str())
    }

    pub fn categorize(&self, predictions: &[Prediction]) -> ImageCategory {
        self.detected_label(predictions)
            .and_then(ImageCategory::from_label)
            .unwrap_or(ImageCategory::Unclassified)
    }

    /// Every photograph yields a record, even when classification failed.
    pub fn build_record(
        &self,
        source: &str,
        output: &ClassifierOutput,
        evidence: &ImageEvidence,
    ) -> ImageRecord {
        let category = match output {
            ClassifierOutput::Predictions(predictions) => self.categorize(predictions),
            ClassifierOutput::ClassificationFailed(reason) => {
                warn!("Classification failed for {}: {}", source, reason);
                ImageCategory::ClassificationError
            }
            ClassifierOutput::ProcessingFailed(reason) => {
                warn!("Processing failed for {}: {}", source, reason);
                ImageCategory::ProcessingError
            }
        };

        let values = match category {
            ImageCategory::DefibrillatorG3 => OcrProcessor::read_defibrillator_g3(&evidence.detections),
            ImageCategory::DefibrillatorG5 => OcrProcessor::read_defibrillator_g5(&evidence.detections),
            ImageCategory::Battery => OcrProcessor::read_battery(&evidence.detections),
            ImageCategory::Electrodes => OcrProcessor::read_electrode_barcodes(&evidence.barcodes),
            ImageCategory::Unclassified => {
                warn!("No classification found for {}", source);
                LabelValues::default()
            }
            ImageCategory::ClassificationError | ImageCategory::ProcessingError => {
                LabelValues::default()
            }
        };

        if values != LabelValues::default() {
            info!("Image {} processed: {}", category.label(), source);
        }

        ImageRecord {
            category,
            serial: values.serial,
            date: values.date,
            source: Some(source.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: &str, confidence: f64) -> Prediction {
        Prediction {
            label: label.to_string(),
            confidence,
        }
    }

    #[test]
    fn test_low_confidence_predictions_are_ignored() {
        let classifier = ImageClassifier::new(0.3);
        let predictions = vec![prediction("Electrodes", 0.3), prediction("Batterie", 0.8)];
        assert_eq!(classifier.detected_label(&predictions), Some("Batterie"));
        assert_eq!(classifier.categorize(&predictions), ImageCategory::Battery);
        assert_eq!(
            classifier.categorize(&[prediction("Batterie", 0.1)]),
            ImageCategory::Unclassified
        );
    }

    #[test]
    fn test_battery_photo_reads_ocr() {
        let classifier = ImageClassifier::new(0.3);
        let evidence = ImageEvidence {
            detections: vec![
                OcrDetection::new("LOT", 0.9),
                OcrDetection::new("AB12345", 0.9),
                OcrDetection::new("2023-03-15", 0.9),
            ],
            barcodes: Vec::new(),
        };
        let record = classifier.build_record(
            "battery.jpg",
            &ClassifierOutput::Predictions(vec![prediction("Batterie", 0.92)]),
            &evidence,
        );
        assert_eq!(record.category, ImageCategory::Battery);
        assert_eq!(record.serial.as_deref(), Some("AB12345"));
        assert_eq!(record.date.as_deref(), Some("2023-03-15"));
        assert_eq!(record.source.as_deref(), Some("battery.jpg"));
    }

    #[test]
    fn test_failed_classification_still_yields_record() {
        let classifier = ImageClassifier::new(0.3);
        let record = classifier.build_record(
            "blurry.jpg",
            &ClassifierOutput::ClassificationFailed("timeout".to_string()),
            &ImageEvidence::default(),
        );
        assert_eq!(record.category, ImageCategory::ClassificationError);
        assert_eq!(record.serial, None);

        let record = classifier.build_record(
            "broken.jpg",
            &ClassifierOutput::ProcessingFailed("decode error".to_string()),
            &ImageEvidence::default(),
        );
        assert_eq!(record.category, ImageCategory::ProcessingError);
    }

    #[test]
    fn test_prediction_json_uses_class_key() {
        let predictions: Vec<Prediction> =
            serde_json::from_str(r#"[{"class": "Defibrillateur G3", "confidence": 0.77}]"#).unwrap();
        assert_eq!(
            ImageClassifier::new(0.3).categorize(&predictions),
            ImageCategory::DefibrillatorG3
        );
    }
}
