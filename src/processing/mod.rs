pub mod aed;
pub mod classification;
pub mod ocr;
pub mod report;

pub use aed::AedExtractor;
pub use classification::{ClassifierOutput, ImageClassifier, ImageEvidence, Prediction};
pub use ocr::{LabelValues, OcrProcessor};
pub use report::ReportExtractor;
