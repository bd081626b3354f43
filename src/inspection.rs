use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::InspectionConfig;
use crate::models::*;
use crate::processing::{AedExtractor, ClassifierOutput, ImageClassifier, ImageEvidence, ReportExtractor};
use crate::utils::InspectionError;
use crate::validation::{DeviceComparator, ImageComparator, Verdict};

/// Kind of document a file was recognized as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    VerificationReport,
    AedReport,
    Image,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub kind: DocumentKind,
}

/// Everything extracted and compared for one inspection.
///
/// Records are filled in as documents are processed; comparisons read a
/// snapshot of them.
#[derive(Debug, Clone)]
pub struct InspectionSession {
    config: InspectionConfig,
    report: Option<ReportRecord>,
    aed: Option<AedReport>,
    images: Vec<ImageRecord>,
    uploaded: Vec<UploadedFile>,
    report_vs_device: ComparisonSet,
    report_vs_images: ComparisonSet,
    notices: Vec<Notice>,
    // Latest outcome of each comparison; replaced on every run.
    device_notice: Option<Notice>,
    images_notice: Option<Notice>,
}

impl InspectionSession {
    pub fn new(config: InspectionConfig) -> Self {
        InspectionSession {
            config,
            report: None,
            aed: None,
            images: Vec::new(),
            uploaded: Vec::new(),
            report_vs_device: ComparisonSet::new(),
            report_vs_images: ComparisonSet::new(),
            notices: Vec::new(),
            device_notice: None,
            images_notice: None,
        }
    }

    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    pub fn generation(&self) -> DeviceGeneration {
        self.config.device_generation
    }

    /// Routes a PDF's text layer by file name: verification reports mention
    /// "rapport de vérification", AED reports mention "aed".
    pub fn ingest_pdf_text(&mut self, file_name: &str, text: &str) -> Result<DocumentKind, InspectionError> {
        let lower_name = file_name.to_lowercase();

        if lower_name.contains("rapport de vérification") {
            self.ingest_report_text(file_name, text);
            Ok(DocumentKind::VerificationReport)
        } else if lower_name.contains("aed") {
            self.ingest_aed_text(file_name, text);
            Ok(DocumentKind::AedReport)
        } else {
            warn!("Unrecognized PDF type: {}", file_name);
            self.notices.push(Notice::new(
                NoticeKind::UnknownDocument,
                format!("Unrecognized PDF type: {}", file_name),
            ));
            Err(InspectionError::UnknownDocument(file_name.to_string()))
        }
    }

    pub fn ingest_report_text(&mut self, file_name: &str, text: &str) {
        self.set_report(ReportExtractor::extract(text));
        self.record_upload(file_name, DocumentKind::VerificationReport);
        info!("Verification report processed: {}", file_name);
    }

    /// Reads the text with the layout of the configured generation.
    pub fn ingest_aed_text(&mut self, file_name: &str, text: &str) {
        let generation = self.generation();
        self.set_aed_report(AedExtractor::extract(text, generation));
        self.record_upload(file_name, DocumentKind::AedReport);
        info!("AED {} report processed: {}", generation, file_name);
    }

    pub fn set_report(&mut self, report: ReportRecord) {
        self.report = Some(report);
    }

    pub fn set_aed_report(&mut self, aed: AedReport) {
        self.aed = Some(aed);
    }

    /// Classifies a photograph from the service output and the text already
    /// recognized on it, then records it.
    pub fn process_image(&mut self, file_name: &str, output: &ClassifierOutput, evidence: &ImageEvidence) -> ImageRecord {
        let classifier = ImageClassifier::new(self.config.classification_threshold);
        let record = classifier.build_record(file_name, output, evidence);
        self.record_upload(file_name, DocumentKind::Image);
        self.add_image(record.clone());
        record
    }

    pub fn add_image(&mut self, record: ImageRecord) {
        let source = record.source.clone().unwrap_or_else(|| "image".to_string());
        match record.category {
            ImageCategory::Unclassified => self.notices.push(Notice::new(
                NoticeKind::Unclassified,
                format!("No classification found for: {}", source),
            )),
            ImageCategory::ClassificationError | ImageCategory::ProcessingError => {
                self.notices.push(Notice::new(
                    NoticeKind::Extraction,
                    format!("{}: {}", record.category.label(), source),
                ))
            }
            _ => {}
        }
        self.images.push(record);
    }

    fn record_upload(&mut self, file_name: &str, kind: DocumentKind) {
        self.uploaded.push(UploadedFile {
            name: file_name.to_string(),
            kind,
        });
    }

    pub fn compare_report_to_device(&mut self) -> &ComparisonSet {
        let outcome = DeviceComparator::compare(self.report.as_ref(), self.aed.as_ref(), self.generation());
        let (results, notice) = Self::recover(outcome);
        self.report_vs_device = results;
        self.device_notice = notice;
        &self.report_vs_device
    }

    pub fn compare_report_to_images(&mut self) -> &ComparisonSet {
        let outcome = ImageComparator::compare(self.report.as_ref(), &self.images);
        let (results, notice) = Self::recover(outcome);
        self.report_vs_images = results;
        self.images_notice = notice;
        &self.report_vs_images
    }

    /// Runs both comparisons and folds them into a verdict.
    pub fn run_comparisons(&mut self) -> Verdict {
        self.compare_report_to_device();
        self.compare_report_to_images();
        self.verdict()
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_comparisons(&self.report_vs_device, &self.report_vs_images)
    }

    // A missing record is a notice and an empty result, not a failure.
    fn recover(outcome: Result<ComparisonSet, InspectionError>) -> (ComparisonSet, Option<Notice>) {
        match outcome {
            Ok(results) => (results, None),
            Err(err) => {
                warn!("Comparison skipped: {}", err);
                let notice = Notice::new(NoticeKind::MissingRecord, format!("{} for comparison", err));
                (ComparisonSet::new(), Some(notice))
            }
        }
    }

    pub fn report(&self) -> Option<&ReportRecord> {
        self.report.as_ref()
    }

    pub fn aed_report(&self) -> Option<&AedReport> {
        self.aed.as_ref()
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn uploaded_files(&self) -> &[UploadedFile] {
        &self.uploaded
    }

    pub fn report_vs_device(&self) -> &ComparisonSet {
        &self.report_vs_device
    }

    pub fn report_vs_images(&self) -> &ComparisonSet {
        &self.report_vs_images
    }

    /// Ingestion notices, then the notice of the latest run of each comparison.
    pub fn notices(&self) -> Vec<&Notice> {
        self.notices
            .iter()
            .chain(self.device_notice.iter())
            .chain(self.images_notice.iter())
            .collect()
    }

    /// Site code from the report, when one was read.
    pub fn site_code(&self) -> Option<&str> {
        self.report
            .as_ref()
            .map(|report| report.get(ReportField::SiteCode))
            .filter(|code| *code != NOT_FOUND && !code.is_empty())
    }
}

impl Default for InspectionSession {
    fn default() -> Self {
        InspectionSession::new(InspectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::Prediction;

    const REPORT_TEXT: &str = "\
Code site SITE42
Numéro de série DEFIBRILLATEUR : 1234567
Date-Heure rapport vérification défibrillateur : 01/02/2023 10:00
Changement batterie : Non
Changement électrodes adultes : Non
Numéro de série Batterie : ABC123
Date mise en service BATTERIE : 15/03/2021
Niveau de charge de la batterie en % : 50
Date fabrication BATTERIE : 10/01/2021
Numéro de série ELECTRODES ADULTES : EL778899
Date de péremption ELECTRODES ADULTES : 30/06/2026
";

    const AED_G5_TEXT: &str = "\
N° série DAE: 1234567
Capacité restante de la batterie: 51 %
Date d'installation : 2021-03-15
Date / Heure: 2023-02-01
";

    fn session_with_documents() -> InspectionSession {
        let mut session = InspectionSession::default();
        session
            .ingest_pdf_text("Rapport de vérification SITE42.pdf", REPORT_TEXT)
            .unwrap();
        session.ingest_pdf_text("AED_export.pdf", AED_G5_TEXT).unwrap();
        session
    }

    #[test]
    fn test_end_to_end_compliant_inspection() {
        let mut session = session_with_documents();
        session.process_image(
            "battery.jpg",
            &ClassifierOutput::Predictions(vec![Prediction {
                label: "Batterie".to_string(),
                confidence: 0.9,
            }]),
            &ImageEvidence {
                detections: vec![
                    OcrDetection::new("SN", 0.9),
                    OcrDetection::new("abc-123", 0.8),
                    OcrDetection::new("2021-01-10", 0.8),
                ],
                barcodes: Vec::new(),
            },
        );
        session.add_image(ImageRecord::with_values(
            ImageCategory::Electrodes,
            Some("EL778899"),
            Some("2026-06-30"),
        ));

        let verdict = session.run_comparisons();
        assert_eq!(session.report_vs_device().len(), 4);
        assert_eq!(session.report_vs_images().len(), 4);
        assert!(verdict.is_compliant, "failing: {:?}", verdict);
        assert!(session.notices().is_empty());
        assert_eq!(session.site_code(), Some("SITE42"));
    }

    #[test]
    fn test_missing_report_gives_empty_results_and_notice() {
        let mut session = InspectionSession::default();
        session.ingest_pdf_text("aed.pdf", AED_G5_TEXT).unwrap();

        assert!(session.compare_report_to_device().is_empty());
        assert!(session.compare_report_to_images().is_empty());
        assert_eq!(session.notices().len(), 2);
        assert!(session
            .notices()
            .iter()
            .all(|notice| notice.kind == NoticeKind::MissingRecord));
        assert!(!session.verdict().is_compliant);
    }

    #[test]
    fn test_missing_aed_does_not_block_image_comparison() {
        let mut session = InspectionSession::default();
        session
            .ingest_pdf_text("rapport de vérification.pdf", REPORT_TEXT)
            .unwrap();
        session.add_image(ImageRecord::with_values(
            ImageCategory::DefibrillatorG5,
            Some("1234567"),
            None,
        ));

        session.run_comparisons();
        assert!(session.report_vs_device().is_empty());
        assert_eq!(session.report_vs_images().len(), 2);
        assert!(session.report_vs_images()[&ComparisonTopic::DefibrillatorSerial].is_match);
    }

    #[test]
    fn test_unknown_pdf_is_rejected_with_notice() {
        let mut session = InspectionSession::default();
        let err = session.ingest_pdf_text("facture.pdf", "").unwrap_err();
        assert!(matches!(err, InspectionError::UnknownDocument(_)));
        assert_eq!(session.notices()[0].kind, NoticeKind::UnknownDocument);
        assert!(session.uploaded_files().is_empty());
    }

    #[test]
    fn test_unclassified_images_are_kept_and_noticed() {
        let mut session = InspectionSession::default();
        let record = session.process_image(
            "chair.jpg",
            &ClassifierOutput::Predictions(Vec::new()),
            &ImageEvidence::default(),
        );
        assert_eq!(record.category, ImageCategory::Unclassified);
        assert_eq!(session.images().len(), 1);
        assert_eq!(session.notices()[0].kind, NoticeKind::Unclassified);
    }

    #[test]
    fn test_rerunning_comparisons_does_not_repeat_notices() {
        let mut session = InspectionSession::default();
        session.compare_report_to_device();
        session.compare_report_to_device();
        session.run_comparisons();
        session.run_comparisons();
        assert_eq!(session.notices().len(), 2);

        // Once the records arrive, the missing-record notices go away.
        session
            .ingest_pdf_text("rapport de vérification.pdf", REPORT_TEXT)
            .unwrap();
        session.ingest_pdf_text("aed.pdf", AED_G5_TEXT).unwrap();
        session.run_comparisons();
        assert!(session.notices().is_empty());
    }

    #[test]
    fn test_processed_image_is_stored() {
        let mut session = InspectionSession::default();
        let record = session.process_image(
            "pads.jpg",
            &ClassifierOutput::Predictions(vec![Prediction {
                label: "Electrodes".to_string(),
                confidence: 0.7,
            }]),
            &ImageEvidence {
                detections: Vec::new(),
                barcodes: vec!["EL1".to_string(), "2026-01-01".to_string()],
            },
        );
        assert_eq!(session.images(), &[record]);
        assert_eq!(session.images()[0].serial.as_deref(), Some("EL1"));
        assert_eq!(session.uploaded_files()[0].kind, DocumentKind::Image);
    }
}
