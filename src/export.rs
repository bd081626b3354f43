use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::info;
use serde::Serialize;

use crate::inspection::{DocumentKind, InspectionSession, UploadedFile};
use crate::models::{ComparisonSet, DeviceGeneration, ImageRecord};
use crate::utils::InspectionError;

/// Site code used in file names when the report has none.
pub const UNKNOWN_SITE: &str = "INCONNU";

pub const DATA_FILE_NAME: &str = "processed_data.json";
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

#[derive(Debug, Serialize)]
struct ProcessedData<'a> {
    #[serde(rename = "RVD")]
    report: BTreeMap<&'static str, &'a str>,
    #[serde(rename = "AED")]
    aed: BTreeMap<&'static str, &'a str>,
    generation: DeviceGeneration,
    images: &'a [ImageRecord],
    files: &'a [UploadedFile],
    comparisons: Comparisons<'a>,
}

#[derive(Debug, Serialize)]
struct Comparisons<'a> {
    rvd_vs_aed: &'a ComparisonSet,
    rvd_vs_images: &'a ComparisonSet,
}

/// An uploaded file and the name it gets inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportEntry {
    pub source: String,
    pub archive_name: String,
}

/// Contents of an inspection archive. Writing the archive is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    pub archive_name: String,
    pub processed_data: String,
    pub summary: String,
    pub entries: Vec<ExportEntry>,
}

impl ExportBundle {
    /// File names are built from the report's site code, so a report is required.
    pub fn build(session: &InspectionSession, date: NaiveDate) -> Result<Self, InspectionError> {
        let report = session.report().ok_or_else(|| {
            InspectionError::MissingRecord("verification report data for export naming".to_string())
        })?;

        let site = session.site_code().unwrap_or(UNKNOWN_SITE);
        let date_str = date.format("%Y%m%d").to_string();
        let generation = session.generation();

        let report_map = report.to_label_map();
        let aed_map = session
            .aed_report()
            .filter(|aed| aed.generation == generation)
            .map(|aed| aed.fields.to_label_map())
            .unwrap_or_default();

        let data = ProcessedData {
            report: report_map.clone(),
            aed: aed_map.clone(),
            generation,
            images: session.images(),
            files: session.uploaded_files(),
            comparisons: Comparisons {
                rvd_vs_aed: session.report_vs_device(),
                rvd_vs_images: session.report_vs_images(),
            },
        };
        let processed_data = serde_json::to_string_pretty(&data)?;

        let mut summary = String::from("Résumé de l'inspection\n\n");
        summary.push_str("Données RVD:\n");
        summary.push_str(&serde_json::to_string_pretty(&report_map)?);
        summary.push_str(&format!("\n\nDonnées AED {}:\n", generation));
        summary.push_str(&serde_json::to_string_pretty(&aed_map)?);
        summary.push_str("\n\nComparaisons:\n");
        for (name, set) in [
            ("RVD VS AED", session.report_vs_device()),
            ("RVD VS IMAGES", session.report_vs_images()),
        ] {
            summary.push_str(&format!("{}:\n", name));
            for (topic, result) in set {
                let mark = if result.is_match { "✅" } else { "❌" };
                summary.push_str(&format!("  {}: {}\n", topic.title(), mark));
            }
        }

        let include_images = session.config().include_images_in_export;
        let entries = session
            .uploaded_files()
            .iter()
            .filter_map(|file| {
                let archive_name = match file.kind {
                    DocumentKind::VerificationReport => format!("RVD_{}_{}.pdf", site, date_str),
                    DocumentKind::AedReport => {
                        format!("AED_{}_{}_{}.pdf", generation, site, date_str)
                    }
                    DocumentKind::Image if include_images => {
                        format!("IMAGE_{}_{}_{}", site, date_str, file.name)
                    }
                    DocumentKind::Image => return None,
                };
                Some(ExportEntry {
                    source: file.name.clone(),
                    archive_name,
                })
            })
            .collect::<Vec<_>>();

        let archive_name = format!("Inspection_{}_{}.zip", site, date_str);
        info!("Export bundle {} with {} files", archive_name, entries.len());

        Ok(ExportBundle {
            archive_name,
            processed_data,
            summary,
            entries,
        })
    }
}
