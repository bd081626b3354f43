// AED inspection cross-check from the command line.
// Takes the text layer of both PDFs and already-classified image records.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use aed_inspector::{
    models::{AedField, ComparisonSet, DeviceGeneration, FieldName, ImageRecord},
    ExportBundle, InspectionConfig, InspectionError, InspectionSession, Verdict,
};
use clap::Parser;
use log::debug;

#[derive(Parser)]
#[command(name = "aed-inspector")]
#[command(about = "Cross-check an AED verification report against the device report and photographs")]
#[command(version)]
struct Cli {
    /// Text of the verification report ("rapport de vérification")
    #[arg(long)]
    report: PathBuf,

    /// Text of the AED device report
    #[arg(long)]
    aed: PathBuf,

    /// JSON list of image records
    #[arg(long)]
    images: Option<PathBuf>,

    /// Device generation (G5 or G3), overrides the config file
    #[arg(long)]
    generation: Option<DeviceGeneration>,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the processed data as JSON instead of the report
    #[arg(long)]
    json: bool,

    /// More logging (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_comparisons(title: &str, results: &ComparisonSet) {
    println!("\n{}:", title);
    if results.is_empty() {
        println!("  (nothing compared)");
        return;
    }
    for (topic, result) in results {
        println!(
            "  - {}: {} (report: {}, {}: {})",
            topic.title(),
            if result.is_match { "MATCH" } else { "MISMATCH" },
            result.report_value.as_deref().unwrap_or("-"),
            result.counterpart.label(),
            result.counterpart_value.as_deref().unwrap_or("-"),
        );
        for error in &result.errors {
            println!("      ! {}", error);
        }
    }
}

fn print_detailed_report(session: &InspectionSession, verdict: &Verdict) {
    println!("\n===============================================");
    println!("      AED INSPECTION DETAILED REPORT");
    println!("===============================================\n");

    println!("VERIFICATION REPORT:");
    if let Some(report) = session.report() {
        for (label, value) in report.to_label_map() {
            println!("  {}: {}", label, value);
        }
    }

    println!("\nAED {} REPORT:", session.generation());
    if let Some(aed) = session.aed_report() {
        for field in AedField::all() {
            if aed.fields.contains(*field) {
                println!("  {}: {}", field.label(), aed.fields.get(*field));
            }
        }
    }

    println!("\nIMAGES:");
    for image in session.images() {
        println!(
            "  - {} (serial: {}, date: {})",
            image.category.label(),
            image.serial_or_sentinel(),
            image.date_or_sentinel()
        );
    }

    print_comparisons("REPORT VS AED", session.report_vs_device());
    print_comparisons("REPORT VS IMAGES", session.report_vs_images());

    if !session.notices().is_empty() {
        println!("\nNOTICES:");
        for notice in session.notices() {
            println!("  - {}", notice.message);
        }
    }

    println!(
        "\nInspection result: {} ({} topics checked)",
        if verdict.is_compliant { "COMPLIANT" } else { "NON-COMPLIANT" },
        verdict.topics_checked
    );
}

fn run(cli: &Cli) -> Result<Verdict, InspectionError> {
    let mut config = match &cli.config {
        Some(path) => InspectionConfig::load(path)?,
        None => InspectionConfig::default(),
    };
    if let Some(generation) = cli.generation {
        config.device_generation = generation;
    }
    debug!("Effective config: {:?}", config);

    let mut session = InspectionSession::new(config);

    let report_text = fs::read_to_string(&cli.report)?;
    session.ingest_report_text(&cli.report.to_string_lossy(), &report_text);

    let aed_text = fs::read_to_string(&cli.aed)?;
    session.ingest_aed_text(&cli.aed.to_string_lossy(), &aed_text);

    if let Some(path) = &cli.images {
        let records: Vec<ImageRecord> = serde_json::from_str(&fs::read_to_string(path)?)?;
        for record in records {
            session.add_image(record);
        }
    }

    let verdict = session.run_comparisons();

    if cli.json {
        let bundle = ExportBundle::build(&session, chrono::Local::now().date_naive())?;
        println!("{}", bundle.processed_data);
    } else {
        print_detailed_report(&session, &verdict);
    }

    Ok(verdict)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(verdict) if verdict.is_compliant => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("Error running inspection: {}", err);
            ExitCode::from(2)
        }
    }
}
