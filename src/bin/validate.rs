//! Schema Validation CLI
//!
//! Validates candidate documents against an observed-schema snapshot and
//! reports findings grouped by component category.
//!
//! Usage:
//!   schema-validate baseline.json candidates/ --strict
//!   schema-validate baseline.json doc.json --out report.json

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docpack_schemas::corpus::{collect_sample_files, load_sample};
use docpack_schemas::store::write_artifact;
use docpack_schemas::{
    load_snapshot, validate, EngineConfig, Severity, ValidateOptions, ValidationReport,
};

#[derive(Parser)]
#[command(name = "schema-validate")]
#[command(about = "Validate documents against an observed schema")]
struct Cli {
    /// Observed-schema snapshot
    schema: PathBuf,

    /// Candidate documents or directories of them
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Optional JSON report output
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Minimum historical frequency for missing-typical-attribute findings
    #[arg(long)]
    threshold: Option<f64>,

    /// Exit with status 1 if any findings are raised
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = EngineConfig::load().context("loading configuration")?;
    if let Some(threshold) = cli.threshold {
        config.missing_attr_threshold = threshold;
    }
    let options = ValidateOptions::from(&config);

    let schema = load_snapshot(&cli.schema)?;
    let files = collect_sample_files(&cli.inputs)?;

    let mut combined = ValidationReport::default();
    for path in &files {
        let sample = load_sample(path)?;
        let report = validate(&schema, &sample, &options)?;
        combined.absorb(report);
    }

    if let Some(out) = &cli.out {
        let json = serde_json::to_string_pretty(&combined)?;
        write_artifact(out, &json)?;
        println!("✅ Wrote report to {}", out.display());
    }

    println!("Validation summary by category:");
    for (category, counts) in &combined.summary_by_category {
        println!(
            "  {}: unknown elements={}, unknown attributes={}, unexpected children={}, missing typical attributes={}",
            category,
            counts.unknown_elements,
            counts.unknown_attributes,
            counts.unexpected_children,
            counts.missing_typical_attributes,
        );
    }
    println!(
        "Totals: high={}, medium={}, low={}",
        combined.count_at(Severity::High),
        combined.count_at(Severity::Medium),
        combined.count_at(Severity::Low),
    );

    if combined.is_clean() {
        println!("✅ No findings");
    }

    Ok(combined.is_clean() || !cli.strict)
}
