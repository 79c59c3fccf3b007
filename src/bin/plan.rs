//! Coverage Plan CLI
//!
//! Two workflows around schema coverage:
//! - `combine`: merge labeled delta reports into one deduplicated Markdown
//!   plan, cross-referencing which sample sets exhibit each gap.
//! - `coverage`: measure how much of a reference schema a target schema
//!   exercises, overall and per component category.
//!
//! Usage:
//!   schema-plan combine print=print_delta.json digital=digital_delta.json --out plan.md
//!   schema-plan coverage baseline.json target.json

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docpack_schemas::store::write_artifact;
use docpack_schemas::{coverage, load_snapshot, CoveragePlan, SchemaDelta};

#[derive(Parser)]
#[command(name = "schema-plan")]
#[command(about = "Combine schema deltas into coverage plans and reports")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine labeled delta reports into one Markdown plan
    Combine {
        /// One or more label=path pairs pointing to delta JSON files
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output Markdown file
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Measure coverage of a reference schema by a target schema
    Coverage {
        /// Reference snapshot (the catalogue)
        reference: PathBuf,

        /// Target snapshot (what was exercised)
        target: PathBuf,

        /// Optional JSON report output
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn load_delta(path: &Path) -> anyhow::Result<SchemaDelta> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading delta report {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parsing delta report {}", path.display()))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Combine { inputs, out } => {
            let mut labeled = Vec::new();
            for input in &inputs {
                let (label, path) = input
                    .split_once('=')
                    .ok_or_else(|| anyhow!("expected label=path, got: {}", input))?;
                let delta = load_delta(Path::new(path.trim()))?;
                labeled.push((label.trim().to_string(), delta));
            }

            let plan = CoveragePlan::combine(&labeled);
            write_artifact(&out, &plan.render())?;
            println!("✅ Wrote coverage plan to {}", out.display());
            if plan.is_empty() {
                println!("   No gaps across {} delta(s)", labeled.len());
            }
            Ok(())
        }

        Commands::Coverage {
            reference,
            target,
            out,
        } => {
            let reference_schema = load_snapshot(&reference)?;
            let target_schema = load_snapshot(&target)?;

            let report = coverage(&reference_schema, &target_schema);

            if let Some(out) = &out {
                let json = serde_json::to_string_pretty(&report)?;
                write_artifact(out, &json)?;
                println!("✅ Wrote coverage report to {}", out.display());
            }

            println!(
                "Overall coverage: {:.1}% ({}/{})",
                report.total.percent(),
                report.total.exercised,
                report.total.catalogued,
            );
            for (category, stat) in &report.by_category {
                println!(
                    "  {}: {:.1}% ({}/{})",
                    category,
                    stat.percent(),
                    stat.exercised,
                    stat.catalogued,
                );
            }
            Ok(())
        }
    }
}
