//! Schema Delta CLI
//!
//! Diffs two observed-schema snapshots and reports what structure appeared,
//! disappeared, or changed. Optionally renders the delta as a Markdown
//! checklist for expanding sample coverage.
//!
//! Usage:
//!   schema-delta baseline.json current.json --out delta.json
//!   schema-delta baseline.json current.json --checklist checklist.md --label print

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use docpack_schemas::store::write_artifact;
use docpack_schemas::{load_snapshot, render_checklist, SchemaDelta};

#[derive(Parser)]
#[command(name = "schema-delta")]
#[command(about = "Diff two observed-schema snapshots")]
struct Cli {
    /// Base snapshot
    base: PathBuf,

    /// New snapshot
    new: PathBuf,

    /// Optional JSON delta output
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Optional Markdown checklist output
    #[arg(long)]
    checklist: Option<PathBuf>,

    /// Label for the checklist heading
    #[arg(long, default_value = "base vs new")]
    label: String,
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

fn run(cli: Cli) -> anyhow::Result<()> {
    let base = load_snapshot(&cli.base)?;
    let new = load_snapshot(&cli.new)?;

    let delta = SchemaDelta::diff(&base, &new);
    let summary = delta.summary();

    if let Some(out) = &cli.out {
        let json = serde_json::to_string_pretty(&delta)?;
        write_artifact(out, &json)?;
        println!("✅ Wrote delta to {}", out.display());
    }

    if let Some(path) = &cli.checklist {
        write_artifact(path, &render_checklist(&delta, &cli.label))?;
        println!("✅ Wrote checklist to {}", path.display());
    }

    println!("Schema delta summary:");
    println!("  added tags:    {}", summary.added_tags);
    println!("  removed tags:  {}", summary.removed_tags);
    println!("  changed tags:  {}", summary.changed_tags);
    println!("  added attrs:   {}", summary.added_attrs);
    println!("  removed attrs: {}", summary.removed_attrs);
    println!("  value changes: {}", summary.value_changes);

    if delta.is_empty() {
        println!("✅ Schemas are identical");
    }
    Ok(())
}
