//! Schema Observation CLI
//!
//! Builds an observed-schema snapshot from a corpus of sample documents
//! (JSON-serialized element trees, one file per logical sample).
//!
//! Usage:
//!   schema-observe samples/ --out baseline.json
//!   schema-observe a.json b.json --out schema.json --value-cap 10

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use docpack_schemas::corpus::{collect_sample_files, load_sample};
use docpack_schemas::{save_snapshot, EngineConfig, SchemaBuilder};

#[derive(Parser)]
#[command(name = "schema-observe")]
#[command(about = "Infer an observed schema from sample documents")]
struct Cli {
    /// Sample files or directories of samples
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output snapshot path
    #[arg(short, long, default_value = "observed_schema.json")]
    out: PathBuf,

    /// Max distinct attribute-value samples per attribute
    #[arg(long)]
    value_cap: Option<usize>,

    /// Nesting-depth guard for traversal
    #[arg(long)]
    max_depth: Option<usize>,
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
    let mut config = EngineConfig::load().context("loading configuration")?;
    if let Some(cap) = cli.value_cap {
        config.value_cap = cap;
    }
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }

    let files = collect_sample_files(&cli.inputs)?;
    let mut builder = SchemaBuilder::new(&config);

    for path in &files {
        match load_sample(path) {
            Ok(sample) => builder.merge_corpus(std::iter::once(&sample)),
            Err(err) => {
                eprintln!("⚠️  Skipping {}: {}", path.display(), err);
                builder.record_skip();
            }
        }
    }

    let schema = builder.finish();
    save_snapshot(&schema, &cli.out)?;

    println!("✅ Wrote schema snapshot to {}", cli.out.display());
    println!("   Tags:       {}", schema.tag_count());
    println!("   Attributes: {}", schema.attr_count());
    println!("   Samples:    {}", schema.samples);
    if schema.skipped > 0 {
        println!("   Skipped:    {} (malformed)", schema.skipped);
    }
    Ok(())
}
