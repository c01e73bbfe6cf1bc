//! Generate serial-protocol bindings from a JSON message schema.
//!
//! Usage:
//!   mspgen --infile messages.json --outdir output
//!   mspgen --infile messages.json --lang cpp --lang python
//!
//! All artifacts are generated in memory first; any schema or generation
//! error aborts before a single output file is created.

use anyhow::{bail, Context};
use clap::Parser;
use mspgen::emit::{generate_all, write_artifacts, TargetProfile};
use mspgen::schema::MessageCatalog;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mspgen", about = "Serial protocol parser generator")]
struct Args {
    /// JSON message schema.
    #[arg(long, default_value = "messages.json")]
    infile: PathBuf,

    /// Directory for generated sources (one subdirectory per language).
    #[arg(long, default_value = "output")]
    outdir: PathBuf,

    /// Target language(s): cpp, python, java. Repeatable; default is all.
    #[arg(long = "lang")]
    langs: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let profiles = if args.langs.is_empty() {
        TargetProfile::all()
    } else {
        args.langs
            .iter()
            .map(|name| {
                TargetProfile::by_name(name)
                    .ok_or_else(|| anyhow::anyhow!("unknown target language: {name}"))
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let source = std::fs::read_to_string(&args.infile)
        .with_context(|| format!("reading schema {}", args.infile.display()))?;
    let catalog = MessageCatalog::from_json(&source)
        .with_context(|| format!("loading schema {}", args.infile.display()))?;
    if catalog.is_empty() {
        bail!("schema {} defines no messages", args.infile.display());
    }
    tracing::info!(messages = catalog.len(), "schema loaded");

    let artifacts = generate_all(&catalog, &profiles).context("generation failed")?;
    let written =
        write_artifacts(&artifacts, &args.outdir).context("writing generated sources")?;
    for path in &written {
        println!("{}", path.display());
    }
    Ok(())
}
