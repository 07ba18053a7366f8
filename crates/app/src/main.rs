use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use cuadre_core::Registry;
use cuadre_import::{run_batch, FileSource};
use cuadre_report::{compose, group, render_csv};

/// Consolidate provider settlement exports into one per-store report.
#[derive(Parser)]
#[command(name = "cuadre", version, about)]
struct Args {
    /// Template and store-alias registry (TOML).
    #[arg(short, long)]
    registry: PathBuf,

    /// Where to write the consolidated CSV report (stdout if omitted).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Provider export files (CSV).
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let registry_toml = fs::read_to_string(&args.registry)
        .with_context(|| format!("reading registry {}", args.registry.display()))?;
    let registry = Registry::from_toml(&registry_toml)?;
    tracing::info!(
        "Registry loaded: {} templates, {} aliases",
        registry.templates.len(),
        registry.aliases.len()
    );

    // Unreadable files are skipped, like any other per-file failure.
    let mut sources = Vec::new();
    for path in &args.files {
        match fs::read(path) {
            Ok(bytes) => sources.push(FileSource {
                name: file_name_of(path),
                bytes,
            }),
            Err(err) => tracing::error!("Skipping unreadable file {}: {err}", path.display()),
        }
    }

    let batch = run_batch(&sources, &registry);
    for failed in &batch.failures {
        tracing::error!("Failed to decode {}: {}", failed.name, failed.reason);
    }
    for processed in &batch.files {
        let v = &processed.validation;
        tracing::info!(
            "{}: {} rows, {:.0}% mapped, {} stores",
            v.file_name,
            v.stats.total_rows,
            v.stats.percent_mapped,
            v.stats.stores_found.len()
        );
        for warning in &v.warnings {
            tracing::warn!("{}: {warning}", v.file_name);
        }
        for error in &v.errors {
            tracing::error!("{}: {error}", v.file_name);
        }
    }

    let normalized: Vec<_> = batch.files.into_iter().map(|p| p.normalized).collect();
    let dataset = group(&normalized);
    let report = compose(&dataset);
    let rendered = render_csv(&report)?;

    match &args.out {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("writing report {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
