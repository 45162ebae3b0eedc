mod cli;
mod error;

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use cbnorm_archive::ZipArchiver;
use cbnorm_config::{Registry, Settings};
use cbnorm_library::{NormalizeEvent, Operations, Outcome, Pipeline, Report, classify, normalize};
use cbnorm_metadata::{Priority, merge};
use clap::Parser;
use exn::ResultExt;
use futures::StreamExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = ?e, "{}", *e);
            ExitCode::FAILURE
        },
    }
}

/// `Ok(false)` when at least one archive failed.
fn run(cli: Cli) -> Result<bool> {
    let settings = Settings::load(cli.config.as_deref()).or_raise(|| ErrorKind::Settings)?;
    let registry = Registry::load(cli.registry.as_deref().unwrap_or(settings.registry.as_path()));
    match cli.command {
        Command::Promos { archives } => run_archives(settings, registry, archives, Operations::default().with_promos()),
        Command::Dedupe { archives } => {
            run_archives(settings, registry, archives, Operations::default().with_hash_duplicates())
        },
        Command::Clean { archives } => run_archives(settings, registry, archives, Operations::all()),
        Command::Classify { dir } => print_classification(&dir, &registry),
        Command::Merge { base, overlay, priority } => print_merge(&base, &overlay, priority),
    }
}

fn run_archives(settings: Settings, registry: Registry, archives: Vec<PathBuf>, ops: Operations) -> Result<bool> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build().or_raise(|| ErrorKind::Runtime)?;
    let pipeline = Pipeline::new(Arc::new(registry), Arc::new(ZipArchiver::new()))
        .with_render_options(settings.render_options());
    let failures = runtime.block_on(async {
        let mut failures = 0usize;
        let mut events = std::pin::pin!(normalize(pipeline, archives, ops, settings.concurrency));
        while let Some(event) = events.next().await {
            match event {
                Ok(NormalizeEvent::Processed { archive, outcome }) => print_outcome(&archive, &outcome),
                Ok(NormalizeEvent::Started | NormalizeEvent::Complete) => {},
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = ?e, "{}", *e);
                },
            }
        }
        failures
    });
    if failures > 0 {
        tracing::warn!(failures, "Some archives could not be processed and were left untouched");
    }
    Ok(failures == 0)
}

fn print_outcome(archive: &Path, outcome: &Outcome) {
    let status = match outcome {
        Outcome::Repacked(_) => "repacked",
        Outcome::Unchanged(_) => "unchanged",
    };
    println!("{}: {status}", archive.display());
    let Report { hash_removals, promos, comixology, .. } = outcome.report();
    for removal in hash_removals {
        println!("  removed {} ({}: {})", removal.path.display(), removal.description, removal.digest);
    }
    if let Some(promos) = promos {
        for path in &promos.removed {
            println!("  removed promo {}", path.display());
        }
        if !promos.found {
            println!("  possible promos: {}", promos.candidates.join(" "));
        }
    }
    for path in comixology {
        println!("  removed {}", path.display());
    }
}

fn print_classification(dir: &Path, registry: &Registry) -> Result<bool> {
    let classification = classify(dir, registry).or_raise(|| ErrorKind::Classify)?;
    for file in &classification.files {
        println!("{:<15} {}", file.category, file.path.display());
    }
    let metadata = &classification.metadata;
    if !metadata.is_empty {
        let issue = metadata.issue.as_deref().unwrap_or("?");
        println!("metadata: {} #{issue}", metadata.series.as_deref().unwrap_or("unknown series"));
    }
    Ok(true)
}

fn print_merge(base: &Path, overlay: &Path, priority: Priority) -> Result<bool> {
    let base = fs::read_to_string(base).or_raise(|| ErrorKind::Io)?;
    let overlay = fs::read_to_string(overlay).or_raise(|| ErrorKind::Io)?;
    println!("{}", merge(&base, &overlay, priority).or_raise(|| ErrorKind::Merge)?);
    Ok(true)
}
