mod commands;
mod logging;
mod progress;
mod summary;

use std::collections::HashSet;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use fingerbundle_core::{config, AppConfig, BundleEngine};
use progress::CliReporter;
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let loaded_config = match args.config.as_deref() {
        Some(path) => config::load_configuration_from(path),
        None => config::load_configuration(),
    };
    let config = match loaded_config {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match (args.command, args.source) {
        (Some(Commands::Inspect { bundle, show_sources }), _) => {
            run_inspect(&config, &bundle, show_sources)
        }
        (Some(Commands::PrintConfig), _) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        (None, Some(source)) => {
            let mut config = config;
            if let Some(output) = args.output {
                config.output_dir = output;
            }
            run_bundle(config, &source)
        }
        (None, None) => {
            let _ = Cli::command().print_long_help();
            return ExitCode::FAILURE;
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run_bundle(config: AppConfig, source: &Path) -> anyhow::Result<()> {
    let engine = BundleEngine::new(config);
    let reporter = CliReporter::new();
    let summary = engine.run(source, &reporter)?;

    println!("\n{}", "=".repeat(60));
    println!("SUMMARY");
    println!("{}", "=".repeat(60));
    println!("{}", summary::render_summary(&summary));

    info!(
        "{} fingerprints bundled, {} files failed",
        format!("{}", summary.total_loaded()).green(),
        format!("{}", summary.total_failed()).red(),
    );

    Ok(())
}

fn run_inspect(config: &AppConfig, bundle: &Path, show_sources: bool) -> anyhow::Result<()> {
    let records = fingerbundle_core::bundle::read_bundle(bundle)
        .with_context(|| format!("reading {}", bundle.display()))?;

    let sources: Vec<&str> = records
        .iter()
        .filter_map(|r| r.get(&config.provenance_key).and_then(|v| v.as_str()))
        .collect();
    let distinct: HashSet<&str> = sources.iter().copied().collect();

    println!("{}: {} records", bundle.display(), records.len());
    println!("{} distinct source files", distinct.len());
    if sources.len() < records.len() {
        println!(
            "{} records without a {} field",
            format!("{}", records.len() - sources.len()).yellow(),
            config.provenance_key
        );
    }

    if show_sources {
        for source in sources {
            println!("  {}", source);
        }
    }

    Ok(())
}
