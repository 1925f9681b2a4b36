use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "fingerbundle")]
#[command(about = "Bundle FingerprintHub web and service fingerprints into gzip JSON", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// FingerprintHub root containing web-fingerprint/ and service-fingerprint/
    pub source: Option<PathBuf>,

    /// Directory for the generated bundles [default: configured output_dir, "."]
    pub output: Option<PathBuf>,

    /// Load configuration from this file instead of ./Config.*
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Read a generated bundle and report what it contains
    Inspect {
        /// Bundle file (.json.gz or plain .json)
        bundle: PathBuf,
        /// List every record's source file
        #[arg(long)]
        show_sources: bool,
    },
    /// Print configuration values
    PrintConfig,
}
