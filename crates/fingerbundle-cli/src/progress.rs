use colored::*;
use fingerbundle_core::{LoadFailure, ProgressReporter};
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Mutex;

const RULE_WIDTH: usize = 60;

/// CLI progress reporter using indicatif progress bars.
///
/// - Load phase: progress bar, total known from the scan
/// - Write and compress phases: spinner
pub struct CliReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn set_bar(&self, pb: ProgressBar) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            *guard = Some(pb);
        }
    }

    fn finish_bar(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn spinner(message: String) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        pb.set_message(message);
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

impl ProgressReporter for CliReporter {
    fn on_category_start(&self, category: &str, source_dir: &Path) {
        eprintln!("\n{}", "=".repeat(RULE_WIDTH));
        eprintln!("Processing {} fingerprints", category.to_uppercase().bold());
        eprintln!("{}", "=".repeat(RULE_WIDTH));
        eprintln!("Scanning directory: {}", source_dir.display());
    }

    fn on_category_missing(&self, category: &str, source_dir: &Path) {
        eprintln!(
            "\n  {} {} fingerprint directory not found: {}",
            "⚠".yellow(),
            category,
            source_dir.display()
        );
    }

    fn on_scan_complete(&self, _category: &str, total_files: usize) {
        eprintln!("Found {} yaml files", total_files);

        let pb = ProgressBar::new(total_files as u64);
        if let Ok(style) = ProgressStyle::with_template(
            "  {spinner:.cyan} Loading [{bar:30.cyan/dim}] {pos}/{len} ({percent}%)",
        ) {
            pb.set_style(style.progress_chars("━╸─").tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
        }
        self.set_bar(pb);
    }

    fn on_load_progress(&self, processed: usize, _total: usize) {
        if let Ok(guard) = self.bar.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.set_position(processed as u64);
            }
        }
    }

    fn on_load_complete(&self, loaded: usize, failed: usize, failures: &[LoadFailure]) {
        self.finish_bar();
        eprintln!("\nLoaded: {}", loaded.to_string().green());
        let failed = failed.to_string();
        eprintln!(
            "Failed: {}",
            if failed == "0" { failed.normal() } else { failed.red() }
        );

        if !failures.is_empty() {
            eprintln!("\nFirst {} errors:", failures.len());
            for failure in failures {
                eprintln!("  - {}", failure);
            }
        }
    }

    fn on_write_start(&self, json_path: &Path) {
        self.set_bar(Self::spinner(format!("Saving to {}...", json_path.display())));
    }

    fn on_compress_start(&self, output_path: &Path) {
        self.set_bar(Self::spinner(format!("Compressing to {}...", output_path.display())));
    }

    fn on_bundle_complete(&self, output_path: &Path, records: usize, compressed_bytes: u64) {
        self.finish_bar();
        let kb = compressed_bytes as f64 / 1024.0;
        eprintln!(
            "  \x1b[32m✓\x1b[0m Saved {} fingerprints to {}",
            records,
            output_path.display()
        );
        eprintln!(
            "    Compressed file size: {:.2} KB ({:.2} MB, {})",
            kb,
            kb / 1024.0,
            HumanBytes(compressed_bytes)
        );
    }
}
