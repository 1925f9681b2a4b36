use crate::bundle;
use crate::config::{AppConfig, CategoryConfig};
use crate::error::Error;
use crate::loader::{LoadFailure, LoadOutcome, RecordLoader};
use crate::progress::ProgressReporter;
use crate::scanner;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub struct BundleEngine {
    config: AppConfig,
}

#[derive(Debug, Clone)]
pub struct CategoryResult {
    pub name: String,
    pub source_dir: PathBuf,
    pub output_path: PathBuf,
    pub files_found: usize,
    pub loaded: usize,
    pub failed: usize,
    /// Documents that parsed but were empty; counted as neither loaded nor failed.
    pub skipped: usize,
    /// First `max_error_samples` failures, in discovery order.
    pub failures: Vec<LoadFailure>,
    pub compressed_bytes: u64,
    pub duration: Duration,
}

#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// One entry per category whose directory existed, in configured order.
    pub categories: Vec<CategoryResult>,
}

impl RunSummary {
    pub fn get(&self, name: &str) -> Option<&CategoryResult> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn total_loaded(&self) -> usize {
        self.categories.iter().map(|c| c.loaded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.categories.iter().map(|c| c.failed).sum()
    }
}

impl BundleEngine {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Bundle every configured category found under `source_root`:
    /// 1. Scan the category directory for fingerprint files
    /// 2. Load and tag each document, skipping failures
    /// 3. Write the records as JSON and gzip them into the output directory
    ///
    /// Missing category directories are reported and left out of the summary.
    pub fn run(
        &self,
        source_root: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<RunSummary, Error> {
        if !source_root.is_dir() {
            return Err(Error::SourceNotFound(source_root.to_path_buf()));
        }

        let output_dir = self.config.output_dir.as_path();
        fs::create_dir_all(output_dir)?;
        info!(
            "Bundling fingerprints from {} into {}",
            source_root.display(),
            output_dir.display()
        );

        let mut summary = RunSummary::default();
        for category in &self.config.categories {
            let source_dir = source_root.join(&category.dir);
            if !source_dir.is_dir() {
                warn!(
                    "{} fingerprint directory not found: {}",
                    category.name,
                    source_dir.display()
                );
                reporter.on_category_missing(&category.name, &source_dir);
                continue;
            }

            let output_path = output_dir.join(&category.output);
            let result = self.bundle_category(category, &source_dir, &output_path, reporter)?;
            summary.categories.push(result);
        }

        Ok(summary)
    }

    /// Run the scan, load, serialize and compress stages for a single category.
    pub fn bundle_category(
        &self,
        category: &CategoryConfig,
        source_dir: &Path,
        output_path: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<CategoryResult, Error> {
        let start = Instant::now();
        reporter.on_category_start(&category.name, source_dir);

        // Phase 1: Scan
        info!("Scanning {} for {} fingerprints...", source_dir.display(), category.name);
        let files = scanner::scan_fingerprint_files(source_dir, &self.config.extensions);
        let total = files.len();
        reporter.on_scan_complete(&category.name, total);

        // Phase 2: Load
        let loader = RecordLoader::new(
            &self.config.provenance_key,
            self.config.error_message_width,
        );
        let interval = self.config.progress_interval.max(1);
        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut failed = 0usize;
        let mut skipped = 0usize;

        for (i, path) in files.iter().enumerate() {
            match loader.load(path, source_dir) {
                LoadOutcome::Loaded(record) => records.push(record),
                LoadOutcome::Empty => skipped += 1,
                LoadOutcome::Failed(failure) => {
                    failed += 1;
                    warn!("Failed to load {}: {}", path.display(), failure.message);
                    if failures.len() < self.config.max_error_samples {
                        failures.push(failure);
                    }
                }
            }

            let processed = i + 1;
            if processed % interval == 0 || processed == total {
                reporter.on_load_progress(processed, total);
            }
        }

        let loaded = records.len();
        reporter.on_load_complete(loaded, failed, &failures);
        debug!(
            "{}: {} loaded, {} failed, {} empty",
            category.name, loaded, failed, skipped
        );

        // Phase 3: Serialize + compress
        let compressed_bytes = bundle::write_bundle(
            &records,
            output_path,
            self.config.compression_level,
            reporter,
        )?;
        drop(records);
        reporter.on_bundle_complete(output_path, loaded, compressed_bytes);

        let duration = start.elapsed();
        info!(
            "Saved {} {} fingerprints to {} in {:.2}s",
            loaded,
            category.name,
            output_path.display(),
            duration.as_secs_f64()
        );

        Ok(CategoryResult {
            name: category.name.clone(),
            source_dir: source_dir.to_path_buf(),
            output_path: output_path.to_path_buf(),
            files_found: total,
            loaded,
            failed,
            skipped,
            failures,
            compressed_bytes,
            duration,
        })
    }
}
