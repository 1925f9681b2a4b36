use crate::loader::LoadFailure;
use std::path::Path;

/// Trait for reporting bundling progress.
///
/// CLI implements with indicatif/colored console output, tests use `SilentReporter`
/// or a recording implementation. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_category_start(&self, _category: &str, _source_dir: &Path) {}
    fn on_category_missing(&self, _category: &str, _source_dir: &Path) {}
    fn on_scan_complete(&self, _category: &str, _total_files: usize) {}
    /// Called every `progress_interval` files and once more when loading finishes.
    fn on_load_progress(&self, _processed: usize, _total: usize) {}
    fn on_load_complete(&self, _loaded: usize, _failed: usize, _failures: &[LoadFailure]) {}
    fn on_write_start(&self, _json_path: &Path) {}
    fn on_compress_start(&self, _output_path: &Path) {}
    fn on_bundle_complete(&self, _output_path: &Path, _records: usize, _compressed_bytes: u64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
