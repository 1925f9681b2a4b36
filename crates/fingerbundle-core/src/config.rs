use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One fingerprint category: a subdirectory of the source root and the bundle it becomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Short label used in progress output and the run summary ("web", "service").
    pub name: String,
    /// Subdirectory name under the source root.
    pub dir: String,
    /// File name of the compressed bundle written into the output directory.
    pub output: String,
}

impl CategoryConfig {
    pub fn new(name: &str, dir: &str, output: &str) -> Self {
        Self {
            name: name.to_string(),
            dir: dir.to_string(),
            output: output.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    /// Recognized file extensions, without the leading dot. Scanned in this order.
    pub extensions: Vec<String>,
    /// Key injected into every record, holding its path relative to the category root.
    pub provenance_key: String,
    pub progress_interval: usize,
    pub max_error_samples: usize,
    pub error_message_width: usize,
    /// gzip level, 0-9.
    pub compression_level: u32,
    pub categories: Vec<CategoryConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            extensions: vec!["yaml".to_string(), "yml".to_string()],
            provenance_key: "_source_file".to_string(),
            progress_interval: 100,
            max_error_samples: 10,
            error_message_width: 50,
            compression_level: 9,
            categories: vec![
                CategoryConfig::new("web", "web-fingerprint", "fingerprinthub_web.json.gz"),
                CategoryConfig::new(
                    "service",
                    "service-fingerprint",
                    "fingerprinthub_service.json.gz",
                ),
            ],
        }
    }
}

/// Load `Config.*` from the working directory (optional), then `FINGERBUNDLE__*` env vars.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(
            Environment::with_prefix("FINGERBUNDLE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Load configuration from an explicit file. The format follows the file extension.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::from(path).required(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
