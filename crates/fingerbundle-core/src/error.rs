use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Invalid bundle {}: {reason}", .path.display())]
    InvalidBundle { path: PathBuf, reason: String },
}
