pub mod bundle;
pub mod config;
mod document;
pub mod engine;
pub mod error;
pub mod loader;
pub mod progress;
pub mod scanner;

pub use self::config::{AppConfig, CategoryConfig};
pub use engine::{BundleEngine, CategoryResult, RunSummary};
pub use error::Error;
pub use loader::{LoadFailure, LoadOutcome, RecordLoader};
pub use progress::{ProgressReporter, SilentReporter};
