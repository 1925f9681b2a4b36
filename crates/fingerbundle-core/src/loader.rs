use crate::document::parse_document;
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Component, Path};
use tracing::trace;

/// A file that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub file_name: String,
    /// Error text, already truncated to the configured width.
    pub message: String,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.message)
    }
}

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Map<String, Value>),
    /// Parsed fine but held nothing worth keeping (null, `{}`, `[]`, `""`, `false`, `0`).
    Empty,
    Failed(LoadFailure),
}

/// Parses fingerprint documents and tags them with their path relative to a category root.
#[derive(Debug, Clone)]
pub struct RecordLoader {
    provenance_key: String,
    message_width: usize,
}

impl RecordLoader {
    pub fn new(provenance_key: &str, message_width: usize) -> Self {
        Self {
            provenance_key: provenance_key.to_string(),
            message_width,
        }
    }

    pub fn load(&self, path: &Path, base_dir: &Path) -> LoadOutcome {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => return LoadOutcome::Failed(self.failure(path, &err.to_string())),
        };

        let value = match parse_document(&text) {
            Ok(Some(value)) => value,
            Ok(None) => return LoadOutcome::Empty,
            Err(message) => return LoadOutcome::Failed(self.failure(path, &message)),
        };

        if is_empty_value(&value) {
            trace!("Skipping empty document {}", path.display());
            return LoadOutcome::Empty;
        }

        match value {
            Value::Object(mut record) => {
                record.insert(
                    self.provenance_key.clone(),
                    Value::String(relative_source_path(path, base_dir)),
                );
                LoadOutcome::Loaded(record)
            }
            other => LoadOutcome::Failed(self.failure(
                path,
                &format!("document is a {}, not a mapping", value_kind(&other)),
            )),
        }
    }

    fn failure(&self, path: &Path, message: &str) -> LoadFailure {
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        LoadFailure {
            file_name,
            message: truncate_chars(message, self.message_width),
        }
    }
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Path of `path` relative to `base_dir`, always `/`-separated.
pub fn relative_source_path(path: &Path, base_dir: &Path) -> String {
    let relative = path.strip_prefix(base_dir).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn truncate_chars(message: &str, width: usize) -> String {
    message.chars().take(width).collect()
}
