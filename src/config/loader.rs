//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::{TargetsDocument, DEFAULT_THRESHOLD_SECS};
use crate::config::validation::{validate_snapshot, ValidationError};
use crate::registry::{Snapshot, Target};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

/// Parse a targets document. TOML when the file ends in `.toml`, YAML otherwise.
pub fn parse_document(path: &Path, content: &str) -> Result<TargetsDocument, ConfigError> {
    // An empty YAML stream is a null document, which serde_yaml refuses for a struct.
    if content.trim().is_empty() {
        return Ok(TargetsDocument::default());
    }
    if is_toml(path) {
        Ok(toml::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Build a snapshot from a parsed document.
///
/// Interval and timeout the document leaves out are taken from `previous`.
pub fn resolve(document: TargetsDocument, previous: &Snapshot) -> Snapshot {
    let targets = document
        .targets
        .into_iter()
        .map(|entry| {
            let url = entry.url.trim().to_string();
            let name = entry
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| url.clone());
            Target {
                name,
                url,
                threshold_secs: entry.threshold_seconds.unwrap_or(DEFAULT_THRESHOLD_SECS),
            }
        })
        .collect();

    Snapshot {
        targets,
        interval_secs: document.interval_seconds.unwrap_or(previous.interval_secs),
        timeout_secs: document
            .request_timeout_seconds
            .unwrap_or(previous.timeout_secs),
    }
}

/// Load, resolve and validate a targets file.
pub fn load_snapshot(path: &Path, previous: &Snapshot) -> Result<Snapshot, ConfigError> {
    let content = fs::read_to_string(path)?;
    let document = parse_document(path, &content)?;
    let snapshot = resolve(document, previous);

    validate_snapshot(&snapshot).map_err(ConfigError::Validation)?;

    Ok(snapshot)
}
