//! Reference data (tea types, sources, tags) provisioned ahead of any
//! scrape run. The pipeline reads these tables but never creates rows in
//! them; `teadb seed` loads them from a YAML file.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReferenceFile {
    pub tea_types: Vec<String>,
    pub sources: Vec<SourceConfig>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Load and validate the reference data file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_reference(path: &Path) -> Result<ReferenceFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReferenceFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let reference: ReferenceFile = serde_yaml::from_str(&content)?;
    validate_reference(&reference)?;

    Ok(reference)
}

fn validate_reference(reference: &ReferenceFile) -> Result<(), ConfigError> {
    if reference.tea_types.is_empty() {
        return Err(ConfigError::Validation(
            "at least one tea type is required".to_string(),
        ));
    }

    check_unique("tea type", reference.tea_types.iter().map(String::as_str))?;
    check_unique("tag", reference.tags.iter().map(String::as_str))?;
    check_unique("source", reference.sources.iter().map(|s| s.name.as_str()))?;

    for source in &reference.sources {
        let url = source.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "source '{}' has invalid url '{}'; must start with http:// or https://",
                source.name, source.url
            )));
        }
    }

    Ok(())
}

fn check_unique<'a>(
    what: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{what} name must be non-empty"
            )));
        }
        if !seen.insert(name.trim().to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate {what}: '{name}'"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "reference_test.rs"]
mod tests;
