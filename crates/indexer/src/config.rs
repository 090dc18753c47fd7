use crate::error::{IndexerError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File names that are indexed
pub const DEFAULT_INCLUDE_PATTERN: &str = r"\.(js|ts|jsx|tsx)$";

/// Full paths that are pruned from the walk
pub const DEFAULT_EXCLUDE_PATTERN: &str = r"node_modules|\.git";

/// Configuration for a codebase scan
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IndexerConfig {
    /// Regex matched against file names
    pub include_pattern: String,

    /// Regex matched against full paths; matching directories are not entered
    pub exclude_pattern: String,

    /// Extensions (without the dot) of UI component files
    pub component_extensions: Vec<String>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self {
            include_pattern: DEFAULT_INCLUDE_PATTERN.to_string(),
            exclude_pattern: DEFAULT_EXCLUDE_PATTERN.to_string(),
            component_extensions: vec!["tsx".to_string(), "jsx".to_string()],
        }
    }
}

impl IndexerConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| IndexerError::invalid_config(format!("invalid TOML: {e}")))?;
        config.validate().map_err(IndexerError::invalid_config)?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&raw)
    }

    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        Regex::new(&self.include_pattern)
            .map_err(|e| format!("include_pattern is not a valid regex: {e}"))?;
        Regex::new(&self.exclude_pattern)
            .map_err(|e| format!("exclude_pattern is not a valid regex: {e}"))?;

        if let Some(bad) = self
            .component_extensions
            .iter()
            .find(|ext| ext.is_empty() || ext.starts_with('.'))
        {
            return Err(format!(
                "component extension {bad:?} must be non-empty and given without a leading dot"
            ));
        }

        Ok(())
    }

    pub(crate) fn include_regex(&self) -> Result<Regex> {
        Regex::new(&self.include_pattern).map_err(|e| IndexerError::invalid_config(e.to_string()))
    }

    pub(crate) fn exclude_regex(&self) -> Result<Regex> {
        Regex::new(&self.exclude_pattern).map_err(|e| IndexerError::invalid_config(e.to_string()))
    }

    /// Check whether `path` is a UI component file
    #[must_use]
    pub fn is_component(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.component_extensions.iter().any(|c| c == ext))
    }
}
