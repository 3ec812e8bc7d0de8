//! Load object settings from storage
//!
//! `TomlDefinitionLoader` reads one TOML file per object. Hosts with their
//! own storage implement `DefinitionLoader` instead.

use std::path::Path;
use thiserror::Error;

use super::schema::ObjectSettings;

/// Errors that can occur when loading an object definition
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Settings parsed but are inconsistent
    #[error("Invalid object '{name}': {}", errors.join(", "))]
    Invalid { name: String, errors: Vec<String> },
}

/// Source of raw object settings
pub trait DefinitionLoader {
    fn load(&self, name: &str, path: &Path) -> Result<ObjectSettings, ConfigError>;
}

/// Loader for `.toml` object files
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlDefinitionLoader;

impl TomlDefinitionLoader {
    pub fn new() -> Self {
        Self
    }

    /// Parse settings from a TOML string
    pub fn parse(&self, content: &str) -> Result<ObjectSettings, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl DefinitionLoader for TomlDefinitionLoader {
    fn load(&self, _name: &str, path: &Path) -> Result<ObjectSettings, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        self.parse(&content)
    }
}
