//! Engine configuration
//!
//! Loaded from TOML. Every section and field is optional; a missing file
//! section falls back to its default.
//!
//! ```toml
//! [logging]
//! profile = "production"
//!
//! [classifier]
//! creation_audit = "require"
//! ```

use serde::Deserialize;
use std::path::Path;

use crate::conflict::CreationAuditPolicy;
use crate::errors::{EntityError, Result};
use crate::logging_facility::Profile;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub logging: LoggingConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierConfig {
    /// Handling of a history whose first def has no creation audit
    pub creation_audit: CreationAuditPolicy,
}

impl EngineConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML, unknown keys or unknown enum values.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`EngineConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| EntityError::Io {
            message: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            EntityError::InvalidConfig { message } => EntityError::InvalidConfig {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }
}
