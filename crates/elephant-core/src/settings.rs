//! Tunable behaviour for the archive codec and the legacy importer.
//!
//! Settings are plain serde structs so the host application can keep them in
//! its own TOML config file. Every field has a default; an empty document is
//! a valid configuration.
//!
//! ```toml
//! [archive]
//! stretch_iterations = 10000
//! min_password_length = 0
//!
//! [import]
//! keep_timestamps = false
//! strict_fields = false
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};

/// Iteration count written into new archives.
pub const DEFAULT_STRETCH_ITERATIONS: u32 = 10_000;

/// Minimum password length accepted when saving. Zero leaves passwords
/// unrestricted.
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElephantSettings {
    pub archive: ArchiveSettings,
    pub import: ImportSettings,
}

/// Settings applied when writing native archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveSettings {
    /// SHA-256 iterations used to stretch the password. Stored per archive, so
    /// changing it only affects archives saved afterwards.
    pub stretch_iterations: u32,

    /// Passwords shorter than this are refused on save. Zero, the default,
    /// accepts any password. Opening is never restricted.
    pub min_password_length: usize,
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            stretch_iterations: DEFAULT_STRETCH_ITERATIONS,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

/// Settings applied when importing Password Safe databases.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    /// Keep creation, password-change and modification times. Off by default
    /// because timestamps in real Password Safe 2.0 files are often garbage.
    pub keep_timestamps: bool,

    /// Fail on field types the importer does not recognise instead of keeping
    /// them as opaque attributes.
    pub strict_fields: bool,
}

impl ElephantSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let settings: Self = toml::from_str(source)
            .map_err(|e| ArchiveError::InvalidInput(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.archive.validate()
    }
}

impl ArchiveSettings {
    pub fn validate(&self) -> Result<()> {
        if self.stretch_iterations == 0 {
            return Err(ArchiveError::InvalidInput(
                "stretch_iterations must be at least 1".to_string(),
            ));
        }
        if i32::try_from(self.stretch_iterations).is_err() {
            return Err(ArchiveError::InvalidInput(format!(
                "stretch_iterations must not exceed {}",
                i32::MAX
            )));
        }
        Ok(())
    }
}
