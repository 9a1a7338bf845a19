// crates/user-api-probe/src/config/file.rs
// ============================================================================
// Module: Probe Config File
// Description: TOML configuration file schema and bounded loader.
// Purpose: Allow checked-in probe targets without environment plumbing.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! The config file is a small TOML document:
//!
//! ```toml
//! [target]
//! base_url = "http://127.0.0.1:3333"
//! timeout_secs = 5
//!
//! [client]
//! max_send_attempts = 3
//!
//! [report]
//! run_root = "target/user-api-probe/nightly"
//! ```
//!
//! Unknown keys are rejected. Files are size-bounded and must be UTF-8.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use super::settings::ConfigError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum accepted config file size in bytes.
pub const MAX_CONFIG_FILE_BYTES: u64 = 1024 * 1024;

// ============================================================================
// SECTION: Schema
// ============================================================================

/// Parsed config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Target API settings.
    #[serde(default)]
    pub target: TargetSection,
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientSection,
    /// Report output settings.
    #[serde(default)]
    pub report: ReportSection,
}

/// `[target]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSection {
    /// Base URL of the API under test.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[client]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientSection {
    /// Maximum send attempts for transient failures.
    pub max_send_attempts: Option<u32>,
}

/// `[report]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// Directory receiving run reports.
    pub run_root: Option<PathBuf>,
}

impl ConfigFile {
    /// Loads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read, exceeds
    /// [`MAX_CONFIG_FILE_BYTES`], is not UTF-8, or is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        if metadata.len() > MAX_CONFIG_FILE_BYTES {
            return Err(ConfigError::TooLarge {
                actual: metadata.len(),
                limit: MAX_CONFIG_FILE_BYTES,
            });
        }
        let bytes = fs::read(path).map_err(|err| ConfigError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let text = String::from_utf8(bytes).map_err(|_| ConfigError::Encoding)?;
        Self::parse(&text)
    }

    /// Parses config file text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid for the schema.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))
    }
}
