// crates/user-api-probe/src/config/settings.rs
// ============================================================================
// Module: Probe Settings
// Description: Resolved probe configuration and validation rules.
// Purpose: Merge defaults, file, and environment layers into one typed value.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! [`ProbeConfig`] is the single resolved configuration handed to the client
//! and the report writer. Layers are applied as defaults, then file, then
//! environment; command-line overrides go through the `override_*` methods.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use super::env::EnvOverrides;
use super::file::ConfigFile;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Base URL of the deployed API the probes were written against.
pub const DEFAULT_BASE_URL: &str = "http://3.73.86.8:3333";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Default maximum send attempts for transient failures.
pub const DEFAULT_MAX_SEND_ATTEMPTS: u32 = 3;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Messages are user-facing and never include secrets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable was invalid.
    #[error("invalid environment: {0}")]
    Env(String),
    /// Config file could not be read.
    #[error("failed to read config file {}: {message}", path.display())]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying I/O error text.
        message: String,
    },
    /// Config file exceeds the size limit.
    #[error("config file exceeds size limit ({actual} > {limit})")]
    TooLarge {
        /// File size in bytes.
        actual: u64,
        /// Limit in bytes.
        limit: u64,
    },
    /// Config file is not UTF-8.
    #[error("config file must be utf-8")]
    Encoding,
    /// Config file is not valid TOML for the schema.
    #[error("invalid config file: {0}")]
    Parse(String),
    /// Base URL failed validation.
    #[error("invalid base url `{url}`: {reason}")]
    BaseUrl {
        /// Offending URL text.
        url: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A numeric setting was out of range.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Setting name.
        field: &'static str,
    },
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Resolved probe configuration.
///
/// # Invariants
/// - `base_url` is an absolute `http`/`https` URL without trailing slash,
///   credentials, query, or fragment.
/// - `timeout` and `max_send_attempts` are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URL of the API under test.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Maximum send attempts for transient failures.
    pub max_send_attempts: u32,
    /// Optional report directory.
    pub run_root: Option<PathBuf>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_send_attempts: DEFAULT_MAX_SEND_ATTEMPTS,
            run_root: None,
        }
    }
}

impl ProbeConfig {
    /// Builds a config for a base URL with default settings otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BaseUrl`] when the URL is invalid.
    pub fn for_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            ..Self::default()
        })
    }

    /// Resolves configuration from defaults, an optional file, and the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any layer fails to load or validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            config.apply_file(ConfigFile::load(path)?)?;
        }
        config.apply_env(EnvOverrides::load().map_err(ConfigError::Env)?)?;
        Ok(config)
    }

    /// Applies a parsed config file layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a file value is invalid.
    pub fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        if let Some(base_url) = file.target.base_url {
            self.override_base_url(&base_url)?;
        }
        if let Some(secs) = file.target.timeout_secs {
            self.override_timeout_secs(secs)?;
        }
        if let Some(attempts) = file.client.max_send_attempts {
            self.override_max_send_attempts(attempts)?;
        }
        if let Some(run_root) = file.report.run_root {
            self.run_root = Some(run_root);
        }
        Ok(())
    }

    /// Applies an environment override layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when an override value is invalid.
    pub fn apply_env(&mut self, env: EnvOverrides) -> Result<(), ConfigError> {
        if let Some(base_url) = env.base_url {
            self.override_base_url(&base_url)?;
        }
        if let Some(timeout) = env.timeout {
            self.timeout = timeout;
        }
        if let Some(attempts) = env.max_send_attempts {
            self.override_max_send_attempts(attempts)?;
        }
        if let Some(run_root) = env.run_root {
            self.run_root = Some(run_root);
        }
        Ok(())
    }

    /// Replaces the base URL after validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::BaseUrl`] when the URL is invalid.
    pub fn override_base_url(&mut self, raw: &str) -> Result<(), ConfigError> {
        self.base_url = normalize_base_url(raw)?;
        Ok(())
    }

    /// Replaces the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] when `secs` is zero.
    pub fn override_timeout_secs(&mut self, secs: u64) -> Result<(), ConfigError> {
        if secs == 0 {
            return Err(ConfigError::NotPositive {
                field: "timeout_secs",
            });
        }
        self.timeout = Duration::from_secs(secs);
        Ok(())
    }

    /// Replaces the send attempt limit.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] when `attempts` is zero.
    pub fn override_max_send_attempts(&mut self, attempts: u32) -> Result<(), ConfigError> {
        if attempts == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_send_attempts",
            });
        }
        self.max_send_attempts = attempts;
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a base URL and strips trailing slashes.
///
/// # Errors
///
/// Returns [`ConfigError::BaseUrl`] when the URL is not an absolute
/// `http`/`https` URL, carries credentials, a query, or a fragment.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let reject = |reason| ConfigError::BaseUrl {
        url: trimmed.to_string(),
        reason,
    };
    let url = Url::parse(trimmed).map_err(|_| reject("not an absolute url"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(reject("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(reject("host is required"));
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(reject("credentials are not allowed"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(reject("query and fragment are not allowed"));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}
