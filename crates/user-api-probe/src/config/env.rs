// crates/user-api-probe/src/config/env.rs
// ============================================================================
// Module: Probe Environment
// Description: Environment-backed overrides for probe configuration.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 and empty values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for probe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeEnv {
    /// Base URL of the API under test.
    BaseUrl,
    /// Request timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Maximum send attempts for transient failures (positive integer).
    MaxAttempts,
    /// Directory receiving run reports.
    RunRoot,
}

impl ProbeEnv {
    /// All recognized keys.
    pub const ALL: [Self; 4] = [Self::BaseUrl, Self::TimeoutSeconds, Self::MaxAttempts, Self::RunRoot];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "USER_API_PROBE_BASE_URL",
            Self::TimeoutSeconds => "USER_API_PROBE_TIMEOUT_SEC",
            Self::MaxAttempts => "USER_API_PROBE_MAX_ATTEMPTS",
            Self::RunRoot => "USER_API_PROBE_RUN_ROOT",
        }
    }
}

// ============================================================================
// SECTION: Override Types
// ============================================================================

/// Overrides read from environment variables; `None` means "not set".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvOverrides {
    /// Base URL override (unvalidated).
    pub base_url: Option<String>,
    /// Timeout override.
    pub timeout: Option<Duration>,
    /// Send attempt override.
    pub max_send_attempts: Option<u32>,
    /// Report root override.
    pub run_root: Option<PathBuf>,
}

impl EnvOverrides {
    /// Loads overrides from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// or fails numeric validation.
    pub fn load() -> Result<Self, String> {
        let base_url = read_env_nonempty(ProbeEnv::BaseUrl.as_str())?;
        let timeout = read_env_nonempty(ProbeEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_positive(ProbeEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?
            .map(Duration::from_secs);
        let max_send_attempts = read_env_nonempty(ProbeEnv::MaxAttempts.as_str())?
            .map(|value| parse_positive(ProbeEnv::MaxAttempts.as_str(), &value))
            .transpose()?
            .map(|value| {
                u32::try_from(value)
                    .map_err(|_| format!("{} is too large", ProbeEnv::MaxAttempts.as_str()))
            })
            .transpose()?;
        let run_root = read_env_nonempty(ProbeEnv::RunRoot.as_str())?.map(PathBuf::from);
        Ok(Self {
            base_url,
            timeout,
            max_send_attempts,
            run_root,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable, trims it, and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is not valid UTF-8 or is set but empty
/// or whitespace.
pub fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value.trim().to_string())),
        None => Ok(None),
    }
}

/// Parses a strictly positive integer from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is non-numeric or zero.
pub fn parse_positive(name: &str, raw: &str) -> Result<u64, String> {
    let value: u64 =
        raw.trim().parse().map_err(|_| format!("{name} must be a positive integer"))?;
    if value == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(value)
}
