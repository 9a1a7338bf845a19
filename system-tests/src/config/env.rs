// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: user-api-probe
// ============================================================================

//! ## Overview
//! Values are read and trimmed with the probe library's env readers. Empty or
//! malformed values fail closed instead of falling back to defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use user_api_probe::config::parse_positive;
use user_api_probe::config::read_env_nonempty;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional artifact root override.
    RunRoot,
    /// Optional minimum timeout in seconds (positive integer).
    TimeoutSeconds,
}

impl SystemTestEnv {
    /// All keys.
    pub const ALL: [Self; 2] = [Self::RunRoot, Self::TimeoutSeconds];

    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "USER_API_PROBE_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "USER_API_PROBE_SYSTEM_TEST_TIMEOUT_SEC",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional artifact root override.
    pub run_root: Option<PathBuf>,
    /// Optional minimum timeout.
    pub timeout: Option<Duration>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a value is not valid UTF-8, is empty, or fails
    /// validation.
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let timeout_key = SystemTestEnv::TimeoutSeconds.as_str();
        let timeout = read_env_nonempty(timeout_key)?
            .map(|value| parse_positive(timeout_key, &value).map(Duration::from_secs))
            .transpose()?;
        Ok(Self {
            run_root,
            timeout,
        })
    }
}
