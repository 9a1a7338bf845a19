// crates/user-api-probe/src/config/mod.rs
// ============================================================================
// Module: Probe Configuration
// Description: Layered configuration for the user API probe.
// Purpose: Resolve target URL, timeouts, retries, and report roots.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Probe configuration is resolved from built-in defaults, an optional TOML
//! file, and environment variables, in that order. Every layer is validated
//! and invalid values fail closed.
//! Security posture: environment and file inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;
mod file;
mod settings;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::EnvOverrides;
pub use env::ProbeEnv;
pub use env::parse_positive;
pub use env::read_env_nonempty;
pub use env::read_env_strict;
pub use file::ClientSection;
pub use file::ConfigFile;
pub use file::MAX_CONFIG_FILE_BYTES;
pub use file::ReportSection;
pub use file::TargetSection;
pub use settings::ConfigError;
pub use settings::DEFAULT_BASE_URL;
pub use settings::DEFAULT_MAX_SEND_ATTEMPTS;
pub use settings::DEFAULT_TIMEOUT;
pub use settings::ProbeConfig;
pub use settings::normalize_base_url;
