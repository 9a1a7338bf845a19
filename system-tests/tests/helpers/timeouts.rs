// system-tests/tests/helpers/timeouts.rs
// ============================================================================
// Module: System Test Timeouts
// Description: Centralized timeout configuration with env overrides.
// Purpose: Keep system-test timeouts consistent and configurable across suites.
// ============================================================================

use std::time::Duration;

use system_tests::config::SystemTestConfig;

/// Returns the effective timeout, honoring `USER_API_PROBE_SYSTEM_TEST_TIMEOUT_SEC`.
/// The override acts as a minimum so explicitly longer timeouts are kept.
pub fn resolve_timeout(requested: Duration) -> Result<Duration, String> {
    let config = SystemTestConfig::load()?;
    Ok(config.timeout.map_or(requested, |minimum| requested.max(minimum)))
}
