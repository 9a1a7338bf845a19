// system-tests/tests/helpers/readiness.rs
// ============================================================================
// Module: Readiness Helpers
// Description: Readiness probes for user API targets.
// Purpose: Ensure servers are ready without arbitrary sleeps.
// Dependencies: tokio, user-api-probe
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use tokio::time::sleep;
use user_api_probe::UserApi;

/// Polls the listing endpoint until it answers or the timeout expires.
pub async fn wait_for_api_ready<A: UserApi + ?Sized>(
    api: &A,
    timeout: Duration,
) -> Result<(), String> {
    let start = Instant::now();
    let mut attempts = 0u32;
    loop {
        attempts = attempts.saturating_add(1);
        match api.list_users().await {
            Ok(_) => return Ok(()),
            Err(err) => {
                if start.elapsed() > timeout {
                    return Err(format!(
                        "user api readiness timeout after {attempts} attempts: {err}"
                    ));
                }
                sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
