// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Stub Harness
// Description: Spawns the user API stub and a probe client bound to it.
// Purpose: Give each test an isolated target reachable over real HTTP.
// Dependencies: system-tests, user-api-probe
// ============================================================================

use std::time::Duration;

use system_tests::StubFaults;
use system_tests::UserApiStub;
use system_tests::UserApiStubHandle;
use user_api_probe::ProbeConfig;
use user_api_probe::ProbeKind;
use user_api_probe::ProbeSuite;
use user_api_probe::SuiteReport;
use user_api_probe::UserApiClient;

use super::readiness::wait_for_api_ready;
use super::timeouts::resolve_timeout;

/// Default readiness and request timeout for stub-backed tests.
const STUB_TIMEOUT: Duration = Duration::from_secs(5);

/// A running stub and a client pointed at it.
pub struct StubTarget {
    /// Running stub; dropping it stops the server.
    pub server: UserApiStubHandle,
    /// Probe client for the stub.
    pub client: UserApiClient,
}

impl StubTarget {
    /// Runs the suite (optionally a selection) against the stub.
    pub async fn run_suite(&self, selection: &[ProbeKind]) -> SuiteReport {
        ProbeSuite::new(&self.client).with_selection(selection).run().await
    }
}

/// Spawns a compliant stub.
pub async fn spawn_stub() -> Result<StubTarget, Box<dyn std::error::Error>> {
    spawn_stub_with_faults(StubFaults::default()).await
}

/// Spawns a stub with injected faults and waits until it answers.
pub async fn spawn_stub_with_faults(
    faults: StubFaults,
) -> Result<StubTarget, Box<dyn std::error::Error>> {
    let server = UserApiStub::new(faults).spawn()?;
    let timeout = resolve_timeout(STUB_TIMEOUT)?;
    let mut config = ProbeConfig::for_base_url(server.base_url())?;
    config.timeout = timeout;
    let client = UserApiClient::new(&config)?;
    wait_for_api_ready(&client, timeout).await?;
    Ok(StubTarget {
        server,
        client,
    })
}

/// Fails with `message` unless `condition` holds.
pub fn require(
    condition: bool,
    message: impl Into<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if condition { Ok(()) } else { Err(message.into().into()) }
}

/// Fails with both values unless they are equal.
pub fn require_eq<T: PartialEq + std::fmt::Debug>(
    left: &T,
    right: &T,
    context: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if left == right {
        Ok(())
    } else {
        Err(format!("{context}: left={left:?} right={right:?}").into())
    }
}
