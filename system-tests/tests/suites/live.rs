// system-tests/tests/suites/live.rs
// ============================================================================
// Module: Live Target Tests
// Description: Runs the probe suite against the configured deployed API.
// Purpose: Check a real deployment against the contract.
// Dependencies: system-tests helpers, user-api-probe
// ============================================================================

//! ## Overview
//! The target comes from `ProbeConfig::load`: defaults, then
//! `USER_API_PROBE_*` environment overrides. Users created here persist on
//! the target.

use helpers::artifacts::TestReporter;
use helpers::harness::require;
use user_api_probe::OutcomeStatus;
use user_api_probe::ProbeConfig;
use user_api_probe::ProbeSuite;
use user_api_probe::UserApiClient;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn live_target_honors_contract() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("live_target_honors_contract")?;
    let config = ProbeConfig::load(None)?;
    let client = UserApiClient::new(&config)?;

    let report = ProbeSuite::new(&client).run().await;
    let artifacts = reporter.artifacts().write_suite(&report, &client.transcript())?;
    let failures: Vec<String> = report
        .outcomes
        .iter()
        .filter(|outcome| outcome.status == OutcomeStatus::Failed)
        .map(|outcome| {
            let detail = outcome.detail.as_deref().unwrap_or_default();
            format!("{} [{}]: {detail}", outcome.probe, outcome.case)
        })
        .collect();
    require(report.is_success(), format!("{} failed: {}", config.base_url, failures.join("; ")))?;

    reporter.finish("pass", vec![format!("target {}", config.base_url)], artifacts)?;
    Ok(())
}
