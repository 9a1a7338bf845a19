// system-tests/tests/suites/list_users.rs
// ============================================================================
// Module: List Users Tests
// Description: Listing probe and full suite runs against the compliant stub.
// Purpose: Validate record completeness and end-to-end report artifacts.
// Dependencies: system-tests helpers, user-api-probe
// ============================================================================

use helpers::artifacts::TestReporter;
use helpers::harness::require;
use helpers::harness::require_eq;
use helpers::harness::spawn_stub;
use user_api_probe::ProbeKind;
use user_api_probe::UserFixture;
use user_api_probe::probe;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn empty_listing_is_valid() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("empty_listing_is_valid")?;
    let target = spawn_stub().await?;

    let records = probe::get_all_users(&target.client).await?;
    require(records.is_empty(), "fresh stub lists no users")?;

    reporter.finish("pass", vec!["empty array accepted".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_returns_complete_records() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("listing_returns_complete_records")?;
    let target = spawn_stub().await?;
    for _ in 0..3 {
        probe::create_user_success(&target.client, &UserFixture::unique()).await?;
    }

    let records = probe::get_all_users(&target.client).await?;
    require_eq(&records.len(), &3, "listed record count")?;
    let mut ids: Vec<String> = records.iter().map(|record| record.id.to_string()).collect();
    ids.sort();
    ids.dedup();
    require_eq(&ids.len(), &3, "record ids are distinct")?;

    reporter.finish("pass", vec!["three complete records listed".to_string()], Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn full_suite_passes_and_writes_report() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("full_suite_passes_and_writes_report")?;
    let target = spawn_stub().await?;

    let report = target.run_suite(&[]).await;
    let artifacts = reporter.artifacts().write_suite(&report, &target.client.transcript())?;

    require(report.is_success(), format!("suite failed: {:?}", report.outcomes))?;
    require_eq(&report.outcomes.len(), &7, "outcome count")?;
    require_eq(
        &report.outcomes_for(ProbeKind::CreateUserWithoutRequiredFields).count(),
        &4,
        "missing-field cases",
    )?;
    // Success probe and the first duplicate-probe registration.
    require_eq(&target.server.stub().users().len(), &2, "users created by the suite")?;

    let root = reporter.artifacts().root().to_path_buf();
    for name in ["report.json", "report.md", "transcript.json"] {
        require(root.join(name).is_file(), format!("{name} written"))?;
    }
    let transcript = std::fs::read_to_string(root.join("transcript.json"))?;
    require(!transcript.contains("password_"), "transcript redacts passwords")?;

    reporter.finish("pass", vec!["all probes passed".to_string()], artifacts)?;
    Ok(())
}
