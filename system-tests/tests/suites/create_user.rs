// system-tests/tests/suites/create_user.rs
// ============================================================================
// Module: Create User Tests
// Description: Creation probes against the compliant stub.
// Purpose: Validate the success and missing-field probes over real HTTP.
// Dependencies: system-tests helpers, user-api-probe
// ============================================================================

//! ## Overview
//! A compliant stub must pass the creation probes, and the stub's table must
//! reflect exactly what the probes sent.

use helpers::artifacts::TestReporter;
use helpers::harness::require;
use helpers::harness::require_eq;
use helpers::harness::spawn_stub;
use user_api_probe::ProbeKind;
use user_api_probe::UserApi;
use user_api_probe::UserFixture;
use user_api_probe::invalid_user_cases;
use user_api_probe::probe;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn create_user_success_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_user_success_round_trip")?;
    let target = spawn_stub().await?;
    let fixture = UserFixture::unique();

    probe::create_user_success(&target.client, &fixture).await?;

    let users = target.server.stub().users();
    require_eq(&users.len(), &1, "stub should hold exactly the created user")?;
    require_eq(&users[0].username, &fixture.username, "stored username")?;
    require_eq(&users[0].email, &fixture.email, "stored email")?;

    let report = target.run_suite(&[ProbeKind::CreateUserSuccess]).await;
    let artifacts = reporter.artifacts().write_suite(&report, &target.client.transcript())?;
    require(report.is_success(), format!("suite failed: {:?}", report.outcomes))?;

    reporter.finish("pass", vec!["unique user created and echoed".to_string()], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_user_without_required_fields_is_rejected() -> Result<(), Box<dyn std::error::Error>>
{
    let mut reporter = TestReporter::new("create_user_without_required_fields_is_rejected")?;
    let target = spawn_stub().await?;

    let mut notes = Vec::new();
    for case in invalid_user_cases() {
        probe::create_user_without_required_fields(&target.client, &case).await?;
        notes.push(format!("{} rejected", case.label));
    }
    require(target.server.stub().users().is_empty(), "rejected requests must not create users")?;

    let listing = target.client.list_users().await?;
    require_eq(&listing.body, &serde_json::json!([]), "listing after rejections")?;

    reporter.finish("pass", notes, Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn requests_send_explicit_nulls() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("requests_send_explicit_nulls")?;
    let target = spawn_stub().await?;
    let case = invalid_user_cases()
        .into_iter()
        .find(|case| case.label == "all fields missing")
        .ok_or("all fields missing case")?;

    let response = target.client.create_user(&case.request).await?;
    require_eq(&response.status, &400, "all-null request status")?;

    let transcript = target.client.transcript();
    let sent = transcript
        .iter()
        .rev()
        .find(|entry| entry.method == "POST")
        .ok_or("create request missing from transcript")?;
    require_eq(
        &sent.request,
        &serde_json::json!({"username": null, "email": null, "password": null}),
        "request body keeps null keys",
    )?;

    reporter.finish("pass", vec!["absent fields sent as null".to_string()], Vec::new())?;
    Ok(())
}
