// system-tests/tests/suites/fault_detection.rs
// ============================================================================
// Module: Fault Detection Tests
// Description: Runs the suite against stubs that break one contract rule each.
// Purpose: Show every probe catches the violation it exists for, and only it.
// Dependencies: system-tests helpers, user-api-probe
// ============================================================================

//! ## Overview
//! Each test injects a single [`StubFaults`] switch, runs the full suite, and
//! checks which probes failed. A probe that stays green under its own fault
//! would be a probe that cannot fail.

use helpers::artifacts::TestReporter;
use helpers::harness::require;
use helpers::harness::require_eq;
use helpers::harness::spawn_stub_with_faults;
use system_tests::StubFaults;
use user_api_probe::OutcomeStatus;
use user_api_probe::ProbeKind;
use user_api_probe::SuiteReport;
use user_api_probe::UserApi;
use user_api_probe::invalid_user_cases;

use crate::helpers;

/// Distinct failed probes in execution order.
fn failed_probes(report: &SuiteReport) -> Vec<ProbeKind> {
    let mut failed: Vec<ProbeKind> = Vec::new();
    for outcome in &report.outcomes {
        if outcome.status == OutcomeStatus::Failed && !failed.contains(&outcome.probe) {
            failed.push(outcome.probe);
        }
    }
    failed
}

/// Failure detail of the first failed case of `probe`.
fn failure_detail(report: &SuiteReport, probe: ProbeKind) -> String {
    report
        .outcomes_for(probe)
        .find(|outcome| outcome.status == OutcomeStatus::Failed)
        .and_then(|outcome| outcome.detail.clone())
        .unwrap_or_default()
}

/// Runs the suite against a faulty stub and records the report.
async fn run_with_fault(
    test_name: &str,
    faults: StubFaults,
) -> Result<(TestReporter, SuiteReport, Vec<String>), Box<dyn std::error::Error>> {
    let reporter = TestReporter::new(test_name)?;
    let target = spawn_stub_with_faults(faults).await?;
    require_eq(&target.server.stub().faults(), &faults, "stub faults")?;
    let report = target.run_suite(&[]).await;
    let artifacts = reporter.artifacts().write_suite(&report, &target.client.transcript())?;
    require(!report.is_success(), "faulty stub must not pass the suite")?;
    Ok((reporter, report, artifacts))
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_acceptance_is_detected() -> Result<(), Box<dyn std::error::Error>> {
    let faults = StubFaults {
        allow_duplicates: true,
        ..StubFaults::default()
    };
    let (mut reporter, report, artifacts) =
        run_with_fault("duplicate_acceptance_is_detected", faults).await?;

    require_eq(
        &failed_probes(&report),
        &vec![ProbeKind::CreateUserWithDuplicateUsername],
        "failed probes",
    )?;
    let detail = failure_detail(&report, ProbeKind::CreateUserWithDuplicateUsername);
    require(detail.contains("expected status 400, got 200"), detail.clone())?;

    reporter.finish("pass", vec![detail], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_field_acceptance_is_detected() -> Result<(), Box<dyn std::error::Error>> {
    let faults = StubFaults {
        accept_missing_fields: true,
        ..StubFaults::default()
    };
    let (mut reporter, report, artifacts) =
        run_with_fault("missing_field_acceptance_is_detected", faults).await?;

    // Accepted incomplete users also surface as blank listing records.
    require_eq(
        &failed_probes(&report),
        &vec![ProbeKind::CreateUserWithoutRequiredFields, ProbeKind::GetAllUsers],
        "failed probes",
    )?;
    let failed_cases = report
        .outcomes_for(ProbeKind::CreateUserWithoutRequiredFields)
        .filter(|outcome| outcome.status == OutcomeStatus::Failed)
        .count();
    require_eq(&failed_cases, &4, "every missing-field case fails")?;

    reporter.finish("pass", vec![format!("{failed_cases} cases caught")], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_field_acceptance_covers_repeated_usernames() -> Result<(), Box<dyn std::error::Error>>
{
    let mut reporter = TestReporter::new("missing_field_acceptance_covers_repeated_usernames")?;
    let faults = StubFaults {
        accept_missing_fields: true,
        ..StubFaults::default()
    };
    let target = spawn_stub_with_faults(faults).await?;

    // "missing email" and "missing password" share the username `username`.
    let mut notes = Vec::new();
    for case in invalid_user_cases() {
        let response = target.client.create_user(&case.request).await?;
        require_eq(&response.status, &200, case.label)?;
        notes.push(format!("{} accepted", case.label));
    }
    require_eq(&target.server.stub().users().len(), &4, "stored incomplete users")?;

    reporter.finish("pass", notes, Vec::new())?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_listing_field_is_detected() -> Result<(), Box<dyn std::error::Error>> {
    let faults = StubFaults {
        blank_listing_field: true,
        ..StubFaults::default()
    };
    let (mut reporter, report, artifacts) =
        run_with_fault("blank_listing_field_is_detected", faults).await?;

    require_eq(&failed_probes(&report), &vec![ProbeKind::GetAllUsers], "failed probes")?;
    let detail = failure_detail(&report, ProbeKind::GetAllUsers);
    require_eq(&detail.as_str(), &"user record 0 has empty field email", "listing detail")?;

    reporter.finish("pass", vec![detail], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_success_message_is_detected() -> Result<(), Box<dyn std::error::Error>> {
    let faults = StubFaults {
        wrong_message: true,
        ..StubFaults::default()
    };
    let (mut reporter, report, artifacts) =
        run_with_fault("wrong_success_message_is_detected", faults).await?;

    require_eq(&failed_probes(&report), &vec![ProbeKind::CreateUserSuccess], "failed probes")?;
    let detail = failure_detail(&report, ProbeKind::CreateUserSuccess);
    require(detail.contains("/message"), detail.clone())?;

    reporter.finish("pass", vec![detail], artifacts)?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_target_fails_every_case() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("unreachable_target_fails_every_case")?;
    let target = spawn_stub_with_faults(StubFaults::default()).await?;
    let client = target.client;
    drop(target.server);

    let report = user_api_probe::ProbeSuite::new(&client).run().await;
    require_eq(&report.passed(), &0, "passed cases")?;
    require_eq(&report.outcomes.len(), &7, "outcome count")?;

    reporter.finish("pass", vec!["transport failures recorded per case".to_string()], Vec::new())?;
    Ok(())
}
