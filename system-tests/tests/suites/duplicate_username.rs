// system-tests/tests/suites/duplicate_username.rs
// ============================================================================
// Module: Duplicate Username Tests
// Description: Uniqueness probe against the compliant stub.
// Purpose: Validate that a second user with a taken username is rejected.
// Dependencies: system-tests helpers, user-api-probe
// ============================================================================

use helpers::artifacts::TestReporter;
use helpers::harness::require_eq;
use helpers::harness::spawn_stub;
use user_api_probe::UserFixture;
use user_api_probe::probe;

use crate::helpers;

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("duplicate_username_is_rejected")?;
    let target = spawn_stub().await?;
    let fixture = UserFixture::unique();

    probe::create_user_with_duplicate_username(&target.client, &fixture).await?;

    let users = target.server.stub().users();
    let holders = users.iter().filter(|user| user.username == fixture.username).count();
    require_eq(&holders, &1, "username holders after duplicate attempt")?;
    require_eq(&users[0].email, &fixture.email, "first registration is kept")?;

    reporter.finish("pass", vec!["second registration rejected".to_string()], Vec::new())?;
    Ok(())
}
