// crates/user-api-probe/src/suite.rs
// ============================================================================
// Module: Probe Suite
// Description: Sequential runner over every probe and table case.
// Purpose: Produce a complete pass/fail report for one API target.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! The suite runs the selected probes in a fixed order. Table-driven probes
//! expand into one outcome per case. A failing case is recorded and the run
//! continues with the next case; inside a case the first mismatch ends it.
//! Invariants:
//! - Probes run strictly one after another against the same [`UserApi`].
//! - Every executed case yields exactly one [`ProbeOutcome`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Deserialize;
use serde::Serialize;

use crate::client::UserApi;
use crate::fixtures::UserFixture;
use crate::fixtures::invalid_user_cases;
use crate::probe;
use crate::probe::ProbeFailure;

// ============================================================================
// SECTION: Probe Kinds
// ============================================================================

/// The probes in the suite.
///
/// # Invariants
/// - Variants and their names are stable for selection and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// Valid unique user is created and echoed.
    CreateUserSuccess,
    /// Requests missing required fields are rejected.
    CreateUserWithoutRequiredFields,
    /// A second user with an existing username is rejected.
    CreateUserWithDuplicateUsername,
    /// Every listed user record is complete.
    GetAllUsers,
}

impl ProbeKind {
    /// All probes in execution order.
    pub const ALL: [Self; 4] = [
        Self::CreateUserSuccess,
        Self::CreateUserWithoutRequiredFields,
        Self::CreateUserWithDuplicateUsername,
        Self::GetAllUsers,
    ];

    /// Returns the stable probe name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateUserSuccess => "create_user_success",
            Self::CreateUserWithoutRequiredFields => "create_user_without_required_fields",
            Self::CreateUserWithDuplicateUsername => "create_user_with_duplicate_username",
            Self::GetAllUsers => "get_all_users",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProbeKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace('-', "_");
        Self::ALL.into_iter().find(|kind| kind.as_str() == normalized).ok_or_else(|| {
            let known: Vec<&str> = Self::ALL.iter().map(|kind| kind.as_str()).collect();
            format!("unknown probe `{value}` (expected one of: {})", known.join(", "))
        })
    }
}

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of one probe case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Every assertion held.
    Passed,
    /// An assertion or the call failed.
    Failed,
}

/// Outcome of one probe case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Probe that ran.
    pub probe: ProbeKind,
    /// Case label within the probe.
    pub case: String,
    /// Pass or fail.
    pub status: OutcomeStatus,
    /// Failure reason, or a short note on success.
    pub detail: Option<String>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Report of one suite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Target base URL.
    pub base_url: String,
    /// Start time in milliseconds since the Unix epoch.
    pub started_at_ms: u64,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Outcomes in execution order.
    pub outcomes: Vec<ProbeOutcome>,
}

impl SuiteReport {
    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(OutcomeStatus::Passed)
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(OutcomeStatus::Failed)
    }

    /// True when at least one case ran and none failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.outcomes.is_empty() && self.failed() == 0
    }

    /// Outcomes of one probe.
    pub fn outcomes_for(&self, probe: ProbeKind) -> impl Iterator<Item = &ProbeOutcome> {
        self.outcomes.iter().filter(move |outcome| outcome.probe == probe)
    }

    /// Counts outcomes with a status.
    fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.status == status).count()
    }
}

// ============================================================================
// SECTION: Runner
// ============================================================================

/// Sequential probe runner.
pub struct ProbeSuite<'a, A: UserApi + ?Sized> {
    /// API under test.
    api: &'a A,
    /// Probes to run, in execution order.
    selection: Vec<ProbeKind>,
}

impl<'a, A: UserApi + ?Sized> ProbeSuite<'a, A> {
    /// Creates a suite running every probe.
    pub fn new(api: &'a A) -> Self {
        Self {
            api,
            selection: ProbeKind::ALL.to_vec(),
        }
    }

    /// Restricts the run to the given probes; an empty selection keeps all.
    ///
    /// Execution order stays the canonical order regardless of input order.
    #[must_use]
    pub fn with_selection(mut self, selection: &[ProbeKind]) -> Self {
        if !selection.is_empty() {
            self.selection =
                ProbeKind::ALL.into_iter().filter(|kind| selection.contains(kind)).collect();
        }
        self
    }

    /// Probes this suite will run.
    #[must_use]
    pub fn selection(&self) -> &[ProbeKind] {
        &self.selection
    }

    /// Runs the selected probes and collects the report.
    pub async fn run(&self) -> SuiteReport {
        let started_at_ms = now_millis();
        let start = Instant::now();
        let mut outcomes = Vec::new();
        tracing::info!(base_url = self.api.base_url(), probes = self.selection.len(), "probe suite started");
        for kind in &self.selection {
            self.run_probe(*kind, &mut outcomes).await;
        }
        let report = SuiteReport {
            base_url: self.api.base_url().to_string(),
            started_at_ms,
            duration_ms: elapsed_millis(start),
            outcomes,
        };
        tracing::info!(
            passed = report.passed(),
            failed = report.failed(),
            duration_ms = report.duration_ms,
            "probe suite finished"
        );
        report
    }

    /// Runs every case of one probe.
    async fn run_probe(&self, kind: ProbeKind, outcomes: &mut Vec<ProbeOutcome>) {
        match kind {
            ProbeKind::CreateUserSuccess => {
                let start = Instant::now();
                let fixture = UserFixture::unique();
                let result = probe::create_user_success(self.api, &fixture).await;
                outcomes.push(finish(kind, "unique user", start, result.map(|()| None)));
            }
            ProbeKind::CreateUserWithoutRequiredFields => {
                for case in invalid_user_cases() {
                    let start = Instant::now();
                    let result = probe::create_user_without_required_fields(self.api, &case).await;
                    outcomes.push(finish(kind, case.label, start, result.map(|()| None)));
                }
            }
            ProbeKind::CreateUserWithDuplicateUsername => {
                let start = Instant::now();
                let fixture = UserFixture::unique();
                let result = probe::create_user_with_duplicate_username(self.api, &fixture).await;
                outcomes.push(finish(kind, "duplicate username", start, result.map(|()| None)));
            }
            ProbeKind::GetAllUsers => {
                let start = Instant::now();
                let result = probe::get_all_users(self.api)
                    .await
                    .map(|records| Some(format!("{} user records validated", records.len())));
                outcomes.push(finish(kind, "all users", start, result));
            }
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Converts a case result into an outcome and logs it.
fn finish(
    probe: ProbeKind,
    case: &str,
    start: Instant,
    result: Result<Option<String>, ProbeFailure>,
) -> ProbeOutcome {
    let duration_ms = elapsed_millis(start);
    let (status, detail) = match result {
        Ok(note) => {
            tracing::info!(probe = probe.as_str(), case, duration_ms, "probe passed");
            (OutcomeStatus::Passed, note)
        }
        Err(failure) => {
            tracing::warn!(probe = probe.as_str(), case, duration_ms, reason = %failure, "probe failed");
            (OutcomeStatus::Failed, Some(failure.to_string()))
        }
    };
    ProbeOutcome {
        probe,
        case: case.to_string(),
        status,
        detail,
        duration_ms,
    }
}

/// Milliseconds since the Unix epoch.
fn now_millis() -> u64 {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

/// Milliseconds elapsed since `start`.
fn elapsed_millis(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
