// crates/user-api-probe/src/lib.rs
// ============================================================================
// Module: User API Probe Library
// Description: Black-box probes for the user-management HTTP API.
// Purpose: Provide typed payloads, an HTTP client, fixtures, and probe suites.
// Dependencies: reqwest, serde, serde_json, thiserror, tokio, tracing
// ============================================================================

//! ## Overview
//! This crate probes a deployed user-management API through its HTTP
//! contract only: `POST /user/create` and `GET /user/get`. A probe builds a
//! request, sends it through a [`UserApi`] implementation, and asserts the
//! observed status and body. The [`ProbeSuite`] runs every probe and table
//! case sequentially and collects a [`SuiteReport`].
//! Invariants:
//! - Probes never mutate or clean up server state beyond the users they create.
//! - Every probe case is fail-fast: the first mismatch ends that case.
//!
//! Security posture: server responses are untrusted; response sizes are bounded
//! and passwords are redacted from transcripts and logs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod config;
pub mod fixtures;
pub mod model;
pub mod probe;
pub mod report;
pub mod suite;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ClientError;
pub use client::TranscriptEntry;
pub use client::UserApi;
pub use client::UserApiClient;
pub use config::ConfigError;
pub use config::ProbeConfig;
pub use fixtures::InvalidUserCase;
pub use fixtures::UserFixture;
pub use fixtures::invalid_user_cases;
pub use model::ApiResponse;
pub use model::CreateUserResponse;
pub use model::UserCreateRequest;
pub use model::UserDetails;
pub use model::UserId;
pub use model::UserRecord;
pub use probe::ProbeFailure;
pub use report::ReportError;
pub use report::ReportWriter;
pub use suite::OutcomeStatus;
pub use suite::ProbeKind;
pub use suite::ProbeOutcome;
pub use suite::ProbeSuite;
pub use suite::SuiteReport;
