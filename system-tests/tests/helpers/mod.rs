// system-tests/tests/helpers/mod.rs
// ============================================================================
// Module: System Test Helpers
// Description: Shared helpers for the user API probe system-tests.
// Purpose: Provide stub harnesses, readiness checks, and artifact utilities.
// Dependencies: system-tests, user-api-probe
// ============================================================================

//! ## Overview
//! Shared helpers for the user API probe system-tests.
//! Invariants:
//! - Every test gets its own stub, so server state never leaks between tests.
//! - Artifacts are written per test under the run root.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

pub mod harness;
pub mod readiness;
pub mod timeouts;
