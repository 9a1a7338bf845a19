// system-tests/src/lib.rs
// ============================================================================
// Module: User API Probe System Tests Library
// Description: Contract stub server and shared configuration for system tests.
// Purpose: Give the end-to-end suites a controllable target over real HTTP.
// Dependencies: axum, tokio, user-api-probe
// ============================================================================

//! ## Overview
//! This crate hosts the in-memory [`stub::UserApiStub`] used by the suites in
//! `system-tests/tests` and the environment settings those suites share. The
//! stub is also runnable on its own through the `user_api_stub_server` binary.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod stub;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use stub::StubFaults;
pub use stub::UserApiStub;
pub use stub::UserApiStubHandle;
