// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Environment settings shared by the system-test suites.
// Purpose: Provide typed access to run-root and timeout overrides.
// Dependencies: user-api-probe
// ============================================================================

//! ## Overview
//! System-test configuration is read from environment variables and mapped into
//! a small typed structure for reuse across test helpers. The live suite's
//! target comes from the probe library's own configuration, not from here.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::SystemTestConfig;
pub use env::SystemTestEnv;
