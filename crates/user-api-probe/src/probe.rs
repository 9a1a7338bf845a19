// crates/user-api-probe/src/probe.rs
// ============================================================================
// Module: User API Probes
// Description: Response assertions and probe procedures.
// Purpose: Check the create/list contract from outside the server.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Assertions are pure functions over [`ApiResponse`] so they can be tested
//! without a network. Probe procedures combine a fixture, one or two calls
//! through a [`UserApi`], and those assertions. Every procedure returns at the
//! first mismatch.
//! Invariants:
//! - A successful creation is `200`, `success: true`, the contract message,
//!   and `details` echoing the requested username and email.
//! - A rejected creation is `400` with `success: false`.
//! - Every listed record has all six fields; `id` is non-null and the other
//!   five are non-empty strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::client::ClientError;
use crate::client::UserApi;
use crate::fixtures::InvalidUserCase;
use crate::fixtures::UserFixture;
use crate::model::ApiResponse;
use crate::model::CREATE_SUCCESS_MESSAGE;
use crate::model::USER_RECORD_FIELDS;
use crate::model::UserCreateRequest;
use crate::model::UserRecord;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Status of an accepted creation.
pub const STATUS_OK: u16 = 200;
/// Status of a rejected creation.
pub const STATUS_BAD_REQUEST: u16 = 400;
/// Maximum characters of a body quoted in a failure.
const BODY_EXCERPT_CHARS: usize = 256;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Reason a probe case failed.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// Unexpected HTTP status.
    #[error("expected status {expected}, got {actual} (body: {body})")]
    Status {
        /// Expected status.
        expected: u16,
        /// Observed status.
        actual: u16,
        /// Excerpt of the observed body.
        body: String,
    },
    /// Body value mismatch.
    #[error("field {path}: expected {expected}, got {actual}")]
    Field {
        /// JSON pointer of the field.
        path: String,
        /// Expected value (JSON text).
        expected: String,
        /// Observed value (JSON text or `<missing>`).
        actual: String,
    },
    /// A listed record lacks a field.
    #[error("user record {record} is missing field {field}")]
    MissingField {
        /// Index of the record in the listing.
        record: usize,
        /// Field name.
        field: &'static str,
    },
    /// A listed record has a null field.
    #[error("user record {record} has null field {field}")]
    NullField {
        /// Index of the record in the listing.
        record: usize,
        /// Field name.
        field: &'static str,
    },
    /// A listed record has an empty string field.
    #[error("user record {record} has empty field {field}")]
    EmptyField {
        /// Index of the record in the listing.
        record: usize,
        /// Field name.
        field: &'static str,
    },
    /// A listed record has a field of the wrong JSON type.
    #[error("user record {record} field {field} must be a string")]
    NotAString {
        /// Index of the record in the listing.
        record: usize,
        /// Field name.
        field: &'static str,
    },
    /// Body has the wrong overall shape.
    #[error("unexpected response shape: {0}")]
    Shape(String),
    /// The call itself failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

// ============================================================================
// SECTION: Assertions
// ============================================================================

/// Asserts the response status.
///
/// # Errors
///
/// Returns [`ProbeFailure::Status`] on mismatch.
pub fn expect_status(response: &ApiResponse, expected: u16) -> Result<(), ProbeFailure> {
    if response.status == expected {
        return Ok(());
    }
    Err(ProbeFailure::Status {
        expected,
        actual: response.status,
        body: body_excerpt(&response.body),
    })
}

/// Asserts the body value at a JSON pointer.
///
/// # Errors
///
/// Returns [`ProbeFailure::Field`] when the value is absent or differs.
pub fn expect_field(
    response: &ApiResponse,
    pointer: &str,
    expected: &Value,
) -> Result<(), ProbeFailure> {
    let actual = response.pointer(pointer);
    if actual == Some(expected) {
        return Ok(());
    }
    Err(ProbeFailure::Field {
        path: pointer.to_string(),
        expected: expected.to_string(),
        actual: actual.map_or_else(|| "<missing>".to_string(), Value::to_string),
    })
}

/// Asserts a successful creation echoing the request.
///
/// # Errors
///
/// Returns [`ProbeFailure`] at the first mismatch.
pub fn check_create_success(
    request: &UserCreateRequest,
    response: &ApiResponse,
) -> Result<(), ProbeFailure> {
    check_create_accepted(response)?;
    expect_field(response, "/message", &Value::from(CREATE_SUCCESS_MESSAGE))?;
    expect_field(response, "/details/username", &Value::from(request.username.clone()))?;
    expect_field(response, "/details/email", &Value::from(request.email.clone()))
}

/// Asserts `200` with `success: true`.
///
/// # Errors
///
/// Returns [`ProbeFailure`] at the first mismatch.
pub fn check_create_accepted(response: &ApiResponse) -> Result<(), ProbeFailure> {
    expect_status(response, STATUS_OK)?;
    expect_field(response, "/success", &Value::Bool(true))
}

/// Asserts `400` with `success: false`.
///
/// # Errors
///
/// Returns [`ProbeFailure`] at the first mismatch.
pub fn check_create_rejected(response: &ApiResponse) -> Result<(), ProbeFailure> {
    expect_status(response, STATUS_BAD_REQUEST)?;
    expect_field(response, "/success", &Value::Bool(false))
}

/// Validates one listed record and decodes it.
///
/// # Errors
///
/// Returns [`ProbeFailure`] for the first missing, null, empty, or mistyped
/// field, in wire order.
pub fn check_user_record(index: usize, value: &Value) -> Result<UserRecord, ProbeFailure> {
    let Value::Object(map) = value else {
        return Err(ProbeFailure::Shape(format!("user record {index} is not an object")));
    };
    for field in USER_RECORD_FIELDS {
        let Some(entry) = map.get(field) else {
            return Err(ProbeFailure::MissingField {
                record: index,
                field,
            });
        };
        match entry {
            Value::Null => {
                return Err(ProbeFailure::NullField {
                    record: index,
                    field,
                });
            }
            _ if field == "id" => {}
            Value::String(text) if text.is_empty() => {
                return Err(ProbeFailure::EmptyField {
                    record: index,
                    field,
                });
            }
            Value::String(_) => {}
            _ => {
                return Err(ProbeFailure::NotAString {
                    record: index,
                    field,
                });
            }
        }
    }
    serde_json::from_value(value.clone())
        .map_err(|err| ProbeFailure::Shape(format!("user record {index}: {err}")))
}

/// Asserts a `200` listing whose records are all valid.
///
/// # Errors
///
/// Returns [`ProbeFailure`] for a bad status, a non-array body, or the first
/// invalid record.
pub fn check_user_listing(response: &ApiResponse) -> Result<Vec<UserRecord>, ProbeFailure> {
    expect_status(response, STATUS_OK)?;
    let Value::Array(items) = &response.body else {
        return Err(ProbeFailure::Shape(format!(
            "listing body must be a JSON array, got {}",
            body_excerpt(&response.body)
        )));
    };
    items.iter().enumerate().map(|(index, item)| check_user_record(index, item)).collect()
}

// ============================================================================
// SECTION: Procedures
// ============================================================================

/// Creates a unique user and expects success.
///
/// # Errors
///
/// Returns [`ProbeFailure`] when the call fails or the response mismatches.
pub async fn create_user_success<A: UserApi + ?Sized>(
    api: &A,
    fixture: &UserFixture,
) -> Result<(), ProbeFailure> {
    let request = fixture.to_request();
    let response = api.create_user(&request).await?;
    check_create_success(&request, &response)
}

/// Sends a request with required fields absent and expects rejection.
///
/// # Errors
///
/// Returns [`ProbeFailure`] when the call fails or the server accepts it.
pub async fn create_user_without_required_fields<A: UserApi + ?Sized>(
    api: &A,
    case: &InvalidUserCase,
) -> Result<(), ProbeFailure> {
    let response = api.create_user(&case.request).await?;
    check_create_rejected(&response)
}

/// Creates a user, then a second one with the same username; expects the
/// first to succeed and the second to be rejected.
///
/// # Errors
///
/// Returns [`ProbeFailure`] at the first mismatch of either call.
pub async fn create_user_with_duplicate_username<A: UserApi + ?Sized>(
    api: &A,
    fixture: &UserFixture,
) -> Result<(), ProbeFailure> {
    let first = api.create_user(&fixture.to_request()).await?;
    check_create_accepted(&first)?;
    let second = api.create_user(&fixture.duplicate_username().to_request()).await?;
    check_create_rejected(&second)
}

/// Lists all users and validates every record.
///
/// # Errors
///
/// Returns [`ProbeFailure`] when the call fails or any record is invalid.
pub async fn get_all_users<A: UserApi + ?Sized>(api: &A) -> Result<Vec<UserRecord>, ProbeFailure> {
    let response = api.list_users().await?;
    check_user_listing(&response)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a bounded excerpt of a body for failure messages.
fn body_excerpt(body: &Value) -> String {
    let text = body.to_string();
    if text.chars().count() <= BODY_EXCERPT_CHARS {
        return text;
    }
    let mut excerpt: String = text.chars().take(BODY_EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

// ============================================================================
// SECTION: Tests
// ============================================================================
