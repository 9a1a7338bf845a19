// crates/user-api-probe/src/fixtures.rs
// ============================================================================
// Module: Probe Fixtures
// Description: Generated and tabled inputs for user API probes.
// Purpose: Produce unique users per run and the invalid-input table.
// Dependencies: uuid
// ============================================================================

//! ## Overview
//! Unique fixtures derive username, email, and password from a single random
//! v4 UUID so repeated runs against a shared server never collide. The
//! invalid-input table covers each required field missing alone and all of
//! them missing together.

use serde::Serialize;
use uuid::Uuid;

use crate::model::UserCreateRequest;

/// A valid, unique set of user credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserFixture {
    /// Username (`user_<uuid>`).
    pub username: String,
    /// Email (`email_<uuid>@example.com`).
    pub email: String,
    /// Password (`password_<uuid>`).
    pub password: String,
}

impl UserFixture {
    /// Generates a fresh unique fixture.
    #[must_use]
    pub fn unique() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Derives a fixture from a given UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            username: format!("user_{uuid}"),
            email: format!("email_{uuid}@example.com"),
            password: format!("password_{uuid}"),
        }
    }

    /// Keeps the username and draws a fresh email and password.
    #[must_use]
    pub fn duplicate_username(&self) -> Self {
        Self {
            username: self.username.clone(),
            email: format!("email_{}@example.com", Uuid::new_v4()),
            password: format!("password_{}", Uuid::new_v4()),
        }
    }

    /// Builds the create request for this fixture.
    #[must_use]
    pub fn to_request(&self) -> UserCreateRequest {
        UserCreateRequest::new(&self.username, &self.email, &self.password)
    }
}

/// One row of the invalid-input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidUserCase {
    /// Stable case label used in reports.
    pub label: &'static str,
    /// Request with one or more fields absent.
    pub request: UserCreateRequest,
}

/// Returns the invalid-input table: each required field missing, then all.
#[must_use]
pub fn invalid_user_cases() -> Vec<InvalidUserCase> {
    let username = || Some("username".to_string());
    let email = || Some("email@example.com".to_string());
    let password = || Some("password".to_string());
    vec![
        InvalidUserCase {
            label: "missing username",
            request: UserCreateRequest {
                username: None,
                email: email(),
                password: password(),
            },
        },
        InvalidUserCase {
            label: "missing email",
            request: UserCreateRequest {
                username: username(),
                email: None,
                password: password(),
            },
        },
        InvalidUserCase {
            label: "missing password",
            request: UserCreateRequest {
                username: username(),
                email: email(),
                password: None,
            },
        },
        InvalidUserCase {
            label: "all fields missing",
            request: UserCreateRequest::empty(),
        },
    ]
}
