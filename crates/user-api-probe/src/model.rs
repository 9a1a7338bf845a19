// crates/user-api-probe/src/model.rs
// ============================================================================
// Module: User API Model
// Description: Request, response, and record payloads for the user API.
// Purpose: Give probes typed access to the HTTP contract under test.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Payload types mirror the wire contract of the user-management API. Absent
//! request fields are serialized as explicit JSON `null` so that "field
//! missing" cases reach the server with the key present. [`ApiResponse`] keeps
//! the raw status and body of an exchange; assertions run against it before
//! any typed decoding happens.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

// ============================================================================
// SECTION: Contract Constants
// ============================================================================

/// Path of the user creation endpoint.
pub const CREATE_USER_PATH: &str = "/user/create";
/// Path of the user listing endpoint.
pub const LIST_USERS_PATH: &str = "/user/get";
/// Message returned by a successful creation (spelling is part of the contract).
pub const CREATE_SUCCESS_MESSAGE: &str = "User Successully created";
/// Field names every listed user record must carry, in wire order.
pub const USER_RECORD_FIELDS: [&str; 6] =
    ["id", "username", "email", "password", "created_at", "updated_at"];

// ============================================================================
// SECTION: Requests
// ============================================================================

/// Body of a `POST /user/create` request.
///
/// # Invariants
/// - `None` fields serialize as `null`; the keys are always present.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreateRequest {
    /// Requested username.
    pub username: Option<String>,
    /// Requested email address.
    pub email: Option<String>,
    /// Requested password.
    pub password: Option<String>,
}

impl UserCreateRequest {
    /// Builds a request with all three fields present.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    /// Builds a request with every field absent.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            username: None,
            email: None,
            password: None,
        }
    }

    /// Returns the names of fields that are absent or blank.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [("username", &self.username), ("email", &self.email), ("password", &self.password)]
            .into_iter()
            .filter(|(_, value)| value.as_deref().is_none_or(|value| value.trim().is_empty()))
            .map(|(name, _)| name)
            .collect()
    }
}

impl fmt::Debug for UserCreateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreateRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Echoed identity of a newly created user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetails {
    /// Username as stored by the server.
    pub username: String,
    /// Email as stored by the server.
    pub email: String,
}

/// Body of a `POST /user/create` response.
///
/// # Invariants
/// - Failure responses carry only `success: false`; `message` and `details`
///   are then `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Whether the user was created.
    pub success: bool,
    /// Human-readable result message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Echoed user identity on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<UserDetails>,
}

impl CreateUserResponse {
    /// Builds the contract's success body for the given identity.
    #[must_use]
    pub fn created(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(CREATE_SUCCESS_MESSAGE.to_string()),
            details: Some(UserDetails {
                username: username.into(),
                email: email.into(),
            }),
        }
    }

    /// Builds the contract's failure body.
    #[must_use]
    pub const fn rejected() -> Self {
        Self {
            success: false,
            message: None,
            details: None,
        }
    }
}

/// Opaque user identifier as returned by the listing endpoint.
///
/// The server decides the representation (number or string); probes only
/// require it to be non-null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Value);

impl UserId {
    /// Returns the raw JSON identifier.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(text) => f.write_str(text),
            other => write!(f, "{other}"),
        }
    }
}

/// One entry of the `GET /user/get` listing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Stored username.
    pub username: String,
    /// Stored email.
    pub email: String,
    /// Stored password value (as exposed by the server).
    pub password: String,
    /// Creation timestamp text.
    pub created_at: String,
    /// Last update timestamp text.
    pub updated_at: String,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

// ============================================================================
// SECTION: Observations
// ============================================================================

/// Raw observation of one HTTP exchange.
///
/// # Invariants
/// - `body` is `Value::Null` when the server sent an empty body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body.
    pub body: Value,
}

impl ApiResponse {
    /// Creates an observation from a status and body.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
        }
    }

    /// Looks up a body value by JSON pointer (for example `/details/email`).
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    /// Decodes the body into a typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}
