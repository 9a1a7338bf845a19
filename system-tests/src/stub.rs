// system-tests/src/stub.rs
// ============================================================================
// Module: User API Stub
// Description: In-memory axum server implementing the user API contract.
// Purpose: Give probes a controllable target, including injectable faults.
// Dependencies: axum, serde, time, tokio, tracing, user-api-probe
// ============================================================================

//! ## Overview
//! [`UserApiStub`] serves `POST /user/create` and `GET /user/get` from an
//! in-memory table. With default [`StubFaults`] it honors the contract:
//! required fields are validated, usernames are unique, and records carry
//! RFC 3339 timestamps. Each fault switch breaks exactly one rule so tests can
//! show the matching probe catches it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::future::Future;
use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::net::TcpListener;
use tokio::runtime::Builder;
use tokio::sync::oneshot;
use user_api_probe::CreateUserResponse;
use user_api_probe::UserCreateRequest;
use user_api_probe::model::CREATE_USER_PATH;
use user_api_probe::model::LIST_USERS_PATH;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Message sent instead of the contract message under [`StubFaults::wrong_message`].
pub const WRONG_SUCCESS_MESSAGE: &str = "User Successfully created";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Contract violations the stub can be told to commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StubFaults {
    /// Accept a second user with an existing username.
    pub allow_duplicates: bool,
    /// Accept create requests with absent or blank fields, without checking
    /// their username for uniqueness.
    pub accept_missing_fields: bool,
    /// Blank the `email` of every listed record.
    pub blank_listing_field: bool,
    /// Answer successful creations with a different message.
    pub wrong_message: bool,
}

/// A user held by the stub, serialized as a listing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredUser {
    /// Sequential identifier starting at 1.
    pub id: u64,
    /// Username.
    pub username: String,
    /// Email.
    pub email: String,
    /// Password, stored and listed as given.
    pub password: String,
    /// Creation time (RFC 3339).
    pub created_at: String,
    /// Last update time (RFC 3339).
    pub updated_at: String,
}

/// Mutable table behind the stub.
#[derive(Debug, Default)]
struct StubStore {
    /// Users in creation order.
    users: Vec<StoredUser>,
    /// Last assigned identifier.
    last_id: u64,
}

/// In-memory user API server.
#[derive(Debug, Clone, Default)]
pub struct UserApiStub {
    /// Shared user table.
    store: Arc<Mutex<StubStore>>,
    /// Injected contract violations.
    faults: StubFaults,
}

impl UserApiStub {
    /// Creates an empty stub with the given faults.
    #[must_use]
    pub fn new(faults: StubFaults) -> Self {
        Self {
            store: Arc::default(),
            faults,
        }
    }

    /// Returns the configured faults.
    #[must_use]
    pub const fn faults(&self) -> StubFaults {
        self.faults
    }

    /// Returns a snapshot of stored users.
    #[must_use]
    pub fn users(&self) -> Vec<StoredUser> {
        self.store.lock().map_or_else(|_| Vec::new(), |store| store.users.clone())
    }

    /// Builds the axum router for this stub.
    pub fn router(&self) -> Router {
        Router::new()
            .route(CREATE_USER_PATH, post(handle_create))
            .route(LIST_USERS_PATH, get(handle_list))
            .with_state(self.clone())
    }

    /// Serves on `listener` until `shutdown` completes.
    ///
    /// # Errors
    ///
    /// Returns the server's I/O error.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router()).with_graceful_shutdown(shutdown).await
    }

    /// Starts the stub on an ephemeral loopback port in a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub fn spawn(self) -> Result<UserApiStubHandle, String> {
        let listener = StdTcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("user api stub bind failed: {err}"))?;
        listener
            .set_nonblocking(true)
            .map_err(|err| format!("user api stub listener nonblocking failed: {err}"))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("user api stub local addr failed: {err}"))?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = self.clone();
        let join = thread::spawn(move || {
            let Ok(runtime) = Builder::new_current_thread().enable_all().build() else {
                return;
            };
            runtime.block_on(async move {
                let Ok(listener) = TcpListener::from_std(listener) else {
                    return;
                };
                let shutdown = async move {
                    let _ = shutdown_rx.await;
                };
                if let Err(err) = server.serve(listener, shutdown).await {
                    tracing::warn!(error = %err, "user api stub stopped");
                }
            });
        });
        Ok(UserApiStubHandle {
            base_url: format!("http://{addr}"),
            stub: self,
            shutdown: Some(shutdown_tx),
            join: Some(join),
        })
    }
}

/// Running stub; stops the server when dropped.
pub struct UserApiStubHandle {
    /// Base URL of the running server.
    base_url: String,
    /// Stub state shared with the server.
    stub: UserApiStub,
    /// Shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
    /// Server thread.
    join: Option<thread::JoinHandle<()>>,
}

impl UserApiStubHandle {
    /// Returns the base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the served stub.
    #[must_use]
    pub const fn stub(&self) -> &UserApiStub {
        &self.stub
    }
}

impl Drop for UserApiStubHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /user/create`.
async fn handle_create(State(stub): State<UserApiStub>, body: Bytes) -> Response {
    let Ok(request) = serde_json::from_slice::<UserCreateRequest>(&body) else {
        return reject("body is not a user create request");
    };
    let faults = stub.faults;
    let missing = request.missing_fields();
    if !missing.is_empty() && !faults.accept_missing_fields {
        return reject(&format!("missing fields: {}", missing.join(", ")));
    }
    let Ok(mut store) = stub.store.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let username = request.username.unwrap_or_default();
    // Incomplete requests only get here under `accept_missing_fields`, which
    // accepts the whole incomplete request, uniqueness included.
    let taken = store.users.iter().any(|user| user.username == username);
    if taken && missing.is_empty() && !faults.allow_duplicates {
        return reject("username already exists");
    }
    store.last_id = store.last_id.saturating_add(1);
    let now = timestamp();
    let user = StoredUser {
        id: store.last_id,
        username,
        email: request.email.unwrap_or_default(),
        password: request.password.unwrap_or_default(),
        created_at: now.clone(),
        updated_at: now,
    };
    let mut response = CreateUserResponse::created(user.username.clone(), user.email.clone());
    if faults.wrong_message {
        response.message = Some(WRONG_SUCCESS_MESSAGE.to_string());
    }
    tracing::debug!(id = user.id, username = %user.username, "stub user created");
    store.users.push(user);
    (StatusCode::OK, Json(response)).into_response()
}

/// Handles `GET /user/get`.
async fn handle_list(State(stub): State<UserApiStub>) -> Response {
    let Ok(store) = stub.store.lock() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };
    let mut users = store.users.clone();
    if stub.faults.blank_listing_field {
        for user in &mut users {
            user.email.clear();
        }
    }
    Json(users).into_response()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the contract's `400` rejection.
fn reject(reason: &str) -> Response {
    tracing::debug!(reason, "stub rejected create request");
    (StatusCode::BAD_REQUEST, Json(CreateUserResponse::rejected())).into_response()
}

/// Current UTC time in RFC 3339.
fn timestamp() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}
