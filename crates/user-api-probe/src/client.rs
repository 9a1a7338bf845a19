// crates/user-api-probe/src/client.rs
// ============================================================================
// Module: User API Client
// Description: HTTP client for the user-management API with transcripts.
// Purpose: Issue create/list calls and record every exchange.
// Dependencies: async-trait, reqwest, serde_json, tokio, tracing
// ============================================================================

//! ## Overview
//! [`UserApi`] is the seam between probes and transport. [`UserApiClient`]
//! implements it over HTTP with reqwest. Status codes are observations, not
//! errors: a `400` comes back as an [`ApiResponse`] so probes can assert on it.
//! Only transient send failures are retried, with a bounded linear backoff.
//! A create is not idempotent, so a `POST` is resent only when the connection
//! was never established; once it may have reached the server it is sent once.
//!
//! Security posture: responses are untrusted; bodies are size-capped and
//! password values are redacted before they reach the transcript.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Method;
use reqwest::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

use crate::config::ProbeConfig;
use crate::model::ApiResponse;
use crate::model::CREATE_USER_PATH;
use crate::model::LIST_USERS_PATH;
use crate::model::UserCreateRequest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size accepted from the API.
pub const MAX_RESPONSE_BYTES: usize = 4 * 1024 * 1024;
/// Base backoff delay for transient send retries.
const BASE_SEND_RETRY_DELAY_MS: u64 = 50;
/// User agent sent with every request.
const USER_AGENT: &str = concat!("user-api-probe/", env!("CARGO_PKG_VERSION"));
/// Placeholder written over password values in transcripts.
const REDACTED: &str = "<redacted>";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Client errors.
///
/// # Invariants
/// - HTTP error statuses are never mapped to [`ClientError`].
/// - String payloads may include untrusted server text.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Client construction failed.
    #[error("user api client config error: {0}")]
    Config(String),
    /// Request could not be sent or the response could not be read.
    #[error("user api transport error: {0}")]
    Transport(String),
    /// Response body was not JSON.
    #[error("user api response is not json (status {status}): {message}")]
    Decode {
        /// HTTP status of the undecodable response.
        status: u16,
        /// Parser error text.
        message: String,
    },
    /// Response body exceeds [`MAX_RESPONSE_BYTES`].
    #[error("user api response exceeds size limit ({actual} > {limit})")]
    ResponseTooLarge {
        /// Observed size in bytes (lower bound when streaming).
        actual: usize,
        /// Maximum size in bytes.
        limit: usize,
    },
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Operations of the user-management API.
#[async_trait]
pub trait UserApi: Send + Sync {
    /// Returns the base URL this API handle targets.
    fn base_url(&self) -> &str;

    /// Issues `POST /user/create`.
    async fn create_user(&self, request: &UserCreateRequest) -> Result<ApiResponse, ClientError>;

    /// Issues `GET /user/get`.
    async fn list_users(&self) -> Result<ApiResponse, ClientError>;
}

// ============================================================================
// SECTION: Transcript
// ============================================================================

/// One recorded exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    /// 1-based sequence number within the client.
    pub sequence: u64,
    /// HTTP method.
    pub method: String,
    /// Request path relative to the base URL.
    pub path: String,
    /// Request body with passwords redacted.
    pub request: Value,
    /// Response status.
    pub status: u16,
    /// Response body with passwords redacted.
    pub response: Value,
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// reqwest-backed [`UserApi`] with transcript capture.
#[derive(Clone)]
pub struct UserApiClient {
    /// Base URL without trailing slash.
    base_url: String,
    /// Underlying HTTP client.
    client: Client,
    /// Maximum send attempts per request.
    max_send_attempts: u32,
    /// Shared transcript of completed exchanges.
    transcript: Arc<Mutex<Vec<TranscriptEntry>>>,
}

impl UserApiClient {
    /// Creates a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the HTTP client cannot be built.
    pub fn new(config: &ProbeConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(Policy::none())
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ClientError::Config(format!("failed to build http client: {err}")))?;
        Ok(Self::with_client(config.base_url.clone(), client, config.max_send_attempts))
    }

    /// Creates a client from an existing reqwest client.
    #[must_use]
    pub fn with_client(base_url: String, client: Client, max_send_attempts: u32) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            max_send_attempts: max_send_attempts.max(1),
            transcript: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a snapshot of the transcript entries.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.transcript.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Sends one request, retrying transient send failures.
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{path}", self.base_url);
        for attempt in 1..=self.max_send_attempts {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(body) = &body {
                request = request.json(body);
            }
            let response = match request.send().await {
                Ok(response) => response,
                Err(err) => {
                    if should_retry_send(&method, &err, attempt, self.max_send_attempts) {
                        tracing::warn!(%method, path, attempt, error = %err, "retrying user api request");
                        sleep(retry_delay_for_attempt(attempt)).await;
                        continue;
                    }
                    return Err(ClientError::Transport(format!(
                        "{method} {path} failed after {attempt} attempt(s): {err}"
                    )));
                }
            };
            let status = response.status().as_u16();
            let bytes = read_body_limited(response, MAX_RESPONSE_BYTES).await?;
            let parsed = decode_body(status, &bytes)?;
            tracing::debug!(%method, path, status, attempt, bytes = bytes.len(), "user api exchange");
            self.record_transcript(&method, path, body.as_ref(), status, &parsed);
            return Ok(ApiResponse::new(status, parsed));
        }

        Err(ClientError::Transport(format!("{method} {path} failed: exhausted retry attempts")))
    }

    /// Appends an exchange to the transcript.
    fn record_transcript(
        &self,
        method: &Method,
        path: &str,
        request: Option<&Value>,
        status: u16,
        response: &Value,
    ) {
        let Ok(mut guard) = self.transcript.lock() else {
            return;
        };
        let sequence = u64::try_from(guard.len()).unwrap_or(u64::MAX).saturating_add(1);
        guard.push(TranscriptEntry {
            sequence,
            method: method.to_string(),
            path: path.to_string(),
            request: request.map_or(Value::Null, |value| redact_passwords(value.clone())),
            status,
            response: redact_passwords(response.clone()),
        });
    }
}

#[async_trait]
impl UserApi for UserApiClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn create_user(&self, request: &UserCreateRequest) -> Result<ApiResponse, ClientError> {
        let body = serde_json::to_value(request).map_err(|err| {
            ClientError::Config(format!("create request serialization failed: {err}"))
        })?;
        self.send(Method::POST, CREATE_USER_PATH, Some(body)).await
    }

    async fn list_users(&self) -> Result<ApiResponse, ClientError> {
        self.send(Method::GET, LIST_USERS_PATH, None).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when a send failure should be retried.
///
/// Non-idempotent methods are retried only on connect failures, where the
/// request cannot have reached the server.
fn should_retry_send(
    method: &Method,
    err: &reqwest::Error,
    attempt: u32,
    max_attempts: u32,
) -> bool {
    if attempt >= max_attempts {
        return false;
    }
    if err.is_connect() {
        return true;
    }
    if !method.is_idempotent() {
        return false;
    }
    if err.is_timeout() {
        return true;
    }
    if !err.is_request() {
        return false;
    }
    let msg = err.to_string().to_ascii_lowercase();
    msg.contains("connection reset")
        || msg.contains("connection refused")
        || msg.contains("connection closed")
        || msg.contains("broken pipe")
        || msg.contains("connection aborted")
        || msg.contains("timed out")
        || msg.contains("eof")
}

/// Returns bounded linear backoff for send retries.
fn retry_delay_for_attempt(attempt: u32) -> Duration {
    Duration::from_millis(u64::from(attempt) * BASE_SEND_RETRY_DELAY_MS)
}

/// Reads a response body, failing once it exceeds `limit` bytes.
async fn read_body_limited(mut response: Response, limit: usize) -> Result<Vec<u8>, ClientError> {
    if let Some(length) = response.content_length() {
        let length = usize::try_from(length).unwrap_or(usize::MAX);
        if length > limit {
            return Err(ClientError::ResponseTooLarge {
                actual: length,
                limit,
            });
        }
    }
    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| ClientError::Transport(format!("failed to read response body: {err}")))?
    {
        if body.len().saturating_add(chunk.len()) > limit {
            return Err(ClientError::ResponseTooLarge {
                actual: body.len().saturating_add(chunk.len()),
                limit,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Parses a response body as JSON; blank bodies become `null`.
pub(crate) fn decode_body(status: u16, bytes: &[u8]) -> Result<Value, ClientError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|err| ClientError::Decode {
        status,
        message: err.to_string(),
    })
}

/// Replaces every string under a `password` key with a placeholder.
pub(crate) fn redact_passwords(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if key == "password" && value.is_string() {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact_passwords(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact_passwords).collect()),
        other => other,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
