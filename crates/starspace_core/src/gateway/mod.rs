//! Remote service gateway.
//!
//! # Responsibility
//! - Map each backend endpoint to one typed call.
//! - Attach the session's bearer credential to every request that has one.
//! - Keep the session consistent with backend rejections.
//!
//! # Invariants
//! - A 401 on any authenticated call clears the session before returning.
//! - Every other non-2xx status surfaces as `ApiError::Status`.
//! - Credential-issuing calls persist the returned token before returning.
//! - Credentials, passwords and bodies are never logged.

mod transport;

pub use transport::{
    ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestTransport, RequestBody,
    TransportError,
};

use crate::config::{ClientConfig, ConfigError};
use crate::model::compatibility::Compatibility;
use crate::model::friend::{Friend, FriendPayload};
use crate::model::profile::{Profile, ProfilePayload};
use crate::model::user::{Credentials, GoogleAuthPayload, TokenResponse, User};
use crate::session::{CredentialStore, Session, StoreError};
use log::{info, warn};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use thiserror::Error;
use uuid::Uuid;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend rejected the bearer credential; the session has been cleared.
    #[error("unauthorized: credential rejected by backend")]
    Unauthorized,
    /// Login endpoint refused the submitted email/password.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("api error: {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("credential storage failed: {0}")]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Whether this failure means the user is no longer signed in.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::InvalidCredentials)
    }
}

/// Typed client for the compatibility backend.
pub struct ApiClient<T: HttpTransport, S: CredentialStore> {
    config: ClientConfig,
    transport: T,
    session: Session<S>,
}

impl<T: HttpTransport, S: CredentialStore> ApiClient<T, S> {
    pub fn new(config: ClientConfig, transport: T, session: Session<S>) -> Self {
        Self {
            config,
            transport,
            session,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<S> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<S> {
        self.session
    }

    // Auth

    /// `POST /auth/register`; stores the issued credential.
    pub fn register(&mut self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        let token: TokenResponse =
            self.request_json(HttpMethod::Post, &["auth", "register"], json_body(credentials)?)?;
        self.session.set_credential(token.access_token.clone())?;
        Ok(token)
    }

    /// `POST /auth/login` with form-encoded `username`/`password`.
    ///
    /// Any non-2xx answer is `InvalidCredentials`; the stored credential is
    /// left untouched on failure.
    pub fn login(&mut self, credentials: &Credentials) -> ApiResult<TokenResponse> {
        let url = self.config.endpoint(&["auth", "login"])?;
        let request = ApiRequest {
            method: HttpMethod::Post,
            path: url.path().to_string(),
            bearer: None,
            body: RequestBody::Form(vec![
                ("username".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ]),
        };
        let response = self.send(&url, &request)?;
        if !response.is_success() {
            return Err(ApiError::InvalidCredentials);
        }
        let token: TokenResponse = decode(&request.path, &response.body)?;
        self.session.set_credential(token.access_token.clone())?;
        Ok(token)
    }

    /// `POST /auth/google`; stores the issued credential.
    pub fn google_auth(&mut self, payload: &GoogleAuthPayload) -> ApiResult<TokenResponse> {
        let token: TokenResponse =
            self.request_json(HttpMethod::Post, &["auth", "google"], json_body(payload)?)?;
        self.session.set_credential(token.access_token.clone())?;
        Ok(token)
    }

    /// `GET /auth/me`.
    pub fn me(&mut self) -> ApiResult<User> {
        self.request_json(HttpMethod::Get, &["auth", "me"], RequestBody::Empty)
    }

    /// Forgets the local credential. The backend keeps no session to end.
    pub fn logout(&mut self) -> ApiResult<()> {
        self.session.clear()?;
        Ok(())
    }

    // Profile

    /// `GET /users/profile`; `None` when the backend answers 404 or `null`.
    pub fn get_profile(&mut self) -> ApiResult<Option<Profile>> {
        match self.request_json::<Option<Profile>>(
            HttpMethod::Get,
            &["users", "profile"],
            RequestBody::Empty,
        ) {
            Ok(profile) => Ok(profile),
            Err(ApiError::Status { status: 404 }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// `POST /users/profile`.
    pub fn create_profile(&mut self, payload: &ProfilePayload) -> ApiResult<Profile> {
        self.request_json(HttpMethod::Post, &["users", "profile"], json_body(payload)?)
    }

    /// `PUT /users/profile`.
    pub fn update_profile(&mut self, payload: &ProfilePayload) -> ApiResult<Profile> {
        self.request_json(HttpMethod::Put, &["users", "profile"], json_body(payload)?)
    }

    // Friends

    /// `GET /friends`.
    pub fn list_friends(&mut self) -> ApiResult<Vec<Friend>> {
        self.request_json(HttpMethod::Get, &["friends"], RequestBody::Empty)
    }

    /// `POST /friends`.
    pub fn create_friend(&mut self, payload: &FriendPayload) -> ApiResult<Friend> {
        self.request_json(HttpMethod::Post, &["friends"], json_body(payload)?)
    }

    /// `PUT /friends/{id}`.
    pub fn update_friend(&mut self, friend_id: &str, payload: &FriendPayload) -> ApiResult<Friend> {
        self.request_json(HttpMethod::Put, &["friends", friend_id], json_body(payload)?)
    }

    /// `DELETE /friends/{id}`. Any response body is ignored.
    pub fn delete_friend(&mut self, friend_id: &str) -> ApiResult<()> {
        self.execute(HttpMethod::Delete, &["friends", friend_id], RequestBody::Empty)?;
        Ok(())
    }

    // Compatibility

    /// `GET /compatibility/{friendId}`.
    pub fn get_compatibility(&mut self, friend_id: &str) -> ApiResult<Compatibility> {
        self.request_json(HttpMethod::Get, &["compatibility", friend_id], RequestBody::Empty)
    }

    /// `GET /compatibility/all`.
    pub fn all_compatibilities(&mut self) -> ApiResult<Vec<Compatibility>> {
        self.request_json(HttpMethod::Get, &["compatibility", "all"], RequestBody::Empty)
    }

    fn request_json<R: DeserializeOwned>(
        &mut self,
        method: HttpMethod,
        segments: &[&str],
        body: RequestBody,
    ) -> ApiResult<R> {
        let (path, response) = self.execute(method, segments, body)?;
        decode(&path, &response.body)
    }

    /// Sends an authenticated request and applies the status policy.
    /// Returns the encoded request path alongside the response.
    fn execute(
        &mut self,
        method: HttpMethod,
        segments: &[&str],
        body: RequestBody,
    ) -> ApiResult<(String, ApiResponse)> {
        let url = self.config.endpoint(segments)?;
        let request = ApiRequest {
            method,
            path: url.path().to_string(),
            bearer: self.session.credential().map(str::to_string),
            body,
        };
        let response = self.send(&url, &request)?;

        match response.status {
            200..=299 => Ok((request.path, response)),
            401 => {
                // Store failures are already logged by the session.
                let _ = self.session.clear();
                Err(ApiError::Unauthorized)
            }
            status => Err(ApiError::Status { status }),
        }
    }

    fn send(&self, url: &Url, request: &ApiRequest) -> ApiResult<ApiResponse> {
        let request_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!(
            "event=api_request module=gateway status=start request_id={} method={} path={} authenticated={}",
            request_id,
            request.method,
            request.path,
            request.bearer.is_some()
        );

        match self.transport.send(url.as_str(), request) {
            Ok(response) => {
                let status = if response.is_success() { "ok" } else { "error" };
                info!(
                    "event=api_request module=gateway status={} request_id={} http_status={} duration_ms={}",
                    status,
                    request_id,
                    response.status,
                    started_at.elapsed().as_millis()
                );
                Ok(response)
            }
            Err(err) => {
                warn!(
                    "event=api_request module=gateway status=error request_id={} duration_ms={} error_code=transport_failed error={}",
                    request_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

fn json_body(value: &impl Serialize) -> ApiResult<RequestBody> {
    serde_json::to_value(value)
        .map(RequestBody::Json)
        .map_err(ApiError::Encode)
}

/// Decodes a JSON body; an empty body reads as `null`.
fn decode<R: DeserializeOwned>(path: &str, body: &[u8]) -> ApiResult<R> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}
