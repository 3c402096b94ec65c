// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authentication for the server.
//!
//! This module provides the Axum extractor that validates session tokens
//! and enforces authentication at the server boundary, before any
//! handler logic runs.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::AppState;
use securo_case_api::{AuthenticatedUser, AuthenticationService};
use securo_case_persistence::UserData;

/// Extracts the Bearer token from the Authorization header.
///
/// # Errors
///
/// Returns a 401 session error if the header is missing or malformed.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, SessionError> {
    let auth_header: &str = headers
        .get("Authorization")
        .ok_or_else(|| {
            debug!("Missing Authorization header");
            SessionError::MissingAuthorizationHeader
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid Authorization header encoding");
            SessionError::InvalidAuthorizationHeader
        })?;

    auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        warn!("Authorization header does not start with 'Bearer '");
        SessionError::InvalidAuthorizationHeader
    })
}

/// Extractor for authenticated users.
///
/// # Authentication Flow
///
/// 1. Extract `Authorization: Bearer <token>` header
/// 2. Validate the session token via `AuthenticationService::validate_session`
/// 3. Check session expiration and account status
/// 4. Return `AuthenticatedUser` and `UserData`
///
/// # Errors
///
/// Returns HTTP 401 Unauthorized if:
/// - The Authorization header is missing or malformed
/// - The session token is invalid or expired
/// - The account is deactivated
pub struct SessionUser(pub AuthenticatedUser, pub UserData);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token: String = bearer_token(&parts.headers)?.to_string();

        let mut persistence = state.persistence.lock().await;
        let (user, data) = AuthenticationService::validate_session(&mut persistence, &token)
            .map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidSession(e.to_string())
            })?;
        drop(persistence);

        debug!(
            email = %user.email,
            role = ?user.role,
            "Session validated successfully"
        );

        Ok(Self(user, data))
    }
}

/// Session extraction errors.
///
/// These errors are returned when session validation fails and are
/// automatically converted to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// Session validation failed.
    InvalidSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingAuthorizationHeader => {
                (StatusCode::UNAUTHORIZED, "Missing Authorization header")
            }
            Self::InvalidAuthorizationHeader => (
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            ),
            Self::InvalidSession(reason) => {
                return (
                    StatusCode::UNAUTHORIZED,
                    format!("Session validation failed: {reason}"),
                )
                    .into_response();
            }
        };

        (status, message).into_response()
    }
}
