// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication types and the session service.
//!
//! Token issuance policy is deliberately simple (opaque random tokens in
//! the sessions table); the contract the rest of the system relies on is
//! only "given an authenticated user id", checked before any core logic
//! runs.

use time::format_description::well_known::Iso8601;
use time::{Duration, OffsetDateTime};

use crate::error::AuthError;
use securo_case_persistence::{Persistence, PersistenceError, SessionData, UserData};

/// Staff roles.
///
/// Roles describe office staff, never clients. All roles may work cases;
/// role-specific restrictions live in the office workflow, not in the
/// lifecycle core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Practice administrator.
    Admin,
    /// Claims agent handling cases.
    Agent,
    /// Office assistant.
    Assistant,
    /// Accountant with read access to settlements.
    Accountant,
}

impl Role {
    /// Returns the stored string representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Agent => "AGENT",
            Self::Assistant => "ASSISTANT",
            Self::Accountant => "ACCOUNTANT",
        }
    }

    /// Parses a stored role string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a known role.
    pub fn parse(s: &str) -> Result<Self, AuthError> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "AGENT" => Ok(Self::Agent),
            "ASSISTANT" => Ok(Self::Assistant),
            "ACCOUNTANT" => Ok(Self::Accountant),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {s}"),
            }),
        }
    }
}

/// An authenticated user with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The user's row identifier, recorded on every write they make.
    pub user_id: i64,
    /// The login email.
    pub email: String,
    /// Display name for joined responses.
    pub display_name: String,
    /// The role assigned to this user.
    pub role: Role,
}

/// Session-token authentication service.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (30 days).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::days(30);

    /// Authenticates a user by email and password and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The login email
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the user is unknown, inactive, or the
    /// password does not match.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser, UserData), AuthError> {
        let user: UserData = persistence
            .get_user_by_email(email)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Nieprawidłowy email lub hasło"),
            })?;

        if !user.is_active() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Konto jest nieaktywne"),
            });
        }

        let password_matches: bool = persistence
            .verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !password_matches {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Nieprawidłowy email lub hasło"),
            });
        }

        let role: Role = Role::parse(&user.role)?;
        let session_token: String = Self::generate_session_token();

        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String = expires_at
            .format(&Iso8601::DEFAULT)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to format expiration time: {e}"),
            })?;

        persistence
            .create_session(&session_token, user.user_id, &expires_at_str)
            .map_err(Self::map_persistence_error)?;
        persistence
            .update_last_login(user.user_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated: AuthenticatedUser = AuthenticatedUser {
            user_id: user.user_id,
            email: user.email.clone(),
            display_name: user.display_name(),
            role,
        };

        Ok((session_token, authenticated, user))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// user is inactive.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedUser, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            OffsetDateTime::parse(&session.expires_at, &Iso8601::DEFAULT).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if !user.is_active() {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Konto jest nieaktywne"),
            });
        }

        let role: Role = Role::parse(&user.role)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        let authenticated: AuthenticatedUser = AuthenticatedUser {
            user_id: user.user_id,
            email: user.email.clone(),
            display_name: user.display_name(),
            role,
        };

        Ok((authenticated, user))
    }

    /// Logs out by deleting the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the logout fails.
    pub fn logout(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Generates an opaque session token.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos());
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }

    /// Maps persistence errors to authentication errors.
    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionExpired(msg) | PersistenceError::SessionNotFound(msg) => {
                AuthError::AuthenticationFailed { reason: msg }
            }
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}
