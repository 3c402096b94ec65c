// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::validation::ValidationError;
use securo_case_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from persistence errors and represent the API
/// contract: the server maps each variant to exactly one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller is not authenticated (HTTP 401).
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The request body failed schema validation (HTTP 400).
    ValidationFailed {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The requested status does not exist or is inactive (HTTP 400).
    InvalidStatus {
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (HTTP 404).
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The underlying store failed; the request had no partial effect
    /// (HTTP 500).
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::ValidationFailed { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::InvalidStatus { message } => write!(f, "Invalid status: {message}"),
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Translates a persistence error into an API error.
///
/// This translation is explicit and ensures persistence errors are not
/// leaked directly: missing referents become 404s, bad status requests
/// become 400s, everything else is an internal error (the transaction
/// has already rolled back, so the caller may safely retry).
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::CaseNotFound(case_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Sprawa"),
            message: format!("Sprawa {case_id} nie istnieje"),
        },
        PersistenceError::ClientNotFound(client_id) => ApiError::ResourceNotFound {
            resource_type: String::from("Klient"),
            message: format!("Klient {client_id} nie istnieje"),
        },
        PersistenceError::StatusNotFound(status_id) => ApiError::InvalidStatus {
            message: format!("Status {status_id} nie istnieje"),
        },
        PersistenceError::StatusCodeNotFound(code) => ApiError::InvalidStatus {
            message: format!("Status '{code}' nie istnieje"),
        },
        PersistenceError::StatusInactive { status_id, code } => ApiError::InvalidStatus {
            message: format!("Status {status_id} ({code}) jest nieaktywny"),
        },
        PersistenceError::UserNotFound(msg)
        | PersistenceError::SessionNotFound(msg)
        | PersistenceError::SessionExpired(msg) => ApiError::AuthenticationFailed { reason: msg },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
