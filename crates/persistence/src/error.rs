// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested case does not exist or has been soft-deleted.
    CaseNotFound(i64),
    /// The requested status does not exist in the catalog.
    StatusNotFound(i64),
    /// No status with the given code exists in the catalog.
    StatusCodeNotFound(String),
    /// The requested status exists but is not selectable.
    StatusInactive {
        /// The requested status identifier.
        status_id: i64,
        /// The status code, for diagnostics.
        code: String,
    },
    /// The status catalog has no active entries to create cases with.
    EmptyStatusCatalog,
    /// The requested client does not exist.
    ClientNotFound(i64),
    /// The requested user was not found.
    UserNotFound(String),
    /// The requested session was not found.
    SessionNotFound(String),
    /// Session has expired.
    SessionExpired(String),
    /// Case number allocation kept colliding with concurrent writers.
    CaseNumberConflict {
        /// How many allocation attempts were made.
        attempts: u32,
    },
    /// The requested resource was not found.
    NotFound(String),
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::CaseNotFound(case_id) => write!(f, "Case not found: {case_id}"),
            Self::StatusNotFound(status_id) => write!(f, "Status not found: {status_id}"),
            Self::StatusCodeNotFound(code) => write!(f, "Status code not found: {code}"),
            Self::StatusInactive { status_id, code } => {
                write!(f, "Status {status_id} ({code}) is not active")
            }
            Self::EmptyStatusCatalog => write!(f, "Status catalog has no active entries"),
            Self::ClientNotFound(client_id) => write!(f, "Client not found: {client_id}"),
            Self::UserNotFound(msg) => write!(f, "User not found: {msg}"),
            Self::SessionNotFound(msg) => write!(f, "Session not found: {msg}"),
            Self::SessionExpired(msg) => write!(f, "Session expired: {msg}"),
            Self::CaseNumberConflict { attempts } => {
                write!(f, "Case number allocation failed after {attempts} attempts")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<securo_case::CoreError> for PersistenceError {
    fn from(err: securo_case::CoreError) -> Self {
        use securo_case_domain::DomainError;
        match err {
            securo_case::CoreError::DomainViolation(DomainError::InactiveStatus {
                status_id,
                code,
            }) => Self::StatusInactive { status_id, code },
            securo_case::CoreError::DomainViolation(DomainError::CaseNotFound { case_id }) => {
                Self::CaseNotFound(case_id)
            }
            securo_case::CoreError::DomainViolation(other) => Self::Other(other.to_string()),
            securo_case::CoreError::Internal(msg) => Self::Other(msg),
        }
    }
}
