// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the SecuroHelp case system.
//!
//! This crate provides database persistence for cases, the status
//! catalog, the append-only status-history ledger, and the supporting
//! reference data (users, sessions, clients, insurance companies). It is
//! built on Diesel over `SQLite`.
//!
//! ## Backend
//!
//! `SQLite` is the single supported backend:
//! - File-backed databases (WAL mode) for deployments
//! - Shared in-memory databases for unit and integration tests
//!
//! The in-memory variant sits behind the same `Persistence` API as the
//! file-backed one, so tests exercise exactly the production code paths.
//!
//! ## Atomicity
//!
//! The two-write operations — case creation (row + creation ledger
//! entry) and status transitions (row update + transition ledger entry)
//! — run inside a single transaction. A partial write (status changed
//! with no ledger entry, or vice versa) is the one failure mode this
//! layer exists to prevent; any error rolls back both writes.
//!
//! ## Concurrency
//!
//! Callers hold the adapter behind a lock (the server wraps it in a
//! mutex), and each transition transaction re-reads the case row before
//! planning, so two racing transitions cannot both capture the same
//! previous status. Case-number allocation is additionally guarded by
//! the UNIQUE constraint on `case_number` with a bounded retry, which
//! also covers writers on other connections.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use securo_case_domain::CaseStatus;
use securo_case_ledger::{ChainViolation, HistoryEntry, verify_chain};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    CaseDetail, CaseFieldPatch, CaseFilters, CaseRow, CaseSummary, ClientData,
    HistoryEntryDetail, InsuranceCompanySummary, NewCaseData, SessionData, TransitionApplied,
    UserData, UserSummary,
};
pub use error::PersistenceError;
pub use queries::history::HistoryOrder;

/// Persistence adapter for the case store, status catalog, and ledger.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Create a unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Status Catalog
    // ========================================================================

    /// Lists the active statuses ordered by `sort_order` ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_active_statuses(&mut self) -> Result<Vec<CaseStatus>, PersistenceError> {
        queries::catalog::list_active_statuses(&mut self.conn)
    }

    /// Retrieves a status by its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the status does not exist.
    pub fn get_status_by_id(&mut self, status_id: i64) -> Result<CaseStatus, PersistenceError> {
        queries::catalog::get_status_by_id(&mut self.conn, status_id)
    }

    /// Retrieves a status by its symbolic code.
    ///
    /// A missing code means catalog misconfiguration and is fatal to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the code does not exist.
    pub fn get_status_by_code(&mut self, code: &str) -> Result<CaseStatus, PersistenceError> {
        queries::catalog::get_status_by_code(&mut self.conn, code)
    }

    // ========================================================================
    // Cases
    // ========================================================================

    /// Creates a case and its initial ledger entry atomically.
    ///
    /// # Arguments
    ///
    /// * `data` - The validated creation input
    /// * `created_by_user_id` - The authenticated user creating the case
    ///
    /// # Returns
    ///
    /// The fully joined projection of the created case.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or persistence fails; no partial
    /// write remains.
    pub fn create_case(
        &mut self,
        data: &NewCaseData,
        created_by_user_id: i64,
    ) -> Result<CaseDetail, PersistenceError> {
        let case_id: i64 = mutations::cases::create_case(&mut self.conn, data, created_by_user_id)?;
        queries::cases::get_case_detail(&mut self.conn, case_id)
    }

    /// Loads the fully joined projection of a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the case does not exist or is soft-deleted.
    pub fn get_case_detail(&mut self, case_id: i64) -> Result<CaseDetail, PersistenceError> {
        queries::cases::get_case_detail(&mut self.conn, case_id)
    }

    /// Loads a raw case row, including soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn get_case_row(&mut self, case_id: i64) -> Result<Option<CaseRow>, PersistenceError> {
        queries::cases::get_case_row(&mut self.conn, case_id)
    }

    /// Lists cases with filters and pagination, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_cases(
        &mut self,
        filters: &CaseFilters,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<CaseSummary>, u64), PersistenceError> {
        queries::cases::list_cases(&mut self.conn, filters, page, limit)
    }

    /// Applies a status transition to a case.
    ///
    /// See the crate docs for the atomicity and concurrency contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the case or status is missing/inactive, or if
    /// any write fails (both writes roll back).
    pub fn apply_transition(
        &mut self,
        case_id: i64,
        requested_status_id: i64,
        comment: Option<&str>,
        acting_user_id: i64,
    ) -> Result<TransitionApplied, PersistenceError> {
        mutations::cases::apply_transition(
            &mut self.conn,
            case_id,
            requested_status_id,
            comment,
            acting_user_id,
        )
    }

    /// Applies a field-level patch to a case.
    ///
    /// The patch cannot carry a status change; status changes go through
    /// `apply_transition`.
    ///
    /// # Errors
    ///
    /// Returns an error if the case does not exist or the write fails.
    pub fn update_case_fields(
        &mut self,
        case_id: i64,
        patch: &CaseFieldPatch,
        updated_by_user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::cases::update_case_fields(&mut self.conn, case_id, patch, updated_by_user_id)
    }

    /// Soft-deletes a case; its history is retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the case does not exist or was already deleted.
    pub fn soft_delete_case(
        &mut self,
        case_id: i64,
        deleted_by_user_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::cases::soft_delete_case(&mut self.conn, case_id, deleted_by_user_id)
    }

    // ========================================================================
    // Status History Ledger
    // ========================================================================

    /// Lists a case's ledger entries joined with display data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_case_history(
        &mut self,
        case_id: i64,
        order: HistoryOrder,
    ) -> Result<Vec<HistoryEntryDetail>, PersistenceError> {
        queries::history::list_case_history(&mut self.conn, case_id, order)
    }

    /// Verifies the ledger chain of a case against its stored status.
    ///
    /// Checks audit completeness (replay reproduces the current status)
    /// and chain continuity (each entry links to its predecessor).
    ///
    /// # Errors
    ///
    /// Returns an error if the chain is broken or the database cannot be
    /// queried.
    pub fn verify_case_chain(&mut self, case_id: i64) -> Result<(), PersistenceError> {
        let row: CaseRow = queries::cases::get_case_row(&mut self.conn, case_id)?
            .ok_or(PersistenceError::CaseNotFound(case_id))?;
        let chain: Vec<HistoryEntry> = queries::history::load_chain(&mut self.conn, case_id)?;

        let created_status_id: i64 = chain
            .first()
            .map_or(row.status_id, |entry| entry.to_status_id);

        verify_chain(&chain, created_status_id, row.status_id)
            .map_err(|violation: ChainViolation| PersistenceError::Other(violation.to_string()))
    }

    // ========================================================================
    // Clients
    // ========================================================================

    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn create_client(
        &mut self,
        first_name: &str,
        last_name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        city: Option<&str>,
        created_by_user_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::clients::create_client(
            &mut self.conn,
            first_name,
            last_name,
            email,
            phone,
            city,
            created_by_user_id,
        )
    }

    /// Retrieves a client by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_client_by_id(
        &mut self,
        client_id: i64,
    ) -> Result<Option<ClientData>, PersistenceError> {
        queries::clients::get_client_by_id(&mut self.conn, client_id)
    }

    /// Lists all clients, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_clients(&mut self) -> Result<Vec<ClientData>, PersistenceError> {
        queries::clients::list_clients(&mut self.conn)
    }

    // ========================================================================
    // Users & Sessions
    // ========================================================================

    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user cannot be created.
    pub fn create_user(
        &mut self,
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, email, first_name, last_name, password, role)
    }

    /// Deactivates a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn deactivate_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::deactivate_user(&mut self.conn, user_id)
    }

    /// Retrieves a user by email address.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Updates the last login timestamp for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if password verification fails.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Creates a new session for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn)
    }
}
