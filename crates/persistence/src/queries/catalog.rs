// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status catalog queries.
//!
//! The catalog is reference data seeded at migration time. Lookups
//! re-query on every call; nothing here is cached.

use crate::data_models::CaseStatusRow;
use crate::diesel_schema::case_statuses;
use crate::error::PersistenceError;
use diesel::prelude::*;
use securo_case_domain::CaseStatus;

/// Lists the active statuses ordered by `sort_order` ascending.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or the catalog is
/// corrupt.
pub fn list_active_statuses(
    conn: &mut SqliteConnection,
) -> Result<Vec<CaseStatus>, PersistenceError> {
    let rows: Vec<CaseStatusRow> = case_statuses::table
        .filter(case_statuses::is_active.eq(1))
        .order(case_statuses::sort_order.asc())
        .select(CaseStatusRow::as_select())
        .load(conn)?;

    rows.into_iter().map(CaseStatusRow::into_domain).collect()
}

/// Retrieves a status by its identifier.
///
/// # Errors
///
/// Returns `PersistenceError::StatusNotFound` if no such status exists.
pub fn get_status_by_id(
    conn: &mut SqliteConnection,
    status_id: i64,
) -> Result<CaseStatus, PersistenceError> {
    let row: CaseStatusRow = case_statuses::table
        .filter(case_statuses::status_id.eq(status_id))
        .select(CaseStatusRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::StatusNotFound(status_id))?;

    row.into_domain()
}

/// Retrieves a status by its symbolic code.
///
/// A missing code is fatal to the caller: the catalog vocabulary is
/// fixed, so the absence of a code means misconfiguration.
///
/// # Errors
///
/// Returns `PersistenceError::StatusCodeNotFound` if no such code exists.
pub fn get_status_by_code(
    conn: &mut SqliteConnection,
    code: &str,
) -> Result<CaseStatus, PersistenceError> {
    let row: CaseStatusRow = case_statuses::table
        .filter(case_statuses::code.eq(code))
        .select(CaseStatusRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::StatusCodeNotFound(code.to_string()))?;

    row.into_domain()
}

/// Retrieves the default status for new cases.
///
/// The default is the lowest-sort-order active catalog entry.
///
/// # Errors
///
/// Returns `PersistenceError::EmptyStatusCatalog` if no active status
/// exists.
pub fn get_default_status(conn: &mut SqliteConnection) -> Result<CaseStatus, PersistenceError> {
    let row: CaseStatusRow = case_statuses::table
        .filter(case_statuses::is_active.eq(1))
        .order(case_statuses::sort_order.asc())
        .select(CaseStatusRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::EmptyStatusCatalog)?;

    row.into_domain()
}

/// Loads the full catalog keyed by status id.
///
/// Used to decorate history projections without per-row lookups.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn load_status_names(
    conn: &mut SqliteConnection,
) -> Result<std::collections::HashMap<i64, String>, PersistenceError> {
    let rows: Vec<(i64, String)> = case_statuses::table
        .select((case_statuses::status_id, case_statuses::name))
        .load(conn)?;

    Ok(rows.into_iter().collect())
}
