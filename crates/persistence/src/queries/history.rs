// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Status-history ledger projections.
//!
//! These queries are read-only. Ledger rows are written exclusively by
//! the transition and creation transactions and are never mutated or
//! deleted afterwards, so the projections here always reflect the full
//! audit record — including entries of soft-deleted cases.

use crate::data_models::{HistoryEntryDetail, HistoryRow};
use crate::diesel_schema::{case_status_history, users};
use crate::error::PersistenceError;
use crate::queries::catalog;
use diesel::prelude::*;
use securo_case_ledger::HistoryEntry;
use std::collections::HashMap;

/// Ordering for ledger projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryOrder {
    /// Chronological, oldest first.
    Ascending,
    /// Most recent first.
    Descending,
}

/// Lists a case's ledger entries joined with display data.
///
/// # Arguments
///
/// * `case_id` - The owning case
/// * `order` - Chronological or most-recent-first
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_case_history(
    conn: &mut SqliteConnection,
    case_id: i64,
    order: HistoryOrder,
) -> Result<Vec<HistoryEntryDetail>, PersistenceError> {
    let status_names: HashMap<i64, String> = catalog::load_status_names(conn)?;

    let query = case_status_history::table
        .inner_join(users::table)
        .filter(case_status_history::case_id.eq(case_id));

    let rows: Vec<(HistoryRow, (String, String))> = match order {
        HistoryOrder::Ascending => query
            .order((
                case_status_history::changed_at.asc(),
                case_status_history::history_id.asc(),
            ))
            .select((
                HistoryRow::as_select(),
                (users::first_name, users::last_name),
            ))
            .load(conn)?,
        HistoryOrder::Descending => query
            .order((
                case_status_history::changed_at.desc(),
                case_status_history::history_id.desc(),
            ))
            .select((
                HistoryRow::as_select(),
                (users::first_name, users::last_name),
            ))
            .load(conn)?,
    };

    let details: Vec<HistoryEntryDetail> = rows
        .into_iter()
        .map(|(row, (first_name, last_name))| {
            let from_status_name: Option<String> = row
                .from_status_id
                .and_then(|status_id| status_names.get(&status_id).cloned());
            let to_status_name: String = status_names
                .get(&row.to_status_id)
                .cloned()
                .unwrap_or_else(|| row.to_status_id.to_string());
            HistoryEntryDetail {
                history_id: row.history_id,
                case_id: row.case_id,
                from_status_id: row.from_status_id,
                from_status_name,
                to_status_id: row.to_status_id,
                to_status_name,
                comment: row.comment,
                changed_by_user_id: row.changed_by_user_id,
                changed_by_name: format!("{first_name} {last_name}"),
                changed_at: row.changed_at,
            }
        })
        .collect();

    Ok(details)
}

/// Loads a case's ledger entries in insertion order as plain values.
///
/// Used for chain-integrity verification.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn load_chain(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<HistoryEntry>, PersistenceError> {
    let rows: Vec<HistoryRow> = case_status_history::table
        .filter(case_status_history::case_id.eq(case_id))
        .order((
            case_status_history::changed_at.asc(),
            case_status_history::history_id.asc(),
        ))
        .select(HistoryRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| HistoryEntry {
            case_id: row.case_id,
            from_status_id: row.from_status_id,
            to_status_id: row.to_status_id,
            comment: row.comment,
            changed_by_user_id: row.changed_by_user_id,
            changed_at: row.changed_at,
        })
        .collect())
}
