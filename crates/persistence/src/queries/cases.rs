// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case projections, listings, and filters.
//!
//! Soft-deleted cases are excluded from every query here; their history
//! rows are retained and remain reachable through the ledger queries.

use crate::data_models::{
    CaseDetail, CaseFilters, CaseRow, CaseSummary, ClientData, InsuranceCompanySummary,
    UserSummary,
};
use crate::diesel_schema::{case_statuses, cases, clients, insurance_companies, users};
use crate::error::PersistenceError;
use crate::queries::catalog;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use securo_case_domain::Case;

/// Row tuple produced by the listing join.
type SummaryRow = (
    i64,
    String,
    i64,
    String,
    String,
    i64,
    String,
    String,
    Option<String>,
    Option<i64>,
    Option<f64>,
    String,
);

/// Loads a raw case row by ID, including soft-deleted rows.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_case_row(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Option<CaseRow>, PersistenceError> {
    Ok(cases::table
        .filter(cases::case_id.eq(case_id))
        .select(CaseRow::as_select())
        .first(conn)
        .optional()?)
}

/// Loads the transition view of a case.
///
/// Soft-deleted cases are treated as missing: they accept no further
/// transitions.
///
/// # Errors
///
/// Returns `PersistenceError::CaseNotFound` if the case does not exist or
/// has been soft-deleted.
pub fn load_case_for_transition(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Case, PersistenceError> {
    let row: CaseRow =
        get_case_row(conn, case_id)?.ok_or(PersistenceError::CaseNotFound(case_id))?;
    if row.deleted_at.is_some() {
        return Err(PersistenceError::CaseNotFound(case_id));
    }
    Ok(row.to_transition_view())
}

/// Loads the fully joined projection of a case.
///
/// # Errors
///
/// Returns `PersistenceError::CaseNotFound` if the case does not exist or
/// has been soft-deleted, or an error if a referenced row is missing
/// (referential corruption).
pub fn get_case_detail(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<CaseDetail, PersistenceError> {
    let case: CaseRow =
        get_case_row(conn, case_id)?.ok_or(PersistenceError::CaseNotFound(case_id))?;
    if case.deleted_at.is_some() {
        return Err(PersistenceError::CaseNotFound(case_id));
    }

    let client: ClientData = clients::table
        .filter(clients::client_id.eq(case.client_id))
        .select(ClientData::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::Other(format!(
                "Case {case_id} references missing client {}",
                case.client_id
            ))
        })?;

    let status = catalog::get_status_by_id(conn, case.status_id)?;

    let insurance_company: Option<InsuranceCompanySummary> = match case.insurance_company_id {
        Some(insurance_company_id) => insurance_companies::table
            .filter(insurance_companies::insurance_company_id.eq(insurance_company_id))
            .select((
                insurance_companies::insurance_company_id,
                insurance_companies::name,
                insurance_companies::short_name,
            ))
            .first::<(i64, String, Option<String>)>(conn)
            .optional()?
            .map(|(insurance_company_id, name, short_name)| InsuranceCompanySummary {
                insurance_company_id,
                name,
                short_name,
            }),
        None => None,
    };

    let assigned_agent: Option<UserSummary> = match case.assigned_agent_id {
        Some(agent_id) => users::table
            .filter(users::user_id.eq(agent_id))
            .select((
                users::user_id,
                users::first_name,
                users::last_name,
                users::email,
            ))
            .first::<(i64, String, String, String)>(conn)
            .optional()?
            .map(|(user_id, first_name, last_name, email)| UserSummary {
                user_id,
                first_name,
                last_name,
                email,
            }),
        None => None,
    };

    Ok(CaseDetail {
        case,
        client,
        status,
        insurance_company,
        assigned_agent,
    })
}

/// Lists cases with filters and pagination.
///
/// Results are always ordered by creation time descending. Returns the
/// page of summaries plus the total matching count for pagination
/// metadata.
///
/// # Arguments
///
/// * `filters` - Free-text and exact-match filters
/// * `page` - 1-based page number
/// * `limit` - Page size
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_cases(
    conn: &mut SqliteConnection,
    filters: &CaseFilters,
    page: u32,
    limit: u32,
) -> Result<(Vec<CaseSummary>, u64), PersistenceError> {
    let offset: i64 = i64::from(page.saturating_sub(1)) * i64::from(limit);

    let mut query = cases::table
        .inner_join(clients::table)
        .inner_join(case_statuses::table)
        .filter(cases::deleted_at.is_null())
        .into_boxed();

    if let Some(search) = &filters.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            cases::case_number
                .like(pattern.clone())
                .nullable()
                .or(cases::claim_number.like(pattern.clone()))
                .or(cases::incident_description.like(pattern.clone()))
                .or(cases::incident_location.like(pattern.clone()))
                .or(clients::first_name.like(pattern.clone()).nullable())
                .or(clients::last_name.like(pattern).nullable()),
        );
    }
    if let Some(status_code) = &filters.status_code {
        query = query.filter(case_statuses::code.eq(status_code.clone()));
    }
    if let Some(client_id) = filters.client_id {
        query = query.filter(cases::client_id.eq(client_id));
    }
    if let Some(assigned_agent_id) = filters.assigned_agent_id {
        query = query.filter(cases::assigned_agent_id.eq(assigned_agent_id));
    }

    let rows: Vec<SummaryRow> = query
        .order(cases::created_at.desc())
        .limit(i64::from(limit))
        .offset(offset)
        .select((
            cases::case_id,
            cases::case_number,
            cases::client_id,
            clients::first_name,
            clients::last_name,
            cases::status_id,
            case_statuses::code,
            case_statuses::name,
            case_statuses::color,
            cases::assigned_agent_id,
            cases::claim_value,
            cases::created_at,
        ))
        .load(conn)?;

    let total: u64 = count_cases(conn, filters)?;

    let summaries: Vec<CaseSummary> = rows
        .into_iter()
        .map(
            |(
                case_id,
                case_number,
                client_id,
                first_name,
                last_name,
                status_id,
                status_code,
                status_name,
                status_color,
                assigned_agent_id,
                claim_value,
                created_at,
            )| CaseSummary {
                case_id,
                case_number,
                client_id,
                client_name: format!("{first_name} {last_name}"),
                status_id,
                status_code,
                status_name,
                status_color,
                assigned_agent_id,
                claim_value,
                created_at,
            },
        )
        .collect();

    Ok((summaries, total))
}

/// Counts cases matching the given filters.
///
/// The filter set must stay in lockstep with `list_cases`; boxed Diesel
/// queries cannot be reused for both the page and the count.
fn count_cases(
    conn: &mut SqliteConnection,
    filters: &CaseFilters,
) -> Result<u64, PersistenceError> {
    let mut query = cases::table
        .inner_join(clients::table)
        .inner_join(case_statuses::table)
        .filter(cases::deleted_at.is_null())
        .into_boxed();

    if let Some(search) = &filters.search {
        let pattern: String = format!("%{search}%");
        query = query.filter(
            cases::case_number
                .like(pattern.clone())
                .nullable()
                .or(cases::claim_number.like(pattern.clone()))
                .or(cases::incident_description.like(pattern.clone()))
                .or(cases::incident_location.like(pattern.clone()))
                .or(clients::first_name.like(pattern.clone()).nullable())
                .or(clients::last_name.like(pattern).nullable()),
        );
    }
    if let Some(status_code) = &filters.status_code {
        query = query.filter(case_statuses::code.eq(status_code.clone()));
    }
    if let Some(client_id) = filters.client_id {
        query = query.filter(cases::client_id.eq(client_id));
    }
    if let Some(assigned_agent_id) = filters.assigned_agent_id {
        query = query.filter(cases::assigned_agent_id.eq(assigned_agent_id));
    }

    let total: i64 = query.count().get_result(conn)?;
    total
        .to_u64()
        .ok_or_else(|| PersistenceError::Other(format!("Negative case count: {total}")))
}

/// Finds the highest allocated per-month sequence for a case-number
/// prefix.
///
/// Returns 0 when the month has no cases yet. Used by case-number
/// allocation inside the creation transaction.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn max_sequence_for_prefix(
    conn: &mut SqliteConnection,
    month_prefix: &str,
) -> Result<u32, PersistenceError> {
    let pattern: String = format!("{month_prefix}%");
    let numbers: Vec<String> = cases::table
        .filter(cases::case_number.like(pattern))
        .select(cases::case_number)
        .load(conn)?;

    let max: u32 = numbers
        .iter()
        .filter_map(|number| number.rsplit('/').next())
        .filter_map(|sequence| sequence.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    Ok(max)
}
