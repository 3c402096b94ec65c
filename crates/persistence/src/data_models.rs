// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs, insert structs, and read-model projections.

use crate::diesel_schema::{case_status_history, case_statuses, cases, clients, sessions, users};
use crate::error::PersistenceError;
use diesel::prelude::*;
use securo_case_domain::{Case, CaseStatus, MilestoneDates, StatusCode};

/// A user row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserData {
    pub user_id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: i32,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserData {
    /// Returns the user's display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns true if the user may authenticate and act.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active != 0
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub role: &'a str,
    pub is_active: i32,
    pub created_at: &'a str,
}

/// A session row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession<'a> {
    pub session_token: &'a str,
    pub user_id: i64,
    pub created_at: &'a str,
    pub last_activity_at: &'a str,
    pub expires_at: &'a str,
}

/// A client row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientData {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub created_at: String,
    pub created_by_user_id: i64,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = clients)]
pub struct NewClient<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub city: Option<&'a str>,
    pub created_at: &'a str,
    pub created_by_user_id: i64,
}

/// A status catalog row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = case_statuses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CaseStatusRow {
    pub status_id: i64,
    pub code: String,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_final: i32,
    pub is_active: i32,
}

impl CaseStatusRow {
    /// Converts the stored row into the domain catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored code is not part of the vocabulary
    /// (catalog corruption).
    pub fn into_domain(self) -> Result<CaseStatus, PersistenceError> {
        let code: StatusCode = self
            .code
            .parse()
            .map_err(|e| PersistenceError::Other(format!("Corrupt status catalog: {e}")))?;
        Ok(CaseStatus {
            status_id: self.status_id,
            code,
            name: self.name,
            color: self.color,
            sort_order: self.sort_order,
            is_final: self.is_final != 0,
            is_active: self.is_active != 0,
        })
    }
}

/// A case row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = cases)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct CaseRow {
    pub case_id: i64,
    pub case_number: String,
    pub client_id: i64,
    pub insurance_company_id: Option<i64>,
    pub status_id: i64,
    pub assigned_agent_id: Option<i64>,
    pub incident_date: String,
    pub incident_description: Option<String>,
    pub incident_location: Option<String>,
    pub policy_number: Option<String>,
    pub claim_number: Option<String>,
    pub claim_value: Option<f64>,
    pub compensation_received: Option<f64>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_registration: Option<String>,
    pub vehicle_year: Option<i32>,
    pub internal_notes: Option<String>,
    pub documents_sent_date: Option<String>,
    pub decision_date: Option<String>,
    pub appeal_date: Option<String>,
    pub lawsuit_date: Option<String>,
    pub closed_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub created_by_user_id: i64,
    pub updated_by_user_id: Option<i64>,
    pub deleted_at: Option<String>,
    pub deleted_by_user_id: Option<i64>,
}

impl CaseRow {
    /// Extracts the slice of the row the transition controller operates on.
    #[must_use]
    pub fn to_transition_view(&self) -> Case {
        Case {
            case_id: self.case_id,
            case_number: self.case_number.clone(),
            status_id: self.status_id,
            milestones: MilestoneDates {
                documents_sent_date: self.documents_sent_date.clone(),
                decision_date: self.decision_date.clone(),
                appeal_date: self.appeal_date.clone(),
                lawsuit_date: self.lawsuit_date.clone(),
                closed_date: self.closed_date.clone(),
            },
            deleted_at: self.deleted_at.clone(),
        }
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = cases)]
pub struct NewCase<'a> {
    pub case_number: &'a str,
    pub client_id: i64,
    pub insurance_company_id: Option<i64>,
    pub status_id: i64,
    pub assigned_agent_id: Option<i64>,
    pub incident_date: &'a str,
    pub incident_description: Option<&'a str>,
    pub incident_location: Option<&'a str>,
    pub policy_number: Option<&'a str>,
    pub claim_value: Option<f64>,
    pub vehicle_brand: Option<&'a str>,
    pub vehicle_model: Option<&'a str>,
    pub vehicle_registration: Option<&'a str>,
    pub vehicle_year: Option<i32>,
    pub internal_notes: Option<&'a str>,
    pub created_at: &'a str,
    pub updated_at: &'a str,
    pub created_by_user_id: i64,
}

/// A history row as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = case_status_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryRow {
    pub history_id: i64,
    pub case_id: i64,
    pub from_status_id: Option<i64>,
    pub to_status_id: i64,
    pub comment: String,
    pub changed_by_user_id: i64,
    pub changed_at: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = case_status_history)]
pub struct NewHistory<'a> {
    pub case_id: i64,
    pub from_status_id: Option<i64>,
    pub to_status_id: i64,
    pub comment: &'a str,
    pub changed_by_user_id: i64,
    pub changed_at: &'a str,
}

/// Input for case creation.
///
/// Only the client reference and incident date are mandatory; the initial
/// status defaults to the lowest-sort-order active catalog entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCaseData {
    pub client_id: i64,
    pub insurance_company_id: Option<i64>,
    pub status_id: Option<i64>,
    pub assigned_agent_id: Option<i64>,
    pub incident_date: String,
    pub incident_description: Option<String>,
    pub incident_location: Option<String>,
    pub policy_number: Option<String>,
    pub claim_value: Option<f64>,
    pub vehicle_brand: Option<String>,
    pub vehicle_model: Option<String>,
    pub vehicle_registration: Option<String>,
    pub vehicle_year: Option<i32>,
    pub internal_notes: Option<String>,
}

/// Field-level patch for case updates.
///
/// The patch deliberately has no status field: status changes go through
/// the transition path only, preserving the single-writer invariant on
/// `status_id`.
#[derive(Debug, Clone, Default)]
pub struct CaseFieldPatch {
    pub insurance_company_id: Option<Option<i64>>,
    pub assigned_agent_id: Option<Option<i64>>,
    pub incident_description: Option<Option<String>>,
    pub incident_location: Option<Option<String>>,
    pub policy_number: Option<Option<String>>,
    pub claim_number: Option<Option<String>>,
    pub claim_value: Option<Option<f64>>,
    pub compensation_received: Option<Option<f64>>,
    pub vehicle_brand: Option<Option<String>>,
    pub vehicle_model: Option<Option<String>>,
    pub vehicle_registration: Option<Option<String>>,
    pub vehicle_year: Option<Option<i32>>,
    pub internal_notes: Option<Option<String>>,
}

impl CaseFieldPatch {
    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.insurance_company_id.is_none()
            && self.assigned_agent_id.is_none()
            && self.incident_description.is_none()
            && self.incident_location.is_none()
            && self.policy_number.is_none()
            && self.claim_number.is_none()
            && self.claim_value.is_none()
            && self.compensation_received.is_none()
            && self.vehicle_brand.is_none()
            && self.vehicle_model.is_none()
            && self.vehicle_registration.is_none()
            && self.vehicle_year.is_none()
            && self.internal_notes.is_none()
    }
}

/// Query filters for case listings.
#[derive(Debug, Clone, Default)]
pub struct CaseFilters {
    /// Free-text search across case number, claim number, client name,
    /// incident description, and incident location.
    pub search: Option<String>,
    /// Exact-match filter on status code.
    pub status_code: Option<String>,
    /// Exact-match filter on client.
    pub client_id: Option<i64>,
    /// Exact-match filter on assigned agent.
    pub assigned_agent_id: Option<i64>,
}

/// One row of a case listing, with joined display data.
#[derive(Debug, Clone)]
pub struct CaseSummary {
    pub case_id: i64,
    pub case_number: String,
    pub client_id: i64,
    pub client_name: String,
    pub status_id: i64,
    pub status_code: String,
    pub status_name: String,
    pub status_color: Option<String>,
    pub assigned_agent_id: Option<i64>,
    pub claim_value: Option<f64>,
    pub created_at: String,
}

/// Summary of a referenced user, for joined responses.
#[derive(Debug, Clone)]
pub struct UserSummary {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// Summary of a referenced insurance company, for joined responses.
#[derive(Debug, Clone)]
pub struct InsuranceCompanySummary {
    pub insurance_company_id: i64,
    pub name: String,
    pub short_name: Option<String>,
}

/// A fully joined case projection, as returned by the read endpoints.
#[derive(Debug, Clone)]
pub struct CaseDetail {
    pub case: CaseRow,
    pub client: ClientData,
    pub status: CaseStatus,
    pub insurance_company: Option<InsuranceCompanySummary>,
    pub assigned_agent: Option<UserSummary>,
}

/// One ledger entry joined with display data.
#[derive(Debug, Clone)]
pub struct HistoryEntryDetail {
    pub history_id: i64,
    pub case_id: i64,
    pub from_status_id: Option<i64>,
    pub from_status_name: Option<String>,
    pub to_status_id: i64,
    pub to_status_name: String,
    pub comment: String,
    pub changed_by_user_id: i64,
    pub changed_by_name: String,
    pub changed_at: String,
}

/// Outcome of a persisted transition request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionApplied {
    /// The requested status equals the stored one; nothing was written.
    Unchanged,
    /// The transition was applied; the case update and ledger entry were
    /// committed together.
    Applied {
        /// The status the case held before the transition.
        previous_status_id: i64,
        /// The status the case now holds.
        new_status_id: i64,
    },
}
