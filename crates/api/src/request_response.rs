// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types.
//!
//! The wire format is camelCase JSON, matching the frontends already in
//! the field. Bodies are deserialized into typed structs here and
//! validated before any core logic runs; nothing downstream ever sees a
//! loose JSON value.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use securo_case_persistence::{
    CaseDetail, CaseSummary, ClientData, HistoryEntryDetail, UserData,
};

/// Deserializes an id that clients send as either a number or a string.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(value)) => Ok(Some(value)),
        Some(NumberOrString::Text(text)) => {
            let trimmed: &str = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<i64>()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid id: {text}")))
        }
    }
}

/// Deserializes a patch field where absent means "keep" and `null` means
/// "clear".
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// API request for logging in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// The login email.
    pub email: String,
    /// The plain-text password.
    pub password: String,
}

/// Public user projection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub user_id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl From<&UserData> for UserInfo {
    fn from(user: &UserData) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.clone(),
        }
    }
}

/// API response for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// The opaque session token for subsequent Bearer auth.
    pub token: String,
    /// The authenticated user.
    pub user: UserInfo,
}

/// One status catalog entry as exposed over HTTP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub status_id: i64,
    pub code: String,
    pub name: String,
    pub color: Option<String>,
    pub sort_order: i32,
    pub is_final: bool,
}

/// API request for creating a case.
///
/// Only `clientId` and `incidentDate` are required; everything else is
/// optional. `statusId` accepts a number or a numeric string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateCaseRequest {
    pub client_id: Option<i64>,
    pub incident_date: Option<String>,
    #[serde(deserialize_with = "lenient_id")]
    pub status_id: Option<i64>,
    pub insurance_company_id: Option<i64>,
    pub assigned_agent_id: Option<i64>,
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

/// API request for updating a case.
///
/// `statusId` may arrive as a number or a string; when it differs from
/// the stored value the transition controller runs before the field
/// patch is applied. Patch fields distinguish "absent" (keep) from
/// `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCaseRequest {
    #[serde(deserialize_with = "lenient_id")]
    pub status_id: Option<i64>,
    pub status_comment: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub insurance_company_id: Option<Option<i64>>,
    #[serde(deserialize_with = "double_option")]
    pub assigned_agent_id: Option<Option<i64>>,
    #[serde(deserialize_with = "double_option")]
    pub incident_description: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub incident_location: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub policy_number: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub claim_number: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub claim_value: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option")]
    pub compensation_received: Option<Option<f64>>,
    #[serde(deserialize_with = "double_option")]
    pub vehicle_brand: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub vehicle_model: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub vehicle_registration: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub vehicle_year: Option<Option<i32>>,
    #[serde(deserialize_with = "double_option")]
    pub internal_notes: Option<Option<String>>,
}

/// Query parameters for listing cases.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListCasesQuery {
    /// Free-text search.
    pub search: Option<String>,
    /// Exact-match filter on status code.
    pub status: Option<String>,
    pub client_id: Option<i64>,
    pub assigned_agent_id: Option<i64>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
}

/// One row of a case listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummaryResponse {
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

impl From<CaseSummary> for CaseSummaryResponse {
    fn from(summary: CaseSummary) -> Self {
        Self {
            case_id: summary.case_id,
            case_number: summary.case_number,
            client_id: summary.client_id,
            client_name: summary.client_name,
            status_id: summary.status_id,
            status_code: summary.status_code,
            status_name: summary.status_name,
            status_color: summary.status_color,
            assigned_agent_id: summary.assigned_agent_id,
            claim_value: summary.claim_value,
            created_at: summary.created_at,
        }
    }
}

/// API response for case listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseListResponse {
    pub cases: Vec<CaseSummaryResponse>,
    pub pagination: PaginationInfo,
}

/// Summary of a referenced client.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub client_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

impl From<ClientData> for ClientResponse {
    fn from(client: ClientData) -> Self {
        Self {
            client_id: client.client_id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone: client.phone,
            city: client.city,
        }
    }
}

/// API request for creating a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
}

/// Summary of a referenced insurance company.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceCompanyInfo {
    pub insurance_company_id: i64,
    pub name: String,
    pub short_name: Option<String>,
}

/// Summary of a referenced staff user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInfo {
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One ledger entry as exposed over HTTP.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub history_id: i64,
    pub from_status_id: Option<i64>,
    pub from_status_name: Option<String>,
    pub to_status_id: i64,
    pub to_status_name: String,
    pub comment: String,
    pub changed_by_user_id: i64,
    pub changed_by_name: String,
    pub changed_at: String,
}

impl From<HistoryEntryDetail> for HistoryEntryResponse {
    fn from(entry: HistoryEntryDetail) -> Self {
        Self {
            history_id: entry.history_id,
            from_status_id: entry.from_status_id,
            from_status_name: entry.from_status_name,
            to_status_id: entry.to_status_id,
            to_status_name: entry.to_status_name,
            comment: entry.comment,
            changed_by_user_id: entry.changed_by_user_id,
            changed_by_name: entry.changed_by_name,
            changed_at: entry.changed_at,
        }
    }
}

/// The fully joined case projection returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDetailResponse {
    pub case_id: i64,
    pub case_number: String,
    pub status: StatusInfo,
    pub client: ClientResponse,
    pub insurance_company: Option<InsuranceCompanyInfo>,
    pub assigned_agent: Option<AgentInfo>,
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
    /// Ledger entries, most recent first.
    pub status_history: Vec<HistoryEntryResponse>,
}

impl CaseDetailResponse {
    /// Builds the response from a joined projection and its history.
    #[must_use]
    pub fn from_detail(detail: CaseDetail, history: Vec<HistoryEntryDetail>) -> Self {
        let case = detail.case;
        Self {
            case_id: case.case_id,
            case_number: case.case_number,
            status: StatusInfo {
                status_id: detail.status.status_id,
                code: detail.status.code.as_str().to_string(),
                name: detail.status.name,
                color: detail.status.color,
                sort_order: detail.status.sort_order,
                is_final: detail.status.is_final,
            },
            client: ClientResponse::from(detail.client),
            insurance_company: detail.insurance_company.map(|company| InsuranceCompanyInfo {
                insurance_company_id: company.insurance_company_id,
                name: company.name,
                short_name: company.short_name,
            }),
            assigned_agent: detail.assigned_agent.map(|agent| AgentInfo {
                user_id: agent.user_id,
                first_name: agent.first_name,
                last_name: agent.last_name,
                email: agent.email,
            }),
            incident_date: case.incident_date,
            incident_description: case.incident_description,
            incident_location: case.incident_location,
            policy_number: case.policy_number,
            claim_number: case.claim_number,
            claim_value: case.claim_value,
            compensation_received: case.compensation_received,
            vehicle_brand: case.vehicle_brand,
            vehicle_model: case.vehicle_model,
            vehicle_registration: case.vehicle_registration,
            vehicle_year: case.vehicle_year,
            internal_notes: case.internal_notes,
            documents_sent_date: case.documents_sent_date,
            decision_date: case.decision_date,
            appeal_date: case.appeal_date,
            lawsuit_date: case.lawsuit_date,
            closed_date: case.closed_date,
            created_at: case.created_at,
            updated_at: case.updated_at,
            status_history: history.into_iter().map(HistoryEntryResponse::from).collect(),
        }
    }
}
