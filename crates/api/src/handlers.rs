// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions.
//!
//! Handlers orchestrate validation, the transition controller, and
//! persistence. They are plain functions over the persistence adapter so
//! the HTTP layer stays a thin wrapper.

use tracing::info;

use crate::auth::{AuthenticatedUser, AuthenticationService};
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{
    CaseDetailResponse, CaseListResponse, CaseSummaryResponse, ClientResponse,
    CreateCaseRequest, CreateClientRequest, HistoryEntryResponse, ListCasesQuery, LoginRequest,
    LoginResponse, PaginationInfo, StatusInfo, UpdateCaseRequest, UserInfo,
};
use crate::validation::{
    clamp_pagination, validate_create_case, validate_create_client, validate_status_comment,
};
use securo_case_domain::CaseStatus;
use securo_case_persistence::{
    CaseDetail, CaseFieldPatch, CaseFilters, HistoryOrder, NewCaseData, Persistence,
    TransitionApplied, UserData,
};

fn status_info(status: CaseStatus) -> StatusInfo {
    StatusInfo {
        status_id: status.status_id,
        code: status.code.as_str().to_string(),
        name: status.name,
        color: status.color,
        sort_order: status.sort_order,
        is_final: status.is_final,
    }
}

/// Loads the joined detail response for a case, history included.
fn load_detail(persistence: &mut Persistence, case_id: i64) -> Result<CaseDetailResponse, ApiError> {
    let detail: CaseDetail = persistence
        .get_case_detail(case_id)
        .map_err(translate_persistence_error)?;
    let history = persistence
        .list_case_history(case_id, HistoryOrder::Descending)
        .map_err(translate_persistence_error)?;
    Ok(CaseDetailResponse::from_detail(detail, history))
}

/// Authenticates a user and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the account is
/// inactive.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (token, _, user) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    info!(user_id = user.user_id, "User logged in");

    Ok(LoginResponse {
        token,
        user: UserInfo::from(&user),
    })
}

/// Ends a session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the authenticated caller's profile.
#[must_use]
pub fn whoami(user: &UserData) -> UserInfo {
    UserInfo::from(user)
}

/// Lists the active status catalog ordered by `sort_order`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be queried.
pub fn list_statuses(persistence: &mut Persistence) -> Result<Vec<StatusInfo>, ApiError> {
    let statuses = persistence
        .list_active_statuses()
        .map_err(translate_persistence_error)?;
    Ok(statuses.into_iter().map(status_info).collect())
}

/// Creates a case with its initial ledger entry.
///
/// # Errors
///
/// Returns an error if required fields are missing, the client does not
/// exist, or persistence fails.
pub fn create_case(
    persistence: &mut Persistence,
    request: &CreateCaseRequest,
    acting_user: &AuthenticatedUser,
) -> Result<CaseDetailResponse, ApiError> {
    let data: NewCaseData = validate_create_case(request)?;

    let detail: CaseDetail = persistence
        .create_case(&data, acting_user.user_id)
        .map_err(translate_persistence_error)?;

    info!(
        case_id = detail.case.case_id,
        case_number = %detail.case.case_number,
        user_id = acting_user.user_id,
        "Case created"
    );

    let case_id: i64 = detail.case.case_id;
    let history = persistence
        .list_case_history(case_id, HistoryOrder::Descending)
        .map_err(translate_persistence_error)?;
    Ok(CaseDetailResponse::from_detail(detail, history))
}

/// Loads the joined projection of a case, history included.
///
/// # Errors
///
/// Returns an error if the case does not exist or is soft-deleted.
pub fn get_case(
    persistence: &mut Persistence,
    case_id: i64,
) -> Result<CaseDetailResponse, ApiError> {
    load_detail(persistence, case_id)
}

/// Lists cases with filters and pagination.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_cases(
    persistence: &mut Persistence,
    query: &ListCasesQuery,
) -> Result<CaseListResponse, ApiError> {
    let (page, limit) = clamp_pagination(query.page, query.limit);

    let filters = CaseFilters {
        search: query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
        status_code: query.status.clone(),
        client_id: query.client_id,
        assigned_agent_id: query.assigned_agent_id,
    };

    let (summaries, total) = persistence
        .list_cases(&filters, page, limit)
        .map_err(translate_persistence_error)?;

    Ok(CaseListResponse {
        cases: summaries.into_iter().map(CaseSummaryResponse::from).collect(),
        pagination: PaginationInfo {
            page,
            limit,
            total,
            total_pages: total.div_ceil(u64::from(limit)),
        },
    })
}

/// Updates a case.
///
/// When the supplied `statusId` differs from the stored value the
/// transition controller runs first (appending the ledger entry and
/// deriving milestone timestamps atomically with the status change);
/// unrelated field edits are applied afterwards. A `statusId` equal to
/// the stored value is a no-op for the ledger.
///
/// # Errors
///
/// Returns an error if the case is missing, the status is invalid, the
/// comment fails validation, or persistence fails.
pub fn update_case(
    persistence: &mut Persistence,
    case_id: i64,
    request: &UpdateCaseRequest,
    acting_user: &AuthenticatedUser,
) -> Result<CaseDetailResponse, ApiError> {
    if let Some(comment) = &request.status_comment {
        validate_status_comment(comment)?;
    }

    if let Some(requested_status_id) = request.status_id {
        let applied: TransitionApplied = persistence
            .apply_transition(
                case_id,
                requested_status_id,
                request.status_comment.as_deref(),
                acting_user.user_id,
            )
            .map_err(translate_persistence_error)?;

        if let TransitionApplied::Applied {
            previous_status_id,
            new_status_id,
        } = applied
        {
            info!(
                case_id,
                from_status_id = previous_status_id,
                to_status_id = new_status_id,
                user_id = acting_user.user_id,
                "Case status changed"
            );
        }
    }

    let patch = CaseFieldPatch {
        insurance_company_id: request.insurance_company_id,
        assigned_agent_id: request.assigned_agent_id,
        incident_description: request.incident_description.clone(),
        incident_location: request.incident_location.clone(),
        policy_number: request.policy_number.clone(),
        claim_number: request.claim_number.clone(),
        claim_value: request.claim_value,
        compensation_received: request.compensation_received,
        vehicle_brand: request.vehicle_brand.clone(),
        vehicle_model: request.vehicle_model.clone(),
        vehicle_registration: request.vehicle_registration.clone(),
        vehicle_year: request.vehicle_year,
        internal_notes: request.internal_notes.clone(),
    };
    persistence
        .update_case_fields(case_id, &patch, acting_user.user_id)
        .map_err(translate_persistence_error)?;

    load_detail(persistence, case_id)
}

/// Soft-deletes a case; its ledger is retained.
///
/// # Errors
///
/// Returns an error if the case does not exist or was already deleted.
pub fn delete_case(
    persistence: &mut Persistence,
    case_id: i64,
    acting_user: &AuthenticatedUser,
) -> Result<(), ApiError> {
    persistence
        .soft_delete_case(case_id, acting_user.user_id)
        .map_err(translate_persistence_error)?;

    info!(case_id, user_id = acting_user.user_id, "Case soft-deleted");
    Ok(())
}

/// Lists a case's ledger entries.
///
/// The ledger outlives soft deletion, so entries of deleted cases stay
/// readable here.
///
/// # Errors
///
/// Returns an error if the case never existed or the query fails.
pub fn get_case_history(
    persistence: &mut Persistence,
    case_id: i64,
    descending: bool,
) -> Result<Vec<HistoryEntryResponse>, ApiError> {
    let exists: bool = persistence
        .get_case_row(case_id)
        .map_err(translate_persistence_error)?
        .is_some();
    if !exists {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Sprawa"),
            message: format!("Sprawa {case_id} nie istnieje"),
        });
    }

    let order: HistoryOrder = if descending {
        HistoryOrder::Descending
    } else {
        HistoryOrder::Ascending
    };
    let history = persistence
        .list_case_history(case_id, order)
        .map_err(translate_persistence_error)?;
    Ok(history.into_iter().map(HistoryEntryResponse::from).collect())
}

/// Creates a client.
///
/// # Errors
///
/// Returns an error if required fields are missing or persistence fails.
pub fn create_client(
    persistence: &mut Persistence,
    request: &CreateClientRequest,
    acting_user: &AuthenticatedUser,
) -> Result<ClientResponse, ApiError> {
    let (first_name, last_name) = validate_create_client(request)?;

    let client_id: i64 = persistence
        .create_client(
            &first_name,
            &last_name,
            request.email.as_deref(),
            request.phone.as_deref(),
            request.city.as_deref(),
            acting_user.user_id,
        )
        .map_err(translate_persistence_error)?;

    let client = persistence
        .get_client_by_id(client_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: format!("Client {client_id} vanished after insert"),
        })?;

    Ok(ClientResponse::from(client))
}

/// Lists all clients, newest first.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_clients(persistence: &mut Persistence) -> Result<Vec<ClientResponse>, ApiError> {
    let clients = persistence
        .list_clients()
        .map_err(translate_persistence_error)?;
    Ok(clients.into_iter().map(ClientResponse::from).collect())
}
