// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request-schema validation.
//!
//! Bodies are validated here, before any core logic or persistence work
//! runs. The messages stay in the deployment locale.

use crate::request_response::{CreateCaseRequest, CreateClientRequest};
use securo_case_domain::{DomainError, validate_comment, validate_new_case};
use securo_case_persistence::NewCaseData;
use thiserror::Error;

/// Default page size for case listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Upper bound on the page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Request-schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("Pole '{field}' jest wymagane")]
    MissingField {
        /// The missing field, in wire casing.
        field: &'static str,
    },
    /// A field is present but invalid.
    #[error("Nieprawidłowa wartość pola '{field}': {message}")]
    InvalidField {
        /// The invalid field, in wire casing.
        field: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

impl ValidationError {
    /// Returns the offending field name in wire casing.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => field,
        }
    }
}

/// Validates a case-creation request into persistence input.
///
/// # Errors
///
/// Returns an error if `clientId` or `incidentDate` is missing or the
/// incident date does not parse.
pub fn validate_create_case(request: &CreateCaseRequest) -> Result<NewCaseData, ValidationError> {
    let (client_id, incident_date) =
        validate_new_case(request.client_id, request.incident_date.as_deref()).map_err(
            |err| match err {
                DomainError::MissingClient => ValidationError::MissingField { field: "clientId" },
                DomainError::MissingIncidentDate => ValidationError::MissingField {
                    field: "incidentDate",
                },
                other => ValidationError::InvalidField {
                    field: "incidentDate",
                    message: other.to_string(),
                },
            },
        )?;

    Ok(NewCaseData {
        client_id,
        insurance_company_id: request.insurance_company_id,
        status_id: request.status_id,
        assigned_agent_id: request.assigned_agent_id,
        incident_date,
        incident_description: request.incident_description.clone(),
        incident_location: request.incident_location.clone(),
        policy_number: request.policy_number.clone(),
        claim_value: request.claim_value,
        vehicle_brand: request.vehicle_brand.clone(),
        vehicle_model: request.vehicle_model.clone(),
        vehicle_registration: request.vehicle_registration.clone(),
        vehicle_year: request.vehicle_year,
        internal_notes: request.internal_notes.clone(),
    })
}

/// Validates a client-creation request.
///
/// # Errors
///
/// Returns an error if the first or last name is missing or blank.
pub fn validate_create_client(
    request: &CreateClientRequest,
) -> Result<(String, String), ValidationError> {
    let first_name: &str = request
        .first_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingField { field: "firstName" })?;
    let last_name: &str = request
        .last_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(ValidationError::MissingField { field: "lastName" })?;

    Ok((first_name.to_string(), last_name.to_string()))
}

/// Validates a status-change comment.
///
/// # Errors
///
/// Returns an error if the comment exceeds the storable length.
pub fn validate_status_comment(comment: &str) -> Result<(), ValidationError> {
    validate_comment(comment).map_err(|err| ValidationError::InvalidField {
        field: "statusComment",
        message: err.to_string(),
    })
}

/// Clamps pagination parameters to sane bounds.
#[must_use]
pub fn clamp_pagination(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page: u32 = page.unwrap_or(1).max(1);
    let limit: u32 = limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}
