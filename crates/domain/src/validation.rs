// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Creation-request validation.
//!
//! These checks run at the API boundary before any persistence work so
//! that malformed requests never reach the transition machinery.

use crate::error::DomainError;
use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime};

/// Maximum length accepted for a status-change comment.
const MAX_COMMENT_LENGTH: usize = 2000;

/// Validates the required fields of a case-creation request.
///
/// The client reference and incident date are the only mandatory inputs;
/// everything else on a new case is optional.
///
/// # Arguments
///
/// * `client_id` - The client reference, if supplied
/// * `incident_date` - The incident date string, if supplied
///
/// # Errors
///
/// Returns an error if:
/// - The client reference is missing
/// - The incident date is missing or unparseable
pub fn validate_new_case(
    client_id: Option<i64>,
    incident_date: Option<&str>,
) -> Result<(i64, String), DomainError> {
    let client_id: i64 = client_id.ok_or(DomainError::MissingClient)?;
    let incident_date: &str = incident_date.ok_or(DomainError::MissingIncidentDate)?;
    if incident_date.trim().is_empty() {
        return Err(DomainError::MissingIncidentDate);
    }
    let incident_date: String = validate_incident_date(incident_date)?;
    Ok((client_id, incident_date))
}

/// Validates that an incident date parses as ISO-8601.
///
/// Accepts either a full timestamp or a plain calendar date, returning the
/// input unchanged on success.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string parses as neither.
pub fn validate_incident_date(raw: &str) -> Result<String, DomainError> {
    if OffsetDateTime::parse(raw, &Iso8601::DEFAULT).is_ok()
        || Date::parse(raw, &Iso8601::DEFAULT).is_ok()
    {
        return Ok(raw.to_string());
    }
    Err(DomainError::DateParseError {
        date_string: raw.to_string(),
        error: String::from("expected an ISO 8601 date or timestamp"),
    })
}

/// Validates a status-change comment.
///
/// # Errors
///
/// Returns `DomainError::CommentTooLong` if the comment exceeds the
/// storable length.
pub fn validate_comment(comment: &str) -> Result<(), DomainError> {
    if comment.len() > MAX_COMMENT_LENGTH {
        return Err(DomainError::CommentTooLong {
            length: comment.len(),
            max: MAX_COMMENT_LENGTH,
        });
    }
    Ok(())
}
