// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::request_response::{CreateCaseRequest, UpdateCaseRequest};
use crate::validation::{
    DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, ValidationError, clamp_pagination,
    validate_create_case, validate_status_comment,
};

#[test]
fn test_status_id_accepts_number_and_string() {
    let from_number: UpdateCaseRequest =
        serde_json::from_str(r#"{"statusId": 3}"#).expect("number parses");
    assert_eq!(from_number.status_id, Some(3));

    let from_string: UpdateCaseRequest =
        serde_json::from_str(r#"{"statusId": "3"}"#).expect("string parses");
    assert_eq!(from_string.status_id, Some(3));

    let garbage = serde_json::from_str::<UpdateCaseRequest>(r#"{"statusId": "trzy"}"#);
    assert!(garbage.is_err());
}

#[test]
fn test_patch_distinguishes_absent_from_null() {
    let absent: UpdateCaseRequest = serde_json::from_str("{}").expect("empty body parses");
    assert_eq!(absent.assigned_agent_id, None);

    let cleared: UpdateCaseRequest =
        serde_json::from_str(r#"{"assignedAgentId": null}"#).expect("null parses");
    assert_eq!(cleared.assigned_agent_id, Some(None));

    let set: UpdateCaseRequest =
        serde_json::from_str(r#"{"assignedAgentId": 5}"#).expect("value parses");
    assert_eq!(set.assigned_agent_id, Some(Some(5)));
}

#[test]
fn test_create_case_body_is_camel_case() {
    let request: CreateCaseRequest = serde_json::from_str(
        r#"{"clientId": 7, "incidentDate": "2026-07-15", "vehicleBrand": "Skoda"}"#,
    )
    .expect("body parses");

    assert_eq!(request.client_id, Some(7));
    assert_eq!(request.vehicle_brand.as_deref(), Some("Skoda"));

    let data = validate_create_case(&request).expect("validates");
    assert_eq!(data.client_id, 7);
    assert_eq!(data.incident_date, "2026-07-15");
}

#[test]
fn test_create_case_reports_missing_fields_in_wire_casing() {
    let missing_client = validate_create_case(&CreateCaseRequest {
        incident_date: Some(String::from("2026-07-15")),
        ..CreateCaseRequest::default()
    });
    assert_eq!(
        missing_client,
        Err(ValidationError::MissingField { field: "clientId" })
    );

    let missing_date = validate_create_case(&CreateCaseRequest {
        client_id: Some(7),
        ..CreateCaseRequest::default()
    });
    assert_eq!(
        missing_date,
        Err(ValidationError::MissingField {
            field: "incidentDate"
        })
    );
}

#[test]
fn test_create_case_rejects_unparseable_incident_date() {
    let result = validate_create_case(&CreateCaseRequest {
        client_id: Some(7),
        incident_date: Some(String::from("wczoraj")),
        ..CreateCaseRequest::default()
    });
    assert!(matches!(
        result,
        Err(ValidationError::InvalidField {
            field: "incidentDate",
            ..
        })
    ));
}

#[test]
fn test_status_comment_length_bound() {
    assert!(validate_status_comment("dokumenty wysłane").is_ok());
    let long: String = "x".repeat(5000);
    assert!(matches!(
        validate_status_comment(&long),
        Err(ValidationError::InvalidField {
            field: "statusComment",
            ..
        })
    ));
}

#[test]
fn test_pagination_clamping() {
    assert_eq!(clamp_pagination(None, None), (1, DEFAULT_PAGE_LIMIT));
    assert_eq!(clamp_pagination(Some(0), Some(0)), (1, 1));
    assert_eq!(
        clamp_pagination(Some(3), Some(10_000)),
        (3, MAX_PAGE_LIMIT)
    );
}
