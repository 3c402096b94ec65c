// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{make_status, test_instant};
use crate::{CREATION_COMMENT, CoreError, format_timestamp, plan_creation};
use securo_case_domain::{DomainError, StatusCode};

#[test]
fn test_creation_plan_carries_initial_status() {
    let initial = make_status(1, StatusCode::New, false);

    let plan = plan_creation(&initial, test_instant()).expect("planning succeeds");

    assert_eq!(plan.status_id, 1);
    assert_eq!(plan.comment, CREATION_COMMENT);
    assert_eq!(
        plan.created_at,
        format_timestamp(test_instant()).expect("formats")
    );
}

#[test]
fn test_creation_rejects_inactive_initial_status() {
    let mut initial = make_status(1, StatusCode::New, false);
    initial.is_active = false;

    let result = plan_creation(&initial, test_instant());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InactiveStatus {
            status_id: 1,
            code: String::from("NEW"),
        }))
    );
}
