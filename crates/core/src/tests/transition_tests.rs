// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{ACTING_USER, later_instant, make_case, make_status, test_instant};
use crate::{
    CoreError, DEFAULT_TRANSITION_COMMENT, TransitionOutcome, format_timestamp, plan_transition,
};
use securo_case_domain::{DomainError, StatusCode};

#[test]
fn test_same_status_is_a_no_op() {
    let case = make_case(1, 3);
    let target = make_status(3, StatusCode::SentToInsurer, false);

    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");

    assert_eq!(outcome, TransitionOutcome::Unchanged);
}

#[test]
fn test_transition_captures_previous_status() {
    let case = make_case(1, 1);
    let target = make_status(3, StatusCode::SentToInsurer, false);

    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");

    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.previous_status_id, 1);
    assert_eq!(plan.new_status_id, 3);
    assert_eq!(plan.entry.from_status_id, Some(1));
    assert_eq!(plan.entry.to_status_id, 3);
    assert_eq!(plan.entry.case_id, 1);
    assert_eq!(plan.entry.changed_by_user_id, ACTING_USER);
}

#[test]
fn test_missing_comment_falls_back_to_default() {
    let case = make_case(1, 1);
    let target = make_status(2, StatusCode::Documents, false);

    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.entry.comment, DEFAULT_TRANSITION_COMMENT);

    // Blank comments also fall back.
    let outcome = plan_transition(&case, &target, Some("   "), ACTING_USER, test_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.entry.comment, DEFAULT_TRANSITION_COMMENT);
}

#[test]
fn test_supplied_comment_is_kept() {
    let case = make_case(1, 1);
    let target = make_status(3, StatusCode::SentToInsurer, false);

    let outcome = plan_transition(
        &case,
        &target,
        Some("dokumenty wysłane"),
        ACTING_USER,
        test_instant(),
    )
    .expect("planning succeeds");

    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.entry.comment, "dokumenty wysłane");
}

#[test]
fn test_sent_to_insurer_sets_documents_sent_date() {
    let case = make_case(1, 1);
    let target = make_status(3, StatusCode::SentToInsurer, false);
    let now = test_instant();

    let outcome =
        plan_transition(&case, &target, None, ACTING_USER, now).expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };

    let expected = format_timestamp(now).expect("formats");
    assert_eq!(plan.milestones.documents_sent_date, Some(expected));
    assert!(plan.milestones.decision_date.is_none());
    assert!(plan.milestones.closed_date.is_none());
}

#[test]
fn test_decision_codes_set_decision_date() {
    for code in [StatusCode::PositiveDecision, StatusCode::NegativeDecision] {
        let case = make_case(1, 3);
        let target = make_status(5, code, false);

        let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
            .expect("planning succeeds");
        let TransitionOutcome::Applied(plan) = outcome else {
            panic!("expected an applied plan");
        };
        assert!(plan.milestones.decision_date.is_some(), "code {code:?}");
    }
}

#[test]
fn test_first_write_wins_for_decision_date() {
    let mut case = make_case(1, 4);
    case.milestones.decision_date = Some(String::from("2026-08-01T09:00:00.000000000Z"));

    // A second decision (negative after positive) must not overwrite.
    let target = make_status(5, StatusCode::NegativeDecision, false);
    let outcome = plan_transition(&case, &target, None, ACTING_USER, later_instant())
        .expect("planning succeeds");

    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert!(plan.milestones.decision_date.is_none());
    assert!(plan.milestones.is_empty());
}

#[test]
fn test_any_final_status_sets_closed_date() {
    let case = make_case(1, 4);
    // A final status whose code carries no milestone of its own.
    let target = make_status(8, StatusCode::Closed, true);

    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert!(plan.milestones.closed_date.is_some());
}

#[test]
fn test_final_decision_sets_both_dates() {
    let case = make_case(1, 3);
    // A decision status can itself be flagged final in the catalog.
    let target = make_status(4, StatusCode::PositiveDecision, true);

    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert!(plan.milestones.decision_date.is_some());
    assert!(plan.milestones.closed_date.is_some());
}

#[test]
fn test_closed_date_not_rewritten_on_second_final_transition() {
    let mut case = make_case(1, 8);
    case.milestones.closed_date = Some(String::from("2026-08-01T09:00:00.000000000Z"));
    case.status_id = 4;

    let target = make_status(8, StatusCode::Closed, true);
    let outcome = plan_transition(&case, &target, None, ACTING_USER, later_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert!(plan.milestones.closed_date.is_none());
}

#[test]
fn test_backwards_transition_is_allowed() {
    // No adjacency constraint: a decided case may return to NEW.
    let mut case = make_case(1, 4);
    case.milestones.decision_date = Some(String::from("2026-08-01T09:00:00.000000000Z"));

    let target = make_status(1, StatusCode::New, false);
    let outcome = plan_transition(&case, &target, None, ACTING_USER, later_instant())
        .expect("planning succeeds");

    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };
    assert_eq!(plan.entry.from_status_id, Some(4));
    assert_eq!(plan.entry.to_status_id, 1);
    // Going backwards never clears milestones.
    assert!(plan.milestones.is_empty());
}

#[test]
fn test_inactive_target_is_rejected() {
    let case = make_case(1, 1);
    let mut target = make_status(3, StatusCode::SentToInsurer, false);
    target.is_active = false;

    let result = plan_transition(&case, &target, None, ACTING_USER, test_instant());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InactiveStatus {
            status_id: 3,
            code: String::from("SENT_TO_INSURER"),
        }))
    );
}

#[test]
fn test_deleted_case_is_rejected() {
    let mut case = make_case(9, 1);
    case.deleted_at = Some(String::from("2026-08-05T08:00:00.000000000Z"));
    let target = make_status(3, StatusCode::SentToInsurer, false);

    let result = plan_transition(&case, &target, None, ACTING_USER, test_instant());
    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::CaseNotFound {
            case_id: 9,
        }))
    );
}

#[test]
fn test_milestone_merge_preserves_existing_values() {
    let case = make_case(1, 1);
    let target = make_status(3, StatusCode::SentToInsurer, false);
    let outcome = plan_transition(&case, &target, None, ACTING_USER, test_instant())
        .expect("planning succeeds");
    let TransitionOutcome::Applied(plan) = outcome else {
        panic!("expected an applied plan");
    };

    let mut current = case.milestones.clone();
    current.decision_date = Some(String::from("2026-08-01T09:00:00.000000000Z"));

    let merged = plan.milestones.merged_into(&current);
    assert_eq!(
        merged.decision_date,
        Some(String::from("2026-08-01T09:00:00.000000000Z"))
    );
    assert_eq!(merged.documents_sent_date, plan.milestones.documents_sent_date);
}
