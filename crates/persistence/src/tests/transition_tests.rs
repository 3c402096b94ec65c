// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{seed_case, seed_client, seed_user, setup, status_id};
use crate::{HistoryOrder, Persistence, PersistenceError, TransitionApplied};

fn setup_with_case() -> (Persistence, i64, i64) {
    let mut persistence = setup();
    let user_id = seed_user(&mut persistence, "agent@securohelp.pl");
    let client_id = seed_client(&mut persistence, user_id);
    let detail = seed_case(&mut persistence, client_id, user_id);
    (persistence, detail.case.case_id, user_id)
}

#[test]
fn test_transition_updates_status_and_appends_history() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let sent = status_id(&mut persistence, "SENT_TO_INSURER");

    let applied = persistence
        .apply_transition(case_id, sent, Some("dokumenty wysłane"), user_id)
        .expect("transition succeeds");

    let new = status_id(&mut persistence, "NEW");
    assert_eq!(
        applied,
        TransitionApplied::Applied {
            previous_status_id: new,
            new_status_id: sent,
        }
    );

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(detail.case.status_id, sent);
    assert!(detail.case.documents_sent_date.is_some());

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].from_status_id, Some(new));
    assert_eq!(history[1].to_status_id, sent);
    assert_eq!(history[1].comment, "dokumenty wysłane");
}

#[test]
fn test_same_status_transition_is_a_no_op() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let new = status_id(&mut persistence, "NEW");

    let applied = persistence
        .apply_transition(case_id, new, None, user_id)
        .expect("no-op succeeds");
    assert_eq!(applied, TransitionApplied::Unchanged);

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 1, "No-op must not append a ledger entry");

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert!(detail.case.documents_sent_date.is_none());
    assert!(detail.case.closed_date.is_none());
}

#[test]
fn test_missing_comment_records_locale_default() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let documents = status_id(&mut persistence, "DOCUMENTS");

    persistence
        .apply_transition(case_id, documents, None, user_id)
        .expect("transition succeeds");

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Descending)
        .expect("history loads");
    assert_eq!(history[0].comment, "Status zmieniony");
}

#[test]
fn test_decision_date_is_first_write_wins() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let negative = status_id(&mut persistence, "NEGATIVE_DECISION");
    let positive = status_id(&mut persistence, "POSITIVE_DECISION");

    persistence
        .apply_transition(case_id, negative, None, user_id)
        .expect("first decision succeeds");
    let first = persistence
        .get_case_detail(case_id)
        .expect("case exists")
        .case
        .decision_date
        .expect("decision date set");

    persistence
        .apply_transition(case_id, positive, None, user_id)
        .expect("second decision succeeds");
    let second = persistence
        .get_case_detail(case_id)
        .expect("case exists")
        .case
        .decision_date
        .expect("decision date still set");

    assert_eq!(first, second, "Second decision must not move decision_date");
}

#[test]
fn test_final_status_sets_closed_date() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let closed = status_id(&mut persistence, "CLOSED");

    persistence
        .apply_transition(case_id, closed, None, user_id)
        .expect("transition succeeds");

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(detail.case.status_id, closed);
    assert!(detail.case.closed_date.is_some());
    assert!(detail.status.is_final);
}

#[test]
fn test_unknown_status_is_rejected() {
    let (mut persistence, case_id, user_id) = setup_with_case();

    let result = persistence.apply_transition(case_id, 9999, None, user_id);
    assert_eq!(result, Err(PersistenceError::StatusNotFound(9999)));
}

#[test]
fn test_unknown_case_is_rejected() {
    let mut persistence = setup();
    let user_id = seed_user(&mut persistence, "agent@securohelp.pl");
    let sent = status_id(&mut persistence, "SENT_TO_INSURER");

    let result = persistence.apply_transition(4242, sent, None, user_id);
    assert_eq!(result, Err(PersistenceError::CaseNotFound(4242)));
}

#[test]
fn test_soft_deleted_case_accepts_no_transitions() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    persistence
        .soft_delete_case(case_id, user_id)
        .expect("delete succeeds");

    let sent = status_id(&mut persistence, "SENT_TO_INSURER");
    let result = persistence.apply_transition(case_id, sent, None, user_id);
    assert_eq!(result, Err(PersistenceError::CaseNotFound(case_id)));
}

#[test]
fn test_failed_write_leaves_no_partial_effect() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let new = status_id(&mut persistence, "NEW");
    let sent = status_id(&mut persistence, "SENT_TO_INSURER");

    // Fault injection: a nonexistent acting user passes planning but
    // violates the ledger's foreign key inside the transaction. The
    // whole transaction must roll back: no new status, no ledger entry.
    let result = persistence.apply_transition(case_id, sent, None, user_id + 1000);
    assert!(matches!(result, Err(PersistenceError::DatabaseError(_))));

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(
        detail.case.status_id, new,
        "Case must retain its pre-transition status"
    );
    assert!(detail.case.documents_sent_date.is_none());

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 1, "No ledger entry may survive the rollback");
}

#[test]
fn test_field_patch_cannot_move_status() {
    let (mut persistence, case_id, user_id) = setup_with_case();
    let new = status_id(&mut persistence, "NEW");

    let patch = crate::CaseFieldPatch {
        incident_location: Some(Some(String::from("Kraków"))),
        claim_value: Some(Some(15_000.0)),
        ..crate::CaseFieldPatch::default()
    };
    persistence
        .update_case_fields(case_id, &patch, user_id)
        .expect("patch succeeds");

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(detail.case.status_id, new);
    assert_eq!(detail.case.incident_location.as_deref(), Some("Kraków"));
    assert_eq!(detail.case.claim_value, Some(15_000.0));

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 1, "Field edits must not touch the ledger");
}

#[test]
fn test_interleaved_transitions_stay_consistent() {
    // The adapter serializes writers; interleaved requests must produce
    // a ledger that replays exactly to the final status.
    let (mut persistence, case_id, user_id) = setup_with_case();
    let sent = status_id(&mut persistence, "SENT_TO_INSURER");
    let positive = status_id(&mut persistence, "POSITIVE_DECISION");
    let appeal = status_id(&mut persistence, "APPEAL");

    for target in [sent, positive, appeal, positive] {
        persistence
            .apply_transition(case_id, target, None, user_id)
            .expect("transition succeeds");
    }

    persistence
        .verify_case_chain(case_id)
        .expect("ledger chain is intact");

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 5);
    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(detail.case.status_id, positive);
}

#[test]
fn test_full_lifecycle_example() {
    // Create (NEW) → SENT_TO_INSURER → POSITIVE_DECISION → back to NEW.
    let (mut persistence, case_id, user_id) = setup_with_case();
    let new = status_id(&mut persistence, "NEW");
    let sent = status_id(&mut persistence, "SENT_TO_INSURER");
    let positive = status_id(&mut persistence, "POSITIVE_DECISION");

    persistence
        .apply_transition(case_id, sent, Some("dokumenty wysłane"), user_id)
        .expect("transition succeeds");
    persistence
        .apply_transition(case_id, positive, None, user_id)
        .expect("transition succeeds");

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert!(detail.case.documents_sent_date.is_some());
    assert!(detail.case.decision_date.is_some());
    assert!(detail.case.closed_date.is_none());

    // Backwards move is allowed and clears nothing.
    persistence
        .apply_transition(case_id, new, None, user_id)
        .expect("backwards transition succeeds");

    let detail = persistence.get_case_detail(case_id).expect("case exists");
    assert_eq!(detail.case.status_id, new);
    assert!(detail.case.decision_date.is_some());

    let history = persistence
        .list_case_history(case_id, HistoryOrder::Ascending)
        .expect("history loads");
    assert_eq!(history.len(), 4);
    assert_eq!(history[3].from_status_id, Some(positive));
    assert_eq!(history[3].to_status_id, new);

    persistence
        .verify_case_chain(case_id)
        .expect("ledger chain is intact");
}
