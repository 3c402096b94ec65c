// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transition planning.
//!
//! This module is the sole authorized decision path for changing a case's
//! status. It derives the milestone side effects and the ledger entry for
//! a requested transition; executing the resulting plan atomically is the
//! persistence layer's job.
//!
//! The catalog imposes no adjacency constraints: any active status may
//! follow any other, including moving backwards through the lifecycle.

use crate::error::CoreError;
use crate::plan::{CreationPlan, MilestoneUpdates, TransitionOutcome, TransitionPlan};
use securo_case_domain::{Case, CaseStatus, DomainError, Milestone};
use securo_case_ledger::HistoryEntry;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Default comment recorded when the caller supplies none.
pub const DEFAULT_TRANSITION_COMMENT: &str = "Status zmieniony";

/// Comment recorded on the ledger entry written at case creation.
pub const CREATION_COMMENT: &str = "Sprawa utworzona";

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns `CoreError::Internal` if formatting fails.
pub fn format_timestamp(now: OffsetDateTime) -> Result<String, CoreError> {
    now.format(&Iso8601::DEFAULT)
        .map_err(|e| CoreError::Internal(format!("Failed to format timestamp: {e}")))
}

/// Plans a status transition for a case.
///
/// When the requested status equals the case's current status the
/// operation is a no-op with respect to status: no ledger entry is
/// planned and no timestamps change.
///
/// When the status actually changes, the plan captures the previous
/// status, the milestone timestamps the destination code triggers (each
/// only if the corresponding case field is still null), the closed
/// timestamp for any final status, and the ledger entry linking the two
/// statuses.
///
/// # Arguments
///
/// * `case` - The case as read inside the executing transaction
/// * `target` - The resolved catalog entry for the requested status
/// * `comment` - Optional user-supplied comment for the ledger entry
/// * `acting_user_id` - The authenticated user performing the transition
/// * `now` - The transition instant
///
/// # Errors
///
/// Returns an error if:
/// - The case has been soft-deleted
/// - The target status is not active
/// - The timestamp cannot be formatted
pub fn plan_transition(
    case: &Case,
    target: &CaseStatus,
    comment: Option<&str>,
    acting_user_id: i64,
    now: OffsetDateTime,
) -> Result<TransitionOutcome, CoreError> {
    if case.is_deleted() {
        return Err(CoreError::DomainViolation(DomainError::CaseNotFound {
            case_id: case.case_id,
        }));
    }

    target.ensure_selectable()?;

    // Only an actual change triggers history and timestamp logic.
    if target.status_id == case.status_id {
        return Ok(TransitionOutcome::Unchanged);
    }

    let previous_status_id: i64 = case.status_id;
    let changed_at: String = format_timestamp(now)?;
    let milestones: MilestoneUpdates = derive_milestones(case, target, &changed_at);

    let comment: String = match comment {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => String::from(DEFAULT_TRANSITION_COMMENT),
    };

    let entry: HistoryEntry = HistoryEntry::transition(
        case.case_id,
        previous_status_id,
        target.status_id,
        comment,
        acting_user_id,
        changed_at,
    );

    Ok(TransitionOutcome::Applied(TransitionPlan {
        previous_status_id,
        new_status_id: target.status_id,
        milestones,
        entry,
    }))
}

/// Plans the bookkeeping for case creation.
///
/// Creation writes the case row and one ledger entry with no prior
/// status; both belong to the same transaction for the same
/// audit-integrity reason as transitions.
///
/// # Arguments
///
/// * `initial_status` - The status the case is created with
/// * `now` - The creation instant
///
/// # Errors
///
/// Returns an error if the initial status is not active or the timestamp
/// cannot be formatted.
pub fn plan_creation(
    initial_status: &CaseStatus,
    now: OffsetDateTime,
) -> Result<CreationPlan, CoreError> {
    initial_status.ensure_selectable()?;

    Ok(CreationPlan {
        status_id: initial_status.status_id,
        comment: String::from(CREATION_COMMENT),
        created_at: format_timestamp(now)?,
    })
}

/// Derives the milestone columns a transition sets.
///
/// Each milestone is first-write-wins: a column is included only while
/// the case's corresponding field is still null. The closed timestamp is
/// driven by the catalog's `is_final` flag, independent of the code.
fn derive_milestones(case: &Case, target: &CaseStatus, changed_at: &str) -> MilestoneUpdates {
    let mut updates = MilestoneUpdates::default();

    match target.code.milestone() {
        Some(Milestone::DocumentsSent) if case.milestones.documents_sent_date.is_none() => {
            updates.documents_sent_date = Some(changed_at.to_string());
        }
        Some(Milestone::Decision) if case.milestones.decision_date.is_none() => {
            updates.decision_date = Some(changed_at.to_string());
        }
        Some(Milestone::Appeal) if case.milestones.appeal_date.is_none() => {
            updates.appeal_date = Some(changed_at.to_string());
        }
        Some(Milestone::Lawsuit) if case.milestones.lawsuit_date.is_none() => {
            updates.lawsuit_date = Some(changed_at.to_string());
        }
        _ => {}
    }

    if target.is_final && case.milestones.closed_date.is_none() {
        updates.closed_date = Some(changed_at.to_string());
    }

    updates
}
