// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Planned write sets produced by the transition controller.
//!
//! Plans are pure values: the controller decides *what* to write and the
//! persistence layer executes the plan inside a single transaction.

use securo_case_domain::MilestoneDates;
use securo_case_ledger::HistoryEntry;

/// Milestone columns a transition will set.
///
/// A field is populated only when the corresponding case field is
/// currently null; milestones are first-write-wins and never cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MilestoneUpdates {
    pub documents_sent_date: Option<String>,
    pub decision_date: Option<String>,
    pub appeal_date: Option<String>,
    pub lawsuit_date: Option<String>,
    pub closed_date: Option<String>,
}

impl MilestoneUpdates {
    /// Returns true if the transition sets no milestone.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.documents_sent_date.is_none()
            && self.decision_date.is_none()
            && self.appeal_date.is_none()
            && self.lawsuit_date.is_none()
            && self.closed_date.is_none()
    }

    /// Folds these updates into an existing set of milestone dates.
    ///
    /// Used by tests and read-model reconstruction; the persistence layer
    /// applies the same merge column-by-column in SQL.
    #[must_use]
    pub fn merged_into(&self, current: &MilestoneDates) -> MilestoneDates {
        MilestoneDates {
            documents_sent_date: current
                .documents_sent_date
                .clone()
                .or_else(|| self.documents_sent_date.clone()),
            decision_date: current
                .decision_date
                .clone()
                .or_else(|| self.decision_date.clone()),
            appeal_date: current
                .appeal_date
                .clone()
                .or_else(|| self.appeal_date.clone()),
            lawsuit_date: current
                .lawsuit_date
                .clone()
                .or_else(|| self.lawsuit_date.clone()),
            closed_date: current
                .closed_date
                .clone()
                .or_else(|| self.closed_date.clone()),
        }
    }
}

/// The write set for one status transition.
///
/// The case update and the ledger entry must be persisted as a single
/// atomic unit — both succeed or both fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    /// The status the case held when the plan was made.
    pub previous_status_id: i64,
    /// The status the case will hold after the transition.
    pub new_status_id: i64,
    /// Milestone columns to set, first-write-wins.
    pub milestones: MilestoneUpdates,
    /// The ledger entry to append.
    pub entry: HistoryEntry,
}

/// Outcome of planning a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The requested status equals the current status: no ledger entry,
    /// no timestamp changes. Other field edits in the same request may
    /// still proceed independently.
    Unchanged,
    /// The status actually changes; execute the plan atomically.
    Applied(TransitionPlan),
}

/// The write set for case creation bookkeeping.
///
/// The case row id is not known until the insert happens, so the plan
/// carries the entry fields; the persistence layer completes the ledger
/// entry with the generated id inside the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationPlan {
    /// The initial status the case is created with.
    pub status_id: i64,
    /// Comment for the creation ledger entry.
    pub comment: String,
    /// Server-assigned ISO-8601 timestamp for both row and entry.
    pub created_at: String,
}
