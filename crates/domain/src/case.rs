// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The case aggregate as seen by the transition controller.

use serde::{Deserialize, Serialize};

/// Milestone timestamps on a case.
///
/// Each field is set at most once, the first time a transition of the
/// corresponding kind occurs, and is never cleared afterwards — moving a
/// case backwards through its lifecycle leaves earlier milestones intact.
/// Values are ISO-8601 strings as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneDates {
    pub documents_sent_date: Option<String>,
    pub decision_date: Option<String>,
    pub appeal_date: Option<String>,
    pub lawsuit_date: Option<String>,
    pub closed_date: Option<String>,
}

/// The slice of a case the transition controller reads and writes.
///
/// Other case attributes (client reference, claim value, vehicle details)
/// are orthogonal to the state machine and never mutated by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Case {
    pub case_id: i64,
    /// Human-readable number, assigned at creation and immutable.
    pub case_number: String,
    /// The single current status reference the controller protects.
    pub status_id: i64,
    pub milestones: MilestoneDates,
    /// Soft-delete marker; a deleted case accepts no further transitions.
    pub deleted_at: Option<String>,
}

impl Case {
    /// Returns true if the case has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
