// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Append-only status-history ledger types and invariants.
//!
//! Every successful status transition produces exactly one ledger entry,
//! written atomically with the case update. Entries are immutable once
//! created and are never deleted; the ledger is the authoritative record
//! of a case's lifecycle even if the case's denormalized status reference
//! were ever corrupted.

/// A single append-only ledger entry recording one status transition.
///
/// `from_status_id` is `None` only for the entry written at case creation,
/// representing "no prior status". `changed_at` is server-assigned and
/// non-decreasing per case when entries are read in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The case this entry belongs to.
    pub case_id: i64,
    /// The status the case held before this transition, if any.
    pub from_status_id: Option<i64>,
    /// The status the case holds after this transition.
    pub to_status_id: i64,
    /// Free-text comment, user-supplied or the locale default.
    pub comment: String,
    /// The user who performed the transition.
    pub changed_by_user_id: i64,
    /// Server-assigned ISO-8601 timestamp.
    pub changed_at: String,
}

impl HistoryEntry {
    /// Creates the entry written at case creation.
    ///
    /// Creation entries have no prior status.
    #[must_use]
    pub const fn creation(
        case_id: i64,
        to_status_id: i64,
        comment: String,
        changed_by_user_id: i64,
        changed_at: String,
    ) -> Self {
        Self {
            case_id,
            from_status_id: None,
            to_status_id,
            comment,
            changed_by_user_id,
            changed_at,
        }
    }

    /// Creates an entry for a transition between two statuses.
    #[must_use]
    pub const fn transition(
        case_id: i64,
        from_status_id: i64,
        to_status_id: i64,
        comment: String,
        changed_by_user_id: i64,
        changed_at: String,
    ) -> Self {
        Self {
            case_id,
            from_status_id: Some(from_status_id),
            to_status_id,
            comment,
            changed_by_user_id,
            changed_at,
        }
    }
}

/// Ways a case's ledger can violate its integrity invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainViolation {
    /// A case must carry at least its creation entry.
    EmptyChain,
    /// The first entry must have no prior status.
    FirstEntryHasPredecessor {
        /// The unexpected prior status.
        from_status_id: i64,
    },
    /// The first entry must record the status the case was created with.
    CreationMismatch {
        /// The status recorded by the first entry.
        recorded: i64,
        /// The status the case was created with.
        expected: i64,
    },
    /// A non-first entry's `from_status_id` must equal the previous
    /// entry's `to_status_id`.
    BrokenLink {
        /// Zero-based index of the offending entry.
        index: usize,
        /// The `from_status_id` the entry recorded (`None` is also a break).
        recorded_from: Option<i64>,
        /// The previous entry's `to_status_id`.
        expected_from: i64,
    },
    /// Replaying the chain must reproduce the case's current status.
    CurrentStatusMismatch {
        /// The final `to_status_id` in the chain.
        replayed: i64,
        /// The case's current status reference.
        current: i64,
    },
    /// Timestamps must be non-decreasing in insertion order.
    TimestampRegression {
        /// Zero-based index of the entry that moved backwards.
        index: usize,
    },
}

impl std::fmt::Display for ChainViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyChain => write!(f, "History chain is empty"),
            Self::FirstEntryHasPredecessor { from_status_id } => {
                write!(
                    f,
                    "First history entry records prior status {from_status_id}"
                )
            }
            Self::CreationMismatch { recorded, expected } => {
                write!(
                    f,
                    "First history entry records status {recorded}, case was created with {expected}"
                )
            }
            Self::BrokenLink {
                index,
                recorded_from,
                expected_from,
            } => {
                write!(
                    f,
                    "History entry {index} records prior status {recorded_from:?}, expected {expected_from}"
                )
            }
            Self::CurrentStatusMismatch { replayed, current } => {
                write!(
                    f,
                    "Replaying history yields status {replayed}, case holds {current}"
                )
            }
            Self::TimestampRegression { index } => {
                write!(f, "History entry {index} has a timestamp before its predecessor")
            }
        }
    }
}

impl std::error::Error for ChainViolation {}

/// Verifies the integrity invariants of a case's ledger.
///
/// `entries` must be in insertion order (ascending `changed_at`). The
/// checks implemented here are the audit-completeness and chain-continuity
/// properties: the chain starts at the creation status, every link's
/// `from_status_id` matches its predecessor's `to_status_id`, timestamps
/// never regress, and replaying the chain reproduces `current_status_id`.
///
/// # Errors
///
/// Returns the first violation found.
pub fn verify_chain(
    entries: &[HistoryEntry],
    created_status_id: i64,
    current_status_id: i64,
) -> Result<(), ChainViolation> {
    let Some(first) = entries.first() else {
        return Err(ChainViolation::EmptyChain);
    };

    if let Some(from_status_id) = first.from_status_id {
        return Err(ChainViolation::FirstEntryHasPredecessor { from_status_id });
    }
    if first.to_status_id != created_status_id {
        return Err(ChainViolation::CreationMismatch {
            recorded: first.to_status_id,
            expected: created_status_id,
        });
    }

    for (index, window) in entries.windows(2).enumerate() {
        let previous = &window[0];
        let entry = &window[1];
        let index = index + 1;

        if entry.from_status_id != Some(previous.to_status_id) {
            return Err(ChainViolation::BrokenLink {
                index,
                recorded_from: entry.from_status_id,
                expected_from: previous.to_status_id,
            });
        }
        // ISO-8601 UTC strings compare correctly as bytes.
        if entry.changed_at < previous.changed_at {
            return Err(ChainViolation::TimestampRegression { index });
        }
    }

    let replayed: i64 = entries
        .iter()
        .fold(created_status_id, |_, entry| entry.to_status_id);
    if replayed != current_status_id {
        return Err(ChainViolation::CurrentStatusMismatch {
            replayed,
            current: current_status_id,
        });
    }

    Ok(())
}
