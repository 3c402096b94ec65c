// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case status vocabulary and milestone derivation.
//!
//! This module defines the fixed set of status codes and the milestone
//! timestamps a transition into each code triggers. Transitions are
//! user-initiated only; the catalog imposes no adjacency constraints, so
//! any active status may follow any other (including moving backwards).

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Status codes a case can move through.
///
/// The catalog row carries the display metadata; the code alone decides
/// which milestone timestamp a transition sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// Freshly created case, nothing sent yet.
    New,
    /// Collecting documents from the client.
    Documents,
    /// Claim file sent to the insurer.
    SentToInsurer,
    /// Insurer issued a positive decision.
    PositiveDecision,
    /// Insurer issued a negative decision.
    NegativeDecision,
    /// Appeal filed against the decision.
    Appeal,
    /// Court proceedings started.
    Lawsuit,
    /// Case closed.
    Closed,
}

/// Milestone timestamp a transition sets, at most once per case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// Documents were sent to the insurer.
    DocumentsSent,
    /// A decision (positive or negative) was received.
    Decision,
    /// An appeal was filed.
    Appeal,
    /// A lawsuit was filed.
    Lawsuit,
}

impl StatusCode {
    /// Returns the string representation of the code.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Documents => "DOCUMENTS",
            Self::SentToInsurer => "SENT_TO_INSURER",
            Self::PositiveDecision => "POSITIVE_DECISION",
            Self::NegativeDecision => "NEGATIVE_DECISION",
            Self::Appeal => "APPEAL",
            Self::Lawsuit => "LAWSUIT",
            Self::Closed => "CLOSED",
        }
    }

    /// Parses a code from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusCode` if the string is not a valid code.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "NEW" => Ok(Self::New),
            "DOCUMENTS" => Ok(Self::Documents),
            "SENT_TO_INSURER" => Ok(Self::SentToInsurer),
            "POSITIVE_DECISION" => Ok(Self::PositiveDecision),
            "NEGATIVE_DECISION" => Ok(Self::NegativeDecision),
            "APPEAL" => Ok(Self::Appeal),
            "LAWSUIT" => Ok(Self::Lawsuit),
            "CLOSED" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidStatusCode(s.to_string())),
        }
    }

    /// Returns the milestone timestamp a transition into this code sets.
    ///
    /// `Closed` carries no code-level milestone; the closed timestamp is
    /// driven by the catalog's `is_final` flag instead, so that any final
    /// status closes the case regardless of its code.
    #[must_use]
    pub const fn milestone(&self) -> Option<Milestone> {
        match self {
            Self::SentToInsurer => Some(Milestone::DocumentsSent),
            Self::PositiveDecision | Self::NegativeDecision => Some(Milestone::Decision),
            Self::Appeal => Some(Milestone::Appeal),
            Self::Lawsuit => Some(Milestone::Lawsuit),
            Self::New | Self::Documents | Self::Closed => None,
        }
    }

    /// Returns true if this code represents an insurer decision.
    #[must_use]
    pub const fn is_decision(&self) -> bool {
        matches!(self, Self::PositiveDecision | Self::NegativeDecision)
    }
}

impl FromStr for StatusCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A status catalog entry.
///
/// Seeded once at system setup and rarely mutated afterwards. `sort_order`
/// defines the canonical display ordering only; it is not a transition
/// constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStatus {
    pub status_id: i64,
    pub code: StatusCode,
    /// Display label in the deployment locale.
    pub name: String,
    /// Presentation hint (hex color).
    pub color: Option<String>,
    pub sort_order: i32,
    /// Reaching this status closes the case.
    pub is_final: bool,
    /// Whether the status is selectable for new transitions.
    pub is_active: bool,
}

impl CaseStatus {
    /// Ensures this status is selectable as a transition target.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InactiveStatus` if the status is retired.
    pub fn ensure_selectable(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::InactiveStatus {
                status_id: self.status_id,
                code: self.code.as_str().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_string_round_trip() {
        let codes = vec![
            StatusCode::New,
            StatusCode::Documents,
            StatusCode::SentToInsurer,
            StatusCode::PositiveDecision,
            StatusCode::NegativeDecision,
            StatusCode::Appeal,
            StatusCode::Lawsuit,
            StatusCode::Closed,
        ];

        for code in codes {
            let s = code.as_str();
            match StatusCode::parse_str(s) {
                Ok(parsed) => assert_eq!(code, parsed),
                Err(e) => panic!("Failed to parse status code string: {s}: {e}"),
            }
        }
    }

    #[test]
    fn test_invalid_code_string() {
        let result = StatusCode::parse_str("NOT_A_STATUS");
        assert!(result.is_err());
    }

    #[test]
    fn test_milestone_mapping() {
        assert_eq!(StatusCode::New.milestone(), None);
        assert_eq!(StatusCode::Documents.milestone(), None);
        assert_eq!(
            StatusCode::SentToInsurer.milestone(),
            Some(Milestone::DocumentsSent)
        );
        assert_eq!(
            StatusCode::PositiveDecision.milestone(),
            Some(Milestone::Decision)
        );
        assert_eq!(
            StatusCode::NegativeDecision.milestone(),
            Some(Milestone::Decision)
        );
        assert_eq!(StatusCode::Appeal.milestone(), Some(Milestone::Appeal));
        assert_eq!(StatusCode::Lawsuit.milestone(), Some(Milestone::Lawsuit));
        // Closed is driven by is_final, never by code.
        assert_eq!(StatusCode::Closed.milestone(), None);
    }

    #[test]
    fn test_decision_codes() {
        assert!(StatusCode::PositiveDecision.is_decision());
        assert!(StatusCode::NegativeDecision.is_decision());
        assert!(!StatusCode::Appeal.is_decision());
        assert!(!StatusCode::New.is_decision());
    }

    #[test]
    fn test_inactive_status_not_selectable() {
        let status = CaseStatus {
            status_id: 3,
            code: StatusCode::SentToInsurer,
            name: String::from("Wysłana do ubezpieczyciela"),
            color: Some(String::from("#f59e0b")),
            sort_order: 3,
            is_final: false,
            is_active: false,
        };

        let result = status.ensure_selectable();
        assert_eq!(
            result,
            Err(DomainError::InactiveStatus {
                status_id: 3,
                code: String::from("SENT_TO_INSURER"),
            })
        );
    }

    #[test]
    fn test_active_status_selectable() {
        let status = CaseStatus {
            status_id: 1,
            code: StatusCode::New,
            name: String::from("Nowa"),
            color: Some(String::from("#3b82f6")),
            sort_order: 1,
            is_final: false,
            is_active: true,
        };

        assert!(status.ensure_selectable().is_ok());
    }
}
