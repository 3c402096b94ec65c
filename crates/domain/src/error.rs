// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Status code string is not part of the catalog vocabulary.
    InvalidStatusCode(String),
    /// Referenced status does not exist in the catalog.
    StatusNotFound {
        /// The requested status identifier.
        status_id: i64,
    },
    /// Referenced status exists but is not selectable for new transitions.
    InactiveStatus {
        /// The requested status identifier.
        status_id: i64,
        /// The status code, for diagnostics.
        code: String,
    },
    /// Case does not exist or has been soft-deleted.
    CaseNotFound {
        /// The requested case identifier.
        case_id: i64,
    },
    /// Case number string does not match `SH/{YYYY}/{MM}/{NNNNN}`.
    InvalidCaseNumber(String),
    /// Case number components are out of range.
    InvalidCaseNumberComponent {
        /// The offending component name.
        component: &'static str,
        /// The offending value.
        value: i64,
    },
    /// Required client reference is missing.
    MissingClient,
    /// Required incident date is missing.
    MissingIncidentDate,
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// A free-text comment exceeds the storable length.
    CommentTooLong {
        /// The actual comment length.
        length: usize,
        /// The maximum permitted length.
        max: usize,
    },
    /// Claim or compensation value is not a valid non-negative amount.
    InvalidMonetaryValue {
        /// The field that was invalid.
        field: &'static str,
        /// The offending raw value.
        value: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStatusCode(code) => write!(f, "Invalid status code: {code}"),
            Self::StatusNotFound { status_id } => {
                write!(f, "Status {status_id} does not exist")
            }
            Self::InactiveStatus { status_id, code } => {
                write!(f, "Status {status_id} ({code}) is not active")
            }
            Self::CaseNotFound { case_id } => write!(f, "Case {case_id} does not exist"),
            Self::InvalidCaseNumber(raw) => write!(f, "Invalid case number: {raw}"),
            Self::InvalidCaseNumberComponent { component, value } => {
                write!(f, "Invalid case number {component}: {value}")
            }
            Self::MissingClient => write!(f, "Client reference is required"),
            Self::MissingIncidentDate => write!(f, "Incident date is required"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::CommentTooLong { length, max } => {
                write!(f, "Comment length {length} exceeds maximum {max}")
            }
            Self::InvalidMonetaryValue { field, value } => {
                write!(f, "Invalid value for {field}: {value}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
