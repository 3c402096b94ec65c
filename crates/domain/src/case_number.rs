// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable case numbers.
//!
//! Case numbers follow the `SH/{YYYY}/{MM}/{NNNNN}` format. The sequence
//! restarts at 1 each calendar month and is zero-padded to five digits.
//! Numbers are assigned at creation and immutable thereafter.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of the zero-padded per-month sequence.
const SEQUENCE_WIDTH: usize = 5;

/// A validated case number.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseNumber {
    year: u16,
    month: u8,
    sequence: u32,
}

impl CaseNumber {
    /// Creates a case number from its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is not 1-12 or the sequence is zero.
    pub fn new(year: u16, month: u8, sequence: u32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::InvalidCaseNumberComponent {
                component: "month",
                value: i64::from(month),
            });
        }
        if sequence == 0 {
            return Err(DomainError::InvalidCaseNumberComponent {
                component: "sequence",
                value: i64::from(sequence),
            });
        }
        Ok(Self {
            year,
            month,
            sequence,
        })
    }

    /// Returns the first case number of a given month.
    ///
    /// # Errors
    ///
    /// Returns an error if the month is not 1-12.
    pub fn first_of_month(year: u16, month: u8) -> Result<Self, DomainError> {
        Self::new(year, month, 1)
    }

    /// Returns the year component.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Returns the month component.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Returns the per-month sequence component.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Returns the `SH/{YYYY}/{MM}/` prefix shared by all numbers in the
    /// same month, used for sequence allocation queries.
    #[must_use]
    pub fn month_prefix(year: u16, month: u8) -> String {
        format!("SH/{year:04}/{month:02}/")
    }

    /// Returns the next number in the same month.
    #[must_use]
    pub const fn next_in_month(&self) -> Self {
        Self {
            year: self.year,
            month: self.month,
            sequence: self.sequence + 1,
        }
    }
}

impl fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SH/{:04}/{:02}/{:0width$}",
            self.year,
            self.month,
            self.sequence,
            width = SEQUENCE_WIDTH
        )
    }
}

impl FromStr for CaseNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidCaseNumber(s.to_string());

        let rest = s.strip_prefix("SH/").ok_or_else(invalid)?;
        let mut parts = rest.split('/');
        let year_part = parts.next().ok_or_else(invalid)?;
        let month_part = parts.next().ok_or_else(invalid)?;
        let seq_part = parts.next().ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        if year_part.len() != 4 || month_part.len() != 2 || seq_part.len() != SEQUENCE_WIDTH {
            return Err(invalid());
        }

        let year: u16 = year_part.parse().map_err(|_| invalid())?;
        let month: u8 = month_part.parse().map_err(|_| invalid())?;
        let sequence: u32 = seq_part.parse().map_err(|_| invalid())?;

        Self::new(year, month, sequence).map_err(|_| invalid())
    }
}

impl TryFrom<String> for CaseNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CaseNumber> for String {
    fn from(value: CaseNumber) -> Self {
        value.to_string()
    }
}
