// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use securo_case_domain::{Case, CaseStatus, MilestoneDates, StatusCode};
use time::OffsetDateTime;
use time::macros::datetime;

pub const ACTING_USER: i64 = 42;

pub fn test_instant() -> OffsetDateTime {
    datetime!(2026-08-06 10:00:00 UTC)
}

pub fn later_instant() -> OffsetDateTime {
    datetime!(2026-08-06 11:30:00 UTC)
}

pub fn make_status(status_id: i64, code: StatusCode, is_final: bool) -> CaseStatus {
    CaseStatus {
        status_id,
        code,
        name: code.as_str().to_string(),
        color: None,
        sort_order: i32::try_from(status_id).expect("small test id"),
        is_final,
        is_active: true,
    }
}

pub fn make_case(case_id: i64, status_id: i64) -> Case {
    Case {
        case_id,
        case_number: String::from("SH/2026/08/00001"),
        status_id,
        milestones: MilestoneDates::default(),
        deleted_at: None,
    }
}
