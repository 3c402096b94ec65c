// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseDetail, NewCaseData, Persistence};

pub fn setup() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn seed_user(persistence: &mut Persistence, email: &str) -> i64 {
    persistence
        .create_user(email, "Anna", "Agentka", "tajnehaslo123", "AGENT")
        .expect("Failed to create user")
}

pub fn seed_client(persistence: &mut Persistence, created_by: i64) -> i64 {
    persistence
        .create_client(
            "Jan",
            "Kowalski",
            Some("jan.kowalski@example.com"),
            Some("123456789"),
            Some("Warszawa"),
            created_by,
        )
        .expect("Failed to create client")
}

pub fn seed_case(persistence: &mut Persistence, client_id: i64, created_by: i64) -> CaseDetail {
    let data = NewCaseData {
        client_id,
        incident_date: String::from("2026-07-15"),
        incident_description: Some(String::from("Kolizja na skrzyżowaniu")),
        ..NewCaseData::default()
    };
    persistence
        .create_case(&data, created_by)
        .expect("Failed to create case")
}

pub fn status_id(persistence: &mut Persistence, code: &str) -> i64 {
    persistence
        .get_status_by_code(code)
        .expect("Status code missing from catalog")
        .status_id
}
