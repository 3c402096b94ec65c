// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedUser, Role};
use securo_case_persistence::Persistence;

pub fn setup() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn seed_agent(persistence: &mut Persistence) -> AuthenticatedUser {
    let user_id = persistence
        .create_user(
            "agent@securohelp.pl",
            "Anna",
            "Agentka",
            "tajnehaslo123",
            "AGENT",
        )
        .expect("Failed to create user");
    AuthenticatedUser {
        user_id,
        email: String::from("agent@securohelp.pl"),
        display_name: String::from("Anna Agentka"),
        role: Role::Agent,
    }
}

pub fn seed_client(persistence: &mut Persistence, created_by: i64) -> i64 {
    persistence
        .create_client("Jan", "Kowalski", None, None, Some("Warszawa"), created_by)
        .expect("Failed to create client")
}
