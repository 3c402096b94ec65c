// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client reference queries.

use crate::data_models::ClientData;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Retrieves a client by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_client_by_id(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<ClientData>, PersistenceError> {
    Ok(clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientData::as_select())
        .first(conn)
        .optional()?)
}

/// Lists all clients, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_clients(conn: &mut SqliteConnection) -> Result<Vec<ClientData>, PersistenceError> {
    Ok(clients::table
        .order(clients::created_at.desc())
        .select(ClientData::as_select())
        .load(conn)?)
}
