// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client reference mutations.

use crate::backend;
use crate::data_models::NewClient;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;
use diesel::prelude::*;
use securo_case::format_timestamp;
use time::OffsetDateTime;
use tracing::info;

/// Creates a new client.
///
/// # Returns
///
/// The generated client ID.
///
/// # Errors
///
/// Returns an error if the client cannot be created.
pub fn create_client(
    conn: &mut SqliteConnection,
    first_name: &str,
    last_name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    city: Option<&str>,
    created_by_user_id: i64,
) -> Result<i64, PersistenceError> {
    let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    let record = NewClient {
        first_name,
        last_name,
        email,
        phone,
        city,
        created_at: &created_at,
        created_by_user_id,
    };

    diesel::insert_into(clients::table)
        .values(&record)
        .execute(conn)?;

    let client_id: i64 = backend::get_last_insert_rowid(conn)?;
    info!(client_id, "Created client");
    Ok(client_id)
}
