// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session queries.

use crate::data_models::{SessionData, UserData};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use diesel::prelude::*;

/// Retrieves a user by email address.
///
/// # Arguments
///
/// * `email` - The email to search for
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_by_email(
    conn: &mut SqliteConnection,
    email: &str,
) -> Result<Option<UserData>, PersistenceError> {
    Ok(users::table
        .filter(users::email.eq(email))
        .select(UserData::as_select())
        .first(conn)
        .optional()?)
}

/// Retrieves a user by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_user_by_id(
    conn: &mut SqliteConnection,
    user_id: i64,
) -> Result<Option<UserData>, PersistenceError> {
    Ok(users::table
        .filter(users::user_id.eq(user_id))
        .select(UserData::as_select())
        .first(conn)
        .optional()?)
}

/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_session_by_token(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    Ok(sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionData::as_select())
        .first(conn)
        .optional()?)
}

/// Verifies a password against a stored hash.
///
/// # Arguments
///
/// * `password` - The plain text password to verify
/// * `password_hash` - The stored bcrypt hash
///
/// # Errors
///
/// Returns an error if password verification fails.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    bcrypt::verify(password, password_hash)
        .map_err(|e| PersistenceError::Other(format!("Password verification failed: {e}")))
}
