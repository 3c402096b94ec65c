// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User and session mutations.

use crate::backend;
use crate::data_models::{NewSession, NewUser};
use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use diesel::prelude::*;
use securo_case::format_timestamp;
use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;
use tracing::info;

/// Creates a new user.
///
/// # Arguments
///
/// * `email` - The login email (unique)
/// * `first_name` / `last_name` - Display names
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (`ADMIN`, `AGENT`, `ASSISTANT`, or `ACCOUNTANT`)
///
/// # Returns
///
/// The generated user ID.
///
/// # Errors
///
/// Returns an error if the user cannot be created.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Password hashing failed: {e}")))?;
    let created_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    let record = NewUser {
        email,
        password_hash: &password_hash,
        first_name,
        last_name,
        role,
        is_active: 1,
        created_at: &created_at,
    };

    diesel::insert_into(users::table)
        .values(&record)
        .execute(conn)?;

    let user_id: i64 = backend::get_last_insert_rowid(conn)?;
    info!(user_id, email, role, "Created user");
    Ok(user_id)
}

/// Deactivates a user.
///
/// A deactivated user can no longer authenticate or act.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn deactivate_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::is_active.eq(0))
        .execute(conn)?;
    Ok(())
}

/// Updates the last login timestamp for a user.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;
    diesel::update(users::table.filter(users::user_id.eq(user_id)))
        .set(users::last_login_at.eq(Some(now)))
        .execute(conn)?;
    Ok(())
}

/// Creates a new session for a user.
///
/// # Arguments
///
/// * `session_token` - The unique session token
/// * `user_id` - The user the session belongs to
/// * `expires_at` - The expiration timestamp (ISO 8601 format)
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;

    let record = NewSession {
        session_token,
        user_id,
        created_at: &now,
        last_activity_at: &now,
        expires_at,
    };

    diesel::insert_into(sessions::table)
        .values(&record)
        .execute(conn)?;

    backend::get_last_insert_rowid(conn)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    let now: String = format_timestamp(OffsetDateTime::now_utc())?;
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}

/// Deletes a session by token.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<(), PersistenceError> {
    diesel::delete(sessions::table.filter(sessions::session_token.eq(session_token)))
        .execute(conn)?;
    Ok(())
}

/// Deletes all expired sessions.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_expired_sessions(conn: &mut SqliteConnection) -> Result<usize, PersistenceError> {
    let now: String = OffsetDateTime::now_utc()
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))?;

    Ok(
        diesel::delete(sessions::table.filter(sessions::expires_at.lt(now)))
            .execute(conn)?,
    )
}
