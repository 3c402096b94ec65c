// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case mutations.
//!
//! Creation and status transitions are the two-write operations this
//! crate exists to keep atomic: the case row and the ledger entry are
//! committed together or not at all. Field patches never touch
//! `status_id`; the transition path is the single writer of the status
//! reference.

use crate::backend;
use crate::data_models::{CaseFieldPatch, NewCase, NewCaseData, NewHistory, TransitionApplied};
use crate::diesel_schema::{case_status_history, cases, clients};
use crate::error::PersistenceError;
use crate::queries;
use diesel::prelude::*;
use diesel::result::DatabaseErrorKind;
use securo_case::{CreationPlan, TransitionOutcome, format_timestamp, plan_creation, plan_transition};
use securo_case_domain::{Case, CaseNumber, CaseStatus, MilestoneDates};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Bounded retries for case-number allocation.
///
/// The UNIQUE constraint on `case_number` serializes allocation across
/// writers that do not share this process's connection lock; a conflict
/// re-reads the maximum and tries the next sequence.
const MAX_NUMBER_ATTEMPTS: u32 = 3;

/// Creates a case and its initial ledger entry atomically.
///
/// Allocates the next `SH/{YYYY}/{MM}/{NNNNN}` number for the current
/// month, inserts the case with its initial status (the lowest-sort-order
/// active status unless one was requested), and appends the creation
/// entry (`from_status_id = NULL`) in the same transaction.
///
/// # Arguments
///
/// * `data` - The validated creation input
/// * `created_by_user_id` - The authenticated user creating the case
///
/// # Returns
///
/// The generated case ID.
///
/// # Errors
///
/// Returns an error if:
/// - The referenced client does not exist
/// - The requested initial status is unknown or inactive
/// - Number allocation keeps colliding
/// - Any write fails (the whole transaction rolls back)
pub fn create_case(
    conn: &mut SqliteConnection,
    data: &NewCaseData,
    created_by_user_id: i64,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let client_exists: bool = diesel::select(diesel::dsl::exists(
            clients::table.filter(clients::client_id.eq(data.client_id)),
        ))
        .get_result(conn)?;
        if !client_exists {
            return Err(PersistenceError::ClientNotFound(data.client_id));
        }

        let initial_status: CaseStatus = match data.status_id {
            Some(status_id) => queries::catalog::get_status_by_id(conn, status_id)?,
            None => queries::catalog::get_default_status(conn)?,
        };

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let plan: CreationPlan = plan_creation(&initial_status, now)?;

        let year: u16 = u16::try_from(now.year())
            .map_err(|_| PersistenceError::Other(format!("Year out of range: {}", now.year())))?;
        let month: u8 = u8::from(now.month());
        let prefix: String = CaseNumber::month_prefix(year, month);

        for attempt in 1..=MAX_NUMBER_ATTEMPTS {
            let max_sequence: u32 = queries::cases::max_sequence_for_prefix(conn, &prefix)?;
            let case_number: CaseNumber = CaseNumber::new(year, month, max_sequence + 1)
                .map_err(|e| PersistenceError::Other(e.to_string()))?;
            let case_number: String = case_number.to_string();

            let record = NewCase {
                case_number: &case_number,
                client_id: data.client_id,
                insurance_company_id: data.insurance_company_id,
                status_id: plan.status_id,
                assigned_agent_id: data.assigned_agent_id,
                incident_date: &data.incident_date,
                incident_description: data.incident_description.as_deref(),
                incident_location: data.incident_location.as_deref(),
                policy_number: data.policy_number.as_deref(),
                claim_value: data.claim_value,
                vehicle_brand: data.vehicle_brand.as_deref(),
                vehicle_model: data.vehicle_model.as_deref(),
                vehicle_registration: data.vehicle_registration.as_deref(),
                vehicle_year: data.vehicle_year,
                internal_notes: data.internal_notes.as_deref(),
                created_at: &plan.created_at,
                updated_at: &plan.created_at,
                created_by_user_id,
            };

            match diesel::insert_into(cases::table).values(&record).execute(conn) {
                Ok(_) => {
                    let case_id: i64 = backend::get_last_insert_rowid(conn)?;

                    let entry = NewHistory {
                        case_id,
                        from_status_id: None,
                        to_status_id: plan.status_id,
                        comment: &plan.comment,
                        changed_by_user_id: created_by_user_id,
                        changed_at: &plan.created_at,
                    };
                    diesel::insert_into(case_status_history::table)
                        .values(&entry)
                        .execute(conn)?;

                    info!(case_id, case_number = %case_number, "Created case");
                    return Ok(case_id);
                }
                Err(diesel::result::Error::DatabaseError(
                    DatabaseErrorKind::UniqueViolation,
                    _,
                )) if attempt < MAX_NUMBER_ATTEMPTS => {
                    warn!(
                        case_number = %case_number,
                        attempt,
                        "Case number collision, reallocating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(PersistenceError::CaseNumberConflict {
            attempts: MAX_NUMBER_ATTEMPTS,
        })
    })
}

/// Applies a status transition to a case.
///
/// The whole operation runs in one transaction: the case is re-read
/// inside it, so the captured previous status cannot be stale, and the
/// case update plus the ledger insert commit together or roll back
/// together. A request for the case's current status writes nothing.
///
/// # Arguments
///
/// * `case_id` - The case to transition
/// * `requested_status_id` - The destination status
/// * `comment` - Optional comment for the ledger entry
/// * `acting_user_id` - The authenticated user performing the transition
///
/// # Errors
///
/// Returns an error if:
/// - The case does not exist or is soft-deleted
/// - The status does not exist or is inactive
/// - Any write fails (no partial effect remains)
pub fn apply_transition(
    conn: &mut SqliteConnection,
    case_id: i64,
    requested_status_id: i64,
    comment: Option<&str>,
    acting_user_id: i64,
) -> Result<TransitionApplied, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let case: Case = queries::cases::load_case_for_transition(conn, case_id)?;
        let target: CaseStatus = queries::catalog::get_status_by_id(conn, requested_status_id)?;

        let outcome: TransitionOutcome = plan_transition(
            &case,
            &target,
            comment,
            acting_user_id,
            OffsetDateTime::now_utc(),
        )?;

        let plan = match outcome {
            TransitionOutcome::Unchanged => {
                debug!(case_id, status_id = requested_status_id, "Status unchanged");
                return Ok(TransitionApplied::Unchanged);
            }
            TransitionOutcome::Applied(plan) => plan,
        };

        let merged: MilestoneDates = plan.milestones.merged_into(&case.milestones);

        // Append the ledger entry first, then move the case; both writes
        // belong to the surrounding transaction.
        let entry = NewHistory {
            case_id,
            from_status_id: plan.entry.from_status_id,
            to_status_id: plan.entry.to_status_id,
            comment: &plan.entry.comment,
            changed_by_user_id: plan.entry.changed_by_user_id,
            changed_at: &plan.entry.changed_at,
        };
        diesel::insert_into(case_status_history::table)
            .values(&entry)
            .execute(conn)?;

        diesel::update(cases::table.filter(cases::case_id.eq(case_id)))
            .set((
                cases::status_id.eq(plan.new_status_id),
                cases::documents_sent_date.eq(merged.documents_sent_date.as_deref()),
                cases::decision_date.eq(merged.decision_date.as_deref()),
                cases::appeal_date.eq(merged.appeal_date.as_deref()),
                cases::lawsuit_date.eq(merged.lawsuit_date.as_deref()),
                cases::closed_date.eq(merged.closed_date.as_deref()),
                cases::updated_at.eq(plan.entry.changed_at.as_str()),
                cases::updated_by_user_id.eq(Some(acting_user_id)),
            ))
            .execute(conn)?;

        info!(
            case_id,
            from_status_id = plan.previous_status_id,
            to_status_id = plan.new_status_id,
            "Applied status transition"
        );

        Ok(TransitionApplied::Applied {
            previous_status_id: plan.previous_status_id,
            new_status_id: plan.new_status_id,
        })
    })
}

/// Applies a field-level patch to a case.
///
/// The patch cannot carry a status change by construction; `status_id`
/// has a single writer in `apply_transition`.
///
/// # Arguments
///
/// * `case_id` - The case to patch
/// * `patch` - The fields to change; absent fields keep their values
/// * `updated_by_user_id` - The authenticated user making the edit
///
/// # Errors
///
/// Returns `PersistenceError::CaseNotFound` if the case does not exist or
/// is soft-deleted, or an error if the write fails.
pub fn update_case_fields(
    conn: &mut SqliteConnection,
    case_id: i64,
    patch: &CaseFieldPatch,
    updated_by_user_id: i64,
) -> Result<(), PersistenceError> {
    if patch.is_empty() {
        return Ok(());
    }

    conn.immediate_transaction(|conn| {
        let row = queries::cases::get_case_row(conn, case_id)?
            .ok_or(PersistenceError::CaseNotFound(case_id))?;
        if row.deleted_at.is_some() {
            return Err(PersistenceError::CaseNotFound(case_id));
        }

        let updated_at: String = format_timestamp(OffsetDateTime::now_utc())?;

        diesel::update(cases::table.filter(cases::case_id.eq(case_id)))
            .set((
                cases::insurance_company_id.eq(patch
                    .insurance_company_id
                    .unwrap_or(row.insurance_company_id)),
                cases::assigned_agent_id.eq(patch
                    .assigned_agent_id
                    .unwrap_or(row.assigned_agent_id)),
                cases::incident_description.eq(patch
                    .incident_description
                    .clone()
                    .unwrap_or(row.incident_description)),
                cases::incident_location.eq(patch
                    .incident_location
                    .clone()
                    .unwrap_or(row.incident_location)),
                cases::policy_number.eq(patch.policy_number.clone().unwrap_or(row.policy_number)),
                cases::claim_number.eq(patch.claim_number.clone().unwrap_or(row.claim_number)),
                cases::claim_value.eq(patch.claim_value.unwrap_or(row.claim_value)),
                cases::compensation_received.eq(patch
                    .compensation_received
                    .unwrap_or(row.compensation_received)),
                cases::vehicle_brand.eq(patch.vehicle_brand.clone().unwrap_or(row.vehicle_brand)),
                cases::vehicle_model.eq(patch.vehicle_model.clone().unwrap_or(row.vehicle_model)),
                cases::vehicle_registration.eq(patch
                    .vehicle_registration
                    .clone()
                    .unwrap_or(row.vehicle_registration)),
                cases::vehicle_year.eq(patch.vehicle_year.unwrap_or(row.vehicle_year)),
                cases::internal_notes.eq(patch
                    .internal_notes
                    .clone()
                    .unwrap_or(row.internal_notes)),
                cases::updated_at.eq(updated_at.as_str()),
                cases::updated_by_user_id.eq(Some(updated_by_user_id)),
            ))
            .execute(conn)?;

        debug!(case_id, "Patched case fields");
        Ok(())
    })
}

/// Soft-deletes a case.
///
/// The case disappears from active views; its ledger entries are
/// retained. History does not cascade.
///
/// # Errors
///
/// Returns `PersistenceError::CaseNotFound` if the case does not exist or
/// was already deleted.
pub fn soft_delete_case(
    conn: &mut SqliteConnection,
    case_id: i64,
    deleted_by_user_id: i64,
) -> Result<(), PersistenceError> {
    let deleted_at: String = format_timestamp(OffsetDateTime::now_utc())?;

    let affected: usize = diesel::update(
        cases::table
            .filter(cases::case_id.eq(case_id))
            .filter(cases::deleted_at.is_null()),
    )
    .set((
        cases::deleted_at.eq(Some(deleted_at.as_str())),
        cases::deleted_by_user_id.eq(Some(deleted_by_user_id)),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::CaseNotFound(case_id));
    }

    info!(case_id, "Soft-deleted case");
    Ok(())
}
