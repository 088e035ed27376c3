// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk upload source mutations.
//!
//! `has_been_loaded` is the idempotency guard for at-least-once job
//! delivery: `load_source_contracts` flips it with a guarded update
//! inside the same transaction as the contract inserts, and a repeat
//! invocation reports `false` instead of loading twice.

use diesel::prelude::*;
use tracing::{debug, info, warn};

use calc_domain::{ContractFields, DomainError, ProcurementCenter, UploadStatus};

use crate::diesel_schema::bulk_upload_sources;
use crate::error::PersistenceError;
use crate::mutations::contracts::insert_contract;
use crate::sqlite;

/// Persists a newly received bulk upload source.
///
/// The file bytes are stored verbatim; nothing is parsed here.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `center` - The procurement center the upload belongs to
/// * `submitter` - The identifier of the submitting user
/// * `original_file` - The raw uploaded bytes
/// * `file_mime_type` - The MIME type the file was uploaded with
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_source(
    conn: &mut SqliteConnection,
    center: ProcurementCenter,
    submitter: &str,
    original_file: &[u8],
    file_mime_type: &str,
) -> Result<i64, PersistenceError> {
    info!(
        center = %center,
        submitter = %submitter,
        bytes = original_file.len(),
        "Storing bulk upload source"
    );

    diesel::insert_into(bulk_upload_sources::table)
        .values((
            bulk_upload_sources::procurement_center.eq(center.as_str()),
            bulk_upload_sources::submitter.eq(submitter),
            bulk_upload_sources::original_file.eq(original_file),
            bulk_upload_sources::file_mime_type.eq(file_mime_type),
            bulk_upload_sources::has_been_loaded.eq(0),
            bulk_upload_sources::status.eq(UploadStatus::Received.as_str()),
        ))
        .execute(conn)?;

    let source_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    info!(source_id, "Bulk upload source stored");
    Ok(source_id)
}

/// Advances a source's lifecycle status.
///
/// The transition is validated against the domain state machine and
/// applied with a `WHERE status = <from>` guard, so a concurrent
/// transition loses cleanly.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `source_id` - The source to advance
/// * `from` - The expected current status
/// * `to` - The requested status
///
/// # Returns
///
/// `true` if this call performed the transition.
///
/// # Errors
///
/// Returns an error for a transition the state machine forbids, or if
/// the database update fails.
pub fn update_source_status(
    conn: &mut SqliteConnection,
    source_id: i64,
    from: UploadStatus,
    to: UploadStatus,
) -> Result<bool, PersistenceError> {
    if !from.can_transition_to(to) {
        return Err(PersistenceError::from(DomainError::InvalidStatusTransition {
            from,
            to,
        }));
    }

    let updated: usize = diesel::update(bulk_upload_sources::table)
        .filter(bulk_upload_sources::source_id.eq(source_id))
        .filter(bulk_upload_sources::status.eq(from.as_str()))
        .set(bulk_upload_sources::status.eq(to.as_str()))
        .execute(conn)?;

    debug!(source_id, %from, %to, transitioned = updated > 0, "Source status update");
    Ok(updated > 0)
}

/// Loads a batch of contracts from a source and marks it loaded.
///
/// The flag flip and every contract insert commit in one transaction:
/// a failure anywhere rolls the whole load back, so a retried job never
/// finds partial contracts attributed to the source. The flag update is
/// guarded on `has_been_loaded = 0`, so a redelivered job for a source
/// that already loaded inserts nothing and reports `false`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `source_id` - The source the contracts came from
/// * `batch` - The normalized contract fields, one per source row
///
/// # Returns
///
/// `true` if this call loaded the source.
///
/// # Errors
///
/// Returns [`PersistenceError::SourceNotFound`] if no such source
/// exists, or a database error. On error nothing is committed.
pub fn load_source_contracts(
    conn: &mut SqliteConnection,
    source_id: i64,
    batch: &[ContractFields],
) -> Result<bool, PersistenceError> {
    conn.transaction::<bool, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(bulk_upload_sources::table)
            .filter(bulk_upload_sources::source_id.eq(source_id))
            .filter(bulk_upload_sources::has_been_loaded.eq(0))
            .set((
                bulk_upload_sources::has_been_loaded.eq(1),
                bulk_upload_sources::status.eq(UploadStatus::Loaded.as_str()),
            ))
            .execute(conn)?;

        if updated == 0 {
            let exists: Option<i64> = bulk_upload_sources::table
                .filter(bulk_upload_sources::source_id.eq(source_id))
                .select(bulk_upload_sources::source_id)
                .first(conn)
                .optional()?;
            if exists.is_none() {
                return Err(PersistenceError::SourceNotFound(source_id));
            }
            debug!(source_id, "Source already loaded; no contracts inserted");
            return Ok(false);
        }

        for fields in batch {
            insert_contract(conn, fields, None, Some(source_id))?;
        }

        info!(
            source_id,
            contracts_created = batch.len(),
            "Bulk upload source loaded"
        );
        Ok(true)
    })
}

/// Marks a source as permanently failed, recording the reason.
///
/// A source that already reached `Loaded` is never demoted: the guard
/// only matches non-terminal statuses.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `source_id` - The source to mark
/// * `reason` - A human-readable failure description
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn mark_source_failed(
    conn: &mut SqliteConnection,
    source_id: i64,
    reason: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(bulk_upload_sources::table)
        .filter(bulk_upload_sources::source_id.eq(source_id))
        .filter(bulk_upload_sources::status.ne(UploadStatus::Loaded.as_str()))
        .set((
            bulk_upload_sources::status.eq(UploadStatus::Failed.as_str()),
            bulk_upload_sources::failure_reason.eq(reason),
        ))
        .execute(conn)?;

    if updated > 0 {
        warn!(source_id, reason = %reason, "Bulk upload source marked failed");
    }
    Ok(())
}
