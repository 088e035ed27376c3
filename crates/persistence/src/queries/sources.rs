// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bulk upload source queries.

use diesel::prelude::*;
use std::str::FromStr;

use calc_domain::{ProcurementCenter, UploadStatus};

use crate::data_models::SourceData;
use crate::diesel_schema::bulk_upload_sources;
use crate::error::PersistenceError;

/// Diesel Queryable struct for bulk upload source rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = bulk_upload_sources)]
struct SourceRow {
    source_id: i64,
    procurement_center: String,
    submitter: String,
    original_file: Vec<u8>,
    file_mime_type: String,
    has_been_loaded: i32,
    status: String,
    failure_reason: Option<String>,
    created_at: String,
}

impl SourceRow {
    fn into_data(self) -> Result<SourceData, PersistenceError> {
        let procurement_center: ProcurementCenter =
            ProcurementCenter::from_str(&self.procurement_center).map_err(|e| {
                PersistenceError::CorruptStoredValue {
                    column: String::from("procurement_center"),
                    message: e.to_string(),
                }
            })?;
        let status: UploadStatus = UploadStatus::from_str(&self.status).map_err(|e| {
            PersistenceError::CorruptStoredValue {
                column: String::from("status"),
                message: e.to_string(),
            }
        })?;

        Ok(SourceData {
            source_id: self.source_id,
            procurement_center,
            submitter: self.submitter,
            original_file: self.original_file,
            file_mime_type: self.file_mime_type,
            has_been_loaded: self.has_been_loaded != 0,
            status,
            failure_reason: self.failure_reason,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a bulk upload source by ID, including its stored bytes.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `source_id` - The source ID
///
/// # Errors
///
/// Returns [`PersistenceError::SourceNotFound`] if no such source
/// exists, or a database error.
pub fn get_source(
    conn: &mut SqliteConnection,
    source_id: i64,
) -> Result<SourceData, PersistenceError> {
    let row: SourceRow = bulk_upload_sources::table
        .filter(bulk_upload_sources::source_id.eq(source_id))
        .select(SourceRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::SourceNotFound(source_id))?;

    row.into_data()
}
