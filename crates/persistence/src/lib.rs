// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for CALC Data Capture.
//!
//! This crate provides database persistence for contracts, submitted
//! price lists, and bulk upload sources. It is built on Diesel over
//! `SQLite` with embedded migrations.
//!
//! ## Search index invariant
//!
//! The `contracts.search_index` column is always a deterministic
//! function of `labor_category`. It is recomputed inside the insert and
//! update mutations; no public API writes it directly and no background
//! job refreshes it. A read can therefore never observe a stale index.
//!
//! ## Testing
//!
//! Tests run against unique shared in-memory databases. Isolation uses
//! an atomic counter rather than timestamps so parallel tests cannot
//! collide.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use calc_domain::{
    ContractFields, PriceListDetails, PriceListRow, ProcurementCenter, TsQuery, UploadStatus,
};

mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use data_models::{ContractData, PriceListData, PriceListRowData, SourceData};
pub use error::PersistenceError;

/// ISO date format used for stored contract period dates.
pub(crate) const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for contracts, price lists, and upload sources.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // WAL for better read concurrency on file databases
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Contracts
    // ========================================================================

    /// Inserts a contract, deriving its search index from the labor category.
    ///
    /// # Arguments
    ///
    /// * `fields` - The normalized contract fields
    /// * `price_list_id` - The owning price list, if any
    /// * `upload_source_id` - The owning bulk upload source, if any
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn insert_contract(
        &mut self,
        fields: &ContractFields,
        price_list_id: Option<i64>,
        upload_source_id: Option<i64>,
    ) -> Result<i64, PersistenceError> {
        mutations::insert_contract(&mut self.conn, fields, price_list_id, upload_source_id)
    }

    /// Updates a contract's labor category, recomputing its search index.
    ///
    /// # Arguments
    ///
    /// * `contract_id` - The contract to update
    /// * `labor_category` - The new labor category text
    ///
    /// # Errors
    ///
    /// Returns an error if the contract does not exist or the update fails.
    pub fn update_contract_labor_category(
        &mut self,
        contract_id: i64,
        labor_category: &str,
    ) -> Result<(), PersistenceError> {
        mutations::update_contract_labor_category(&mut self.conn, contract_id, labor_category)
    }

    /// Retrieves a contract by ID.
    ///
    /// # Arguments
    ///
    /// * `contract_id` - The contract ID
    ///
    /// # Errors
    ///
    /// Returns an error if the contract is not found.
    pub fn get_contract(&mut self, contract_id: i64) -> Result<ContractData, PersistenceError> {
        queries::get_contract(&mut self.conn, contract_id)
    }

    /// Lists every contract in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_contracts(&mut self) -> Result<Vec<ContractData>, PersistenceError> {
        queries::list_contracts(&mut self.conn)
    }

    /// Searches contracts by one or more free-text phrases.
    ///
    /// Results are ordered by contract id ascending. Phrases with no
    /// alphanumeric content yield an empty result, never an error.
    ///
    /// # Arguments
    ///
    /// * `phrases` - The search phrases (ORed together)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn multi_phrase_search<S: AsRef<str>>(
        &mut self,
        phrases: &[S],
    ) -> Result<Vec<ContractData>, PersistenceError> {
        queries::multi_phrase_search(&mut self.conn, phrases)
    }

    /// Evaluates a structured query directly against the search index.
    ///
    /// This is the operational escape hatch that bypasses the query
    /// compiler. It accepts a structured query object, never raw SQL.
    ///
    /// # Arguments
    ///
    /// * `query` - The compiled query
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn search_contracts(
        &mut self,
        query: &TsQuery,
    ) -> Result<Vec<ContractData>, PersistenceError> {
        queries::search_contracts(&mut self.conn, query)
    }

    /// Counts the contracts loaded from a bulk upload source.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The bulk upload source ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_contracts_for_source(
        &mut self,
        source_id: i64,
    ) -> Result<i64, PersistenceError> {
        queries::count_contracts_for_source(&mut self.conn, source_id)
    }

    // ========================================================================
    // Submitted price lists
    // ========================================================================

    /// Creates a submitted price list in draft state.
    ///
    /// # Arguments
    ///
    /// * `details` - The validated vendor-level details
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_price_list(
        &mut self,
        details: &PriceListDetails,
    ) -> Result<i64, PersistenceError> {
        mutations::create_price_list(&mut self.conn, details)
    }

    /// Adds one normalized row to a price list.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The owning price list
    /// * `row` - The normalized row
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn add_price_list_row(
        &mut self,
        price_list_id: i64,
        row: &PriceListRow,
    ) -> Result<i64, PersistenceError> {
        mutations::add_price_list_row(&mut self.conn, price_list_id, row)
    }

    /// Retrieves a price list by ID.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The price list ID
    ///
    /// # Errors
    ///
    /// Returns an error if the list is not found.
    pub fn get_price_list(
        &mut self,
        price_list_id: i64,
    ) -> Result<PriceListData, PersistenceError> {
        queries::get_price_list(&mut self.conn, price_list_id)
    }

    /// Lists the rows of a price list in insertion order.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The owning price list ID
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_price_list_rows(
        &mut self,
        price_list_id: i64,
    ) -> Result<Vec<PriceListRowData>, PersistenceError> {
        queries::list_price_list_rows(&mut self.conn, price_list_id)
    }

    /// Approves a price list, materializing its rows as contracts.
    ///
    /// Idempotent: returns `false` when the list was already approved.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The price list to approve
    ///
    /// # Errors
    ///
    /// Returns an error if the list does not exist, its business size
    /// is unanswered, or the transaction fails.
    pub fn approve_price_list(&mut self, price_list_id: i64) -> Result<bool, PersistenceError> {
        mutations::approve_price_list(&mut self.conn, price_list_id)
    }

    /// Unapproves a price list, removing its materialized contracts.
    ///
    /// Idempotent: returns `false` when the list was not approved.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The price list to unapprove
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction fails.
    pub fn unapprove_price_list(&mut self, price_list_id: i64) -> Result<bool, PersistenceError> {
        mutations::unapprove_price_list(&mut self.conn, price_list_id)
    }

    /// Mutes or unmutes one price list row.
    ///
    /// Muted rows are skipped when their list is approved. Returns
    /// `false` when the row was already in the requested state.
    ///
    /// # Arguments
    ///
    /// * `row_id` - The row to mute or unmute
    /// * `muted` - The desired mute state
    ///
    /// # Errors
    ///
    /// Returns an error if the row does not exist or the update fails.
    pub fn set_price_list_row_muted(
        &mut self,
        row_id: i64,
        muted: bool,
    ) -> Result<bool, PersistenceError> {
        mutations::set_price_list_row_muted(&mut self.conn, row_id, muted)
    }

    /// Deletes a price list; its rows and contracts cascade.
    ///
    /// # Arguments
    ///
    /// * `price_list_id` - The price list to delete
    ///
    /// # Errors
    ///
    /// Returns an error if the list does not exist or the delete fails.
    pub fn delete_price_list(&mut self, price_list_id: i64) -> Result<(), PersistenceError> {
        mutations::delete_price_list(&mut self.conn, price_list_id)
    }

    // ========================================================================
    // Bulk upload sources
    // ========================================================================

    /// Persists a newly received bulk upload source.
    ///
    /// # Arguments
    ///
    /// * `center` - The procurement center the upload belongs to
    /// * `submitter` - The identifier of the submitting user
    /// * `original_file` - The raw uploaded bytes
    /// * `file_mime_type` - The MIME type the file was uploaded with
    ///
    /// # Errors
    ///
    /// Returns an error if persistence fails.
    pub fn create_source(
        &mut self,
        center: ProcurementCenter,
        submitter: &str,
        original_file: &[u8],
        file_mime_type: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::create_source(&mut self.conn, center, submitter, original_file, file_mime_type)
    }

    /// Retrieves a bulk upload source by ID, including its stored bytes.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The source ID
    ///
    /// # Errors
    ///
    /// Returns an error if the source is not found.
    pub fn get_source(&mut self, source_id: i64) -> Result<SourceData, PersistenceError> {
        queries::get_source(&mut self.conn, source_id)
    }

    /// Advances a source's lifecycle status with a guarded update.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The source to advance
    /// * `from` - The expected current status
    /// * `to` - The requested status
    ///
    /// # Errors
    ///
    /// Returns an error for a forbidden transition or a database failure.
    pub fn update_source_status(
        &mut self,
        source_id: i64,
        from: UploadStatus,
        to: UploadStatus,
    ) -> Result<bool, PersistenceError> {
        mutations::update_source_status(&mut self.conn, source_id, from, to)
    }

    /// Loads a batch of contracts from a source and marks it loaded.
    ///
    /// Atomic: the contract inserts and the `has_been_loaded` flip
    /// commit together, and a failure rolls everything back. Returns
    /// `false` when the source was already loaded, in which case
    /// nothing is inserted.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The source the contracts came from
    /// * `batch` - The normalized contract fields, one per source row
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not exist or the
    /// transaction fails.
    pub fn load_source_contracts(
        &mut self,
        source_id: i64,
        batch: &[ContractFields],
    ) -> Result<bool, PersistenceError> {
        mutations::load_source_contracts(&mut self.conn, source_id, batch)
    }

    /// Marks a source as permanently failed, recording the reason.
    ///
    /// # Arguments
    ///
    /// * `source_id` - The source to mark
    /// * `reason` - A human-readable failure description
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn mark_source_failed(
        &mut self,
        source_id: i64,
        reason: &str,
    ) -> Result<(), PersistenceError> {
        mutations::mark_source_failed(&mut self.conn, source_id, reason)
    }
}
