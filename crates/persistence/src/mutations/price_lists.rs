// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submitted price list mutations.
//!
//! Approval and unapproval are guarded check-then-set updates: the
//! `WHERE is_approved = <old>` clause makes the transition atomic, so
//! concurrent admin actions cannot double-transition (and therefore
//! cannot double-notify). Both run inside a transaction together with
//! the contract materialization they imply.

use diesel::prelude::*;
use tracing::{debug, info};

use calc_domain::{BusinessSize, ContractFields, PriceListDetails, PriceListRow};

use crate::DATE_FORMAT;
use crate::diesel_schema::{contracts, submitted_price_list_rows, submitted_price_lists};
use crate::error::PersistenceError;
use crate::mutations::contracts::insert_contract;
use crate::sqlite;

/// Creates a new submitted price list in draft (unapproved) state.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `details` - The validated vendor-level details
///
/// # Errors
///
/// Returns an error if the insert fails or a date cannot be formatted.
pub fn create_price_list(
    conn: &mut SqliteConnection,
    details: &PriceListDetails,
) -> Result<i64, PersistenceError> {
    info!(
        contract_number = %details.contract_number,
        vendor_name = %details.vendor_name,
        "Creating submitted price list"
    );

    let start: String = details
        .contract_start
        .format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let end: String = details
        .contract_end
        .format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;

    diesel::insert_into(submitted_price_lists::table)
        .values((
            submitted_price_lists::contract_number.eq(&details.contract_number),
            submitted_price_lists::vendor_name.eq(&details.vendor_name),
            submitted_price_lists::is_small_business
                .eq(details.is_small_business.map(i32::from)),
            submitted_price_lists::contractor_site.eq(details.contractor_site.as_str()),
            submitted_price_lists::contract_year.eq(i32::from(details.contract_year)),
            submitted_price_lists::contract_start.eq(&start),
            submitted_price_lists::contract_end.eq(&end),
            submitted_price_lists::schedule.eq(&details.schedule),
            submitted_price_lists::submitter.eq(&details.submitter),
            submitted_price_lists::is_approved.eq(0),
        ))
        .execute(conn)?;

    let price_list_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    info!(price_list_id, "Submitted price list created");
    Ok(price_list_id)
}

/// Adds one normalized row to a price list.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The owning price list
/// * `row` - The normalized row
///
/// # Errors
///
/// Returns an error if the insert fails (including a missing parent,
/// which foreign key enforcement rejects).
pub fn add_price_list_row(
    conn: &mut SqliteConnection,
    price_list_id: i64,
    row: &PriceListRow,
) -> Result<i64, PersistenceError> {
    debug!(price_list_id, labor_category = %row.labor_category, "Adding price list row");

    diesel::insert_into(submitted_price_list_rows::table)
        .values((
            submitted_price_list_rows::price_list_id.eq(price_list_id),
            submitted_price_list_rows::labor_category.eq(&row.labor_category),
            submitted_price_list_rows::education_code.eq(&row.education_code),
            submitted_price_list_rows::min_years_experience
                .eq(i32::from(row.min_years_experience)),
            submitted_price_list_rows::hourly_rate_year1.eq(row.hourly_rate_year1),
            submitted_price_list_rows::is_muted.eq(0),
        ))
        .execute(conn)?;

    Ok(sqlite::get_last_insert_rowid(conn)?)
}

/// Mutes or unmutes one price list row.
///
/// Muted rows stay on the submitted list but are skipped when the list
/// is approved. Toggling mute state on an already-approved list does
/// not touch its materialized contracts; the flag takes effect on the
/// next approval.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `row_id` - The row to mute or unmute
/// * `muted` - The desired mute state
///
/// # Returns
///
/// `true` if the row's mute state changed.
///
/// # Errors
///
/// Returns [`PersistenceError::NotFound`] if no such row exists, or a
/// database error.
pub fn set_price_list_row_muted(
    conn: &mut SqliteConnection,
    row_id: i64,
    muted: bool,
) -> Result<bool, PersistenceError> {
    let new_flag: i32 = i32::from(muted);

    let changed: usize = diesel::update(submitted_price_list_rows::table)
        .filter(submitted_price_list_rows::row_id.eq(row_id))
        .filter(submitted_price_list_rows::is_muted.ne(new_flag))
        .set(submitted_price_list_rows::is_muted.eq(new_flag))
        .execute(conn)?;

    if changed == 0 {
        let exists: Option<i64> = submitted_price_list_rows::table
            .filter(submitted_price_list_rows::row_id.eq(row_id))
            .select(submitted_price_list_rows::row_id)
            .first(conn)
            .optional()?;
        if exists.is_none() {
            return Err(PersistenceError::NotFound(format!(
                "Price list row {row_id}"
            )));
        }
        debug!(row_id, muted, "Row mute state unchanged; no-op");
        return Ok(false);
    }

    info!(row_id, muted, "Row mute state changed");
    Ok(true)
}

/// Queryable struct for the row fields needed during materialization.
#[derive(Queryable)]
struct RowForMaterialization {
    labor_category: String,
    education_code: Option<String>,
    min_years_experience: i32,
    hourly_rate_year1: f64,
}

/// Approves a price list, materializing its rows as contracts.
///
/// Idempotent: approving an already-approved list is a no-op reported
/// as `Ok(false)`. On an actual transition, every row of the list
/// becomes one contract attributed to the list, and the whole operation
/// commits atomically.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The price list to approve
///
/// # Returns
///
/// `true` if the list transitioned from unapproved to approved.
///
/// # Errors
///
/// Returns [`PersistenceError::PriceListNotFound`] for an unknown list,
/// [`PersistenceError::PriceListIncomplete`] when the business size is
/// still unanswered, or a database error.
pub fn approve_price_list(
    conn: &mut SqliteConnection,
    price_list_id: i64,
) -> Result<bool, PersistenceError> {
    conn.transaction::<bool, PersistenceError, _>(|conn| {
        let is_small_business: Option<Option<i32>> = submitted_price_lists::table
            .filter(submitted_price_lists::price_list_id.eq(price_list_id))
            .select(submitted_price_lists::is_small_business)
            .first(conn)
            .optional()?;

        let Some(flag) = is_small_business else {
            return Err(PersistenceError::PriceListNotFound(price_list_id));
        };
        let Some(flag) = flag else {
            return Err(PersistenceError::PriceListIncomplete { price_list_id });
        };
        let business_size: BusinessSize = if flag == 0 {
            BusinessSize::OtherThanSmall
        } else {
            BusinessSize::Small
        };

        let transitioned: usize = diesel::update(submitted_price_lists::table)
            .filter(submitted_price_lists::price_list_id.eq(price_list_id))
            .filter(submitted_price_lists::is_approved.eq(0))
            .set((
                submitted_price_lists::is_approved.eq(1),
                submitted_price_lists::approved_at.eq(diesel::dsl::sql::<
                    diesel::sql_types::Nullable<diesel::sql_types::Text>,
                >("CURRENT_TIMESTAMP")),
            ))
            .execute(conn)?;

        if transitioned == 0 {
            debug!(price_list_id, "Price list already approved; no-op");
            return Ok(false);
        }

        let rows: Vec<RowForMaterialization> = submitted_price_list_rows::table
            .filter(submitted_price_list_rows::price_list_id.eq(price_list_id))
            .filter(submitted_price_list_rows::is_muted.eq(0))
            .order(submitted_price_list_rows::row_id.asc())
            .select((
                submitted_price_list_rows::labor_category,
                submitted_price_list_rows::education_code,
                submitted_price_list_rows::min_years_experience,
                submitted_price_list_rows::hourly_rate_year1,
            ))
            .load(conn)?;

        for row in &rows {
            let fields: ContractFields = ContractFields {
                labor_category: row.labor_category.clone(),
                education_code: row.education_code.clone(),
                min_years_experience: row.min_years_experience.try_into().map_err(|_| {
                    PersistenceError::CorruptStoredValue {
                        column: String::from("min_years_experience"),
                        message: format!("value {} out of range", row.min_years_experience),
                    }
                })?,
                hourly_rate_year1: row.hourly_rate_year1,
                hourly_rate_year2: None,
                hourly_rate_year3: None,
                hourly_rate_year4: None,
                hourly_rate_year5: None,
                business_size,
            };
            insert_contract(conn, &fields, Some(price_list_id), None)?;
        }

        info!(
            price_list_id,
            contracts_created = rows.len(),
            "Price list approved"
        );
        Ok(true)
    })
}

/// Unapproves a price list, removing its materialized contracts.
///
/// Idempotent: unapproving an unapproved list is a no-op reported as
/// `Ok(false)`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The price list to unapprove
///
/// # Returns
///
/// `true` if the list transitioned from approved to unapproved.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn unapprove_price_list(
    conn: &mut SqliteConnection,
    price_list_id: i64,
) -> Result<bool, PersistenceError> {
    conn.transaction::<bool, PersistenceError, _>(|conn| {
        let transitioned: usize = diesel::update(submitted_price_lists::table)
            .filter(submitted_price_lists::price_list_id.eq(price_list_id))
            .filter(submitted_price_lists::is_approved.eq(1))
            .set((
                submitted_price_lists::is_approved.eq(0),
                submitted_price_lists::approved_at
                    .eq(None::<String>),
            ))
            .execute(conn)?;

        if transitioned == 0 {
            debug!(price_list_id, "Price list not approved; no-op");
            return Ok(false);
        }

        let removed: usize = diesel::delete(contracts::table)
            .filter(contracts::price_list_id.eq(price_list_id))
            .execute(conn)?;

        info!(
            price_list_id,
            contracts_removed = removed,
            "Price list unapproved"
        );
        Ok(true)
    })
}

/// Deletes a price list.
///
/// Owned rows and materialized contracts are removed by `ON DELETE
/// CASCADE`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The price list to delete
///
/// # Errors
///
/// Returns [`PersistenceError::PriceListNotFound`] if no such list
/// exists, or a database error.
pub fn delete_price_list(
    conn: &mut SqliteConnection,
    price_list_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(submitted_price_lists::table)
        .filter(submitted_price_lists::price_list_id.eq(price_list_id))
        .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::PriceListNotFound(price_list_id));
    }

    info!(price_list_id, "Price list deleted");
    Ok(())
}
