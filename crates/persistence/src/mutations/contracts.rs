// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contract mutations and search-index maintenance.
//!
//! The `search_index` column is written exclusively here: every insert
//! and every labor-category update recomputes it from the category text
//! in the same statement, so the index can never go stale.

use diesel::prelude::*;
use tracing::{debug, info};

use calc_domain::{ContractFields, tokenize};

use crate::diesel_schema::contracts;
use crate::error::PersistenceError;
use crate::sqlite;

/// Derives the stored search index value for a labor category.
///
/// The index is the space-joined token form of the category; queries
/// split it back into tokens for prefix evaluation.
pub(crate) fn index_value(labor_category: &str) -> String {
    tokenize(labor_category).join(" ")
}

/// Inserts a new contract, deriving its search index.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `fields` - The normalized contract fields
/// * `price_list_id` - The owning price list, for approved submissions
/// * `upload_source_id` - The owning bulk source, for bulk loads
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_contract(
    conn: &mut SqliteConnection,
    fields: &ContractFields,
    price_list_id: Option<i64>,
    upload_source_id: Option<i64>,
) -> Result<i64, PersistenceError> {
    debug!(
        labor_category = %fields.labor_category,
        "Inserting contract"
    );

    diesel::insert_into(contracts::table)
        .values((
            contracts::labor_category.eq(&fields.labor_category),
            contracts::education_code.eq(&fields.education_code),
            contracts::min_years_experience.eq(i32::from(fields.min_years_experience)),
            contracts::hourly_rate_year1.eq(fields.hourly_rate_year1),
            contracts::hourly_rate_year2.eq(fields.hourly_rate_year2),
            contracts::hourly_rate_year3.eq(fields.hourly_rate_year3),
            contracts::hourly_rate_year4.eq(fields.hourly_rate_year4),
            contracts::hourly_rate_year5.eq(fields.hourly_rate_year5),
            contracts::business_size.eq(fields.business_size.as_code()),
            contracts::search_index.eq(index_value(&fields.labor_category)),
            contracts::price_list_id.eq(price_list_id),
            contracts::upload_source_id.eq(upload_source_id),
        ))
        .execute(conn)?;

    let contract_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    info!(contract_id, "Contract inserted");
    Ok(contract_id)
}

/// Updates a contract's labor category, recomputing its search index.
///
/// There is deliberately no way to update `search_index` on its own.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `contract_id` - The contract to update
/// * `labor_category` - The new labor category text
///
/// # Errors
///
/// Returns [`PersistenceError::ContractNotFound`] if no such contract
/// exists, or a database error if the update fails.
pub fn update_contract_labor_category(
    conn: &mut SqliteConnection,
    contract_id: i64,
    labor_category: &str,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(contracts::table)
        .filter(contracts::contract_id.eq(contract_id))
        .set((
            contracts::labor_category.eq(labor_category),
            contracts::search_index.eq(index_value(labor_category)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::ContractNotFound(contract_id));
    }

    info!(contract_id, "Contract labor category updated");
    Ok(())
}
