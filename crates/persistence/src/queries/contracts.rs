// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contract retrieval and full-text search.
//!
//! Search evaluates compiled [`TsQuery`] values against each contract's
//! stored `search_index`, ordered by contract id ascending. Ordering is
//! deterministic by construction: there is no relevance score.

use diesel::prelude::*;
use num_traits::cast::ToPrimitive;
use std::str::FromStr;
use tracing::debug;

use calc_domain::{BusinessSize, TsQuery};

use crate::data_models::ContractData;
use crate::diesel_schema::contracts;
use crate::error::PersistenceError;

/// Diesel Queryable struct for contract rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = contracts)]
struct ContractRow {
    contract_id: i64,
    labor_category: String,
    education_code: Option<String>,
    min_years_experience: i32,
    hourly_rate_year1: f64,
    hourly_rate_year2: Option<f64>,
    hourly_rate_year3: Option<f64>,
    hourly_rate_year4: Option<f64>,
    hourly_rate_year5: Option<f64>,
    business_size: String,
    search_index: String,
    price_list_id: Option<i64>,
    upload_source_id: Option<i64>,
}

impl ContractRow {
    fn into_data(self) -> Result<ContractData, PersistenceError> {
        let min_years_experience: u16 = self.min_years_experience.to_u16().ok_or_else(|| {
            PersistenceError::CorruptStoredValue {
                column: String::from("min_years_experience"),
                message: format!("value {} out of range", self.min_years_experience),
            }
        })?;
        let business_size: BusinessSize =
            BusinessSize::from_str(&self.business_size).map_err(|e| {
                PersistenceError::CorruptStoredValue {
                    column: String::from("business_size"),
                    message: e.to_string(),
                }
            })?;

        Ok(ContractData {
            contract_id: self.contract_id,
            labor_category: self.labor_category,
            education_code: self.education_code,
            min_years_experience,
            hourly_rate_year1: self.hourly_rate_year1,
            hourly_rate_year2: self.hourly_rate_year2,
            hourly_rate_year3: self.hourly_rate_year3,
            hourly_rate_year4: self.hourly_rate_year4,
            hourly_rate_year5: self.hourly_rate_year5,
            business_size,
            search_index: self.search_index,
            price_list_id: self.price_list_id,
            upload_source_id: self.upload_source_id,
        })
    }
}

/// Retrieves a contract by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `contract_id` - The contract ID
///
/// # Errors
///
/// Returns [`PersistenceError::ContractNotFound`] if no such contract
/// exists, or a database error.
pub fn get_contract(
    conn: &mut SqliteConnection,
    contract_id: i64,
) -> Result<ContractData, PersistenceError> {
    let row: ContractRow = contracts::table
        .filter(contracts::contract_id.eq(contract_id))
        .select(ContractRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::ContractNotFound(contract_id))?;

    row.into_data()
}

/// Lists every contract, ordered by id ascending.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_contracts(conn: &mut SqliteConnection) -> Result<Vec<ContractData>, PersistenceError> {
    let rows: Vec<ContractRow> = contracts::table
        .order(contracts::contract_id.asc())
        .select(ContractRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ContractRow::into_data).collect()
}

/// Evaluates a structured query directly against the search index.
///
/// This is the low-level escape hatch: callers hand in an already
/// compiled [`TsQuery`] and get matching contracts back in id order.
/// An empty query matches nothing.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `query` - The compiled query
///
/// # Errors
///
/// Returns an error if the underlying query fails.
pub fn search_contracts(
    conn: &mut SqliteConnection,
    query: &TsQuery,
) -> Result<Vec<ContractData>, PersistenceError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let rows: Vec<ContractRow> = contracts::table
        .order(contracts::contract_id.asc())
        .select(ContractRow::as_select())
        .load(conn)?;

    debug!(query = %query, candidates = rows.len(), "Evaluating contract search");

    rows.into_iter()
        .filter(|row| query.matches_index(&row.search_index))
        .map(ContractRow::into_data)
        .collect()
}

/// Searches contracts by one or more free-text phrases.
///
/// Phrases are compiled with the query compiler (AND within a phrase,
/// OR across phrases, prefix tokens). Phrases with no alphanumeric
/// content compile away; if nothing is left the result is an empty
/// sequence, never an error.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `phrases` - The search phrases
///
/// # Errors
///
/// Returns an error if the underlying query fails.
pub fn multi_phrase_search<S: AsRef<str>>(
    conn: &mut SqliteConnection,
    phrases: &[S],
) -> Result<Vec<ContractData>, PersistenceError> {
    let query: TsQuery = TsQuery::compile(phrases);
    search_contracts(conn, &query)
}

/// Counts the contracts loaded from a bulk upload source.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `source_id` - The bulk upload source ID
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_contracts_for_source(
    conn: &mut SqliteConnection,
    source_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(contracts::table
        .filter(contracts::upload_source_id.eq(source_id))
        .count()
        .get_result(conn)?)
}
