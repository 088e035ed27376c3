// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submitted price list queries.

use diesel::prelude::*;
use num_traits::cast::ToPrimitive;
use std::str::FromStr;

use calc_domain::{ContractorSite, PriceListDetails, PriceListRow};

use crate::DATE_FORMAT;
use crate::data_models::{PriceListData, PriceListRowData};
use crate::diesel_schema::{submitted_price_list_rows, submitted_price_lists};
use crate::error::PersistenceError;

/// Diesel Queryable struct for price list rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = submitted_price_lists)]
struct PriceListQueryRow {
    price_list_id: i64,
    contract_number: String,
    vendor_name: String,
    is_small_business: Option<i32>,
    contractor_site: String,
    contract_year: i32,
    contract_start: String,
    contract_end: String,
    schedule: String,
    submitter: String,
    is_approved: i32,
    approved_at: Option<String>,
    created_at: String,
}

fn corrupt(column: &str, message: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::CorruptStoredValue {
        column: String::from(column),
        message: message.to_string(),
    }
}

fn parse_stored_date(column: &str, value: &str) -> Result<time::Date, PersistenceError> {
    time::Date::parse(value, DATE_FORMAT).map_err(|e| corrupt(column, e))
}

impl PriceListQueryRow {
    fn into_data(self) -> Result<PriceListData, PersistenceError> {
        let contract_year: u16 = self
            .contract_year
            .to_u16()
            .ok_or_else(|| corrupt("contract_year", "value out of range"))?;
        let contractor_site: ContractorSite = ContractorSite::from_str(&self.contractor_site)
            .map_err(|e| corrupt("contractor_site", e))?;

        Ok(PriceListData {
            price_list_id: self.price_list_id,
            details: PriceListDetails {
                contract_number: self.contract_number,
                vendor_name: self.vendor_name,
                is_small_business: self.is_small_business.map(|flag| flag != 0),
                contractor_site,
                contract_year,
                contract_start: parse_stored_date("contract_start", &self.contract_start)?,
                contract_end: parse_stored_date("contract_end", &self.contract_end)?,
                schedule: self.schedule,
                submitter: self.submitter,
            },
            is_approved: self.is_approved != 0,
            approved_at: self.approved_at,
            created_at: self.created_at,
        })
    }
}

/// Retrieves a submitted price list by ID.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The price list ID
///
/// # Errors
///
/// Returns [`PersistenceError::PriceListNotFound`] if no such list
/// exists, or a database error.
pub fn get_price_list(
    conn: &mut SqliteConnection,
    price_list_id: i64,
) -> Result<PriceListData, PersistenceError> {
    let row: PriceListQueryRow = submitted_price_lists::table
        .filter(submitted_price_lists::price_list_id.eq(price_list_id))
        .select(PriceListQueryRow::as_select())
        .first(conn)
        .optional()?
        .ok_or(PersistenceError::PriceListNotFound(price_list_id))?;

    row.into_data()
}

/// Lists the rows of a price list in insertion order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `price_list_id` - The owning price list ID
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_price_list_rows(
    conn: &mut SqliteConnection,
    price_list_id: i64,
) -> Result<Vec<PriceListRowData>, PersistenceError> {
    let rows: Vec<(i64, i64, String, Option<String>, i32, f64, i32)> =
        submitted_price_list_rows::table
            .filter(submitted_price_list_rows::price_list_id.eq(price_list_id))
            .order(submitted_price_list_rows::row_id.asc())
            .select((
                submitted_price_list_rows::row_id,
                submitted_price_list_rows::price_list_id,
                submitted_price_list_rows::labor_category,
                submitted_price_list_rows::education_code,
                submitted_price_list_rows::min_years_experience,
                submitted_price_list_rows::hourly_rate_year1,
                submitted_price_list_rows::is_muted,
            ))
            .load(conn)?;

    rows.into_iter()
        .map(
            |(row_id, price_list_id, labor_category, education_code, years, rate, muted)| {
                let min_years_experience: u16 = years
                    .to_u16()
                    .ok_or_else(|| corrupt("min_years_experience", "value out of range"))?;
                Ok(PriceListRowData {
                    row_id,
                    price_list_id,
                    row: PriceListRow {
                        labor_category,
                        education_code,
                        min_years_experience,
                        hourly_rate_year1: rate,
                    },
                    is_muted: muted != 0,
                })
            },
        )
        .collect()
}
