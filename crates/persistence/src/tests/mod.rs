// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence integration tests.
//!
//! Every test gets its own in-memory database from
//! [`Persistence::new_in_memory`], so tests run in parallel without
//! interference.

mod contract_tests;

use time::macros::date;

use calc_domain::{
    BusinessSize, ContractFields, ContractorSite, PriceListDetails, PriceListRow,
};

use crate::Persistence;

/// Creates a fresh in-memory persistence adapter.
fn make_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

/// Builds contract fields for the given labor category with fixed rates.
fn contract_fields(labor_category: &str) -> ContractFields {
    ContractFields {
        labor_category: String::from(labor_category),
        education_code: Some(String::from("BA")),
        min_years_experience: 5,
        hourly_rate_year1: 100.0,
        hourly_rate_year2: None,
        hourly_rate_year3: None,
        hourly_rate_year4: None,
        hourly_rate_year5: None,
        business_size: BusinessSize::Small,
    }
}

/// Builds valid vendor-level details for a submitted price list.
fn price_list_details() -> PriceListDetails {
    PriceListDetails {
        contract_number: String::from("GS-12F-1234"),
        vendor_name: String::from("Acme Staffing LLC"),
        is_small_business: Some(true),
        contractor_site: ContractorSite::Both,
        contract_year: 1,
        contract_start: date!(2026 - 01 - 01),
        contract_end: date!(2030 - 12 - 31),
        schedule: String::from("Professional Services"),
        submitter: String::from("vendor@example.test"),
    }
}

/// Builds one normalized price list row.
fn price_list_row(labor_category: &str, rate: f64) -> PriceListRow {
    PriceListRow {
        labor_category: String::from(labor_category),
        education_code: Some(String::from("BA")),
        min_years_experience: 3,
        hourly_rate_year1: rate,
    }
}
