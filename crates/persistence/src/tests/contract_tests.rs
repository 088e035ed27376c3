// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contract storage and the search index invariant.

use calc_domain::{BusinessSize, ContractFields};

use crate::data_models::ContractData;
use crate::error::PersistenceError;
use crate::tests::{contract_fields, make_persistence};
use crate::Persistence;

#[test]
fn test_insert_derives_search_index_from_labor_category() {
    let mut persistence: Persistence = make_persistence();

    let contract_id: i64 = persistence
        .insert_contract(&contract_fields("Sr. Software Engineer II"), None, None)
        .unwrap();

    let stored: ContractData = persistence.get_contract(contract_id).unwrap();
    assert_eq!(stored.search_index, "sr software engineer ii");
}

#[test]
fn test_stored_fields_round_trip() {
    let mut persistence: Persistence = make_persistence();

    let fields: ContractFields = ContractFields {
        labor_category: String::from("Program Manager"),
        education_code: Some(String::from("MA")),
        min_years_experience: 10,
        hourly_rate_year1: 180.25,
        hourly_rate_year2: Some(185.50),
        hourly_rate_year3: None,
        hourly_rate_year4: None,
        hourly_rate_year5: None,
        business_size: BusinessSize::OtherThanSmall,
    };
    let contract_id: i64 = persistence.insert_contract(&fields, None, None).unwrap();

    let stored: ContractData = persistence.get_contract(contract_id).unwrap();
    assert_eq!(stored.labor_category, "Program Manager");
    assert_eq!(stored.education_code.as_deref(), Some("MA"));
    assert_eq!(stored.min_years_experience, 10);
    assert!((stored.hourly_rate_year1 - 180.25).abs() < f64::EPSILON);
    assert_eq!(stored.hourly_rate_year2, Some(185.50));
    assert_eq!(stored.hourly_rate_year3, None);
    assert_eq!(stored.business_size, BusinessSize::OtherThanSmall);
    assert_eq!(stored.price_list_id, None);
    assert_eq!(stored.upload_source_id, None);
}

#[test]
fn test_updating_labor_category_recomputes_the_index() {
    let mut persistence: Persistence = make_persistence();
    let contract_id: i64 = persistence
        .insert_contract(&contract_fields("Junior Analyst"), None, None)
        .unwrap();

    persistence
        .update_contract_labor_category(contract_id, "Senior Consultant")
        .unwrap();

    let stored: ContractData = persistence.get_contract(contract_id).unwrap();
    assert_eq!(stored.labor_category, "Senior Consultant");
    assert_eq!(stored.search_index, "senior consultant");

    // The old text is no longer findable; the new text is.
    assert!(persistence.multi_phrase_search(&["analyst"]).unwrap().is_empty());
    assert_eq!(
        persistence.multi_phrase_search(&["consultant"]).unwrap().len(),
        1
    );
}

#[test]
fn test_updating_unknown_contract_fails() {
    let mut persistence: Persistence = make_persistence();

    let result: Result<(), PersistenceError> =
        persistence.update_contract_labor_category(42, "Anything");
    assert!(matches!(
        result,
        Err(PersistenceError::ContractNotFound(42))
    ));
}

#[test]
fn test_get_unknown_contract_fails() {
    let mut persistence: Persistence = make_persistence();

    assert!(matches!(
        persistence.get_contract(7),
        Err(PersistenceError::ContractNotFound(7))
    ));
}

#[test]
fn test_list_contracts_orders_by_id() {
    let mut persistence: Persistence = make_persistence();
    for category in ["Alpha", "Bravo", "Charlie"] {
        persistence
            .insert_contract(&contract_fields(category), None, None)
            .unwrap();
    }

    let contracts: Vec<ContractData> = persistence.list_contracts().unwrap();
    let ids: Vec<i64> = contracts.iter().map(|c| c.contract_id).collect();
    let mut sorted: Vec<i64> = ids.clone();
    sorted.sort_unstable();
    assert_eq!(ids, sorted);
    assert_eq!(contracts[0].labor_category, "Alpha");
}

#[test]
fn test_foreign_key_enforcement_is_on() {
    let mut persistence: Persistence = make_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());

    // An orphan attribution is rejected, not silently stored.
    let result: Result<i64, PersistenceError> =
        persistence.insert_contract(&contract_fields("Orphan"), Some(999), None);
    assert!(result.is_err());
}
