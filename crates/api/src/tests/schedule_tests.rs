// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spreadsheet converter tests.

use crate::schedules::{
    ConverterRegistry, GleanedRow, Region10SpreadsheetConverter, SpreadsheetConverter,
    SpreadsheetError, UploadMetadata,
};
use crate::tests::REGION_10_CSV;

#[test]
fn test_gleaning_preserves_raw_text() {
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    let rows: Vec<GleanedRow> = converter.glean(REGION_10_CSV.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].row_number, 1);
    assert_eq!(rows[0].labor_category, "Senior Analyst");
    assert_eq!(rows[0].education_level, "Bachelors");
    assert_eq!(rows[0].min_years_experience, "5");
    // Raw, unnormalized price text survives gleaning.
    assert_eq!(rows[0].price, "$1,000.00");
    assert_eq!(rows[0].business_size, "S");
    assert_eq!(rows[1].labor_category, "Sign Language Interpreter");
}

#[test]
fn test_headers_match_case_insensitively() {
    let csv: &str = "\
Contract Number,Vendor Name,Labor Category,Education Level,Min Years Experience,Price,Business Size
GS-1,Acme,Analyst,Bachelors,2,50.00,O
";
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    let rows: Vec<GleanedRow> = converter.glean(csv.as_bytes()).unwrap();
    assert_eq!(rows[0].labor_category, "Analyst");
}

#[test]
fn test_missing_column_is_reported_by_name() {
    let csv: &str = "contract_number,vendor_name,labor_category\nGS-1,Acme,Analyst\n";
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    let result = converter.glean(csv.as_bytes());
    match result {
        Err(SpreadsheetError::MissingColumn { name }) => {
            assert_eq!(name, "education_level");
        }
        other => panic!("expected MissingColumn, got {other:?}"),
    }
}

#[test]
fn test_header_only_file_has_no_data_rows() {
    let csv: &str = "\
contract_number,vendor_name,labor_category,education_level,min_years_experience,price,business_size
";
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    assert!(matches!(
        converter.glean(csv.as_bytes()),
        Err(SpreadsheetError::NoDataRows)
    ));
}

#[test]
fn test_empty_labor_category_names_the_row() {
    let csv: &str = "\
contract_number,vendor_name,labor_category,education_level,min_years_experience,price,business_size
GS-1,Acme,Analyst,Bachelors,2,50.00,O
GS-1,Acme,,Bachelors,2,60.00,O
";
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    match converter.glean(csv.as_bytes()) {
        Err(SpreadsheetError::Row { row_number, .. }) => assert_eq!(row_number, 2),
        other => panic!("expected Row error, got {other:?}"),
    }
}

#[test]
fn test_metadata_reads_the_first_row_and_counts_all() {
    let converter: Region10SpreadsheetConverter = Region10SpreadsheetConverter;

    let metadata: UploadMetadata = converter.metadata(REGION_10_CSV.as_bytes()).unwrap();
    assert_eq!(metadata.vendor_name, "Acme Staffing LLC");
    assert_eq!(metadata.contract_number, "GS-10F-0247K");
    assert_eq!(metadata.row_count, 2);
}

#[test]
fn test_registry_resolves_known_schedules_only() {
    let registry: ConverterRegistry = ConverterRegistry::standard();

    assert!(registry.find("Region 10").is_some());
    assert!(registry.find("Region 99").is_none());
    assert_eq!(registry.schedule_titles(), vec!["Region 10"]);
}
