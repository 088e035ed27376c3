// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Pure validation rules for submitted price lists.

use crate::error::DomainError;
use crate::types::{PriceListDetails, PriceListRow};

/// Validates the vendor-level details of a submitted price list.
///
/// # Arguments
///
/// * `details` - The details to validate
///
/// # Errors
///
/// Returns an error if:
/// - The contract number is empty
/// - The vendor name is empty
/// - The contract end date precedes the start date
pub fn validate_price_list_details(details: &PriceListDetails) -> Result<(), DomainError> {
    if details.contract_number.trim().is_empty() {
        return Err(DomainError::InvalidContractNumber(String::from(
            "contract number cannot be empty",
        )));
    }

    if details.vendor_name.trim().is_empty() {
        return Err(DomainError::InvalidVendorName(String::from(
            "vendor name cannot be empty",
        )));
    }

    if details.contract_end < details.contract_start {
        return Err(DomainError::InvalidContractPeriod {
            start: details.contract_start,
            end: details.contract_end,
        });
    }

    Ok(())
}

/// Validates a gleaned row collection before anything is persisted.
///
/// # Arguments
///
/// * `rows` - The normalized rows gleaned from an upload
///
/// # Errors
///
/// Returns an error if the collection is empty or any row has an empty
/// labor category.
pub fn validate_rows(rows: &[PriceListRow]) -> Result<(), DomainError> {
    if rows.is_empty() {
        return Err(DomainError::NoRows);
    }

    for (idx, row) in rows.iter().enumerate() {
        if row.labor_category.trim().is_empty() {
            return Err(DomainError::EmptyLaborCategory {
                row_number: idx + 1,
            });
        }
    }

    Ok(())
}
