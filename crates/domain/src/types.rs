// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::normalize::BusinessSize;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents the lifecycle state of a bulk upload source.
///
/// Explicit lifecycle states govern what the ingestion pipeline may do
/// with a stored source. `Loaded` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum UploadStatus {
    /// Initial state after the raw file is persisted.
    #[default]
    Received,
    /// Metadata has been extracted and shown for confirmation.
    MetadataExtracted,
    /// The source has been handed to the background worker queue.
    Queued,
    /// The worker is converting rows.
    Processing,
    /// All rows were converted and committed. Terminal.
    Loaded,
    /// Processing failed permanently. Terminal.
    Failed,
}

impl FromStr for UploadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Received" => Ok(Self::Received),
            "MetadataExtracted" => Ok(Self::MetadataExtracted),
            "Queued" => Ok(Self::Queued),
            "Processing" => Ok(Self::Processing),
            "Loaded" => Ok(Self::Loaded),
            "Failed" => Ok(Self::Failed),
            _ => Err(DomainError::InvalidUploadStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl UploadStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::MetadataExtracted => "MetadataExtracted",
            Self::Queued => "Queued",
            Self::Processing => "Processing",
            Self::Loaded => "Loaded",
            Self::Failed => "Failed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Received → `MetadataExtracted`
    /// - `MetadataExtracted` → Queued
    /// - Queued → Processing
    /// - Processing → Loaded
    /// - Processing → Failed
    ///
    /// Metadata extraction is idempotent, so
    /// `MetadataExtracted` → `MetadataExtracted` is also permitted.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Received, Self::MetadataExtracted)
                | (Self::MetadataExtracted, Self::MetadataExtracted | Self::Queued)
                | (Self::Queued, Self::Processing)
                | (Self::Processing, Self::Loaded | Self::Failed)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Loaded | Self::Failed)
    }
}

/// A procurement center whose bulk spreadsheets we accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcurementCenter {
    /// GSA Region 10.
    Region10,
}

impl ProcurementCenter {
    /// Converts this center to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Region10 => "Region 10",
        }
    }
}

impl FromStr for ProcurementCenter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Region 10" => Ok(Self::Region10),
            _ => Err(DomainError::InvalidProcurementCenter(s.to_string())),
        }
    }
}

impl std::fmt::Display for ProcurementCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the work on a contract is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContractorSite {
    /// Work is performed at the customer site.
    Customer,
    /// Work is performed at the contractor site.
    Contractor,
    /// Work is split across both sites.
    Both,
}

impl ContractorSite {
    /// Converts this site to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Contractor => "Contractor",
            Self::Both => "Both",
        }
    }
}

impl FromStr for ContractorSite {
    type Err = DomainError;

    // Submitted forms are not consistent about capitalization, so the
    // parse is case-insensitive; storage always uses `as_str`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Self::Customer),
            "contractor" => Ok(Self::Contractor),
            "both" => Ok(Self::Both),
            _ => Err(DomainError::InvalidContractorSite(s.to_string())),
        }
    }
}

impl std::fmt::Display for ContractorSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The vendor-level details of one submitted price list.
///
/// `is_small_business` is deliberately tri-state: a draft created during
/// the upload wizard may not have answered the question yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListDetails {
    /// The GSA contract number, e.g. `GS-10F-0247K`.
    pub contract_number: String,
    /// The vendor's legal name.
    pub vendor_name: String,
    /// Whether the vendor is a small business. `None` means unanswered.
    pub is_small_business: Option<bool>,
    /// Where the contracted work is performed.
    pub contractor_site: ContractorSite,
    /// The current option year of the contract.
    pub contract_year: u16,
    /// The contract period start date.
    pub contract_start: time::Date,
    /// The contract period end date.
    pub contract_end: time::Date,
    /// The schedule the price list was submitted under.
    pub schedule: String,
    /// The identifier of the submitting user.
    pub submitter: String,
}

/// One normalized row of a submitted price list.
///
/// Field values have already been through the row normalizer: the rate
/// is numeric and the education level has been resolved against the
/// lookup table (or explicitly found to have no match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListRow {
    /// The free-text labor category.
    pub labor_category: String,
    /// The resolved education code, if the level name had a match.
    pub education_code: Option<String>,
    /// Minimum years of experience required.
    pub min_years_experience: u16,
    /// The base-year hourly rate.
    pub hourly_rate_year1: f64,
}

/// The normalized fields of one contract line item, ready for persistence.
///
/// The `search_index` is not part of this struct: it is derived from
/// `labor_category` inside the persistence layer and never supplied by
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractFields {
    /// The free-text labor category.
    pub labor_category: String,
    /// The stored education code, if any.
    pub education_code: Option<String>,
    /// Minimum years of experience required.
    pub min_years_experience: u16,
    /// The base-year hourly rate.
    pub hourly_rate_year1: f64,
    /// Option-year rates, where the spreadsheet provided them.
    pub hourly_rate_year2: Option<f64>,
    /// Option-year rates, where the spreadsheet provided them.
    pub hourly_rate_year3: Option<f64>,
    /// Option-year rates, where the spreadsheet provided them.
    pub hourly_rate_year4: Option<f64>,
    /// Option-year rates, where the spreadsheet provided them.
    pub hourly_rate_year5: Option<f64>,
    /// The vendor's business size classification.
    pub business_size: BusinessSize,
}
