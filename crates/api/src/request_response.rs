// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs.
//!
//! These types are the service contract. They are distinct from domain
//! types: dates and enums travel as strings and are parsed explicitly
//! at the handler boundary.

use serde::{Deserialize, Serialize};

use calc_persistence::ContractData;

/// Actor identification carried on every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorFields {
    /// The requesting actor's identifier, absent for anonymous calls.
    #[serde(default)]
    pub actor_id: Option<String>,
    /// The requesting actor's role, absent for anonymous calls.
    #[serde(default)]
    pub actor_role: Option<String>,
}

/// Request to submit a price list through the manual upload wizard.
///
/// Carries the wizard's step 1 inputs (schedule and file) and step 3
/// inputs (vendor-level details) in one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePriceListRequest {
    /// Actor identification.
    #[serde(flatten)]
    pub actor: ActorFields,
    /// The schedule title selected in step 1.
    pub schedule: String,
    /// The uploaded price list file contents (CSV text).
    pub file_contents: String,
    /// The GSA contract number.
    pub contract_number: String,
    /// The vendor's name.
    pub vendor_name: String,
    /// Whether the vendor is a small business; `null` means unanswered.
    #[serde(default)]
    pub is_small_business: Option<bool>,
    /// Where work is performed: `customer`, `contractor`, or `both`.
    pub contractor_site: String,
    /// The current contract year (1-based).
    pub contract_year: u16,
    /// The contract period start date (ISO 8601).
    pub contract_start: String,
    /// The contract period end date (ISO 8601).
    pub contract_end: String,
}

/// Response for a successful price list submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePriceListResponse {
    /// The created draft price list's identifier.
    pub price_list_id: i64,
    /// How many rows the submission carried.
    pub row_count: usize,
}

/// Request to approve or unapprove a batch of price lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    /// Actor identification.
    #[serde(flatten)]
    pub actor: ActorFields,
    /// The price lists to transition.
    pub price_list_ids: Vec<i64>,
}

/// Response reporting how many price lists actually transitioned.
///
/// Already-transitioned lists are skipped silently, so the count can be
/// lower than the number of ids in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalResponse {
    /// How many lists changed state in this call.
    pub transitioned: usize,
}

/// One search phrase as it arrives from the wire.
///
/// A query parameter may repeat, so a phrase input is either a single
/// string or a list of strings. Anything else is rejected at the
/// boundary as invalid query input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PhraseInput {
    /// One phrase.
    Single(String),
    /// Several phrases, matched as alternatives.
    Many(Vec<String>),
}

impl PhraseInput {
    /// Flattens the input into a phrase list.
    #[must_use]
    pub fn into_phrases(self) -> Vec<String> {
        match self {
            Self::Single(phrase) => vec![phrase],
            Self::Many(phrases) => phrases,
        }
    }
}

/// One contract in a search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSummary {
    /// The contract's identifier.
    pub contract_id: i64,
    /// The labor category.
    pub labor_category: String,
    /// The stored education code, if any.
    pub education_code: Option<String>,
    /// Minimum years of experience required.
    pub min_years_experience: u16,
    /// The base-year hourly rate.
    pub hourly_rate_year1: f64,
    /// The vendor's business size code (`O` or `S`).
    pub business_size: String,
}

impl From<ContractData> for ContractSummary {
    fn from(contract: ContractData) -> Self {
        Self {
            contract_id: contract.contract_id,
            labor_category: contract.labor_category,
            education_code: contract.education_code,
            min_years_experience: contract.min_years_experience,
            hourly_rate_year1: contract.hourly_rate_year1,
            business_size: String::from(contract.business_size.as_code()),
        }
    }
}

/// Response for a contract search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Matching contracts, ordered by contract id ascending.
    pub results: Vec<ContractSummary>,
}

/// Request to receive a bulk upload source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadRequest {
    /// Actor identification.
    #[serde(flatten)]
    pub actor: ActorFields,
    /// The uploaded file contents (CSV text).
    pub file_contents: String,
    /// The MIME type the file was uploaded with.
    #[serde(default = "default_mime_type")]
    pub file_mime_type: String,
}

fn default_mime_type() -> String {
    String::from("text/csv")
}

/// Response for a received bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkUploadResponse {
    /// The stored source's identifier.
    pub source_id: i64,
}

/// Response for a bulk upload metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadataResponse {
    /// The source's identifier.
    pub source_id: i64,
    /// The vendor name found in the file.
    pub vendor_name: String,
    /// The contract number found in the file.
    pub contract_number: String,
    /// How many data rows the file carries.
    pub row_count: usize,
}

/// Response for a confirmed bulk upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmUploadResponse {
    /// The source's identifier.
    pub source_id: i64,
    /// An opaque identifier for the queued processing job.
    pub job_id: String,
}

/// Response describing a bulk upload source's current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatusResponse {
    /// The source's identifier.
    pub source_id: i64,
    /// The lifecycle status name.
    pub status: String,
    /// Whether the source's rows have been loaded into contracts.
    pub has_been_loaded: bool,
    /// Why processing failed, when the status is `Failed`.
    pub failure_reason: Option<String>,
    /// How many contracts this source has loaded.
    pub contracts_loaded: i64,
}
