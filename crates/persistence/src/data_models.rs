// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use calc_domain::{BusinessSize, PriceListDetails, PriceListRow, ProcurementCenter, UploadStatus};
use serde::{Deserialize, Serialize};

/// One persisted contract line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractData {
    /// The canonical numeric identifier assigned by the database.
    pub contract_id: i64,
    /// The free-text labor category.
    pub labor_category: String,
    /// The stored education code, if any.
    pub education_code: Option<String>,
    /// Minimum years of experience required.
    pub min_years_experience: u16,
    /// The base-year hourly rate.
    pub hourly_rate_year1: f64,
    /// Option-year hourly rate, if provided.
    pub hourly_rate_year2: Option<f64>,
    /// Option-year hourly rate, if provided.
    pub hourly_rate_year3: Option<f64>,
    /// Option-year hourly rate, if provided.
    pub hourly_rate_year4: Option<f64>,
    /// Option-year hourly rate, if provided.
    pub hourly_rate_year5: Option<f64>,
    /// The vendor's business size classification.
    pub business_size: BusinessSize,
    /// The derived search index value. Read-only outside persistence.
    pub search_index: String,
    /// The price list this contract was materialized from, if any.
    pub price_list_id: Option<i64>,
    /// The bulk upload source this contract was loaded from, if any.
    pub upload_source_id: Option<i64>,
}

/// One persisted submitted price list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListData {
    /// The canonical numeric identifier assigned by the database.
    pub price_list_id: i64,
    /// The vendor-level details.
    pub details: PriceListDetails,
    /// Whether the list has been approved.
    pub is_approved: bool,
    /// When the list was approved, if it has been.
    pub approved_at: Option<String>,
    /// When the list was created.
    pub created_at: String,
}

/// One persisted submitted price list row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListRowData {
    /// The canonical numeric identifier assigned by the database.
    pub row_id: i64,
    /// The owning price list.
    pub price_list_id: i64,
    /// The normalized row fields.
    pub row: PriceListRow,
    /// Whether the row is excluded from contract materialization.
    pub is_muted: bool,
}

/// One persisted bulk upload source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceData {
    /// The canonical numeric identifier assigned by the database.
    pub source_id: i64,
    /// The procurement center the source belongs to.
    pub procurement_center: ProcurementCenter,
    /// The identifier of the submitting user.
    pub submitter: String,
    /// The original uploaded file bytes, stored verbatim.
    pub original_file: Vec<u8>,
    /// The MIME type the file was uploaded with.
    pub file_mime_type: String,
    /// Whether the source has been loaded into contracts.
    pub has_been_loaded: bool,
    /// The ingestion lifecycle status.
    pub status: UploadStatus,
    /// Why processing failed, when `status` is `Failed`.
    pub failure_reason: Option<String>,
    /// When the source was received.
    pub created_at: String,
}
