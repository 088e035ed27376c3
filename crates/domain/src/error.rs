// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A rate string contained no parseable numeric value.
    RateParse {
        /// The raw input that failed to parse.
        raw: String,
    },
    /// A business size code was not one of the known codes.
    UnknownBusinessSize(String),
    /// A procurement center identifier was not recognized.
    InvalidProcurementCenter(String),
    /// An upload status string was not recognized.
    InvalidUploadStatus(String),
    /// An upload status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: crate::UploadStatus,
        /// The requested status.
        to: crate::UploadStatus,
    },
    /// A contractor site string was not recognized.
    InvalidContractorSite(String),
    /// Contract number is empty or invalid.
    InvalidContractNumber(String),
    /// Vendor name is empty or invalid.
    InvalidVendorName(String),
    /// Contract period is invalid (end precedes start).
    InvalidContractPeriod {
        /// The contract start date.
        start: time::Date,
        /// The contract end date.
        end: time::Date,
    },
    /// A submitted row has an empty labor category.
    EmptyLaborCategory {
        /// The 1-based row number within the submission.
        row_number: usize,
    },
    /// A submission contained no rows at all.
    NoRows,
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateParse { raw } => {
                write!(f, "Rate '{raw}' contains no parseable numeric value")
            }
            Self::UnknownBusinessSize(code) => {
                write!(f, "Unknown business size code: '{code}'")
            }
            Self::InvalidProcurementCenter(center) => {
                write!(f, "Unknown procurement center: '{center}'")
            }
            Self::InvalidUploadStatus(status) => {
                write!(f, "Unknown upload status: '{status}'")
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Upload status cannot transition from {from} to {to}")
            }
            Self::InvalidContractorSite(site) => {
                write!(f, "Unknown contractor site: '{site}'")
            }
            Self::InvalidContractNumber(msg) => {
                write!(f, "Invalid contract number: {msg}")
            }
            Self::InvalidVendorName(msg) => write!(f, "Invalid vendor name: {msg}"),
            Self::InvalidContractPeriod { start, end } => {
                write!(f, "Contract end date {end} precedes start date {start}")
            }
            Self::EmptyLaborCategory { row_number } => {
                write!(f, "Row {row_number} has an empty labor category")
            }
            Self::NoRows => write!(f, "Submission contains no rows"),
        }
    }
}

impl std::error::Error for DomainError {}
