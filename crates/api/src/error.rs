// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the application service layer.

use calc_domain::DomainError;
use calc_persistence::PersistenceError;

use crate::schedules::SpreadsheetError;

/// Authentication and authorization errors.
///
/// The two variants are deliberately distinct: a request with no actor
/// at all gets `AuthenticationRequired`, while an authenticated actor
/// whose role lacks the needed grant gets `Forbidden`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authenticated actor was supplied.
    AuthenticationRequired {
        /// The action that was attempted.
        action: String,
    },
    /// The actor is authenticated but lacks the required permission.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        permission: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired { action } => {
                write!(f, "Authentication required for '{action}'")
            }
            Self::Forbidden { action, permission } => {
                write!(f, "Forbidden: '{action}' requires the {permission} permission")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// Application-level errors.
///
/// These are distinct from domain and persistence errors and represent
/// the service contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No authenticated actor was supplied.
    AuthenticationRequired {
        /// The action that was attempted.
        action: String,
    },
    /// The actor is authenticated but lacks the required permission.
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// The permission required for this action.
        permission: String,
    },
    /// A search query was structurally invalid.
    InvalidQueryInput {
        /// A human-readable description of the problem.
        message: String,
    },
    /// Submitted data failed validation.
    ValidationError {
        /// The field or input that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Processing of an accepted submission failed.
    ProcessingFailure {
        /// A description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationRequired { action } => {
                write!(f, "Authentication required for '{action}'")
            }
            Self::Forbidden { action, permission } => {
                write!(f, "Forbidden: '{action}' requires the {permission} permission")
            }
            Self::InvalidQueryInput { message } => {
                write!(f, "Invalid query input: {message}")
            }
            Self::ValidationError { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::ProcessingFailure { message } => {
                write!(f, "Processing failed: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationRequired { action } => Self::AuthenticationRequired { action },
            AuthError::Forbidden { action, permission } => Self::Forbidden { action, permission },
        }
    }
}

impl From<SpreadsheetError> for ApiError {
    fn from(err: SpreadsheetError) -> Self {
        Self::ValidationError {
            field: String::from("file"),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// The translation is explicit so domain errors are never leaked
/// directly across the service boundary.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::RateParse { raw } => ApiError::ValidationError {
            field: String::from("price"),
            message: format!("Rate '{raw}' contains no parseable numeric value"),
        },
        DomainError::UnknownBusinessSize(code) => ApiError::ValidationError {
            field: String::from("business_size"),
            message: format!("Unknown business size code: '{code}'"),
        },
        DomainError::InvalidProcurementCenter(center) => ApiError::ValidationError {
            field: String::from("procurement_center"),
            message: format!("Unknown procurement center: '{center}'"),
        },
        DomainError::InvalidUploadStatus(status) => ApiError::Internal {
            message: format!("Unknown upload status: '{status}'"),
        },
        DomainError::InvalidStatusTransition { from, to } => ApiError::ValidationError {
            field: String::from("status"),
            message: format!("Upload cannot move from {from} to {to}"),
        },
        DomainError::InvalidContractorSite(site) => ApiError::ValidationError {
            field: String::from("contractor_site"),
            message: format!("Unknown contractor site: '{site}'"),
        },
        DomainError::InvalidContractNumber(msg) => ApiError::ValidationError {
            field: String::from("contract_number"),
            message: msg,
        },
        DomainError::InvalidVendorName(msg) => ApiError::ValidationError {
            field: String::from("vendor_name"),
            message: msg,
        },
        DomainError::InvalidContractPeriod { start, end } => ApiError::ValidationError {
            field: String::from("contract_period"),
            message: format!("Contract end {end} precedes start {start}"),
        },
        DomainError::EmptyLaborCategory { row_number } => ApiError::ValidationError {
            field: String::from("labor_category"),
            message: format!("Row {row_number} has an empty labor category"),
        },
        DomainError::NoRows => ApiError::ValidationError {
            field: String::from("rows"),
            message: String::from("The submission contains no rows"),
        },
    }
}

/// Translates a persistence error into an API error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::ContractNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Contract"),
            message: format!("Contract {id} does not exist"),
        },
        PersistenceError::PriceListNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Price list"),
            message: format!("Price list {id} does not exist"),
        },
        PersistenceError::SourceNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Bulk upload"),
            message: format!("Bulk upload {id} does not exist"),
        },
        PersistenceError::PriceListIncomplete { price_list_id } => ApiError::ValidationError {
            field: String::from("is_small_business"),
            message: format!(
                "Price list {price_list_id} has not answered the small business question"
            ),
        },
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
