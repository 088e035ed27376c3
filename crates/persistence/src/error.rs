// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested contract was not found.
    ContractNotFound(i64),
    /// The requested price list was not found.
    PriceListNotFound(i64),
    /// The requested bulk upload source was not found.
    SourceNotFound(i64),
    /// A price list cannot be approved before its business size is answered.
    PriceListIncomplete {
        /// The incomplete price list's identifier.
        price_list_id: i64,
    },
    /// A stored value failed domain-level validation on the way out.
    CorruptStoredValue {
        /// The column the value came from.
        column: String,
        /// A description of the failure.
        message: String,
    },
    /// A domain rule was violated during a persistence operation.
    Domain(calc_domain::DomainError),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::ContractNotFound(id) => write!(f, "Contract not found: {id}"),
            Self::PriceListNotFound(id) => write!(f, "Price list not found: {id}"),
            Self::SourceNotFound(id) => write!(f, "Bulk upload source not found: {id}"),
            Self::PriceListIncomplete { price_list_id } => {
                write!(
                    f,
                    "Price list {price_list_id} cannot be approved: business size is unanswered"
                )
            }
            Self::CorruptStoredValue { column, message } => {
                write!(f, "Corrupt stored value in column '{column}': {message}")
            }
            Self::Domain(err) => write!(f, "{err}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<calc_domain::DomainError> for PersistenceError {
    fn from(err: calc_domain::DomainError) -> Self {
        Self::Domain(err)
    }
}
