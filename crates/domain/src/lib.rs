// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod education;
mod error;
mod normalize;
mod text;
mod tsquery;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use education::{EDUCATION_CHOICES, get_education_code, get_education_label};
pub use error::DomainError;
pub use normalize::{BusinessSize, normalize_rate};
pub use text::tokenize;
pub use tsquery::TsQuery;

// Re-export public types
pub use types::{
    ContractFields, ContractorSite, PriceListDetails, PriceListRow, ProcurementCenter,
    UploadStatus,
};
pub use validation::{validate_price_list_details, validate_rows};
