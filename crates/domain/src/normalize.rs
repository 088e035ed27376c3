// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level normalization applied to raw submitted rows.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Business size classification of a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessSize {
    /// Code `O`: other than small business.
    OtherThanSmall,
    /// Code `S`: small business.
    Small,
}

impl BusinessSize {
    /// Converts this business size to its stored single-letter code.
    #[must_use]
    pub const fn as_code(&self) -> &'static str {
        match self {
            Self::OtherThanSmall => "O",
            Self::Small => "S",
        }
    }

    /// Returns the human-readable label for this business size.
    #[must_use]
    pub const fn readable(&self) -> &'static str {
        match self {
            Self::OtherThanSmall => "other than small business",
            Self::Small => "small business",
        }
    }
}

impl FromStr for BusinessSize {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "O" => Ok(Self::OtherThanSmall),
            "S" => Ok(Self::Small),
            _ => Err(DomainError::UnknownBusinessSize(s.to_string())),
        }
    }
}

impl std::fmt::Display for BusinessSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Normalizes a raw rate string into a floating-point hourly rate.
///
/// Currency symbols and thousands separators are stripped, as is any
/// trailing punctuation left over from spreadsheet exports, so
/// `"$1,000.00,"` parses to `1000.0`. An already-clean numeric string
/// round-trips unchanged.
///
/// # Arguments
///
/// * `raw` - The raw rate cell value
///
/// # Errors
///
/// Returns [`DomainError::RateParse`] when the input contains no
/// parseable numeric value.
pub fn normalize_rate(raw: &str) -> Result<f64, DomainError> {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned: &str = stripped.trim_end_matches(|c: char| !c.is_ascii_digit());

    cleaned
        .parse::<f64>()
        .map_err(|_| DomainError::RateParse {
            raw: raw.to_string(),
        })
}
