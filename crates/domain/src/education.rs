// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Education level lookup table.
//!
//! Contracts store a short education code; submitted spreadsheets carry
//! the human-readable level name. The table is fixed and small, so both
//! directions are plain linear lookups.

/// The known education levels as `(code, readable name)` pairs.
pub const EDUCATION_CHOICES: &[(&str, &str)] = &[
    ("HS", "High School"),
    ("AA", "Associates"),
    ("BA", "Bachelors"),
    ("MA", "Masters"),
    ("PHD", "Ph.D."),
];

/// Looks up the stored code for a human-readable education level name.
///
/// The lookup is an explicit "no match" result rather than an error:
/// submitted spreadsheets routinely carry level names outside the table
/// (e.g. `"Nursing"`) and callers decide the fallback.
///
/// # Arguments
///
/// * `readable_name` - The human-readable level name, e.g. `"Bachelors"`
#[must_use]
pub fn get_education_code(readable_name: &str) -> Option<&'static str> {
    EDUCATION_CHOICES
        .iter()
        .find(|(_, name)| *name == readable_name)
        .map(|(code, _)| *code)
}

/// Looks up the human-readable name for a stored education code.
///
/// # Arguments
///
/// * `code` - The stored short code, e.g. `"BA"`
#[must_use]
pub fn get_education_label(code: &str) -> Option<&'static str> {
    EDUCATION_CHOICES
        .iter()
        .find(|(choice_code, _)| *choice_code == code)
        .map(|(_, name)| *name)
}
