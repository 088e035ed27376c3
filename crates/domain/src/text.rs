// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Free-text tokenization for labor category strings.
//!
//! The same tokenizer is applied at index time (when a contract's
//! `search_index` is derived) and at query time (when phrases are
//! compiled), so the two sides always agree on word boundaries.

/// Tokenizes a free-text string into normalized search tokens.
///
/// Text is lowercased and split on every non-alphanumeric character.
/// Fragments that are empty after splitting (pure punctuation) are
/// discarded.
///
/// # Arguments
///
/// * `text` - The free-text input, e.g. a labor category or search phrase
///
/// # Returns
///
/// The normalized tokens in input order. An input with no alphanumeric
/// content yields an empty vector.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|fragment| !fragment.is_empty())
        .map(String::from)
        .collect()
}
