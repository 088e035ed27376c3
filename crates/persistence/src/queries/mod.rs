// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only query modules.
//!
//! ## Module Organization
//!
//! - `contracts` — Contract retrieval and full-text search
//! - `price_lists` — Price list and row retrieval
//! - `sources` — Bulk upload source retrieval

pub mod contracts;
pub mod price_lists;
pub mod sources;

pub use contracts::{
    count_contracts_for_source, get_contract, list_contracts, multi_phrase_search,
    search_contracts,
};
pub use price_lists::{get_price_list, list_price_list_rows};
pub use sources::get_source;
