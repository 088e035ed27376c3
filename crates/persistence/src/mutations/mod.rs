// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the
//! persistence layer. All mutations use Diesel DSL; the only raw SQL is
//! the `last_insert_rowid()` helper from the `sqlite` module.
//!
//! ## Module Organization
//!
//! - `contracts` — Contract inserts and search-index maintenance
//! - `price_lists` — Price list creation, rows, approve/unapprove
//! - `sources` — Bulk upload source creation and lifecycle flags

pub mod contracts;
pub mod price_lists;
pub mod sources;

pub use contracts::{insert_contract, update_contract_labor_category};
pub use price_lists::{
    add_price_list_row, approve_price_list, create_price_list, delete_price_list,
    set_price_list_row_muted, unapprove_price_list,
};
pub use sources::{
    create_source, load_source_contracts, mark_source_failed, update_source_status,
};
