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
    clippy::all
)]

//! Application service layer for CALC Data Capture.
//!
//! This crate sits between the HTTP server and persistence. Handlers
//! authorize the actor, translate request DTOs into domain types, drive
//! the persistence adapter, and dispatch notices for the transitions
//! that actually happened.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod request_response;
pub mod schedules;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, Permission, PermissionMap, Role, authorize};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use request_response::{
    ActorFields, ApprovalRequest, ApprovalResponse, BulkUploadRequest, BulkUploadResponse,
    ConfirmUploadResponse, ContractSummary, CreatePriceListRequest, CreatePriceListResponse,
    PhraseInput, SearchResponse, SourceStatusResponse, UploadMetadataResponse,
};
pub use schedules::{
    ConverterRegistry, GleanedRow, Region10SpreadsheetConverter, SpreadsheetConverter,
    SpreadsheetError, UploadMetadata,
};
