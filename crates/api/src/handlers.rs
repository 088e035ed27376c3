// Copyright (C) 2026 CALC Data Capture Developers
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application service handlers.
//!
//! Each handler authorizes the actor with an explicit [`authorize`]
//! call, parses request strings into domain types, drives persistence,
//! and sends notices only for transitions that actually happened.

use std::str::FromStr;
use tracing::{debug, info, warn};

use calc_domain::{
    BusinessSize, ContractFields, ContractorSite, PriceListDetails, PriceListRow,
    ProcurementCenter, UploadStatus, get_education_code, normalize_rate,
    validate_price_list_details, validate_rows,
};
use calc_notify::{Notice, NoticeKind, Notifier};
use calc_persistence::{Persistence, PriceListData, SourceData};

use crate::auth::{AuthenticatedActor, Permission, PermissionMap, Role, authorize};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    ActorFields, ApprovalRequest, ApprovalResponse, BulkUploadRequest, BulkUploadResponse,
    ContractSummary, CreatePriceListRequest, CreatePriceListResponse, PhraseInput, SearchResponse,
    SourceStatusResponse, UploadMetadataResponse,
};
use crate::schedules::{ConverterRegistry, GleanedRow, SpreadsheetConverter, UploadMetadata};

/// ISO date format used in request payloads.
const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Resolves request actor fields into an authenticated actor.
///
/// Absent fields mean an anonymous request, which is not an error here:
/// the authorization check decides whether anonymity is acceptable.
///
/// # Arguments
///
/// * `fields` - The actor fields from the request
///
/// # Errors
///
/// Returns a validation error when a role string is present but not a
/// known role.
pub fn resolve_actor(fields: &ActorFields) -> Result<Option<AuthenticatedActor>, ApiError> {
    match (&fields.actor_id, &fields.actor_role) {
        (Some(id), Some(role)) => {
            let role: Role = Role::from_str(role).map_err(|message| ApiError::ValidationError {
                field: String::from("actor_role"),
                message,
            })?;
            Ok(Some(AuthenticatedActor::new(id.clone(), role)))
        }
        _ => Ok(None),
    }
}

/// Parses an ISO date string from a request.
fn parse_date(field: &str, value: &str) -> Result<time::Date, ApiError> {
    time::Date::parse(value, DATE_FORMAT).map_err(|e| ApiError::ValidationError {
        field: String::from(field),
        message: format!("'{value}' is not a valid date: {e}"),
    })
}

/// Normalizes one gleaned row into a price list row.
///
/// The rate is cleaned with [`normalize_rate`]; the education level is
/// looked up in the fixed table, with unknown levels stored as absent
/// rather than rejected.
fn normalize_gleaned_row(row: &GleanedRow) -> Result<PriceListRow, ApiError> {
    let hourly_rate_year1: f64 = normalize_rate(&row.price).map_err(|err| {
        let base: ApiError = translate_domain_error(err);
        match base {
            ApiError::ValidationError { field, message } => ApiError::ValidationError {
                field,
                message: format!("row {}: {message}", row.row_number),
            },
            other => other,
        }
    })?;

    let min_years_experience: u16 =
        row.min_years_experience
            .trim()
            .parse()
            .map_err(|_| ApiError::ValidationError {
                field: String::from("min_years_experience"),
                message: format!(
                    "row {}: '{}' is not a whole number of years",
                    row.row_number, row.min_years_experience
                ),
            })?;

    Ok(PriceListRow {
        labor_category: row.labor_category.clone(),
        education_code: get_education_code(&row.education_level).map(String::from),
        min_years_experience,
        hourly_rate_year1,
    })
}

/// Submits a price list through the manual upload wizard.
///
/// The uploaded file is gleaned through the schedule's converter and
/// every row normalized before anything is persisted; a bad row rejects
/// the whole submission.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `registry` - The schedule converter registry
/// * `request` - The submission
///
/// # Errors
///
/// Returns an error when the actor lacks `UploadPriceLists`, the
/// schedule is unrecognized, the file gleans no rows, or validation
/// fails.
pub fn create_price_list(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    registry: &ConverterRegistry,
    request: &CreatePriceListRequest,
) -> Result<CreatePriceListResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(&request.actor)?;
    let actor: &AuthenticatedActor = authorize(
        permissions,
        actor.as_ref(),
        Permission::UploadPriceLists,
        "create_price_list",
    )?;

    let converter: &dyn SpreadsheetConverter =
        registry
            .find(&request.schedule)
            .ok_or_else(|| ApiError::ValidationError {
                field: String::from("schedule"),
                message: format!("Unrecognized schedule: '{}'", request.schedule),
            })?;

    let gleaned: Vec<GleanedRow> = converter.glean(request.file_contents.as_bytes())?;
    let rows: Vec<PriceListRow> = gleaned
        .iter()
        .map(normalize_gleaned_row)
        .collect::<Result<_, _>>()?;

    let contractor_site: ContractorSite =
        ContractorSite::from_str(&request.contractor_site).map_err(translate_domain_error)?;

    let details: PriceListDetails = PriceListDetails {
        contract_number: request.contract_number.clone(),
        vendor_name: request.vendor_name.clone(),
        is_small_business: request.is_small_business,
        contractor_site,
        contract_year: request.contract_year,
        contract_start: parse_date("contract_start", &request.contract_start)?,
        contract_end: parse_date("contract_end", &request.contract_end)?,
        schedule: request.schedule.clone(),
        submitter: actor.id.clone(),
    };

    validate_price_list_details(&details).map_err(translate_domain_error)?;
    validate_rows(&rows).map_err(translate_domain_error)?;

    let price_list_id: i64 = persistence
        .create_price_list(&details)
        .map_err(translate_persistence_error)?;
    for row in &rows {
        persistence
            .add_price_list_row(price_list_id, row)
            .map_err(translate_persistence_error)?;
    }

    info!(price_list_id, rows = rows.len(), submitter = %actor.id, "Price list submitted");
    Ok(CreatePriceListResponse {
        price_list_id,
        row_count: rows.len(),
    })
}

/// Approves a batch of price lists.
///
/// Already-approved lists are skipped; the response reports only actual
/// transitions, and exactly one notice goes out per actual transition.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `notifier` - The notice sender
/// * `request` - The ids to approve
///
/// # Errors
///
/// Returns an error when the actor lacks `ApprovePriceLists`, an id
/// does not exist, or a list cannot be approved.
pub fn approve_price_lists(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    notifier: &dyn Notifier,
    request: &ApprovalRequest,
) -> Result<ApprovalResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(&request.actor)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::ApprovePriceLists,
        "approve_price_lists",
    )?;

    let mut transitioned: usize = 0;
    for &price_list_id in &request.price_list_ids {
        let stored: PriceListData = persistence
            .get_price_list(price_list_id)
            .map_err(translate_persistence_error)?;
        let did_transition: bool = persistence
            .approve_price_list(price_list_id)
            .map_err(translate_persistence_error)?;
        if did_transition {
            transitioned += 1;
            send_notice(
                notifier,
                Notice::new(
                    stored.details.submitter,
                    NoticeKind::PriceListApproved { price_list_id },
                ),
            );
        }
    }

    info!(
        requested = request.price_list_ids.len(),
        transitioned, "Price list approval batch"
    );
    Ok(ApprovalResponse { transitioned })
}

/// Unapproves a batch of price lists.
///
/// The mirror of [`approve_price_lists`]: idempotent, counts actual
/// transitions, one notice per transition.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `notifier` - The notice sender
/// * `request` - The ids to unapprove
///
/// # Errors
///
/// Returns an error when the actor lacks `ApprovePriceLists` or an id
/// does not exist.
pub fn unapprove_price_lists(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    notifier: &dyn Notifier,
    request: &ApprovalRequest,
) -> Result<ApprovalResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(&request.actor)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::ApprovePriceLists,
        "unapprove_price_lists",
    )?;

    let mut transitioned: usize = 0;
    for &price_list_id in &request.price_list_ids {
        let stored: PriceListData = persistence
            .get_price_list(price_list_id)
            .map_err(translate_persistence_error)?;
        let did_transition: bool = persistence
            .unapprove_price_list(price_list_id)
            .map_err(translate_persistence_error)?;
        if did_transition {
            transitioned += 1;
            send_notice(
                notifier,
                Notice::new(
                    stored.details.submitter,
                    NoticeKind::PriceListUnapproved { price_list_id },
                ),
            );
        }
    }

    info!(
        requested = request.price_list_ids.len(),
        transitioned, "Price list unapproval batch"
    );
    Ok(ApprovalResponse { transitioned })
}

/// Searches contracts by free-text phrases.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `actor_fields` - Actor identification from the request
/// * `inputs` - The search phrase inputs (flattened, then ORed)
///
/// # Errors
///
/// Returns an error when the actor lacks `SearchContracts` or the
/// query fails.
pub fn search_contracts(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    actor_fields: &ActorFields,
    inputs: &[PhraseInput],
) -> Result<SearchResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(actor_fields)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::SearchContracts,
        "search_contracts",
    )?;

    let phrases: Vec<String> = inputs
        .iter()
        .cloned()
        .flat_map(PhraseInput::into_phrases)
        .collect();
    let results: Vec<ContractSummary> = persistence
        .multi_phrase_search(&phrases)
        .map_err(translate_persistence_error)?
        .into_iter()
        .map(ContractSummary::from)
        .collect();

    debug!(phrases = phrases.len(), matches = results.len(), "Contract search");
    Ok(SearchResponse { results })
}

/// Receives a bulk upload source for Region 10.
///
/// The file is gleaned once up front so an unreadable or empty file is
/// rejected before anything is persisted. The stored source keeps the
/// original bytes verbatim.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `registry` - The schedule converter registry
/// * `request` - The upload
///
/// # Errors
///
/// Returns an error when the actor lacks `BulkUploadContracts` or the
/// file fails gleaning.
pub fn receive_bulk_upload(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    registry: &ConverterRegistry,
    request: &BulkUploadRequest,
) -> Result<BulkUploadResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(&request.actor)?;
    let actor: &AuthenticatedActor = authorize(
        permissions,
        actor.as_ref(),
        Permission::BulkUploadContracts,
        "receive_bulk_upload",
    )?;

    let converter: &dyn SpreadsheetConverter = region_10_converter(registry)?;
    let gleaned: Vec<GleanedRow> = converter.glean(request.file_contents.as_bytes())?;

    let source_id: i64 = persistence
        .create_source(
            ProcurementCenter::Region10,
            &actor.id,
            request.file_contents.as_bytes(),
            &request.file_mime_type,
        )
        .map_err(translate_persistence_error)?;

    info!(source_id, rows = gleaned.len(), submitter = %actor.id, "Bulk upload received");
    Ok(BulkUploadResponse { source_id })
}

/// Extracts metadata from a stored bulk upload.
///
/// Read-only with respect to the file: the summary comes from the
/// stored bytes, and repeating the call returns the same summary. The
/// lifecycle status advances to `MetadataExtracted` the first time.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `registry` - The schedule converter registry
/// * `actor_fields` - Actor identification from the request
/// * `source_id` - The stored source to summarize
///
/// # Errors
///
/// Returns an error when the actor lacks `BulkUploadContracts`, the
/// source does not exist, or the stored bytes fail to parse.
pub fn extract_upload_metadata(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    registry: &ConverterRegistry,
    actor_fields: &ActorFields,
    source_id: i64,
) -> Result<UploadMetadataResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(actor_fields)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::BulkUploadContracts,
        "extract_upload_metadata",
    )?;

    let source: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;
    let converter: &dyn SpreadsheetConverter = region_10_converter(registry)?;
    let metadata: UploadMetadata = converter.metadata(&source.original_file)?;

    // First extraction advances the lifecycle; repeats are permitted
    // transitions, and later statuses are left alone.
    if matches!(
        source.status,
        UploadStatus::Received | UploadStatus::MetadataExtracted
    ) {
        persistence
            .update_source_status(source_id, source.status, UploadStatus::MetadataExtracted)
            .map_err(translate_persistence_error)?;
    }

    Ok(UploadMetadataResponse {
        source_id,
        vendor_name: metadata.vendor_name,
        contract_number: metadata.contract_number,
        row_count: metadata.row_count,
    })
}

/// Confirms a bulk upload for processing.
///
/// Transitions the source to `Queued`. The caller owns the job channel
/// and enqueues the returned source id; no row conversion happens here.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `actor_fields` - Actor identification from the request
/// * `source_id` - The source to confirm
///
/// # Errors
///
/// Returns an error when the actor lacks `BulkUploadContracts`, the
/// source does not exist, or it is not awaiting confirmation.
pub fn confirm_upload(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    actor_fields: &ActorFields,
    source_id: i64,
) -> Result<i64, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(actor_fields)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::BulkUploadContracts,
        "confirm_upload",
    )?;

    // Existence check first so an unknown id reports as not-found
    // rather than as a state conflict.
    let source: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;

    let queued: bool = persistence
        .update_source_status(source_id, UploadStatus::MetadataExtracted, UploadStatus::Queued)
        .map_err(translate_persistence_error)?;
    if !queued {
        return Err(ApiError::ValidationError {
            field: String::from("status"),
            message: format!(
                "Upload {source_id} is {} and cannot be confirmed",
                source.status
            ),
        });
    }

    info!(source_id, "Bulk upload confirmed and queued");
    Ok(source_id)
}

/// Describes a bulk upload source's current state.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `permissions` - The immutable grant map
/// * `actor_fields` - Actor identification from the request
/// * `source_id` - The source to describe
///
/// # Errors
///
/// Returns an error when the actor lacks `BulkUploadContracts` or the
/// source does not exist.
pub fn get_upload_status(
    persistence: &mut Persistence,
    permissions: &PermissionMap,
    actor_fields: &ActorFields,
    source_id: i64,
) -> Result<SourceStatusResponse, ApiError> {
    let actor: Option<AuthenticatedActor> = resolve_actor(actor_fields)?;
    authorize(
        permissions,
        actor.as_ref(),
        Permission::BulkUploadContracts,
        "get_upload_status",
    )?;

    let source: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;
    let contracts_loaded: i64 = persistence
        .count_contracts_for_source(source_id)
        .map_err(translate_persistence_error)?;

    Ok(SourceStatusResponse {
        source_id,
        status: String::from(source.status.as_str()),
        has_been_loaded: source.has_been_loaded,
        failure_reason: source.failure_reason,
        contracts_loaded,
    })
}

/// Processes one queued bulk upload. This is the worker body.
///
/// A source whose `has_been_loaded` flag is already set is skipped
/// entirely, making redelivery of a completed job harmless. Otherwise
/// every row is normalized before any contract is inserted, and the
/// batch insert commits in one transaction with the loaded flag: one
/// bad row fails the whole batch with nothing committed, so a retry
/// starts from a clean slate.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `registry` - The schedule converter registry
/// * `notifier` - The notice sender
/// * `source_id` - The source to process
///
/// # Returns
///
/// The number of contracts created, `0` for a skipped redelivery.
///
/// # Errors
///
/// Returns an error when the source does not exist, the stored bytes
/// fail to parse, or a row fails normalization. The caller decides
/// whether to retry or mark the source failed.
pub fn process_bulk_upload(
    persistence: &mut Persistence,
    registry: &ConverterRegistry,
    notifier: &dyn Notifier,
    source_id: i64,
) -> Result<usize, ApiError> {
    let source: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;

    if source.has_been_loaded {
        debug!(source_id, "Source already loaded; skipping redelivered job");
        return Ok(0);
    }

    // First attempt moves Queued to Processing; a retry is already in
    // Processing and the guard simply matches nothing.
    persistence
        .update_source_status(source_id, UploadStatus::Queued, UploadStatus::Processing)
        .map_err(translate_persistence_error)?;

    let converter: &dyn SpreadsheetConverter = region_10_converter(registry)?;
    let gleaned: Vec<GleanedRow> = converter.glean(&source.original_file)?;

    let mut batch: Vec<ContractFields> = Vec::with_capacity(gleaned.len());
    for row in &gleaned {
        let normalized: PriceListRow = normalize_gleaned_row(row)?;
        let business_size: BusinessSize =
            BusinessSize::from_str(row.business_size.trim()).map_err(|err| {
                let base: ApiError = translate_domain_error(err);
                match base {
                    ApiError::ValidationError { field, message } => ApiError::ValidationError {
                        field,
                        message: format!("row {}: {message}", row.row_number),
                    },
                    other => other,
                }
            })?;
        batch.push(ContractFields {
            labor_category: normalized.labor_category,
            education_code: normalized.education_code,
            min_years_experience: normalized.min_years_experience,
            hourly_rate_year1: normalized.hourly_rate_year1,
            hourly_rate_year2: None,
            hourly_rate_year3: None,
            hourly_rate_year4: None,
            hourly_rate_year5: None,
            business_size,
        });
    }

    let loaded_now: bool = persistence
        .load_source_contracts(source_id, &batch)
        .map_err(translate_persistence_error)?;
    if !loaded_now {
        // Lost a race with another delivery of the same job.
        debug!(source_id, "Source loaded concurrently; nothing inserted");
        return Ok(0);
    }

    send_notice(
        notifier,
        Notice::new(
            source.submitter,
            NoticeKind::BulkUploadSucceeded {
                source_id,
                center: source.procurement_center,
                contracts_created: batch.len(),
            },
        ),
    );

    info!(source_id, contracts_created = batch.len(), "Bulk upload processed");
    Ok(batch.len())
}

/// Marks a bulk upload permanently failed and sends the failure notice.
///
/// Called by the worker after its retry budget is exhausted. The notice
/// goes out only if the source actually moved to `Failed`; a source
/// that reached `Loaded` is never demoted and never mis-notified.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `notifier` - The notice sender
/// * `source_id` - The source that failed
/// * `reason` - A human-readable failure description
///
/// # Errors
///
/// Returns an error when the source does not exist or the update fails.
pub fn fail_bulk_upload(
    persistence: &mut Persistence,
    notifier: &dyn Notifier,
    source_id: i64,
    reason: &str,
) -> Result<(), ApiError> {
    let source: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;

    persistence
        .mark_source_failed(source_id, reason)
        .map_err(translate_persistence_error)?;

    let after: SourceData = persistence
        .get_source(source_id)
        .map_err(translate_persistence_error)?;
    if after.status == UploadStatus::Failed {
        send_notice(
            notifier,
            Notice::new(
                source.submitter,
                NoticeKind::BulkUploadFailed {
                    source_id,
                    center: source.procurement_center,
                    reason: String::from(reason),
                },
            ),
        );
    }
    Ok(())
}

fn region_10_converter(
    registry: &ConverterRegistry,
) -> Result<&dyn SpreadsheetConverter, ApiError> {
    registry.find("Region 10").ok_or_else(|| ApiError::Internal {
        message: String::from("Region 10 converter is not registered"),
    })
}

/// Delivery failures are logged, never escalated: the state transition
/// already committed and must not be rolled back over email.
fn send_notice(notifier: &dyn Notifier, notice: Notice) {
    if let Err(delivery_error) = notifier.send(&notice) {
        warn!(
            recipient = %notice.recipient,
            error = %delivery_error,
            "Notice delivery failed"
        );
    }
}
