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
#![allow(clippy::multiple_crate_versions)]

//! HTTP server for CALC Data Capture.
//!
//! Exposes the price list wizard, the approval surface, contract
//! search, and the bulk upload pipeline. Confirmed bulk uploads are
//! handed to a background worker over an mpsc channel; everything else
//! is handled inline.

mod worker;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{error, info};

use calc_api::handlers::{
    approve_price_lists, confirm_upload, create_price_list, extract_upload_metadata,
    get_upload_status, receive_bulk_upload, search_contracts, unapprove_price_lists,
};
use calc_api::{
    ActorFields, ApiError, ApprovalRequest, ApprovalResponse, BulkUploadRequest,
    BulkUploadResponse, ConfirmUploadResponse, ConverterRegistry, CreatePriceListRequest,
    CreatePriceListResponse, PermissionMap, PhraseInput, SearchResponse, SourceStatusResponse,
    UploadMetadataResponse,
};
use calc_notify::{LogNotifier, Notifier};
use calc_persistence::Persistence;

use worker::{Job, WorkerContext, new_job_id};

/// CALC Data Capture server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How many attempts a bulk upload job gets before permanent failure
    #[arg(long, default_value_t = 3)]
    job_retries: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer behind a mutex for safe concurrent access.
    persistence: Arc<Mutex<Persistence>>,
    /// The immutable role-to-permission map.
    permissions: Arc<PermissionMap>,
    /// The schedule converter registry.
    registry: Arc<ConverterRegistry>,
    /// The notice sender.
    notifier: Arc<dyn Notifier + Send + Sync>,
    /// The job channel feeding the bulk upload worker.
    jobs: mpsc::Sender<Job>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationRequired { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::InvalidQueryInput { .. } | ApiError::ValidationError { .. } => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::ProcessingFailure { .. } | ApiError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handles `POST /price_lists`: the manual upload wizard intake.
async fn handle_create_price_list(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<CreatePriceListRequest>,
) -> Result<Json<CreatePriceListResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: CreatePriceListResponse =
        create_price_list(&mut persistence, &state.permissions, &state.registry, &request)?;
    Ok(Json(response))
}

/// Handles `POST /price_lists/approve`.
async fn handle_approve(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Json<ApprovalResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ApprovalResponse = approve_price_lists(
        &mut persistence,
        &state.permissions,
        state.notifier.as_ref(),
        &request,
    )?;
    Ok(Json(response))
}

/// Handles `POST /price_lists/unapprove`.
async fn handle_unapprove(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ApprovalRequest>,
) -> Result<Json<ApprovalResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: ApprovalResponse = unapprove_price_lists(
        &mut persistence,
        &state.permissions,
        state.notifier.as_ref(),
        &request,
    )?;
    Ok(Json(response))
}

/// Handles `GET /search?q=…`.
///
/// The `q` parameter repeats, one occurrence per phrase. Actor fields
/// travel as query parameters on this read-only endpoint.
async fn handle_search(
    AxumState(state): AxumState<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, HttpError> {
    let Query(params): Query<Vec<(String, String)>> =
        query.map_err(|rejection| HttpError::from(ApiError::InvalidQueryInput {
            message: rejection.to_string(),
        }))?;

    let mut actor: ActorFields = ActorFields::default();
    let mut inputs: Vec<PhraseInput> = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "q" => inputs.push(PhraseInput::Single(value)),
            "actor_id" => actor.actor_id = Some(value),
            "actor_role" => actor.actor_role = Some(value),
            _ => {}
        }
    }

    let mut persistence = state.persistence.lock().await;
    let response: SearchResponse =
        search_contracts(&mut persistence, &state.permissions, &actor, &inputs)?;
    Ok(Json(response))
}

/// Handles `POST /bulk/uploads`.
async fn handle_receive_bulk_upload(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<BulkUploadRequest>,
) -> Result<Json<BulkUploadResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: BulkUploadResponse = receive_bulk_upload(
        &mut persistence,
        &state.permissions,
        &state.registry,
        &request,
    )?;
    Ok(Json(response))
}

/// Handles `GET /bulk/uploads/{id}/metadata`.
async fn handle_upload_metadata(
    AxumState(state): AxumState<AppState>,
    Path(source_id): Path<i64>,
    Query(actor): Query<ActorFields>,
) -> Result<Json<UploadMetadataResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: UploadMetadataResponse = extract_upload_metadata(
        &mut persistence,
        &state.permissions,
        &state.registry,
        &actor,
        source_id,
    )?;
    Ok(Json(response))
}

/// Handles `POST /bulk/uploads/{id}/confirm`.
///
/// Enqueues the source for background processing and returns an opaque
/// job id immediately; no row conversion happens inline.
async fn handle_confirm_upload(
    AxumState(state): AxumState<AppState>,
    Path(source_id): Path<i64>,
    Json(actor): Json<ActorFields>,
) -> Result<Json<ConfirmUploadResponse>, HttpError> {
    {
        let mut persistence = state.persistence.lock().await;
        confirm_upload(&mut persistence, &state.permissions, &actor, source_id)?;
    }

    let job_id: String = new_job_id();
    state
        .jobs
        .send(Job {
            source_id,
            job_id: job_id.clone(),
        })
        .await
        .map_err(|send_error| {
            error!(source_id, error = %send_error, "Job channel closed");
            HttpError::from(ApiError::Internal {
                message: String::from("The processing queue is unavailable"),
            })
        })?;

    Ok(Json(ConfirmUploadResponse { source_id, job_id }))
}

/// Handles `GET /bulk/uploads/{id}`.
async fn handle_upload_status(
    AxumState(state): AxumState<AppState>,
    Path(source_id): Path<i64>,
    Query(actor): Query<ActorFields>,
) -> Result<Json<SourceStatusResponse>, HttpError> {
    let mut persistence = state.persistence.lock().await;
    let response: SourceStatusResponse =
        get_upload_status(&mut persistence, &state.permissions, &actor, source_id)?;
    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/price_lists", post(handle_create_price_list))
        .route("/price_lists/approve", post(handle_approve))
        .route("/price_lists/unapprove", post(handle_unapprove))
        .route("/search", get(handle_search))
        .route("/bulk/uploads", post(handle_receive_bulk_upload))
        .route("/bulk/uploads/{source_id}/metadata", get(handle_upload_metadata))
        .route("/bulk/uploads/{source_id}/confirm", post(handle_confirm_upload))
        .route("/bulk/uploads/{source_id}", get(handle_upload_status))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing CALC Data Capture server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(persistence));
    let registry: Arc<ConverterRegistry> = Arc::new(ConverterRegistry::standard());
    let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(LogNotifier);

    let (jobs, job_receiver) = mpsc::channel::<Job>(64);
    tokio::spawn(worker::run(
        WorkerContext {
            persistence: Arc::clone(&persistence),
            registry: Arc::clone(&registry),
            notifier: Arc::clone(&notifier),
            max_attempts: args.job_retries,
        },
        job_receiver,
    ));

    let app_state: AppState = AppState {
        persistence,
        permissions: Arc::new(PermissionMap::standard()),
        registry,
        notifier,
        jobs,
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use calc_domain::UploadStatus;
    use std::time::Duration;
    use tower::ServiceExt;

    /// A well-formed two-row Region 10 export.
    const REGION_10_CSV: &str = "\
contract_number,vendor_name,labor_category,education_level,min_years_experience,price,business_size
GS-10F-0247K,Acme Staffing LLC,Senior Analyst,Bachelors,5,\"$1,000.00\",S
GS-10F-0247K,Acme Staffing LLC,Sign Language Interpreter,Masters,3,$95.50,S
";

    /// Builds app state with an in-memory database and a live worker.
    fn create_test_app_state() -> AppState {
        let persistence: Arc<Mutex<Persistence>> = Arc::new(Mutex::new(
            Persistence::new_in_memory().expect("Failed to create in-memory persistence"),
        ));
        let registry: Arc<ConverterRegistry> = Arc::new(ConverterRegistry::standard());
        let notifier: Arc<dyn Notifier + Send + Sync> = Arc::new(LogNotifier);

        let (jobs, job_receiver) = mpsc::channel::<Job>(8);
        tokio::spawn(worker::run(
            WorkerContext {
                persistence: Arc::clone(&persistence),
                registry: Arc::clone(&registry),
                notifier: Arc::clone(&notifier),
                max_attempts: 3,
            },
            job_receiver,
        ));

        AppState {
            persistence,
            permissions: Arc::new(PermissionMap::standard()),
            registry,
            notifier,
            jobs,
        }
    }

    fn price_list_body(actor_id: &str, actor_role: &str) -> serde_json::Value {
        serde_json::json!({
            "actor_id": actor_id,
            "actor_role": actor_role,
            "schedule": "Region 10",
            "file_contents": REGION_10_CSV,
            "contract_number": "GS-10F-0247K",
            "vendor_name": "Acme Staffing LLC",
            "is_small_business": true,
            "contractor_site": "both",
            "contract_year": 1,
            "contract_start": "2026-01-01",
            "contract_end": "2030-12-31",
        })
    }

    async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_uri(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Submits a price list as a contract officer, returning its id.
    async fn submit_price_list(app: &Router) -> i64 {
        let response = post_json(
            app,
            "/price_lists",
            &price_list_body("officer@gsa.test", "contract_officer"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: CreatePriceListResponse = json_body(response).await;
        body.price_list_id
    }

    #[tokio::test]
    async fn test_price_list_intake_round_trip() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(
            &app,
            "/price_lists",
            &price_list_body("officer@gsa.test", "contract_officer"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: CreatePriceListResponse = json_body(response).await;
        assert_eq!(body.row_count, 2);
    }

    #[tokio::test]
    async fn test_unknown_role_is_a_bad_request() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(
            &app,
            "/price_lists",
            &price_list_body("someone", "superuser"),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_officer_cannot_approve_over_http() {
        let app: Router = build_router(create_test_app_state());
        let price_list_id: i64 = submit_price_list(&app).await;

        let response = post_json(
            &app,
            "/price_lists/approve",
            &serde_json::json!({
                "actor_id": "officer@gsa.test",
                "actor_role": "contract_officer",
                "price_list_ids": [price_list_id],
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_approval_reports_actual_transitions() {
        let app: Router = build_router(create_test_app_state());
        let price_list_id: i64 = submit_price_list(&app).await;

        let approve_body: serde_json::Value = serde_json::json!({
            "actor_id": "admin@gsa.test",
            "actor_role": "data_administrator",
            "price_list_ids": [price_list_id],
        });

        let first = post_json(&app, "/price_lists/approve", &approve_body).await;
        assert_eq!(first.status(), HttpStatusCode::OK);
        let first_body: ApprovalResponse = json_body(first).await;
        assert_eq!(first_body.transitioned, 1);

        // Second approval is an acknowledged no-op.
        let second = post_json(&app, "/price_lists/approve", &approve_body).await;
        let second_body: ApprovalResponse = json_body(second).await;
        assert_eq!(second_body.transitioned, 0);
    }

    #[tokio::test]
    async fn test_search_requires_an_actor() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(&app, "/search?q=analyst").await;
        assert_eq!(response.status(), HttpStatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_search_with_repeated_phrases() {
        let app: Router = build_router(create_test_app_state());
        let price_list_id: i64 = submit_price_list(&app).await;
        post_json(
            &app,
            "/price_lists/approve",
            &serde_json::json!({
                "actor_id": "admin@gsa.test",
                "actor_role": "data_administrator",
                "price_list_ids": [price_list_id],
            }),
        )
        .await;

        let response = get_uri(
            &app,
            "/search?q=analyst&q=interpreter&actor_id=officer@gsa.test&actor_role=contract_officer",
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);

        let body: SearchResponse = json_body(response).await;
        assert_eq!(body.results.len(), 2);
        assert_eq!(body.results[0].labor_category, "Senior Analyst");
        assert_eq!(body.results[1].labor_category, "Sign Language Interpreter");
    }

    #[tokio::test]
    async fn test_punctuation_only_search_is_empty_ok() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(
            &app,
            "/search?q=%40%24%25&actor_id=officer@gsa.test&actor_role=contract_officer",
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: SearchResponse = json_body(response).await;
        assert!(body.results.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_upload_is_not_found() {
        let app: Router = build_router(create_test_app_state());

        let response = get_uri(
            &app,
            "/bulk/uploads/999?actor_id=admin@gsa.test&actor_role=data_administrator",
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bulk_pipeline_over_http() {
        let app: Router = build_router(create_test_app_state());

        // Receive.
        let response = post_json(
            &app,
            "/bulk/uploads",
            &serde_json::json!({
                "actor_id": "admin@gsa.test",
                "actor_role": "data_administrator",
                "file_contents": REGION_10_CSV,
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let received: BulkUploadResponse = json_body(response).await;
        let source_id: i64 = received.source_id;

        // Metadata preview.
        let response = get_uri(
            &app,
            &format!(
                "/bulk/uploads/{source_id}/metadata?actor_id=admin@gsa.test&actor_role=data_administrator"
            ),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let metadata: UploadMetadataResponse = json_body(response).await;
        assert_eq!(metadata.vendor_name, "Acme Staffing LLC");
        assert_eq!(metadata.row_count, 2);

        // Confirm; returns a job id immediately.
        let response = post_json(
            &app,
            &format!("/bulk/uploads/{source_id}/confirm"),
            &serde_json::json!({
                "actor_id": "admin@gsa.test",
                "actor_role": "data_administrator",
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::OK);
        let confirmed: ConfirmUploadResponse = json_body(response).await;
        assert!(confirmed.job_id.starts_with("job-"));

        // The worker loads the source shortly after.
        let mut loaded: bool = false;
        for _ in 0..50 {
            let response = get_uri(
                &app,
                &format!(
                    "/bulk/uploads/{source_id}?actor_id=admin@gsa.test&actor_role=data_administrator"
                ),
            )
            .await;
            let status: SourceStatusResponse = json_body(response).await;
            if status.status == UploadStatus::Loaded.as_str() {
                assert!(status.has_been_loaded);
                assert_eq!(status.contracts_loaded, 2);
                loaded = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert!(loaded, "bulk upload never reached Loaded");
    }

    #[tokio::test]
    async fn test_confirm_before_metadata_is_rejected() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(
            &app,
            "/bulk/uploads",
            &serde_json::json!({
                "actor_id": "admin@gsa.test",
                "actor_role": "data_administrator",
                "file_contents": REGION_10_CSV,
            }),
        )
        .await;
        let received: BulkUploadResponse = json_body(response).await;

        let response = post_json(
            &app,
            &format!("/bulk/uploads/{}/confirm", received.source_id),
            &serde_json::json!({
                "actor_id": "admin@gsa.test",
                "actor_role": "data_administrator",
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_officer_cannot_bulk_upload_over_http() {
        let app: Router = build_router(create_test_app_state());

        let response = post_json(
            &app,
            "/bulk/uploads",
            &serde_json::json!({
                "actor_id": "officer@gsa.test",
                "actor_role": "contract_officer",
                "file_contents": REGION_10_CSV,
            }),
        )
        .await;
        assert_eq!(response.status(), HttpStatusCode::FORBIDDEN);
    }
}
