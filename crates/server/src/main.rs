// Copyright (C) 2026 Fred Clausen
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

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use clap::Parser;
use mission_desk_api::{
    ApiError, CleanupRequest, CleanupResponse, ConflictScope, CreateGroupMissionsRequest,
    CreateMissionRequest, DeleteMissionResponse, FailureDetail, GroupMissionsResponse,
    MissionResponse, ReportResponse, UpdateMissionRequest, create_group_missions,
    create_single_mission, delete_mission, run_reconciliation_cleanup,
    run_reconciliation_report, update_mission,
};
use mission_desk_persistence::{Persistence, PersistenceError, PersistenceOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

/// Mission Desk Server - HTTP server for monthly mission allocation
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Directory receiving reconciliation backups
    #[arg(long, default_value = "./backups")]
    backup_dir: PathBuf,

    /// How long a write waits for the database lock, in milliseconds
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u64,
}

/// Application state shared across handlers.
///
/// The persistence layer sits behind a Mutex so requests are applied one at
/// a time within this process.
#[derive(Clone)]
struct AppState {
    /// The mission store.
    persistence: Arc<Mutex<Persistence>>,
    /// Where cleanup writes its snapshot.
    backup_dir: PathBuf,
}

/// Query string for the reconciliation report.
#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    /// Group every monthly mission instead of active ones only.
    #[serde(default)]
    all_statuses: bool,
}

/// API request for a reconciliation cleanup.
///
/// Without `auto_confirm` the call is a dry run returning the plan.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct CleanupApiRequest {
    #[serde(default)]
    auto_confirm: bool,
    #[serde(default)]
    all_statuses: bool,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Per-employee failures of an aborted batch.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    failures: Vec<FailureDetail>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
    /// Failures carried by an aborted batch.
    failures: Vec<FailureDetail>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            failures: self.failures,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        match err {
            ApiError::Validation { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                message,
                failures: Vec::new(),
            },
            ApiError::Conflict { .. } => Self {
                status: StatusCode::CONFLICT,
                message,
                failures: Vec::new(),
            },
            ApiError::NotFound { .. } => Self {
                status: StatusCode::NOT_FOUND,
                message,
                failures: Vec::new(),
            },
            ApiError::TransactionAborted { failures, .. } => Self {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message,
                failures,
            },
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    failures: Vec::new(),
                }
            }
        }
    }
}

const fn scope_for(all_statuses: bool) -> ConflictScope {
    if all_statuses {
        ConflictScope::AllStatuses
    } else {
        ConflictScope::ActiveOnly
    }
}

/// Handler for POST `/missions` endpoint.
///
/// Creates one mission for one employee.
async fn handle_create_mission(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateMissionRequest>,
) -> Result<(StatusCode, Json<MissionResponse>), HttpError> {
    info!(
        employee_id = req.employee_id,
        mission_type = %req.mission_type,
        "Handling create_mission request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: MissionResponse = create_single_mission(&mut persistence, req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/missions/group` endpoint.
///
/// Creates one mission per listed employee, or none.
async fn handle_create_group_missions(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateGroupMissionsRequest>,
) -> Result<(StatusCode, Json<GroupMissionsResponse>), HttpError> {
    info!(
        employees = req.employee_ids.len(),
        mission_type = %req.mission_type,
        "Handling create_group_missions request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GroupMissionsResponse = create_group_missions(&mut persistence, req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PATCH `/missions/{mission_id}` endpoint.
async fn handle_update_mission(
    AxumState(app_state): AxumState<AppState>,
    Path(mission_id): Path<i64>,
    Json(req): Json<UpdateMissionRequest>,
) -> Result<Json<MissionResponse>, HttpError> {
    info!(mission_id, "Handling update_mission request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MissionResponse = update_mission(&mut persistence, mission_id, req)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/missions/{mission_id}` endpoint.
async fn handle_delete_mission(
    AxumState(app_state): AxumState<AppState>,
    Path(mission_id): Path<i64>,
) -> Result<Json<DeleteMissionResponse>, HttpError> {
    info!(mission_id, "Handling delete_mission request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteMissionResponse = delete_mission(&mut persistence, mission_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/reconciliation/report` endpoint.
///
/// Lists employees holding more than one monthly mission in a month.
async fn handle_reconciliation_report(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ReportResponse>, HttpError> {
    info!(
        all_statuses = query.all_statuses,
        "Handling reconciliation_report request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ReportResponse =
        run_reconciliation_report(&mut persistence, scope_for(query.all_statuses))?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/reconciliation/cleanup` endpoint.
///
/// There is nobody to prompt over HTTP, so an unconfirmed request only
/// returns the plan.
async fn handle_reconciliation_cleanup(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CleanupApiRequest>,
) -> Result<Json<CleanupResponse>, HttpError> {
    info!(
        auto_confirm = req.auto_confirm,
        all_statuses = req.all_statuses,
        "Handling reconciliation_cleanup request"
    );

    let request: CleanupRequest = CleanupRequest {
        auto_confirm: req.auto_confirm,
        backup_dir: app_state.backup_dir.clone(),
        scope: scope_for(req.all_statuses),
    };

    let mut persistence = app_state.persistence.lock().await;
    let response: CleanupResponse = run_reconciliation_cleanup(&mut persistence, &request, |_| {
        warn!("Cleanup requested without auto_confirm, returning plan only");
        false
    })?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/missions", post(handle_create_mission))
        .route("/missions/group", post(handle_create_group_missions))
        .route("/missions/{mission_id}", patch(handle_update_mission))
        .route("/missions/{mission_id}", delete(handle_delete_mission))
        .route("/reconciliation/report", get(handle_reconciliation_report))
        .route("/reconciliation/cleanup", post(handle_reconciliation_cleanup))
        .with_state(app_state)
}

fn open_persistence(args: &Args) -> Result<Persistence, PersistenceError> {
    if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        let options: PersistenceOptions = PersistenceOptions {
            busy_timeout: Duration::from_millis(args.busy_timeout_ms),
        };
        Persistence::open(db_path, options)
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Mission Desk Server");

    let persistence: Persistence = open_persistence(&args)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        backup_dir: args.backup_dir.clone(),
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
