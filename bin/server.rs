// Shipment Tracker - API Server
// REST surface for the customer, operator and manager views

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use shipment_tracker::{
    open_repository, parse_status, DynRepository, ShipmentStatus, StoreBackend, TrackerConfig,
    TrackerError,
};

/// Shared application state. Every request goes through the one mutex,
/// so repository calls stay strictly sequential.
#[derive(Clone)]
struct AppState {
    repo: Arc<Mutex<DynRepository>>,
}

impl AppState {
    fn repo(&self) -> MutexGuard<'_, DynRepository> {
        // A panic mid-request leaves the stores as they were in memory
        self.repo.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn error_response(err: TrackerError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "storage failure while serving request");
    }

    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

fn respond<T: Serialize>(result: Result<T, TrackerError>) -> Response {
    match result {
        Ok(data) => ApiResponse::ok(data),
        Err(err) => error_response(err),
    }
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct EventRequest {
    username: String,
    password: String,
    location: String,
    status: String,
}

#[derive(Serialize)]
struct StatusResponse {
    code: &'static str,
    label: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/statuses - Accepted status names
async fn list_statuses() -> Response {
    let statuses: Vec<StatusResponse> = ShipmentStatus::ALL
        .iter()
        .map(|status| StatusResponse {
            code: status.code(),
            label: status.label(),
        })
        .collect();
    ApiResponse::ok(statuses)
}

/// GET /api/shipments/:id - Customer lookup
async fn track_shipment(State(state): State<AppState>, Path(tracking_id): Path<String>) -> Response {
    respond(state.repo().track(&tracking_id))
}

/// POST /api/login - Check credentials
async fn login(State(state): State<AppState>, Json(body): Json<Credentials>) -> Response {
    respond(state.repo().login(body.username.trim(), body.password.trim()))
}

/// POST /api/shipments/:id/events - Operator data entry
async fn record_event(
    State(state): State<AppState>,
    Path(tracking_id): Path<String>,
    Json(body): Json<EventRequest>,
) -> Response {
    let mut repo = state.repo();

    let result = repo
        .login(body.username.trim(), body.password.trim())
        .and_then(|session| {
            let status = parse_status(&body.status)?;
            repo.record_event(&session, &tracking_id, &body.location, status)
        });
    respond(result)
}

/// POST /api/report - Manager overview
async fn manager_report(State(state): State<AppState>, Json(body): Json<Credentials>) -> Response {
    let repo = state.repo();

    let result = repo
        .login(body.username.trim(), body.password.trim())
        .and_then(|session| repo.manager_report(&session));
    respond(result)
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🌐 Shipment Tracker - API Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = match TrackerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
        eprintln!("❌ Cannot create data directory {:?}: {}", config.data_dir, e);
        std::process::exit(1);
    }

    let repo = match open_repository(&config) {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("❌ Critical startup error!");
            eprintln!("   {}", e);
            std::process::exit(1);
        }
    };
    println!("✓ Stores loaded: {}", repo.backend().describe());

    let state = AppState {
        repo: Arc::new(Mutex::new(repo)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/statuses", get(list_statuses))
        .route("/login", post(login))
        .route("/report", post(manager_report))
        .route("/shipments/:id", get(track_shipment))
        .route("/shipments/:id/events", post(record_event))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    let listener = match tokio::net::TcpListener::bind(&config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("❌ Failed to bind to {}: {}", config.server_addr, e);
            std::process::exit(1);
        }
    };

    info!(addr = %config.server_addr, "server listening");
    println!("\n🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/shipments/<tracking-id>", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
