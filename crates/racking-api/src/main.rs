use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use racking_core::catalog::Catalog;
use racking_core::{preview, EquipmentSummary, EstimateError, EstimateRequest, Estimator};
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Catalog used to resolve `panel_model` and missing rail lengths
type SharedCatalog = Arc<Catalog>;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Racking Builder API");

    let catalog = match std::env::var("RACKING_CATALOG") {
        Ok(path) => Catalog::load(Path::new(&path)).expect("Failed to load RACKING_CATALOG"),
        Err(_) => Catalog::default(),
    };
    info!(
        "Catalog has {} panel models and {} rail lengths",
        catalog.panel_models.len(),
        catalog.rails.len()
    );

    let app = router(Arc::new(catalog));

    let addr = std::env::var("RACKING_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {addr}: {e}"));

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://localhost:3000/api/health");

    axum::serve(listener, app).await.expect("Server error");
}

fn router(catalog: SharedCatalog) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/estimate", post(estimate))
        .route("/api/deadload", post(deadload))
        .route("/api/preview/svg", post(preview_svg))
        .layer(CorsLayer::permissive())
        .with_state(catalog)
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "racking-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Main estimation endpoint
async fn estimate(
    State(catalog): State<SharedCatalog>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<EquipmentSummary>, AppError> {
    info!("Received estimate request with {} rows", request.rows.len());

    let request = catalog.resolve(request)?;
    // The remainder search is CPU-bound
    let summary = tokio::task::spawn_blocking(move || Estimator::new(request)?.estimate())
        .await
        .map_err(anyhow::Error::from)??;

    info!(
        "Estimate complete: {} panels, {} mounts, {} splices, {:.2}\" waste",
        summary.total_panels, summary.total_mounts, summary.total_splices, summary.total_waste
    );

    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
struct DeadloadResponse {
    psf: Vec<f64>,
}

/// Per-row deadload endpoint
async fn deadload(
    State(catalog): State<SharedCatalog>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<DeadloadResponse>, AppError> {
    info!("Received deadload request with {} rows", request.rows.len());

    let request = catalog.resolve(request)?;
    let panel = request.panel.ok_or_else(missing_panel)?;
    let psf = racking_core::deadload(&request.rows, &panel, &request.config)?;

    Ok(Json(DeadloadResponse { psf }))
}

/// Generate SVG preview of the row layout
async fn preview_svg(
    State(catalog): State<SharedCatalog>,
    Json(request): Json<EstimateRequest>,
) -> Result<Response, AppError> {
    info!("Generating SVG for {} rows", request.rows.len());

    let request = catalog.resolve(request)?;
    let panel = request.panel.ok_or_else(missing_panel)?;
    let svg = preview::render_svg(&request.rows, &panel, &request.config)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

fn missing_panel() -> EstimateError {
    EstimateError::InvalidInput {
        field: "panel".to_string(),
        value: "missing".to_string(),
        range: "explicit panel dimensions or a known panel_model".to_string(),
    }
}

/// Application error type
#[derive(Debug)]
enum AppError {
    Estimate(EstimateError),
    Internal(anyhow::Error),
}

impl From<EstimateError> for AppError {
    fn from(err: EstimateError) -> Self {
        AppError::Estimate(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Estimate(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        };
        error!("Request error: {}", message);

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}
