use axum::{
    extract::{DefaultBodyLimit, Json},
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use anyhow::Context;
use route_planner::{floorplan, Building, Point};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod buildings;
pub mod config;
pub mod planning;

pub use config::ServerConfig;

// Reject coordinates far outside any floor image
const MAX_COORDINATE_VALUE: f64 = 1_000_000.0;
const MIN_COORDINATE_VALUE: f64 = -1_000_000.0;

const SAMPLE_BUILDINGS: &str = include_str!("../data/buildings.json");

/// Read-only data shared by every handler
#[derive(Debug, Default)]
pub struct AppState {
    pub buildings: Vec<Building>,
}

impl AppState {
    pub fn new(buildings: Vec<Building>) -> Self {
        Self { buildings }
    }

    /// Load buildings from `FLOORPLAN_PATH`, or the bundled sample
    pub fn load(config: &ServerConfig) -> anyhow::Result<Self> {
        let buildings = match &config.floorplan_path {
            Some(path) => {
                info!("Loading buildings from {}", path.display());
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                floorplan::load_buildings(&json)?
            }
            None => {
                info!("FLOORPLAN_PATH not set, serving the bundled sample building");
                Self::sample()?.buildings
            }
        };

        Ok(Self::new(buildings))
    }

    pub fn sample() -> anyhow::Result<Self> {
        Ok(Self::new(floorplan::load_buildings(SAMPLE_BUILDINGS)?))
    }

    pub fn building(&self, id: &str) -> Option<&Building> {
        self.buildings.iter().find(|building| building.id == id)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: &str, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            message: message.into(),
        }),
    )
}

/// Coordinates must be finite and within reasonable bounds
pub(crate) fn is_valid_point(point: &Point) -> bool {
    point.is_finite()
        && point.x >= MIN_COORDINATE_VALUE
        && point.x <= MAX_COORDINATE_VALUE
        && point.y >= MIN_COORDINATE_VALUE
        && point.y <= MAX_COORDINATE_VALUE
}

pub(crate) fn validate_point(name: &str, point: &Point) -> Result<(), ApiError> {
    if is_valid_point(point) {
        Ok(())
    } else {
        Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_POINT",
            format!(
                "Invalid {}: coordinates must be finite and within [{}, {}]",
                name, MIN_COORDINATE_VALUE, MAX_COORDINATE_VALUE
            ),
        ))
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn create_app(config: &ServerConfig, state: Arc<AppState>) -> Router {
    let origins: Vec<_> = config
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    let cors = if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/buildings", get(buildings::list_buildings_handler))
        .route("/buildings/:id", get(buildings::get_building_handler))
        .route(
            "/buildings/:id/floors/:floor/rooms",
            get(buildings::search_rooms_handler),
        )
        .route("/floorplan/import", post(buildings::import_floorplan_handler))
        .route("/plan", post(planning::plan_handler))
        .route("/obstacles", post(planning::obstacles_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
