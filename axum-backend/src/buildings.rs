use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use route_planner::{floorplan, Building, BuildingSummary, Room};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{api_error, ApiError, AppState};

// Extraction responses are plain JSON text; anything larger is not a floor plan
const MAX_EXTRACTION_BYTES: usize = 1024 * 1024;

pub async fn list_buildings_handler(State(state): State<Arc<AppState>>) -> Json<Vec<BuildingSummary>> {
    Json(state.buildings.iter().map(Building::summary).collect())
}

pub async fn get_building_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Building>, ApiError> {
    state
        .building(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| building_not_found(&id))
}

#[derive(Debug, Deserialize)]
pub struct RoomQuery {
    #[serde(default)]
    pub q: Option<String>,
}

pub async fn search_rooms_handler(
    State(state): State<Arc<AppState>>,
    Path((id, floor_name)): Path<(String, String)>,
    Query(query): Query<RoomQuery>,
) -> Result<Json<Vec<Room>>, ApiError> {
    let building = state.building(&id).ok_or_else(|| building_not_found(&id))?;
    let floor = building.floor(&floor_name).ok_or_else(|| {
        api_error(
            StatusCode::NOT_FOUND,
            "FLOOR_NOT_FOUND",
            format!("Building {} has no floor named {}", id, floor_name),
        )
    })?;

    let rooms: Vec<Room> = floor
        .search(query.q.as_deref().unwrap_or(""))
        .into_iter()
        .cloned()
        .collect();

    info!(
        "Room search on {}/{} matched {} of {} rooms",
        id,
        floor_name,
        rooms.len(),
        floor.rooms.len()
    );
    Ok(Json(rooms))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub building_id: String,
    /// Raw text returned by the floor-plan extraction model
    pub response_text: String,
}

pub async fn import_floorplan_handler(Json(request): Json<ImportRequest>) -> Result<Json<Building>, ApiError> {
    if request.building_id.trim().is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_BUILDING_ID",
            "building_id must not be empty",
        ));
    }

    if request.response_text.len() > MAX_EXTRACTION_BYTES {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INPUT_TOO_LARGE",
            format!(
                "Extraction response too large. Maximum allowed: {} bytes. Received: {}",
                MAX_EXTRACTION_BYTES,
                request.response_text.len()
            ),
        ));
    }

    let extracted = floorplan::parse_extraction(&request.response_text).map_err(|e| {
        warn!("Rejected extraction for {}: {:#}", request.building_id, e);
        api_error(StatusCode::BAD_REQUEST, "INVALID_EXTRACTION", format!("{:#}", e))
    })?;

    let building = extracted.into_building(request.building_id.trim());
    info!(
        "Imported building {} with {} floors",
        building.id,
        building.floors.len()
    );

    Ok(Json(building))
}

fn building_not_found(id: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        "BUILDING_NOT_FOUND",
        format!("No building with id {}", id),
    )
}
