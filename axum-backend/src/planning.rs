use axum::extract::Json;
use route_planner::{
    obstacle_segments, plan_path_with_outcome, selected_room_control, selected_room_obstacles,
    NavigationState, PathSpec, PlanOutcome, PlannerRequest, Point, ReferenceMarker, Segment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{validate_point, ApiError};

#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    pub reference: ReferenceMarker,
    pub pin: Point,
    /// Centre of the selected room; its curve becomes the obstacle set
    #[serde(default)]
    pub selected_room: Option<Point>,
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub path: PathSpec,
    pub d: String,
    pub outcome: PlanOutcome,
    pub obstacle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_room_d: Option<String>,
}

pub async fn plan_handler(Json(request): Json<PlanRequest>) -> Result<Json<PlanResponse>, ApiError> {
    validate_point("reference position", &request.reference.position)?;
    // Offset applied, this is where the path actually starts
    let origin = request.reference.origin();
    validate_point("reference origin", &origin)?;
    validate_point("pin", &request.pin)?;
    if let Some(room) = &request.selected_room {
        validate_point("selected room", room)?;
    }

    let planner_request = PlannerRequest::new(
        origin,
        request.pin,
        selected_room_obstacles(&origin, request.selected_room.as_ref()),
    );

    let (path, outcome) = plan_path_with_outcome(&planner_request);
    info!(
        "Planned path with {} obstacles: {:?}",
        planner_request.obstacles.len(),
        outcome
    );

    Ok(Json(PlanResponse {
        d: path.to_svg_path(),
        path,
        outcome,
        obstacle_count: planner_request.obstacles.len(),
        selected_room_d: selected_room_d(request.reference, request.selected_room),
    }))
}

fn selected_room_d(reference: ReferenceMarker, selected_room: Option<Point>) -> Option<String> {
    let state = NavigationState {
        reference,
        pin: None,
        selected_room,
    };
    state.selected_room_curve().map(|curve| curve.to_svg_path())
}

#[derive(Debug, Deserialize)]
pub struct ObstaclesRequest {
    pub start: Point,
    pub end: Point,
    /// Defaults to the selected-room control point
    #[serde(default)]
    pub control: Option<Point>,
}

#[derive(Debug, Serialize)]
pub struct ObstaclesResponse {
    pub segments: Vec<Segment>,
}

pub async fn obstacles_handler(
    Json(request): Json<ObstaclesRequest>,
) -> Result<Json<ObstaclesResponse>, ApiError> {
    validate_point("start", &request.start)?;
    validate_point("end", &request.end)?;
    if let Some(control) = &request.control {
        validate_point("control", control)?;
    }

    let control = request
        .control
        .unwrap_or_else(|| selected_room_control(&request.start, &request.end));

    Ok(Json(ObstaclesResponse {
        segments: obstacle_segments(&request.start, &control, &request.end),
    }))
}
