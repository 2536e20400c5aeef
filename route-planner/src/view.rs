//! Map interaction math shared by the navigation UI and the backend.
//!
//! The floor layer is drawn with CSS `translate(x, y) scale(scale)` and
//! transform origin `0 0`, so a client point maps back to floor pixels by
//! undoing the translation and then the scale.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::planner::{PathSpec, PlannerRequest};
use crate::sampler::{selected_room_control, selected_room_obstacles};

pub const MIN_SCALE: f64 = 0.5;
pub const MAX_SCALE: f64 = 3.0;
const ZOOM_OUT_FACTOR: f64 = 0.9;
const ZOOM_IN_FACTOR: f64 = 1.1;

/// Pan/zoom state of the floor layer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapTransform {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
}

impl Default for MapTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            x: 0.0,
            y: 0.0,
        }
    }
}

impl MapTransform {
    /// Client (viewport-relative) pixels to floor pixels
    pub fn to_floor(&self, client: Point) -> Point {
        Point {
            x: (client.x - self.x) / self.scale,
            y: (client.y - self.y) / self.scale,
        }
    }

    /// Floor pixels to client pixels
    pub fn to_screen(&self, floor: Point) -> Point {
        Point {
            x: floor.x * self.scale + self.x,
            y: floor.y * self.scale + self.y,
        }
    }

    /// Apply one wheel step; positive `delta_y` zooms out
    pub fn zoom(&mut self, delta_y: f64) {
        let factor = if delta_y > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
    }

    /// Where a drag started, relative to the current translation
    pub fn drag_origin(&self, client: Point) -> Point {
        Point {
            x: client.x - self.x,
            y: client.y - self.y,
        }
    }

    /// Move the layer so that `drag_origin` follows the pointer
    pub fn pan_to(&mut self, client: Point, drag_origin: Point) {
        self.x = client.x - drag_origin.x;
        self.y = client.y - drag_origin.y;
    }
}

/// The user's fixed "you are here" marker
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ReferenceMarker {
    pub position: Point,
    /// Vertical shift from the marker centre to where paths begin
    #[serde(default)]
    pub offset_y: f64,
}

impl Default for ReferenceMarker {
    fn default() -> Self {
        Self {
            position: Point::new(100.0, 200.0),
            offset_y: 8.0,
        }
    }
}

impl ReferenceMarker {
    /// Point every path starts from
    pub fn origin(&self) -> Point {
        Point {
            x: self.position.x,
            y: self.position.y + self.offset_y,
        }
    }
}

/// Snapshot of the navigation view that drives the planner
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NavigationState {
    pub reference: ReferenceMarker,
    pub pin: Option<Point>,
    /// Centre of the selected room, if any
    pub selected_room: Option<Point>,
}

impl NavigationState {
    /// Curve drawn from the marker to the selected room
    pub fn selected_room_curve(&self) -> Option<PathSpec> {
        let start = self.reference.origin();
        self.selected_room.map(|end| PathSpec::Quadratic {
            start,
            control: selected_room_control(&start, &end),
            end,
        })
    }

    /// Planner input for the current pin; `None` until a pin is placed
    pub fn planner_request(&self) -> Option<PlannerRequest> {
        let start = self.reference.origin();
        let pin = self.pin?;
        let obstacles = selected_room_obstacles(&start, self.selected_room.as_ref());
        Some(PlannerRequest::new(start, pin, obstacles))
    }
}
