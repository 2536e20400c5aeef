//! Path geometry for the room-finder navigation view.
//!
//! Given the user's reference marker, a clicked destination pin and the curve
//! currently drawn to the selected room, [`plan_path`] returns a straight line
//! when it is clear and otherwise a quadratic detour that avoids the curve.

pub mod floorplan;
pub mod geometry;
pub mod planner;
pub mod sampler;
pub mod view;

pub use floorplan::{Building, BuildingSummary, Floor, Room, RoomKind};
pub use geometry::{orientation, quadratic_point, segments_intersect, Point, Segment};
pub use planner::{plan_path, plan_path_with_outcome, PathSpec, PlanOutcome, PlannerRequest};
pub use sampler::{obstacle_segments, selected_room_control, selected_room_obstacles};
pub use view::{MapTransform, NavigationState, ReferenceMarker};
