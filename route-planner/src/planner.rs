use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::geometry::{Point, Segment};
use crate::sampler::sample_quadratic;

/// Offsets tried along the start->end normal, smallest first
pub const DETOUR_OFFSETS: [f64; 4] = [80.0, 140.0, 220.0, 300.0];

/// Side of the straight line tried for each offset, in order
pub const DETOUR_SIGNS: [f64; 2] = [1.0, -1.0];

/// Offset used when no candidate curve clears the obstacles
pub const FALLBACK_OFFSET: f64 = 360.0;

/// Pieces a candidate detour is broken into when checking it
pub const DETOUR_SAMPLES: usize = 12;

/// Everything the planner needs for one call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerRequest {
    pub start: Point,
    pub end: Point,
    #[serde(default)]
    pub obstacles: Vec<Segment>,
}

impl PlannerRequest {
    pub fn new(start: Point, end: Point, obstacles: Vec<Segment>) -> Self {
        Self { start, end, obstacles }
    }
}

/// Drawable path produced by the planner
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PathSpec {
    Line { start: Point, end: Point },
    Quadratic { start: Point, control: Point, end: Point },
}

impl PathSpec {
    pub fn start(&self) -> Point {
        match self {
            PathSpec::Line { start, .. } | PathSpec::Quadratic { start, .. } => *start,
        }
    }

    pub fn end(&self) -> Point {
        match self {
            PathSpec::Line { end, .. } | PathSpec::Quadratic { end, .. } => *end,
        }
    }

    pub fn control(&self) -> Option<Point> {
        match self {
            PathSpec::Line { .. } => None,
            PathSpec::Quadratic { control, .. } => Some(*control),
        }
    }

    pub fn is_straight(&self) -> bool {
        matches!(self, PathSpec::Line { .. })
    }

    /// Polyline approximation of the path; a line is always a single segment
    pub fn samples(&self, pieces: usize) -> Vec<Segment> {
        match self {
            PathSpec::Line { start, end } => vec![Segment::new(*start, *end)],
            PathSpec::Quadratic { start, control, end } => {
                sample_quadratic(start, control, end, pieces)
            }
        }
    }

    /// SVG `d` attribute, e.g. `M 0 150 L 500 150`
    pub fn to_svg_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSpec::Line { start, end } => write!(
                f,
                "M {} {} L {} {}",
                SvgNumber(start.x),
                SvgNumber(start.y),
                SvgNumber(end.x),
                SvgNumber(end.y)
            ),
            PathSpec::Quadratic { start, control, end } => write!(
                f,
                "M {} {} Q {} {} {} {}",
                SvgNumber(start.x),
                SvgNumber(start.y),
                SvgNumber(control.x),
                SvgNumber(control.y),
                SvgNumber(end.x),
                SvgNumber(end.y)
            ),
        }
    }
}

/// Shortest round-trip form, with negative zero printed as `0`
struct SvgNumber(f64);

impl fmt::Display for SvgNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Which branch of the planner produced the path
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanOutcome {
    Straight,
    Detour { offset: f64, sign: f64 },
    /// No candidate cleared the obstacles; the returned curve may still cross one
    Fallback,
}

/// Plan a path from `request.start` to `request.end` around the obstacles.
///
/// Never fails. When no candidate curve is clear the largest-offset curve is
/// returned anyway so the UI always has something to draw.
pub fn plan_path(request: &PlannerRequest) -> PathSpec {
    plan_path_with_outcome(request).0
}

/// Same as [`plan_path`], also reporting which branch was taken
pub fn plan_path_with_outcome(request: &PlannerRequest) -> (PathSpec, PlanOutcome) {
    let start = request.start;
    let end = request.end;
    let obstacles = request.obstacles.as_slice();

    if !Segment::new(start, end).crosses_any(obstacles) {
        return (PathSpec::Line { start, end }, PlanOutcome::Straight);
    }

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = dx.hypot(dy).max(1.0);
    let normal = Point::new(-dy / length, dx / length);
    let mid = start.midpoint(&end);

    for &offset in DETOUR_OFFSETS.iter() {
        for &sign in DETOUR_SIGNS.iter() {
            let control = offset_control(&mid, &normal, offset, sign);
            let clear = !sample_quadratic(&start, &control, &end, DETOUR_SAMPLES)
                .iter()
                .any(|piece| piece.crosses_any(obstacles));

            if clear {
                debug!("Detour found at offset {} (sign {})", offset, sign);
                return (
                    PathSpec::Quadratic { start, control, end },
                    PlanOutcome::Detour { offset, sign },
                );
            }
        }
    }

    debug!(
        "No clear detour among {} candidates, falling back to offset {}",
        DETOUR_OFFSETS.len() * DETOUR_SIGNS.len(),
        FALLBACK_OFFSET
    );
    let control = offset_control(&mid, &normal, FALLBACK_OFFSET, DETOUR_SIGNS[0]);
    (PathSpec::Quadratic { start, control, end }, PlanOutcome::Fallback)
}

fn offset_control(mid: &Point, normal: &Point, offset: f64, sign: f64) -> Point {
    Point {
        x: mid.x + normal.x * offset * sign,
        y: mid.y + normal.y * offset * sign,
    }
}
