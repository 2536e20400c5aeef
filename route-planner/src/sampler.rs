use crate::geometry::{quadratic_point, Point, Segment};

/// Number of straight pieces an obstacle curve is broken into
pub const OBSTACLE_SAMPLES: usize = 24;

/// How far above the reference point the selected-room curve bows
pub const SELECTED_ROOM_LIFT: f64 = 50.0;

/// Control point of the curve drawn from the reference marker to the selected room.
///
/// Both the renderer and the obstacle sampler go through this function so the
/// obstacles always match what is on screen.
pub fn selected_room_control(start: &Point, end: &Point) -> Point {
    Point {
        x: (start.x + end.x) / 2.0,
        y: start.y - SELECTED_ROOM_LIFT,
    }
}

/// Break a quadratic curve into `pieces` straight segments, in curve order.
///
/// The curve is evaluated at `k / pieces` for `k = 0..=pieces`.
pub fn sample_quadratic(start: &Point, control: &Point, end: &Point, pieces: usize) -> Vec<Segment> {
    if pieces == 0 {
        return Vec::new();
    }

    let points: Vec<Point> = (0..=pieces)
        .map(|k| quadratic_point(k as f64 / pieces as f64, start, control, end))
        .collect();

    points
        .windows(2)
        .map(|pair| Segment::new(pair[0], pair[1]))
        .collect()
}

/// Obstacle polyline for an arbitrary quadratic curve
pub fn obstacle_segments(start: &Point, control: &Point, end: &Point) -> Vec<Segment> {
    sample_quadratic(start, control, end, OBSTACLE_SAMPLES)
}

/// Obstacle set derived from the selected-room curve, or empty with no selection
pub fn selected_room_obstacles(reference: &Point, room_center: Option<&Point>) -> Vec<Segment> {
    match room_center {
        Some(center) => {
            let control = selected_room_control(reference, center);
            obstacle_segments(reference, &control, center)
        }
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_room_control_formula() {
        let start = Point::new(100.0, 200.0);
        let end = Point::new(290.0, 80.0);

        assert_eq!(selected_room_control(&start, &end), Point::new(195.0, 150.0));
    }

    #[test]
    fn test_sampler_matches_curve_evaluation() {
        let start = Point::new(100.0, 208.0);
        let end = Point::new(390.0, 180.0);
        let control = selected_room_control(&start, &end);

        let segments = obstacle_segments(&start, &control, &end);
        assert_eq!(segments.len(), OBSTACLE_SAMPLES);

        for (k, segment) in segments.iter().enumerate() {
            let t0 = k as f64 / OBSTACLE_SAMPLES as f64;
            let t1 = (k + 1) as f64 / OBSTACLE_SAMPLES as f64;
            assert_eq!(segment.a, quadratic_point(t0, &start, &control, &end));
            assert_eq!(segment.b, quadratic_point(t1, &start, &control, &end));
        }
    }

    #[test]
    fn test_sampler_is_a_connected_polyline() {
        let start = Point::new(0.0, 0.0);
        let control = Point::new(50.0, -50.0);
        let end = Point::new(100.0, 0.0);

        let segments = sample_quadratic(&start, &control, &end, 12);
        assert_eq!(segments.len(), 12);
        assert_eq!(segments.first().map(|s| s.a), Some(start));
        assert_eq!(segments.last().map(|s| s.b), Some(end));

        for pair in segments.windows(2) {
            assert_eq!(pair[0].b, pair[1].a);
        }
    }

    #[test]
    fn test_no_selection_means_no_obstacles() {
        let reference = Point::new(100.0, 200.0);
        assert!(selected_room_obstacles(&reference, None).is_empty());

        let center = Point::new(90.0, 80.0);
        assert_eq!(selected_room_obstacles(&reference, Some(&center)).len(), OBSTACLE_SAMPLES);
    }

    #[test]
    fn test_zero_pieces() {
        let p = Point::new(1.0, 1.0);
        assert!(sample_quadratic(&p, &p, &p, 0).is_empty());
    }
}
