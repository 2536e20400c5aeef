use serde::{Deserialize, Serialize};

/// A point in floor-image pixel space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Straight piece between two points, undirected for intersection tests
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn intersects(&self, other: &Segment) -> bool {
        segments_intersect(&self.a, &self.b, &other.a, &other.b)
    }

    /// True if this segment crosses any segment in `obstacles`
    pub fn crosses_any(&self, obstacles: &[Segment]) -> bool {
        obstacles.iter().any(|obstacle| self.intersects(obstacle))
    }
}

/// Whether `c` lies on the counter-clockwise side of the directed line `a -> b`.
///
/// Exactly collinear points (zero cross product) count as not counter-clockwise.
/// No attempt is made to be robust against degenerate configurations.
pub fn orientation(a: &Point, b: &Point, c: &Point) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Strict crossing test for segments `a-b` and `c-d`.
///
/// Segments that only touch at an endpoint may or may not be reported,
/// depending on float rounding.
pub fn segments_intersect(a: &Point, b: &Point, c: &Point, d: &Point) -> bool {
    orientation(a, c, d) != orientation(b, c, d) && orientation(a, b, c) != orientation(a, b, d)
}

/// Evaluate the quadratic Bézier `p0 -> pc -> p1` at `t` in `[0, 1]`
pub fn quadratic_point(t: f64, p0: &Point, pc: &Point, p1: &Point) -> Point {
    let u = 1.0 - t;
    let uu = u * u;
    let ut2 = 2.0 * u * t;
    let tt = t * t;

    Point {
        x: uu * p0.x + ut2 * pc.x + tt * p1.x,
        y: uu * p0.y + ut2 * pc.y + tt * p1.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_sides() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);

        assert!(orientation(&a, &b, &Point::new(5.0, 5.0)));
        assert!(!orientation(&a, &b, &Point::new(5.0, -5.0)));
    }

    #[test]
    fn test_orientation_collinear_is_not_ccw() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 10.0);

        assert!(!orientation(&a, &b, &Point::new(20.0, 20.0)));
        assert!(!orientation(&a, &b, &Point::new(-3.0, -3.0)));
    }

    #[test]
    fn test_crossing_segments() {
        let horizontal = Segment::new(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        let wall = Segment::new(Point::new(100.0, -50.0), Point::new(100.0, 50.0));

        assert!(horizontal.intersects(&wall));
        assert!(wall.intersects(&horizontal));
    }

    #[test]
    fn test_disjoint_segments() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Segment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0));
        let c = Segment::new(Point::new(20.0, -5.0), Point::new(20.0, 5.0));

        assert!(!a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_wall_short_of_the_line() {
        // Wall spans y in [10, 50], never reaching y = 0
        let line = Segment::new(Point::new(0.0, 0.0), Point::new(200.0, 0.0));
        let wall = Segment::new(Point::new(100.0, 10.0), Point::new(100.0, 50.0));

        assert!(!line.intersects(&wall));
    }

    #[test]
    fn test_zero_length_segment_never_crosses() {
        let p = Point::new(50.0, 50.0);
        let degenerate = Segment::new(p, p);
        let wall = Segment::new(Point::new(0.0, 0.0), Point::new(100.0, 100.0));

        assert!(!degenerate.intersects(&wall));
    }

    #[test]
    fn test_quadratic_endpoints_and_midpoint() {
        let p0 = Point::new(0.0, 0.0);
        let pc = Point::new(100.0, 80.0);
        let p1 = Point::new(200.0, 0.0);

        assert_eq!(quadratic_point(0.0, &p0, &pc, &p1), p0);
        assert_eq!(quadratic_point(1.0, &p0, &pc, &p1), p1);
        assert_eq!(quadratic_point(0.5, &p0, &pc, &p1), Point::new(100.0, 40.0));
    }

    #[test]
    fn test_midpoint_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(6.0, 8.0);

        assert_eq!(a.midpoint(&b), Point::new(3.0, 4.0));
        assert!((a.distance_to(&b) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_finite() {
        assert!(Point::new(1.0, -2.0).is_finite());
        assert!(!Point::new(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
    }
}
