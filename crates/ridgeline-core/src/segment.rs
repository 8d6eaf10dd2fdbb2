use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

/// A directed line segment from `p` to `q`.
///
/// Direction matters for slope-following and wall facing; the distance and
/// projection tests below are symmetric in the endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p: Vec2,
    pub q: Vec2,
}

impl Segment {
    pub const fn new(p: Vec2, q: Vec2) -> Self {
        Self { p, q }
    }

    pub fn length(&self) -> f64 {
        self.p.dist(self.q)
    }

    pub fn is_finite(&self) -> bool {
        self.p.is_finite() && self.q.is_finite()
    }

    /// Rigidly move both endpoints by `v`.
    pub fn translate(&mut self, v: Vec2) {
        self.p += v;
        self.q += v;
    }

    /// Distance from `r` to the closest point of the segment.
    pub fn dist(&self, r: Vec2) -> f64 {
        let Self { p, q } = *self;
        if (q - p).dot(r - p) <= 0.0 {
            return p.dist(r);
        }
        if (p - q).dot(r - q) <= 0.0 {
            return q.dist(r);
        }
        (q - p).cross(r - p).abs() / p.dist(q)
    }

    /// Strict: a circle exactly tangent to the segment does not intersect it.
    pub fn intersects_circle(&self, center: Vec2, radius: f64) -> bool {
        self.dist(center) < radius
    }

    /// Orthogonal projection of `r` onto the segment's line, or `r` itself
    /// when the projection would fall outside the endpoints.
    pub fn closest_point_projection(&self, r: Vec2) -> Vec2 {
        let Self { p, q } = *self;
        if (q - p).dot(r - p) <= 0.0 || (p - q).dot(r - q) <= 0.0 {
            return r;
        }
        let d = q - p;
        p + d * (d.dot(r - p) / d.dot(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Vec2::new(x1, y1), Vec2::new(x2, y2))
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn dist_inside_and_beyond_endpoints() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert_close(s.dist(Vec2::new(5.0, 0.0)), 0.0);
        assert_close(s.dist(Vec2::new(5.0, 1.0)), 1.0);
        assert_close(s.dist(Vec2::new(-1.0, 1.0)), 2f64.sqrt());
        assert_close(s.dist(Vec2::new(11.0, 1.0)), 2f64.sqrt());
    }

    #[test]
    fn dist_ignores_endpoint_order() {
        let a = seg(0.0, 0.0, 10.0, 4.0);
        let b = seg(10.0, 4.0, 0.0, 0.0);
        for r in [
            Vec2::new(3.0, 7.0),
            Vec2::new(-4.0, 1.0),
            Vec2::new(12.0, 2.0),
        ] {
            assert_close(a.dist(r), b.dist(r));
        }
    }

    #[test]
    fn dist_zero_length_segment_is_point_distance() {
        let s = seg(2.0, 2.0, 2.0, 2.0);
        assert_close(s.dist(Vec2::new(5.0, 6.0)), 5.0);
    }

    #[test]
    fn tangent_circle_does_not_intersect() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert!(!s.intersects_circle(Vec2::new(5.0, 5.0), 5.0));
        assert!(s.intersects_circle(Vec2::new(5.0, 4.999), 5.0));
    }

    #[test]
    fn projection_onto_segment() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        let p = s.closest_point_projection(Vec2::new(5.0, 1.0));
        assert_close(p.x, 5.0);
        assert_close(p.y, 0.0);
    }

    #[test]
    fn projection_of_point_on_segment_is_itself() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        let p = s.closest_point_projection(Vec2::new(6.0, 0.0));
        assert_close(p.x, 6.0);
        assert_close(p.y, 0.0);
    }

    #[test]
    fn projection_unbracketed_returns_input() {
        let s = seg(0.0, 0.0, 10.0, 0.0);
        assert_eq!(
            s.closest_point_projection(Vec2::new(15.0, 4.0)),
            Vec2::new(15.0, 4.0)
        );
        assert_eq!(
            s.closest_point_projection(Vec2::new(15.0, 0.0)),
            Vec2::new(15.0, 0.0)
        );
        assert_eq!(
            s.closest_point_projection(Vec2::new(-3.0, 2.0)),
            Vec2::new(-3.0, 2.0)
        );
    }

    #[test]
    fn projection_on_slope() {
        let s = seg(0.0, 0.0, 4.0, 4.0);
        let p = s.closest_point_projection(Vec2::new(0.0, 4.0));
        assert_close(p.x, 2.0);
        assert_close(p.y, 2.0);
    }

    #[test]
    fn translate_moves_both_endpoints() {
        let mut s = seg(0.0, 0.0, 10.0, 0.0);
        s.translate(Vec2::new(1.0, -2.0));
        assert_eq!(s, seg(1.0, -2.0, 11.0, -2.0));
        assert_close(s.length(), 10.0);
    }
}
