//! Stateless helpers shared by the locomotion code: linear evaluation of
//! floors and walls, sign/clamp utilities, and the half-plane predicates that
//! suppress false wall contacts at floor/wall junctions.

use crate::segment::Segment;
use crate::vector::Vec2;

/// Every tolerance used by the geometry predicates.
pub mod tolerance {
    /// Magnitudes below this are treated as zero by [`super::sgn`].
    pub const SIGN: f64 = 1e-9;
    /// Cross products below this place a point on or below a line.
    pub const BELOW_LINE: f64 = 1e-9;
    /// Height slack when comparing wall endpoints against the character.
    pub const HEIGHT: f64 = 1e-9;
}

/// Evaluate `y` at `x` on the infinite line through a floor segment.
///
/// Vertical segments produce a non-finite result.
pub fn eval_at_x(s: &Segment, x: f64) -> f64 {
    let (first, second) = if s.p.x < s.q.x { (s.p, s.q) } else { (s.q, s.p) };
    let t = (x - first.x) / (second.x - first.x);
    first.y + (second.y - first.y) * t
}

/// Evaluate `x` at `y` on the infinite line through a wall segment.
///
/// Horizontal segments produce a non-finite result.
pub fn eval_at_y(s: &Segment, y: f64) -> f64 {
    let t = (y - s.p.y) / (s.q.y - s.p.y);
    s.p.x - (s.p.x - s.q.x) * t
}

/// -1, 0 or 1. Values inside the [`tolerance::SIGN`] band count as zero.
pub fn sgn(x: f64) -> f64 {
    if x.abs() < tolerance::SIGN {
        0.0
    } else if x > 0.0 {
        1.0
    } else {
        -1.0
    }
}

pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x < lo {
        lo
    } else if x > hi {
        hi
    } else {
        x
    }
}

/// Move `x` towards zero by `delta` without crossing it.
pub fn converge_to_zero(x: f64, delta: f64) -> f64 {
    if x.abs() <= delta {
        return 0.0;
    }
    x - sgn(x) * delta
}

/// Same segment with endpoints ordered by ascending x.
fn ascending_x(s: &Segment) -> Segment {
    if s.p.x < s.q.x {
        *s
    } else {
        Segment::new(s.q, s.p)
    }
}

fn point_below_line(r: Vec2, line: &Segment) -> bool {
    (line.q - line.p).cross(r - line.p) < tolerance::BELOW_LINE
}

/// Whether both endpoints of `wall` lie on or below the line of `floor`.
///
/// Such walls hang under the floor the character stands on and must not
/// register as contacts.
pub fn wall_below_floor(wall: &Segment, floor: &Segment) -> bool {
    let floor = ascending_x(floor);
    point_below_line(wall.p, &floor) && point_below_line(wall.q, &floor)
}

/// Position-only variant of [`wall_below_floor`], used when no floor is
/// cached.
///
/// True when the point lies on the lower side of the wall as authored
/// (`p` to `q`), or when the whole wall sits at or below the point's height.
pub fn wall_below_character(wall: &Segment, point: Vec2) -> bool {
    if point_below_line(point, wall) {
        return true;
    }
    let top = point.y + tolerance::HEIGHT;
    wall.p.y <= top && wall.q.y <= top
}

/// Side a wall pushes the character towards: `1.0` (right) when the wall was
/// authored top to bottom, `-1.0` (left) otherwise.
///
/// Maps depend on this authoring order; see DESIGN.md.
pub fn wall_direction(wall: &Segment) -> f64 {
    if wall.p.y - wall.q.y > 0.0 { 1.0 } else { -1.0 }
}

/// Unit direction along a floor with a non-negative x component.
///
/// Scaling it by a signed horizontal speed moves the character left or right
/// while following the slope.
pub fn movement_direction(floor: &Segment) -> Vec2 {
    let dir = floor.p.unit_dir(floor.q);
    Vec2::new(dir.x.abs(), dir.y)
}
