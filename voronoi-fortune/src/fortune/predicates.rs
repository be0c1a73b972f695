//--------------------------------------------------------------------
// predicates.rs
//--------------------------------------------------------------------
// Provides the geometric predicates the sweep is built on: circle
// centers, breakpoint positions, collinearity and the convergence of
// two breakpoints
//--------------------------------------------------------------------

use crate::geometry::*;
use crate::error::*;

/// Finds the center of the circle passing through three points.
///
/// Subtracting the circle equation of the first point from the other two
/// gives two linear equations in the center `(h, k)`; we solve for `k`
/// first and substitute back. The elimination pivots on the pair with
/// the widest x separation, so the triple is rotated before solving.
pub fn circle_center(a: Vec2, b: Vec2, c: Vec2) -> Result<Vec2> {
    let rotations = [(a, b, c), (b, c, a), (c, a, b)];
    let mut pivot = rotations[0];
    for &r in &rotations[1..] {
        if (r.0.x - r.1.x).abs() > (pivot.0.x - pivot.1.x).abs() { pivot = r; }
    }

    // Work relative to the first point
    let (origin, p, q) = pivot;
    let p = p - origin;
    let q = q - origin;

    // If either of these two denominators is 0, the points are collinear
    let k_denominator = 2.0 * p.cross(q);
    let h_denominator = 2.0 * p.x;
    if k_denominator == 0.0 || h_denominator == 0.0 {
        return Err(VoronoiError::CollinearPoints(a, b, c));
    }

    let k = (q.length_sq() * p.x - q.x * p.length_sq()) / k_denominator;
    let h = (p.length_sq() - 2.0 * p.y * k) / h_denominator;
    Ok(origin + Vec2::new(h, k))
}

// Coefficients of y = a*x^2 + b*x + c for the parabola of a site and the sweep line
fn parabola_coefficients(sweep_y: Coord, site: Vec2) -> (Coord, Coord, Coord) {
    let d = sweep_y - site.y;
    let a = -1.0 / (2.0 * d);
    let b = site.x / d;
    let c = (sweep_y * sweep_y - site.x * site.x - site.y * site.y) / (2.0 * d);
    (a, b, c)
}

/// Gets the x coordinate of one of the two points where the parabolas of
/// two sites meet, for the sweep line at `sweep_y`.
///
/// Two sites always define two such points, which trace out the edge
/// between them in opposite directions; `want_left` selects the one with
/// the smaller x coordinate.
pub fn breakpoint_x(sweep_y: Coord, site1: Vec2, site2: Vec2, want_left: bool) -> Result<Coord> {
    if sweep_y >= site1.y || sweep_y >= site2.y {
        return Err(VoronoiError::InvalidArgument(format!(
            "sweep line (y = {}) must be below both sites {} and {}", sweep_y, site1, site2)));
    }

    // Both breakpoints sit on the vertical bisector, avoid the division by zero below
    if site1.y == site2.y { return Ok(0.5 * (site1.x + site2.x)); }

    let (a1, b1, c1) = parabola_coefficients(sweep_y, site1);
    let (a2, b2, c2) = parabola_coefficients(sweep_y, site2);
    let (a, b, c) = (a1 - a2, b1 - b2, c1 - c2);

    // Two distinct sites always give two real roots
    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return Err(VoronoiError::SanityCheckFailed(format!(
            "discriminant was {} for sites {} and {} with the sweep line at y = {}",
            discriminant, site1, site2, sweep_y)));
    }

    // If the heights are close enough for `a` to cancel out, roots degrades to the linear root
    match roots::find_roots_quadratic(a, b, c).as_ref() {
        [x] => Ok(*x),
        [x1, x2] => Ok(if want_left { x1.min(*x2) } else { x1.max(*x2) }),
        _ => Err(VoronoiError::SanityCheckFailed(format!(
            "no breakpoint found for sites {} and {} with the sweep line at y = {}", site1, site2, sweep_y)))
    }
}

/// Whether the triangle formed by three points has (almost) no area
pub fn are_collinear(a: Vec2, b: Vec2, c: Vec2) -> bool {
    let area = 0.5 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    area.abs() < COLLINEARITY_TOLERANCE
}

// The offsets from left to middle and from middle to right, which must not vanish
fn site_offsets(left: Vec2, middle: Vec2, right: Vec2) -> Result<(Vec2, Vec2)> {
    let first = middle - left;
    let second = right - middle;
    if first.is_zero() || second.is_zero() {
        return Err(VoronoiError::SanityCheckFailed(format!(
            "coincident sites among {}, {} and {}", left, middle, right)));
    }
    Ok((first, second))
}

// The directions in which the breakpoints of (left, middle) and (middle, right) travel
// as the sweep line moves down, or None if the three sites are collinear
fn bisector_directions(left: Vec2, middle: Vec2, right: Vec2) -> Result<Option<(Vec2, Vec2)>> {
    let (first, second) = site_offsets(left, middle, right)?;
    if are_collinear(left, middle, right) { Ok(None) }
    else { Ok(Some((first.normalized().cw_perpendicular(), second.normalized().cw_perpendicular()))) }
}

/// Tests whether the perpendicular bisectors of (left, middle) and (middle, right),
/// taken as rays leaving the midpoints of both segments, meet ahead of both midpoints.
pub fn test_convergence(left: Vec2, middle: Vec2, right: Vec2) -> Result<bool> {
    let (d1, d2) = match bisector_directions(left, middle, right)? {
        Some(directions) => directions,
        None => return Ok(false)
    };

    // Parallel rays never meet
    let denominator = d1.cross(d2);
    if denominator == 0.0 { return Ok(false); }

    let offset = middle.midpoint(right) - left.midpoint(middle);
    let t1 = offset.cross(d2) / denominator;
    let t2 = offset.cross(d1) / denominator;
    Ok(t1 >= 0.0 && t2 >= 0.0)
}

/// Tests whether the breakpoints around the middle of three consecutive arcs will meet.
///
/// Both breakpoints travel along their bisectors in the directions given by
/// `bisector_directions`, so they converge exactly when the sites turn
/// clockwise from left to right. Unlike `test_convergence`, this accepts
/// triangles that are obtuse at an end site, for which the meeting point
/// lies behind a midpoint.
///
/// The degeneracy test is relative to the lengths of both offsets, so the
/// answer does not change when all three sites are scaled together.
pub fn breakpoints_converge(left: Vec2, middle: Vec2, right: Vec2) -> Result<bool> {
    let (first, second) = site_offsets(left, middle, right)?;
    let turn = first.cross(second);
    if turn.abs() < COLLINEARITY_TOLERANCE * first.length() * second.length() { return Ok(false); }
    Ok(turn < 0.0)
}
