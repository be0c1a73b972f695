//--------------------------------------------------------------------
// coord_utils.rs
//--------------------------------------------------------------------
// Provides utilities and tolerances to work with the coordinate type
//--------------------------------------------------------------------

use super::*;

/// Triangles with an area below this are considered degenerate
pub const COLLINEARITY_TOLERANCE: Coord = 1e-6;

/// Voronoi vertices closer than this are merged when the diagram is finalised
pub const VERTEX_MERGE_TOLERANCE: Coord = 1e-6;

pub const EPSILON: Coord = COLLINEARITY_TOLERANCE;
pub const EPSILON2: Coord = EPSILON * EPSILON;

// Some utility functions for Coord
// trait used only for implementation
pub trait Geometry where Self: Sized {
    fn roughly_zero(self) -> bool;
    fn roughly_zero_squared(self) -> bool;
    fn roughly_equals(self, other: Self) -> bool;
}

impl Geometry for Coord {
    fn roughly_zero(self) -> bool { self > -EPSILON && self < EPSILON }
    fn roughly_zero_squared(self) -> bool { self > -EPSILON2 && self < EPSILON2 }
    fn roughly_equals(self, other: Self) -> bool { (self - other).roughly_zero() }
}
