//--------------------------------------------------------------------
// vec2.rs
//--------------------------------------------------------------------
// Provides a two-element vector class, used both for the input sites
// and for every derived point of the diagram
//--------------------------------------------------------------------

use crate::derive_more::*;
use crate::approx::{AbsDiffEq, RelativeEq};

use super::*;

// Vec2
#[derive(Copy, Clone, Add, Sub, Mul, Div, AddAssign, SubAssign, Neg, PartialEq,
    MulAssign, DivAssign, From, Into, Display, Constructor)]
#[display(fmt = "({},{})", x, y)]
pub struct Vec2 { pub x: Coord, pub y: Coord }

impl Vec2 {
    pub fn zero() -> Vec2 { Vec2 { x: 0.0, y: 0.0 } }

    pub fn dot(&self, other: Vec2) -> Coord { self.x * other.x + self.y * other.y }
    pub fn cross(&self, other: Vec2) -> Coord { self.x * other.y - self.y * other.x }

    pub fn length_sq(&self) -> Coord { self.dot(*self) }
    pub fn length(&self) -> Coord { self.length_sq().sqrt() }
    pub fn normalized(&self) -> Vec2 { *self / self.length() }

    pub fn ccw_perpendicular(&self) -> Vec2 { Vec2 { x: -self.y, y: self.x } }
    pub fn cw_perpendicular(&self) -> Vec2 { -self.ccw_perpendicular() }

    pub fn midpoint(&self, other: Vec2) -> Vec2 { 0.5 * (*self + other) }
    pub fn distance(&self, other: Vec2) -> Coord { (*self - other).length() }

    pub fn is_zero(&self) -> bool { self.x == 0.0 && self.y == 0.0 }
    pub fn roughly_zero(&self) -> bool { self.length_sq().roughly_zero_squared() }
    pub fn roughly_equals(&self, other: Vec2) -> bool { (*self - other).length_sq().roughly_zero_squared() }
}

// Implement scalar * mul as required
impl core::ops::Mul<Vec2> for Coord {
    type Output = Vec2;
    fn mul(self, rhs: Vec2) -> Vec2 { Vec2::new(self * rhs.x, self * rhs.y) }
}

impl std::fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

// Component-wise tolerant comparisons, so tests and the finaliser can use approx
impl AbsDiffEq for Vec2 {
    type Epsilon = Coord;

    fn default_epsilon() -> Coord { Coord::default_epsilon() }

    fn abs_diff_eq(&self, other: &Vec2, epsilon: Coord) -> bool {
        self.x.abs_diff_eq(&other.x, epsilon) && self.y.abs_diff_eq(&other.y, epsilon)
    }
}

impl RelativeEq for Vec2 {
    fn default_max_relative() -> Coord { Coord::default_max_relative() }

    fn relative_eq(&self, other: &Vec2, epsilon: Coord, max_relative: Coord) -> bool {
        self.x.relative_eq(&other.x, epsilon, max_relative) && self.y.relative_eq(&other.y, epsilon, max_relative)
    }
}
