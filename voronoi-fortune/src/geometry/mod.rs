//--------------------------------------------------------------------
// geometry.rs
//--------------------------------------------------------------------
// Provides the geometric constructs used by the sweep
//--------------------------------------------------------------------

mod coord_utils;
mod vec2;

pub type Coord = f64;
pub use std::f64 as CoordM;

pub use coord_utils::*;
pub use vec2::*;
