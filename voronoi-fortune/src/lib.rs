//--------------------------------------------------------------------
// lib.rs
//--------------------------------------------------------------------
// Declaration of all modules occurs here
//--------------------------------------------------------------------

#[cfg_attr(test, macro_use)]
extern crate approx;
extern crate derive_more;
extern crate ordered_float;
extern crate roots;
extern crate arrayvec;
#[macro_use]
extern crate log;

mod geometry;
mod error;
mod site;
mod dcel;
mod union_find;
mod fortune;

pub use geometry::{Coord, Vec2, COLLINEARITY_TOLERANCE, VERTEX_MERGE_TOLERANCE};
pub use error::{VoronoiError, Result};
pub use site::Site;
pub use dcel::*;
pub use fortune::*;
