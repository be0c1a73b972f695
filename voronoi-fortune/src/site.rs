//--------------------------------------------------------------------
// site.rs
//--------------------------------------------------------------------
// Provides the input site of a Voronoi diagram
//--------------------------------------------------------------------

use crate::geometry::*;

/// An input point of the diagram. The user data is copied verbatim to
/// the face the site generates.
#[derive(Clone, Debug, PartialEq)]
pub struct Site<T> {
    pub position: Vec2,
    pub user_data: T
}

impl<T> Site<T> {
    pub fn new(position: Vec2, user_data: T) -> Site<T> { Site { position, user_data } }
}

impl Site<()> {
    pub fn at(x: Coord, y: Coord) -> Site<()> { Site::new(Vec2::new(x, y), ()) }
}

impl<T> std::fmt::Display for Site<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Site{}", self.position)
    }
}
