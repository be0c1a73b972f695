//--------------------------------------------------------------------
// events.rs
//--------------------------------------------------------------------
// Provides the events the sweep line stops at
//--------------------------------------------------------------------

use std::cmp::Ordering;
use crate::ordered_float::OrderedFloat;
use crate::geometry::*;
use super::beach_line::NodeId;

#[derive(Clone, Debug)]
pub enum Event {
    /// The sweep line reaches an input site
    Site { site: usize, position: Vec2 },
    /// The arc `arc` shrinks to a point, leaving a vertex at `center`.
    /// `y` is the bottom of the circle, where the sweep line is when that happens.
    Circle { arc: NodeId, y: Coord, center: Vec2 }
}

impl Event {
    pub fn y(&self) -> Coord {
        match self {
            Event::Site { position, .. } => position.y,
            Event::Circle { y, .. } => *y
        }
    }

    // Higher events come first; on a tie circle events go before sites,
    // and sites on the same line go from left to right
    fn sweep_key(&self) -> (OrderedFloat<Coord>, bool, OrderedFloat<Coord>) {
        match self {
            Event::Site { position, .. } => (OrderedFloat(position.y), false, OrderedFloat(-position.x)),
            Event::Circle { y, .. } => (OrderedFloat(*y), true, OrderedFloat(0.0))
        }
    }

    /// Orders events for a max-queue, so that the event the sweep meets first is the greatest
    pub fn sweep_order(a: &Event, b: &Event) -> Ordering {
        a.sweep_key().cmp(&b.sweep_key())
    }
}
