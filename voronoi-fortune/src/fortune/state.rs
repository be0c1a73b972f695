//--------------------------------------------------------------------
// state.rs
//--------------------------------------------------------------------
// Provides the state of the sweep line as it moves down the plane,
// and the handling of site and circle events
//--------------------------------------------------------------------

use crate::arrayvec::ArrayVec;
use crate::geometry::*;
use crate::error::*;
use crate::site::Site;
use crate::dcel::Dcel;
use super::beach_line::*;
use super::events::Event;
use super::predicates::*;
use super::priority_queue::PriorityQueue;

pub struct SweepState<T> {
    sweep_y: Coord,
    sites: Vec<SiteRef>,
    queue: PriorityQueue<Event>,
    beach_line: BeachLine,
    dcel: Dcel<T>,
    // Below one unit, the tolerances shrink with the extent of the sites
    scale: Coord
}

// The larger side of the bounding box of the sites, capped at one
fn tolerance_scale(sites: &[SiteRef]) -> Coord {
    let mut positions = sites.iter().map(|site| site.position);
    let first = match positions.next() {
        Some(position) => position,
        None => return 1.0
    };

    let (min, max) = positions.fold((first, first), |(min, max), p|
        (Vec2::new(min.x.min(p.x), min.y.min(p.y)), Vec2::new(max.x.max(p.x), max.y.max(p.y))));
    let extent = (max.x - min.x).max(max.y - min.y);
    if extent > 0.0 { extent.min(1.0) } else { 1.0 }
}

impl<T> SweepState<T> {
    pub fn new(sites: impl IntoIterator<Item = Site<T>>) -> SweepState<T> {
        let mut site_refs = Vec::new();
        let dcel = Dcel::with_faces(sites.into_iter().enumerate().map(|(index, site)| {
            site_refs.push(SiteRef { index, position: site.position });
            (site.position, site.user_data)
        }));

        let mut queue = PriorityQueue::new(Event::sweep_order);
        for site in &site_refs {
            queue.enqueue(Event::Site { site: site.index, position: site.position });
        }

        let scale = tolerance_scale(&site_refs);
        SweepState { sweep_y: CoordM::INFINITY, sites: site_refs, queue, beach_line: BeachLine::new(), dcel, scale }
    }

    /// Processes every event and returns the finished diagram
    pub fn run(mut self) -> Result<Dcel<T>> {
        debug!("Sweeping over {} sites", self.sites.len());

        while !self.queue.is_empty() {
            let event = self.queue.dequeue()?;
            let y = event.y();
            sanity_check(y <= self.sweep_y,
                || format!("event at y = {} is above the sweep line at y = {}", y, self.sweep_y))?;
            self.sweep_y = y;

            match event {
                Event::Site { site, .. } => self.handle_site_event(site)?,
                Event::Circle { arc, center, .. } => self.handle_circle_event(arc, center)?
            }
            trace!("Beach line: {}", self.beach_line);
            self.dcel.print();
        }

        let dcel = self.dcel.finalize(self.scale)?;
        debug!("Finished with {} vertices and {} edges", dcel.vertices().len(), dcel.edge_count());
        Ok(dcel)
    }

    fn handle_site_event(&mut self, index: usize) -> Result<()> {
        let site = self.sites[index];
        debug!("Site event for site {} at {}", index, site.position);

        if self.beach_line.is_empty() {
            self.beach_line.insert_root_arc(site)?;
            return Ok(());
        }

        let arc = self.beach_line.find_arc_under_site(site.position.x, self.sweep_y)?;
        self.cancel_circle_event(arc)?;

        let old = self.beach_line.arc(arc)?.site;
        let (old_edge, new_edge) = self.dcel.pair_of_edges(old.index, site.index);

        // The arcs which may now vanish between their new neighbours
        let mut candidates = ArrayVec::<[NodeId; 2]>::new();
        if old.position.y == site.position.y {
            // The arc above is still a vertical ray, so there is nothing to split
            let (left, right) = self.beach_line.insert_beside(arc, site, old_edge, new_edge)?;
            candidates.push(left);
            candidates.push(right);
        } else {
            let split = self.beach_line.split_arc(arc, site, old_edge, new_edge)?;
            candidates.push(split.left);
            candidates.push(split.right);
        }

        for arc in candidates { self.schedule_circle_event(arc)?; }
        Ok(())
    }

    fn handle_circle_event(&mut self, arc: NodeId, center: Vec2) -> Result<()> {
        debug!("Circle event for arc {} with center {}", arc, center);
        self.beach_line.arc_mut(arc)?.circle_event = None;

        let missing = |side: &str| VoronoiError::SanityCheckFailed(format!("vanishing arc {} has no {} neighbor", arc, side));
        let (left, left_bp) = self.beach_line.left_neighbor(arc)?.ok_or_else(|| missing("left"))?;
        let (right, right_bp) = self.beach_line.right_neighbor(arc)?.ok_or_else(|| missing("right"))?;
        self.cancel_circle_event(left)?;
        self.cancel_circle_event(right)?;

        // Both traced edges end at the new vertex, and a new one starts going down
        let left_face = self.beach_line.arc(left)?.site.index;
        let right_face = self.beach_line.arc(right)?.site.index;
        let left_edge = self.beach_line.breakpoint(left_bp)?.half_edge;
        let right_edge = self.beach_line.breakpoint(right_bp)?.half_edge;
        let (below, _) = self.dcel.pair_of_edges(left_face, right_face);
        self.dcel.close_vertex(center, left_edge, right_edge, below);

        self.beach_line.remove_arc(arc, below)?;
        self.schedule_circle_event(left)?;
        self.schedule_circle_event(right)
    }

    // Drops the pending event of an arc whose neighbourhood changed
    fn cancel_circle_event(&mut self, arc: NodeId) -> Result<()> {
        if let Some(handle) = self.beach_line.arc_mut(arc)?.circle_event.take() {
            trace!("Cancelling the circle event of arc {}", arc);
            self.queue.remove(handle)?;
        }
        Ok(())
    }

    // Queues the event where `arc` vanishes, if its breakpoints ever meet
    fn schedule_circle_event(&mut self, arc: NodeId) -> Result<()> {
        self.cancel_circle_event(arc)?;

        let (left, right) = match (self.beach_line.left_neighbor(arc)?, self.beach_line.right_neighbor(arc)?) {
            (Some((left, _)), Some((right, _))) => (left, right),
            _ => return Ok(())
        };

        let left = self.beach_line.arc(left)?.site;
        let middle = self.beach_line.arc(arc)?.site;
        let right = self.beach_line.arc(right)?.site;
        if left.index == right.index { return Ok(()); }
        if !breakpoints_converge(left.position, middle.position, right.position)? { return Ok(()); }

        let center = match circle_center(left.position, middle.position, right.position) {
            Ok(center) => center,
            Err(VoronoiError::CollinearPoints(..)) => return Ok(()),
            Err(err) => return Err(err)
        };

        // The arc vanishes when the sweep line reaches the bottom of the circle
        let mut y = center.y - center.distance(middle.position);
        if y > self.sweep_y {
            if y - self.sweep_y > COLLINEARITY_TOLERANCE * self.scale {
                warn!("Dropping the circle event at y = {} for arc {}, above the sweep line at y = {}",
                    y, arc, self.sweep_y);
                return Ok(());
            }
            y = self.sweep_y;
        }

        trace!("Scheduling the circle event of arc {} at y = {}, center {}", arc, y, center);
        let handle = self.queue.enqueue(Event::Circle { arc, y, center });
        self.beach_line.arc_mut(arc)?.circle_event = Some(handle);
        Ok(())
    }
}
