//--------------------------------------------------------------------
// beach_line.rs
//--------------------------------------------------------------------
// Provides the beach line: a binary tree whose leaves are the parabolic
// arcs in left-to-right order and whose inner nodes are the breakpoints
// between them. Nodes live in an arena and refer to each other by index.
//--------------------------------------------------------------------

use std::fmt;
use crate::geometry::*;
use crate::error::*;
use super::predicates::breakpoint_x;
use super::priority_queue::QueueHandle;

pub type NodeId = usize;

/// An input site as the beach line sees it: its index (which is also its face) and position
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SiteRef {
    pub index: usize,
    pub position: Vec2
}

#[derive(Clone, Debug)]
pub struct ArcNode {
    pub site: SiteRef,
    /// The pending event where this arc vanishes, if any
    pub circle_event: Option<QueueHandle>,
    pub parent: Option<NodeId>
}

impl ArcNode {
    fn new(site: SiteRef) -> ArcNode { ArcNode { site, circle_event: None, parent: None } }
}

/// The meeting point of two neighbouring arcs, tracing a Voronoi edge
#[derive(Clone, Debug)]
pub struct BreakpointNode {
    /// Site of the arc to the left of the breakpoint
    pub left_site: SiteRef,
    /// Site of the arc to the right of the breakpoint
    pub right_site: SiteRef,
    /// The half-edge being traced, which borders the face of `left_site`
    pub half_edge: usize,
    /// Whether this is the left of the two intersections of the parabolas
    pub is_left: bool,
    pub left: NodeId,
    pub right: NodeId,
    pub parent: Option<NodeId>
}

impl BreakpointNode {
    /// The x coordinate of the breakpoint for the sweep line at `sweep_y`.
    /// A site lying on the sweep line has a degenerate parabola: a vertical ray at its x.
    pub fn x_at(&self, sweep_y: Coord) -> Result<Coord> {
        let (p, q) = (self.left_site.position, self.right_site.position);
        match (p.y == sweep_y, q.y == sweep_y) {
            (true, true) => Ok(0.5 * (p.x + q.x)),
            (true, false) => Ok(p.x),
            (false, true) => Ok(q.x),
            (false, false) => breakpoint_x(sweep_y, p, q, self.is_left)
        }
    }
}

#[derive(Clone, Debug)]
pub enum BeachNode {
    Arc(ArcNode),
    Breakpoint(BreakpointNode)
}

impl BeachNode {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            BeachNode::Arc(arc) => arc.parent,
            BeachNode::Breakpoint(bp) => bp.parent
        }
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            BeachNode::Arc(arc) => arc.parent = parent,
            BeachNode::Breakpoint(bp) => bp.parent = parent
        }
    }
}

/// The three arcs left where a new site split an arc
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitArcs {
    pub left: NodeId,
    pub middle: NodeId,
    pub right: NodeId
}

#[derive(Clone, Debug, Default)]
pub struct BeachLine {
    nodes: Vec<Option<BeachNode>>,
    free: Vec<NodeId>,
    root: Option<NodeId>
}

fn not_an_arc(node: NodeId) -> VoronoiError {
    VoronoiError::SanityCheckFailed(format!("beach line node {} is not an arc", node))
}

fn not_a_breakpoint(node: NodeId) -> VoronoiError {
    VoronoiError::SanityCheckFailed(format!("beach line node {} is not a breakpoint", node))
}

impl BeachLine {
    pub fn new() -> BeachLine { BeachLine::default() }

    pub fn root(&self) -> Option<NodeId> { self.root }
    pub fn is_empty(&self) -> bool { self.root.is_none() }

    // The number of nodes currently in the tree
    #[cfg(test)]
    fn len(&self) -> usize { self.nodes.len() - self.free.len() }

    fn alloc(&mut self, node: BeachNode) -> NodeId {
        match self.free.pop() {
            Some(id) => { self.nodes[id] = Some(node); id },
            None => { self.nodes.push(Some(node)); self.nodes.len() - 1 }
        }
    }

    fn release(&mut self, id: NodeId) -> Result<BeachNode> {
        let node = self.nodes.get_mut(id).and_then(Option::take).ok_or_else(||
            VoronoiError::SanityCheckFailed(format!("beach line node {} released twice", id)))?;
        self.free.push(id);
        Ok(node)
    }

    pub fn node(&self, id: NodeId) -> Result<&BeachNode> {
        self.nodes.get(id).and_then(Option::as_ref).ok_or_else(||
            VoronoiError::SanityCheckFailed(format!("dangling beach line node {}", id)))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut BeachNode> {
        self.nodes.get_mut(id).and_then(Option::as_mut).ok_or_else(||
            VoronoiError::SanityCheckFailed(format!("dangling beach line node {}", id)))
    }

    pub fn arc(&self, id: NodeId) -> Result<&ArcNode> {
        match self.node(id)? { BeachNode::Arc(arc) => Ok(arc), _ => Err(not_an_arc(id)) }
    }

    pub fn arc_mut(&mut self, id: NodeId) -> Result<&mut ArcNode> {
        match self.node_mut(id)? { BeachNode::Arc(arc) => Ok(arc), _ => Err(not_an_arc(id)) }
    }

    pub fn breakpoint(&self, id: NodeId) -> Result<&BreakpointNode> {
        match self.node(id)? { BeachNode::Breakpoint(bp) => Ok(bp), _ => Err(not_a_breakpoint(id)) }
    }

    fn breakpoint_mut(&mut self, id: NodeId) -> Result<&mut BreakpointNode> {
        match self.node_mut(id)? { BeachNode::Breakpoint(bp) => Ok(bp), _ => Err(not_a_breakpoint(id)) }
    }

    /// Starts the beach line with the arc of the first site
    pub fn insert_root_arc(&mut self, site: SiteRef) -> Result<NodeId> {
        sanity_check(self.is_empty(), || "the beach line already has a root".to_owned())?;
        let root = self.alloc(BeachNode::Arc(ArcNode::new(site)));
        self.root = Some(root);
        Ok(root)
    }

    /// Finds the arc directly above `site_x` for the sweep line at `sweep_y`
    pub fn find_arc_under_site(&self, site_x: Coord, sweep_y: Coord) -> Result<NodeId> {
        let mut current = self.root.ok_or_else(||
            VoronoiError::InvalidArgument("cannot search an empty beach line".to_owned()))?;

        loop {
            match self.node(current)? {
                BeachNode::Arc(_) => return Ok(current),
                BeachNode::Breakpoint(bp) =>
                    current = if site_x <= bp.x_at(sweep_y)? { bp.left } else { bp.right }
            }
        }
    }

    fn leftmost_arc(&self, mut node: NodeId) -> Result<NodeId> {
        while let BeachNode::Breakpoint(bp) = self.node(node)? { node = bp.left; }
        Ok(node)
    }

    fn rightmost_arc(&self, mut node: NodeId) -> Result<NodeId> {
        while let BeachNode::Breakpoint(bp) = self.node(node)? { node = bp.right; }
        Ok(node)
    }

    /// The arc to the left of `node` and the breakpoint separating them
    pub fn left_neighbor(&self, node: NodeId) -> Result<Option<(NodeId, NodeId)>> {
        let mut child = node;
        while let Some(parent) = self.node(child)?.parent() {
            let bp = self.breakpoint(parent)?;
            if bp.right == child { return Ok(Some((self.rightmost_arc(bp.left)?, parent))); }
            child = parent;
        }
        Ok(None)
    }

    /// The arc to the right of `node` and the breakpoint separating them
    pub fn right_neighbor(&self, node: NodeId) -> Result<Option<(NodeId, NodeId)>> {
        let mut child = node;
        while let Some(parent) = self.node(child)?.parent() {
            let bp = self.breakpoint(parent)?;
            if bp.left == child { return Ok(Some((self.leftmost_arc(bp.right)?, parent))); }
            child = parent;
        }
        Ok(None)
    }

    /// All the arcs from left to right
    pub fn arcs(&self) -> Result<Vec<NodeId>> {
        let mut arcs = Vec::new();
        let mut current = match self.root {
            Some(root) => Some(self.leftmost_arc(root)?),
            None => None
        };

        while let Some(arc) = current {
            arcs.push(arc);
            current = self.right_neighbor(arc)?.map(|(next, _)| next);
        }
        Ok(arcs)
    }

    // Puts `new` where `old` hangs in the tree
    fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        let parent = self.node(old)?.parent();
        self.node_mut(new)?.set_parent(parent);

        match parent {
            None => {
                sanity_check(self.root == Some(old), || format!("orphaned beach line node {}", old))?;
                self.root = Some(new);
            },
            Some(parent) => {
                let bp = self.breakpoint_mut(parent)?;
                if bp.left == old { bp.left = new; }
                else if bp.right == old { bp.right = new; }
                else { return Err(VoronoiError::SanityCheckFailed(format!(
                    "beach line node {} is not a child of its parent {}", old, parent))); }
            }
        }
        Ok(())
    }

    // A breakpoint with two arcs below it
    fn alloc_breakpoint(&mut self, left_site: SiteRef, right_site: SiteRef, half_edge: usize, is_left: bool,
        left: NodeId, right: NodeId) -> Result<NodeId> {
        let bp = self.alloc(BeachNode::Breakpoint(BreakpointNode {
            left_site, right_site, half_edge, is_left, left, right, parent: None
        }));
        self.node_mut(left)?.set_parent(Some(bp));
        self.node_mut(right)?.set_parent(Some(bp));
        Ok(bp)
    }

    /// Splits `arc` around the arc of a new site below it.
    ///
    /// `left_edge` borders the face of the split arc and is traced by the left
    /// breakpoint, `right_edge` borders the new face and is traced by the right one.
    pub fn split_arc(&mut self, arc: NodeId, site: SiteRef, left_edge: usize, right_edge: usize) -> Result<SplitArcs> {
        let old = self.arc(arc)?.site;
        sanity_check(self.arc(arc)?.circle_event.is_none(),
            || format!("splitting arc {} with a pending circle event", arc))?;

        let left = self.alloc(BeachNode::Arc(ArcNode::new(old)));
        let middle = self.alloc(BeachNode::Arc(ArcNode::new(site)));
        let right = self.alloc(BeachNode::Arc(ArcNode::new(old)));

        let right_bp = self.alloc_breakpoint(site, old, right_edge, false, middle, right)?;
        let left_bp = self.alloc_breakpoint(old, site, left_edge, true, left, right_bp)?;

        self.replace(arc, left_bp)?;
        self.release(arc)?;
        Ok(SplitArcs { left, middle, right })
    }

    /// Puts the arc of a new site next to `arc`, when both sites are on the sweep line.
    ///
    /// `old_edge` borders the face of `arc` and `new_edge` the face of the new site;
    /// the breakpoint traces whichever borders the arc that ends up on the left.
    pub fn insert_beside(&mut self, arc: NodeId, site: SiteRef, old_edge: usize, new_edge: usize) -> Result<(NodeId, NodeId)> {
        let old = self.arc(arc)?.site;
        sanity_check(self.arc(arc)?.circle_event.is_none(),
            || format!("splitting arc {} with a pending circle event", arc))?;

        let (left_site, right_site, half_edge) =
            if site.position.x > old.position.x { (old, site, old_edge) } else { (site, old, new_edge) };

        let left = self.alloc(BeachNode::Arc(ArcNode::new(left_site)));
        let right = self.alloc(BeachNode::Arc(ArcNode::new(right_site)));
        let bp = self.alloc_breakpoint(left_site, right_site, half_edge, true, left, right)?;

        self.replace(arc, bp)?;
        self.release(arc)?;
        Ok((left, right))
    }

    /// Removes a vanishing arc along with one of the breakpoints around it.
    /// The other breakpoint now separates the former neighbours and traces
    /// `half_edge`; its id is returned.
    pub fn remove_arc(&mut self, arc: NodeId, half_edge: usize) -> Result<NodeId> {
        let missing = |side: &str| VoronoiError::SanityCheckFailed(format!("vanishing arc {} has no {} neighbor", arc, side));
        let (left, left_bp) = self.left_neighbor(arc)?.ok_or_else(|| missing("left"))?;
        let (right, right_bp) = self.right_neighbor(arc)?.ok_or_else(|| missing("right"))?;

        // The parent of the arc is one of the two breakpoints around it
        let parent = self.arc(arc)?.parent.ok_or_else(||
            VoronoiError::SanityCheckFailed(format!("orphaned beach line node {}", arc)))?;
        let survivor = if parent == left_bp { right_bp } else { left_bp };
        sanity_check(parent == left_bp || parent == right_bp,
            || format!("arc {} hangs from breakpoint {}, which does not border it", arc, parent))?;

        let sibling = {
            let bp = self.breakpoint(parent)?;
            if bp.left == arc { bp.right } else { bp.left }
        };
        self.replace(parent, sibling)?;
        self.release(arc)?;
        self.release(parent)?;

        let left_site = self.arc(left)?.site;
        let right_site = self.arc(right)?.site;
        let bp = self.breakpoint_mut(survivor)?;
        bp.left_site = left_site;
        bp.right_site = right_site;
        bp.half_edge = half_edge;
        bp.is_left = left_site.position.y > right_site.position.y;
        Ok(survivor)
    }
}

impl fmt::Display for BeachLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arcs = match self.arcs() {
            Ok(arcs) => arcs,
            Err(_) => return write!(f, "<corrupted beach line>")
        };

        write!(f, "[")?;
        for (i, &arc) in arcs.iter().enumerate() {
            if i > 0 { write!(f, " ")?; }
            match self.arc(arc) {
                Ok(node) => write!(f, "{}", node.site.index)?,
                Err(_) => write!(f, "?")?
            }
        }
        write!(f, "]")
    }
}
