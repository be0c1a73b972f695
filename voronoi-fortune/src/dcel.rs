//------------------------------------------------------------------------------
// dcel.rs
//------------------------------------------------------------------------------
// Provides the Doubly-Connected Edge List the sweep writes the diagram
// into, along with the read-only queries offered on the finished diagram
//------------------------------------------------------------------------------

use crate::approx::AbsDiffEq;
use crate::geometry::*;
use crate::error::*;
use crate::union_find::UnionFind;

/// A Voronoi vertex, where three or more cells meet
#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: Vec2,
    /// One of the half-edges whose origin is this vertex
    pub leaving: usize
}

/// One side of a Voronoi edge, with its cell on its left.
///
/// A half-edge that runs off to infinity has no `next`, and its twin
/// has no `origin`. An edge unbounded in both directions has neither.
#[derive(Clone, Debug, PartialEq)]
pub struct HalfEdge {
    pub origin: Option<usize>,
    pub twin: usize,
    pub next: Option<usize>,
    pub face: usize
}

/// The Voronoi cell of one input site
#[derive(Clone, Debug, PartialEq)]
pub struct Face<T> {
    pub user_data: T,
    pub site: Vec2,
    /// One of the half-edges bounding the cell, if the diagram has any edges
    pub bordering: Option<usize>
}

#[derive(Clone, Debug)]
pub struct Dcel<T> {
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
    faces: Vec<Face<T>>
}

impl<T> Dcel<T> {
    // Printing function
    #[cfg(feature = "debug_dcel")]
    pub(crate) fn print(&self) {
        debug!("vertices: {:#?}", self.vertices);
        debug!("half-edges: {:#?}", self.half_edges);
    }

    #[cfg(not(feature = "debug_dcel"))]
    pub(crate) fn print(&self) {}

    /// Creates a diagram with one face per site, in the order they were given
    pub(crate) fn with_faces(faces: impl IntoIterator<Item = (Vec2, T)>) -> Dcel<T> {
        let faces = faces.into_iter()
            .map(|(site, user_data)| Face { user_data, site, bordering: None })
            .collect();
        Dcel { vertices: Vec::new(), half_edges: Vec::new(), faces }
    }

    /// Creates the two sides of the edge separating `face1` and `face2`.
    /// The first returned half-edge borders `face1`.
    pub(crate) fn pair_of_edges(&mut self, face1: usize, face2: usize) -> (usize, usize) {
        let len = self.half_edges.len();
        self.half_edges.push(HalfEdge { origin: None, twin: len+1, next: None, face: face1 });
        self.half_edges.push(HalfEdge { origin: None, twin: len, next: None, face: face2 });

        self.faces[face1].bordering.get_or_insert(len);
        self.faces[face2].bordering.get_or_insert(len+1);
        (len, len+1)
    }

    /// Closes the two half-edges traced by the breakpoints around a vanishing arc
    /// at the vertex where they meet, and starts the half-edge `below` going down from it.
    ///
    /// `left` and `below` border the cell to the left of the vanishing arc, `right`
    /// borders the cell of the arc itself, and `twin(below)` the cell to its right.
    pub(crate) fn close_vertex(&mut self, position: Vec2, left: usize, right: usize, below: usize) -> usize {
        let vertex = self.vertices.len();
        self.vertices.push(Vertex { position, leaving: left });

        let left_twin = self.half_edges[left].twin;
        let right_twin = self.half_edges[right].twin;
        let below_twin = self.half_edges[below].twin;

        self.half_edges[left].origin = Some(vertex);
        self.half_edges[right].origin = Some(vertex);
        self.half_edges[below_twin].origin = Some(vertex);

        self.half_edges[left_twin].next = Some(right);
        self.half_edges[below].next = Some(left);
        self.half_edges[right_twin].next = Some(below_twin);
        vertex
    }

    /// Merges vertices joined by edges shorter than `VERTEX_MERGE_TOLERANCE` and checks the result.
    /// `scale` shrinks the tolerance for diagrams whose sites span less than one unit.
    pub(crate) fn finalize(mut self, scale: Coord) -> Result<Dcel<T>> {
        self.merge_coincident_vertices(VERTEX_MERGE_TOLERANCE * scale)?;

        #[cfg(debug_assertions)]
        self.check_invariants()?;

        Ok(self)
    }

    // Four or more co-circular sites produce a cluster of vertices joined by zero-length edges
    fn merge_coincident_vertices(&mut self, tolerance: Coord) -> Result<()> {
        let mut union_find = UnionFind::new(self.vertices.len());
        let mut dead = vec![false; self.half_edges.len()];

        for e in 0..self.half_edges.len() {
            let twin = self.half_edges[e].twin;
            if twin < e { continue; }

            if let (Some(v1), Some(v2)) = (self.half_edges[e].origin, self.half_edges[twin].origin) {
                let (p1, p2) = (self.vertices[v1].position, self.vertices[v2].position);
                if p1.abs_diff_eq(&p2, tolerance) {
                    union_find.union(v1, v2);
                    dead[e] = true;
                    dead[twin] = true;
                }
            }
        }

        if !dead.contains(&true) { return Ok(()); }
        debug!("Merging {} zero-length edges", dead.iter().filter(|&&d| d).count() / 2);

        // Route the chains around the dead half-edges
        for e in 0..self.half_edges.len() {
            if dead[e] { continue; }

            let mut skipped = 0;
            while let Some(next) = self.half_edges[e].next {
                if !dead[next] { break; }
                self.half_edges[e].next = self.half_edges[next].next;

                skipped += 1;
                sanity_check(skipped <= self.half_edges.len(),
                    || format!("half-edge {} loops through collapsed edges", e))?;
            }
        }

        // Compact the vertices, one per group
        let mut vertex_map = vec![None; self.vertices.len()];
        let mut vertices = Vec::new();
        for v in 0..self.vertices.len() {
            if union_find.is_representative(v) {
                vertex_map[v] = Some(vertices.len());
                vertices.push(self.vertices[v].clone());
            }
        }

        // And the half-edges
        let mut edge_map = vec![None; self.half_edges.len()];
        let mut live = 0;
        for e in 0..self.half_edges.len() {
            if !dead[e] { edge_map[e] = Some(live); live += 1; }
        }

        let lost = |e: usize| VoronoiError::SanityCheckFailed(format!("half-edge {} lost during vertex merging", e));
        let mut half_edges = Vec::with_capacity(live);
        for e in (0..self.half_edges.len()).filter(|&e| !dead[e]) {
            let edge = &self.half_edges[e];
            let twin = edge_map[edge.twin].ok_or_else(|| lost(edge.twin))?;
            let next = match edge.next {
                Some(next) => Some(edge_map[next].ok_or_else(|| lost(next))?),
                None => None
            };
            let origin = match edge.origin {
                Some(v) => {
                    let root = union_find.find(v);
                    Some(vertex_map[root].ok_or_else(|| lost(e))?)
                },
                None => None
            };
            half_edges.push(HalfEdge { origin, twin, next, face: edge.face });
        }

        // The leaving and bordering edges may have died
        let mut leaving = vec![None; vertices.len()];
        let mut bordering = vec![None; self.faces.len()];
        for (e, edge) in half_edges.iter().enumerate() {
            if let Some(v) = edge.origin { leaving[v].get_or_insert(e); }
            bordering[edge.face].get_or_insert(e);
        }

        for (v, (vertex, leaving)) in vertices.iter_mut().zip(leaving).enumerate() {
            vertex.leaving = leaving.ok_or_else(||
                VoronoiError::SanityCheckFailed(format!("vertex {} has no half-edges left after merging", v)))?;
        }

        for (face, bordering) in self.faces.iter_mut().zip(bordering) {
            face.bordering = face.bordering.and_then(|e| edge_map[e]).or(bordering);
        }

        self.vertices = vertices;
        self.half_edges = half_edges;
        Ok(())
    }

    pub fn vertices(&self) -> &[Vertex] { &self.vertices }
    pub fn half_edges(&self) -> &[HalfEdge] { &self.half_edges }
    pub fn faces(&self) -> &[Face<T>] { &self.faces }

    /// The number of full edges, each made of two half-edges
    pub fn edge_count(&self) -> usize { self.half_edges.len() / 2 }

    /// The vertex a half-edge ends on, if it does not run off to infinity
    pub fn destination(&self, edge: usize) -> Option<usize> {
        self.half_edges[self.half_edges[edge].twin].origin
    }

    /// The half-edges of a face in boundary order, starting at `edge`.
    /// Stops at the end of the chain for a face open towards infinity.
    pub fn edge_loop_iter(&self, edge: usize) -> EdgeLoopIterator<'_> {
        EdgeLoopIterator { edges: &self.half_edges, first: edge, cur: Some(edge) }
    }

    /// Gets the boundary of a face as chains of half-edges.
    ///
    /// A bounded face has a single closed chain. An unbounded face has one
    /// chain per connected piece of its boundary, each starting with a
    /// half-edge coming in from infinity.
    pub fn face_chains(&self, face: usize) -> Vec<Vec<usize>> {
        let starts = self.half_edges.iter().enumerate()
            .filter(|(_, e)| e.face == face && e.origin.is_none())
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        if starts.is_empty() {
            self.faces[face].bordering.into_iter().map(|e| self.edge_loop_iter(e).collect()).collect()
        } else {
            starts.into_iter().map(|e| self.edge_loop_iter(e).collect()).collect()
        }
    }

    /// Whether a face is enclosed by a finite cycle of edges
    pub fn is_bounded(&self, face: usize) -> bool {
        self.faces[face].bordering.is_some() &&
            self.half_edges.iter().filter(|e| e.face == face).all(|e| e.origin.is_some() && e.next.is_some())
    }

    /// The faces sharing an edge with `face`, without repetition
    pub fn adjacent_faces(&self, face: usize) -> Vec<usize> {
        let mut adjacent = self.half_edges.iter()
            .filter(|e| e.face == face)
            .map(|e| self.half_edges[e.twin].face)
            .collect::<Vec<_>>();
        adjacent.sort_unstable();
        adjacent.dedup();
        adjacent
    }

    /// Checks the structural invariants of the diagram
    pub fn check_invariants(&self) -> Result<()> {
        let edge_count = self.half_edges.len();
        let mut incoming = vec![0usize; edge_count];

        for (e, edge) in self.half_edges.iter().enumerate() {
            sanity_check(edge.twin < edge_count && edge.twin != e,
                || format!("half-edge {} has invalid twin {}", e, edge.twin))?;
            let twin = &self.half_edges[edge.twin];
            sanity_check(twin.twin == e, || format!("twin of the twin of half-edge {} is {}", e, twin.twin))?;
            sanity_check(edge.face < self.faces.len(), || format!("half-edge {} has invalid face {}", e, edge.face))?;
            sanity_check(edge.face != twin.face, || format!("half-edge {} and its twin share face {}", e, edge.face))?;

            if let Some(v) = edge.origin {
                sanity_check(v < self.vertices.len(), || format!("half-edge {} has invalid origin {}", e, v))?;
            }

            match edge.next {
                Some(next) => {
                    sanity_check(next < edge_count, || format!("half-edge {} has invalid next {}", e, next))?;
                    incoming[next] += 1;

                    let next_edge = &self.half_edges[next];
                    sanity_check(next_edge.face == edge.face,
                        || format!("half-edge {} is followed by half-edge {} from another face", e, next))?;
                    sanity_check(twin.origin.is_some() && next_edge.origin == twin.origin,
                        || format!("half-edge {} does not end where half-edge {} starts", e, next))?;
                },
                None => sanity_check(twin.origin.is_none(),
                    || format!("half-edge {} ends on a vertex but has no successor", e))?
            }
        }

        // Each half-edge follows at most one other, so the chains cannot merge
        if let Some(e) = incoming.iter().position(|&count| count > 1) {
            return Err(VoronoiError::SanityCheckFailed(format!("half-edge {} follows {} half-edges", e, incoming[e])));
        }

        for (v, vertex) in self.vertices.iter().enumerate() {
            sanity_check(vertex.leaving < edge_count && self.half_edges[vertex.leaving].origin == Some(v),
                || format!("vertex {} has a leaving half-edge {} starting elsewhere", v, vertex.leaving))?;
        }

        for (f, face) in self.faces.iter().enumerate() {
            if let Some(e) = face.bordering {
                sanity_check(e < edge_count && self.half_edges[e].face == f,
                    || format!("face {} has a bordering half-edge {} of another face", f, e))?;
            }
        }

        Ok(())
    }
}

pub struct EdgeLoopIterator<'a> {
    edges: &'a [HalfEdge],
    first: usize,
    cur: Option<usize>
}

impl<'a> Iterator for EdgeLoopIterator<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let cur = self.cur?;
        self.cur = self.edges[cur].next.filter(|&next| next != self.first);
        Some(cur)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_edge_iter<T>(dcel: &Dcel<T>, edge: usize, expected: &[usize]) {
        let lp: Vec<_> = dcel.edge_loop_iter(edge).collect();
        assert!(lp.iter().eq(expected.iter()),
            "Edge {}: expected loop {:?}, but got loop {:?}", edge, expected, lp.as_slice());
    }

    // Three cells around a single vertex at the origin, as the sweep builds them:
    // the arc of b vanishes between the arcs of a and c
    fn three_cells() -> Dcel<char> {
        let mut dcel = Dcel::with_faces(vec![
            (Vec2::new(-1.0, 1.0), 'a'),
            (Vec2::new(0.0, 2.0), 'b'),
            (Vec2::new(1.0, 1.0), 'c')
        ]);

        let (ab, _) = dcel.pair_of_edges(0, 1);
        let (bc, _) = dcel.pair_of_edges(1, 2);
        let (ac, _) = dcel.pair_of_edges(0, 2);
        assert_eq!(dcel.close_vertex(Vec2::zero(), ab, bc, ac), 0);
        dcel
    }

    #[test]
    fn test_pair_of_edges() {
        let mut dcel = Dcel::with_faces(vec![(Vec2::new(0.0, 1.0), ()), (Vec2::new(0.0, -1.0), ())]);
        assert_eq!(dcel.pair_of_edges(0, 1), (0, 1));
        assert_eq!(dcel.pair_of_edges(1, 0), (2, 3));

        assert_eq!(dcel.half_edges()[1].twin, 0);
        assert_eq!(dcel.half_edges()[2].face, 1);
        assert_eq!(dcel.faces()[0].bordering, Some(0));
        assert_eq!(dcel.faces()[1].bordering, Some(1));
        assert_eq!(dcel.edge_count(), 2);
    }

    #[test]
    fn test_close_vertex() {
        let dcel = three_cells();

        assert_eq!(dcel.vertices()[0].leaving, 0);
        assert_eq!(dcel.half_edges()[0].origin, Some(0));
        assert_eq!(dcel.half_edges()[2].origin, Some(0));
        assert_eq!(dcel.half_edges()[5].origin, Some(0));
        assert_eq!(dcel.destination(4), Some(0));
        assert_eq!(dcel.destination(0), None);

        test_edge_iter(&dcel, 4, &[4, 0]);
        test_edge_iter(&dcel, 1, &[1, 2]);
        test_edge_iter(&dcel, 3, &[3, 5]);
    }

    #[test]
    fn test_face_queries() {
        let dcel = three_cells();

        assert_eq!(dcel.face_chains(0), vec![vec![4, 0]]);
        assert_eq!(dcel.face_chains(1), vec![vec![1, 2]]);
        assert!(!dcel.is_bounded(0));
        assert_eq!(dcel.adjacent_faces(0), vec![1, 2]);
        assert_eq!(dcel.adjacent_faces(2), vec![0, 1]);
        assert_eq!(dcel.faces()[1].user_data, 'b');
    }

    #[test]
    fn test_check_invariants() {
        let mut dcel = three_cells();
        assert!(dcel.check_invariants().is_ok());

        // A successor from another face
        dcel.half_edges[3].next = Some(1);
        assert!(matches!(dcel.check_invariants(), Err(VoronoiError::SanityCheckFailed(_))));
    }

    #[test]
    fn test_merge_coincident_vertices() {
        // Four co-circular sites: two vertices at the center joined by a zero-length edge
        let mut dcel = Dcel::with_faces(vec![
            (Vec2::new(0.0, 1.0), 't'),
            (Vec2::new(-1.0, 0.0), 'l'),
            (Vec2::new(1.0, 0.0), 'r'),
            (Vec2::new(0.0, -1.0), 'b')
        ]);

        // The arc of the top site vanishes between the left and right ones
        let (lt, _) = dcel.pair_of_edges(1, 0);
        let (tr, _) = dcel.pair_of_edges(0, 2);
        let (lr, _) = dcel.pair_of_edges(1, 2);
        dcel.close_vertex(Vec2::zero(), lt, tr, lr);

        // Then the bottom site splits the left arc, whose right copy vanishes immediately
        let (_, bl) = dcel.pair_of_edges(1, 3);
        let (br, _) = dcel.pair_of_edges(3, 2);
        dcel.close_vertex(Vec2::new(1e-9, -1e-9), bl, lr, br);
        assert_eq!(dcel.vertices().len(), 2);
        assert_eq!(dcel.edge_count(), 5);

        let dcel = dcel.finalize(1.0).unwrap();
        assert_eq!(dcel.vertices().len(), 1);
        assert_eq!(dcel.edge_count(), 4);
        assert!(dcel.half_edges().iter().all(|e| e.origin.map_or(true, |v| v == 0)));
        assert_eq!(dcel.adjacent_faces(1), vec![0, 3]);
        assert_eq!(dcel.face_chains(1), vec![vec![4, 0]]);
        assert_eq!(dcel.faces()[3].bordering, Some(5));
    }
}
