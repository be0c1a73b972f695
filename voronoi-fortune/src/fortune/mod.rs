//--------------------------------------------------------------------
// fortune/mod.rs
//--------------------------------------------------------------------
// Provides the Voronoi diagram computation by Fortune's algorithm: a
// horizontal line sweeps down the plane while the beach line of
// parabolic arcs above it traces the edges of the diagram
//--------------------------------------------------------------------

mod predicates;
mod priority_queue;
mod beach_line;
mod events;
mod state;

pub use predicates::*;
pub use priority_queue::*;
pub use beach_line::{BeachLine, BeachNode, ArcNode, BreakpointNode, SiteRef, SplitArcs, NodeId};

use crate::error::Result;
use crate::site::Site;
use crate::dcel::Dcel;
use state::SweepState;

/// Something that computes Voronoi diagrams.
///
/// Implementations keep no state between calls, so a generator can be
/// shared between threads working on different site sets.
pub trait VoronoiGenerator {
    /// Computes the diagram of a set of distinct sites with finite coordinates.
    /// Face `i` of the result is the cell of the `i`-th site.
    fn compute_voronoi_diagram<T, I>(&self, sites: I) -> Result<Dcel<T>>
        where I: IntoIterator<Item = Site<T>>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FortunesAlgorithm;

impl VoronoiGenerator for FortunesAlgorithm {
    fn compute_voronoi_diagram<T, I>(&self, sites: I) -> Result<Dcel<T>>
        where I: IntoIterator<Item = Site<T>> {
        SweepState::new(sites).run()
    }
}

/// Computes a Voronoi diagram with Fortune's algorithm
pub fn compute_voronoi_diagram<T>(sites: impl IntoIterator<Item = Site<T>>) -> Result<Dcel<T>> {
    FortunesAlgorithm.compute_voronoi_diagram(sites)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::*;
    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    const SEED: u64 = 8101991;

    fn sites(points: &[(Coord, Coord)]) -> Vec<Site<()>> {
        points.iter().map(|&(x, y)| Site::at(x, y)).collect()
    }

    fn random_sites(rng: &mut StdRng, count: usize, range: Coord) -> Vec<Site<usize>> {
        (0..count).map(|i| Site::new(Vec2::new(rng.gen_range(-range..range), rng.gen_range(-range..range)), i)).collect()
    }

    fn regular_polygon(n: usize) -> Vec<Site<()>> {
        (0..n).map(|i| {
            let angle = 2.0 * CoordM::consts::PI * (i as Coord) / (n as Coord);
            Site::at(10.0 * angle.cos(), 10.0 * angle.sin())
        }).collect()
    }

    fn test_counts<T>(dcel: &Dcel<T>, vertices: usize, half_edges: usize) {
        assert!(dcel.vertices().len() == vertices && dcel.half_edges().len() == half_edges,
            "Expected {} vertices and {} half-edges, but got {} vertices and {} half-edges",
            vertices, half_edges, dcel.vertices().len(), dcel.half_edges().len());
    }

    // Checks the geometry of the diagram against the sites it was built from
    fn test_geometry<T>(dcel: &Dcel<T>) {
        dcel.check_invariants().unwrap();
        let sites = dcel.faces().iter().map(|f| f.site).collect::<Vec<_>>();

        for (v, vertex) in dcel.vertices().iter().enumerate() {
            let center = vertex.position;
            let radius = center.distance(sites[dcel.half_edges()[vertex.leaving].face]);
            let tolerance = 1e-6 * radius;

            // Every cell around a vertex is at the same distance from it...
            for edge in dcel.half_edges().iter().filter(|e| e.origin == Some(v)) {
                let distance = center.distance(sites[edge.face]);
                assert!((distance - radius).abs() <= tolerance,
                    "Vertex {} at {} is {} away from site {} but {} away from site {}",
                    v, center, radius, sites[dcel.half_edges()[vertex.leaving].face], distance, sites[edge.face]);
            }

            // ...and no site is closer than those
            for site in &sites {
                assert!(center.distance(*site) >= radius - tolerance,
                    "Site {} is inside the empty circle of vertex {} at {}", site, v, center);
            }
        }

        // The cell of each half-edge is on its left
        for (e, edge) in dcel.half_edges().iter().enumerate() {
            if let (Some(from), Some(to)) = (edge.origin, dcel.destination(e)) {
                let (from, to) = (dcel.vertices()[from].position, dcel.vertices()[to].position);
                let site = sites[edge.face];
                assert!((to - from).cross(site - from) > 0.0,
                    "Half-edge {} from {} to {} does not have its site {} on its left", e, from, to, site);
            }
        }
    }

    #[test]
    fn test_no_sites() {
        let dcel = compute_voronoi_diagram(Vec::<Site<()>>::new()).unwrap();
        assert!(dcel.faces().is_empty());
        test_counts(&dcel, 0, 0);
    }

    #[test]
    fn test_single_site() {
        let dcel = compute_voronoi_diagram(sites(&[(3.0, 4.0)])).unwrap();
        assert_eq!(dcel.faces().len(), 1);
        assert_eq!(dcel.faces()[0].bordering, None);
        assert_eq!(dcel.face_chains(0), Vec::<Vec<usize>>::new());
        test_counts(&dcel, 0, 0);
    }

    #[test]
    fn test_two_sites() {
        let dcel = compute_voronoi_diagram(sites(&[(0.0, 1.0), (0.0, -1.0)])).unwrap();
        test_counts(&dcel, 0, 2);
        assert!(dcel.half_edges().iter().all(|e| e.origin.is_none() && e.next.is_none()));
        assert_eq!(dcel.adjacent_faces(0), vec![1]);
        test_geometry(&dcel);
    }

    #[test]
    fn test_square() {
        let dcel = compute_voronoi_diagram(sites(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)])).unwrap();
        test_counts(&dcel, 1, 8);
        assert_relative_eq!(dcel.vertices()[0].position, Vec2::new(0.5, 0.5), epsilon = 1e-9);
        assert_eq!(dcel.faces().len(), 4);

        // Each cell is a quadrant: in from infinity to the center, and back out
        for face in 0..4 {
            let chains = dcel.face_chains(face);
            assert_eq!(chains.len(), 1);
            assert_eq!(chains[0].len(), 2);

            let (first, last) = (&dcel.half_edges()[chains[0][0]], &dcel.half_edges()[chains[0][1]]);
            assert_eq!((first.origin, last.origin), (None, Some(0)));
            assert_eq!(last.next, None);
            assert!(!dcel.is_bounded(face));
        }

        // Diagonal cells only touch at the vertex
        assert_eq!(dcel.adjacent_faces(0), vec![1, 2]);
        assert_eq!(dcel.adjacent_faces(3), vec![1, 2]);
        test_geometry(&dcel);
    }

    #[test]
    fn test_triangle() {
        let dcel = compute_voronoi_diagram(sites(&[(0.0, 0.0), (4.0, 1.0), (1.0, 3.0)])).unwrap();
        test_counts(&dcel, 1, 6);

        let center = circle_center(Vec2::new(0.0, 0.0), Vec2::new(4.0, 1.0), Vec2::new(1.0, 3.0)).unwrap();
        assert_relative_eq!(dcel.vertices()[0].position, center, epsilon = 1e-9);
        for face in 0..3 {
            assert_eq!(dcel.face_chains(face).len(), 1);
            assert!(!dcel.is_bounded(face));
        }
        test_geometry(&dcel);
    }

    #[test]
    fn test_regular_polygons() {
        for n in (3..=16).chain(vec![20, 25, 32, 50]) {
            let dcel = compute_voronoi_diagram(regular_polygon(n)).unwrap();
            assert!(dcel.vertices().len() == 1 && dcel.half_edges().len() == 2 * n,
                "A regular {}-gon gave {} vertices and {} half-edges", n,
                dcel.vertices().len(), dcel.half_edges().len());
            assert_abs_diff_eq!(dcel.vertices()[0].position, Vec2::zero(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_collinear_sites() {
        let dcel = compute_voronoi_diagram(sites(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)])).unwrap();
        test_counts(&dcel, 0, 4);
        assert_eq!(dcel.adjacent_faces(1), vec![0, 2]);

        // The same on a vertical line
        let dcel = compute_voronoi_diagram(sites(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0), (0.0, 3.0)])).unwrap();
        test_counts(&dcel, 0, 6);
        assert_eq!(dcel.adjacent_faces(2), vec![1, 3]);
        test_geometry(&dcel);
    }

    #[test]
    fn test_grid() {
        let points = (0..4).flat_map(|i| (0..4).map(move |j| (i as Coord, j as Coord))).collect::<Vec<_>>();
        let dcel = compute_voronoi_diagram(sites(&points)).unwrap();
        test_counts(&dcel, 9, 48);

        // Only the four inner cells are closed
        let bounded = (0..16).filter(|&f| dcel.is_bounded(f)).count();
        assert_eq!(bounded, 4);
        for face in (0..16).filter(|&f| dcel.is_bounded(f)) {
            assert_eq!(dcel.face_chains(face), vec![dcel.edge_loop_iter(dcel.faces()[face].bordering.unwrap()).collect::<Vec<_>>()]);
            assert_eq!(dcel.face_chains(face)[0].len(), 4);
        }
        test_geometry(&dcel);
    }

    #[test]
    fn test_random_sites() {
        let mut rng = StdRng::seed_from_u64(SEED);

        for &count in &[5, 20, 100, 400] {
            let dcel = compute_voronoi_diagram(random_sites(&mut rng, count, 100.0)).unwrap();
            assert_eq!(dcel.faces().len(), count);
            test_geometry(&dcel);

            // Sites in general position: every vertex joins exactly three cells
            for v in 0..dcel.vertices().len() {
                assert_eq!(dcel.half_edges().iter().filter(|e| e.origin == Some(v)).count(), 3);
            }
        }
    }

    #[test]
    fn test_scaled_sites() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let input = random_sites(&mut rng, 200, 1.0);
        let expected = compute_voronoi_diagram(input.clone()).unwrap().vertices().len();

        for &scale in &[1e-6, 1e-4, 1e-2, 1e3, 1e7] {
            let scaled = input.iter().map(|site| Site::new(site.position * scale, site.user_data)).collect::<Vec<_>>();
            let dcel = compute_voronoi_diagram(scaled).unwrap();
            assert!(dcel.vertices().len() == expected,
                "Expected {} vertices at scale {}, but got {}", expected, scale, dcel.vertices().len());
            test_geometry(&dcel);
        }
    }

    #[test]
    fn test_random_integer_sites() {
        let mut rng = StdRng::seed_from_u64(SEED);

        for _ in 0..10 {
            let mut points = Vec::new();
            while points.len() < 40 {
                let point = (rng.gen_range(0..20) as Coord, rng.gen_range(0..20) as Coord);
                if !points.contains(&point) { points.push(point); }
            }

            let dcel = compute_voronoi_diagram(sites(&points)).unwrap();
            test_geometry(&dcel);
        }
    }

    #[test]
    fn test_user_data() {
        let names = ["north", "south", "east", "west"];
        let input = vec![(0.0, 5.0), (0.0, -5.0), (5.0, 0.0), (-5.0, 0.0)].into_iter().zip(names.iter())
            .map(|((x, y), name)| Site::new(Vec2::new(x, y), name.to_string()))
            .collect::<Vec<_>>();

        let dcel = FortunesAlgorithm.compute_voronoi_diagram(input.clone()).unwrap();
        for (face, site) in dcel.faces().iter().zip(&input) {
            assert_eq!(face.user_data, site.user_data);
            assert_eq!(face.site, site.position);
        }
    }

    #[test]
    fn test_concurrent_runs() {
        let mut rng = StdRng::seed_from_u64(SEED);
        let inputs = (0..4).map(|_| random_sites(&mut rng, 200, 50.0)).collect::<Vec<_>>();
        let expected = inputs.iter().map(|s| compute_voronoi_diagram(s.clone()).unwrap().vertices().len()).collect::<Vec<_>>();

        let handles = inputs.into_iter()
            .map(|input| std::thread::spawn(move || compute_voronoi_diagram(input).map(|d| d.vertices().len())))
            .collect::<Vec<_>>();
        let results = handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect::<Vec<_>>();
        assert_eq!(results, expected);
    }
}
