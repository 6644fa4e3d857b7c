//! Property-based tests for topology invariants.
//!
//! Run with: cargo test --test proptest_topology

use std::collections::HashSet;

use ahf_mesh::algo::subdivide::{catmull_clark, SubdivideOptions};
use ahf_mesh::prelude::*;
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Strategies for generating random meshes
// =============================================================================

/// A grid cell split into two triangles or kept as a quad.
#[derive(Debug, Clone, Copy)]
enum Cell {
    Quad,
    Diagonal,
    AntiDiagonal,
}

fn arb_cell() -> impl Strategy<Value = Cell> {
    prop_oneof![Just(Cell::Quad), Just(Cell::Diagonal), Just(Cell::AntiDiagonal)]
}

/// A manifold mixed grid of `nx` by `ny` cells with random heights.
fn arb_grid(max_cells: usize) -> impl Strategy<Value = (Vec<Point3<f64>>, Vec<Vec<usize>>)> {
    (1..=max_cells, 1..=max_cells).prop_flat_map(|(nx, ny)| {
        let heights = prop::collection::vec(-1.0..1.0f64, (nx + 1) * (ny + 1));
        let cells = prop::collection::vec(arb_cell(), nx * ny);
        (heights, cells).prop_map(move |(heights, cells)| {
            let mut vertices = Vec::with_capacity(heights.len());
            for j in 0..=ny {
                for i in 0..=nx {
                    vertices.push(Point3::new(i as f64, j as f64, heights[j * (nx + 1) + i]));
                }
            }
            let mut faces = Vec::new();
            for j in 0..ny {
                for i in 0..nx {
                    let v00 = j * (nx + 1) + i;
                    let v10 = v00 + 1;
                    let v01 = v00 + nx + 1;
                    let v11 = v01 + 1;
                    match cells[j * nx + i] {
                        Cell::Quad => faces.push(vec![v00, v10, v11, v01]),
                        Cell::Diagonal => {
                            faces.push(vec![v00, v10, v11]);
                            faces.push(vec![v00, v11, v01]);
                        }
                        Cell::AntiDiagonal => {
                            faces.push(vec![v00, v10, v01]);
                            faces.push(vec![v10, v11, v01]);
                        }
                    }
                }
            }
            (vertices, faces)
        })
    })
}

/// A grid with an arbitrary subset of its faces removed (may be non-manifold
/// at vertices).
fn arb_punctured_grid() -> impl Strategy<Value = Mesh> {
    arb_grid(5).prop_flat_map(|(vertices, faces)| {
        let n = faces.len();
        prop::collection::vec(any::<bool>(), n).prop_map(move |keep| {
            let mut mesh = build_from_polygons(&vertices, &faces).unwrap();
            for (i, k) in keep.iter().enumerate() {
                if !k && mesh.num_elements() > 1 {
                    mesh.remove_element(ElementKey::new(i as u32)).unwrap();
                }
            }
            mesh.build_topology(false);
            mesh
        })
    })
}

/// A grid with an extra triangle standing on one of its edges, so that edge
/// is shared by three faces when it is interior.
fn arb_finned_grid() -> impl Strategy<Value = Mesh> {
    arb_grid(4).prop_flat_map(|(vertices, faces)| {
        let n = faces.len();
        (0..n, 0..4usize).prop_map(move |(face, side)| {
            let f = &faces[face];
            let (a, b) = (f[side % f.len()], f[(side + 1) % f.len()]);
            let mut vertices = vertices.clone();
            let apex = Point3::from((vertices[a].coords + vertices[b].coords) / 2.0)
                + nalgebra::Vector3::new(0.0, 0.0, 2.0);
            vertices.push(apex);
            let mut faces = faces.clone();
            faces.push(vec![a, b, vertices.len() - 1]);
            build_from_polygons(&vertices, &faces).unwrap()
        })
    })
}

fn undirected(edges: &[(VertexKey, VertexKey)]) -> HashSet<(VertexKey, VertexKey)> {
    edges
        .iter()
        .map(|&(a, b)| if a < b { (a, b) } else { (b, a) })
        .collect()
}

// =============================================================================
// Property Tests: Sibling links
// =============================================================================

proptest! {
    /// Every link points back, for any face subset.
    #[test]
    fn siblings_are_symmetric(mesh in arb_punctured_grid()) {
        for e in mesh.elements().values() {
            for local in 1..=e.half_facet_count() {
                if let Sibling::Linked(hf) = e.sibling(local).unwrap() {
                    let other = mesh.element(hf.element).unwrap();
                    let back = other.sibling(hf.local as usize).unwrap();
                    prop_assert_eq!(back, Sibling::Linked(HalfFacetRef::new(e.key(), local as u16)));
                }
            }
        }
        prop_assert!(mesh.topology().validate().is_empty());
    }

    /// Rebuilding from scratch reproduces the same links.
    #[test]
    fn rebuild_is_stable(mesh in arb_punctured_grid()) {
        let mut rebuilt = mesh.clone();
        rebuilt.build_topology(true);
        for (a, b) in mesh.elements().values().zip(rebuilt.elements().values()) {
            prop_assert_eq!(a, b);
        }
    }
}

// =============================================================================
// Property Tests: Queries
// =============================================================================

proptest! {
    /// Adjacency is symmetric on manifold grids.
    #[test]
    fn adjacency_is_symmetric((vertices, faces) in arb_grid(6)) {
        let mesh = build_from_polygons(&vertices, &faces).unwrap();
        let topo = mesh.topology();
        for v in mesh.vertex_keys() {
            for w in topo.vertex_adjacent_vertices(v) {
                prop_assert!(topo.vertex_adjacent_vertices(w).contains(&v));
            }
        }
    }

    /// Adjacency stays symmetric when an edge is shared by three faces.
    #[test]
    fn adjacency_is_symmetric_with_a_fin(mesh in arb_finned_grid()) {
        let topo = mesh.topology();
        for v in mesh.vertex_keys() {
            for w in topo.vertex_adjacent_vertices(v) {
                prop_assert!(topo.vertex_adjacent_vertices(w).contains(&v));
            }
            for ek in topo.vertex_incident_elements(v) {
                prop_assert!(mesh.element(ek).unwrap().contains_vertex(v));
            }
            let incident = topo.vertex_incident_elements(v).len();
            let containing = mesh.elements().values().filter(|e| e.contains_vertex(v)).count();
            prop_assert_eq!(incident, containing);
        }
        prop_assert!(topo.validate().is_empty());
    }

    /// Repeated unique-edge queries agree, and match a brute-force edge set.
    #[test]
    fn unique_edges_are_idempotent(mesh in arb_punctured_grid()) {
        let topo = mesh.topology();
        let first = topo.unique_edges();
        let second = topo.unique_edges();
        prop_assert_eq!(&first, &second);

        let brute: HashSet<_> = mesh
            .elements()
            .values()
            .flat_map(|e| e.edges())
            .map(|(a, b)| if a < b { (a, b) } else { (b, a) })
            .collect();
        prop_assert_eq!(first.len(), brute.len());
        prop_assert_eq!(undirected(&first), brute);
    }

    /// A grid is a disk: its naked edges form one closed loop.
    #[test]
    fn grid_boundary_is_one_loop((vertices, faces) in arb_grid(6)) {
        let mesh = build_from_polygons(&vertices, &faces).unwrap();
        let naked = mesh.topology().naked_edges();

        let next: std::collections::HashMap<VertexKey, VertexKey> =
            naked.iter().copied().collect();
        prop_assert_eq!(next.len(), naked.len());

        let start = naked[0].0;
        let mut current = start;
        let mut steps = 0;
        loop {
            current = next[&current];
            steps += 1;
            if current == start || steps > naked.len() {
                break;
            }
        }
        prop_assert_eq!(current, start);
        prop_assert_eq!(steps, naked.len());
    }

    /// Catmull-Clark adds one vertex per edge and face, and one quad per side.
    #[test]
    fn catmull_clark_counts((vertices, faces) in arb_grid(4)) {
        let mesh = build_from_polygons(&vertices, &faces).unwrap();
        let edges = mesh.topology().unique_edges().len();
        let sides: usize = faces.iter().map(Vec::len).sum();

        let fine = catmull_clark(&mesh, &SubdivideOptions::new(1)).unwrap();
        prop_assert_eq!(fine.num_vertices(), vertices.len() + edges + faces.len());
        prop_assert_eq!(fine.num_elements(), sides);
        prop_assert!(fine.topology().validate().is_empty());
    }
}
