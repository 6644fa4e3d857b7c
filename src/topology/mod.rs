//! The topology engine.
//!
//! [`Topology`] borrows a [`Mesh`] and answers connectivity queries by walking
//! sibling half-facet links. Nothing is cached: every query is recomputed from
//! the current links, so the mesh must have been built with
//! [`Mesh::build_topology`] after its last structural change. Building
//! topology and querying it must not overlap; the borrow checker enforces
//! this for safe code.
//!
//! Queries for keys that are not in the mesh return empty results rather than
//! errors.
//!
//! # Example
//!
//! ```
//! use ahf_mesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let topo = mesh.topology();
//!
//! assert_eq!(topo.unique_edges().len(), 5);
//! assert_eq!(topo.naked_edges().len(), 4);
//! assert_eq!(topo.vertex_incident_elements(VertexKey::new(0)).len(), 2);
//! ```

pub(crate) mod build;
mod curvature;
mod normals;
mod traversal;
mod validate;

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use crate::geometry;
use crate::mesh::{Element, ElementKey, HalfFacetRef, Mesh, Sibling, VertexKey};

pub use curvature::CurvatureOptions;
pub use normals::NormalOptions;
pub use traversal::VisitMarks;
pub use validate::TopologyIssue;

/// Read-only connectivity queries over a mesh.
#[derive(Debug, Clone, Copy)]
pub struct Topology<'a> {
    mesh: &'a Mesh,
}

impl<'a> Topology<'a> {
    pub(crate) fn new(mesh: &'a Mesh) -> Self {
        Self { mesh }
    }

    /// The mesh being queried.
    #[inline]
    pub fn mesh(&self) -> &'a Mesh {
        self.mesh
    }

    // ==================== Vertex queries ====================

    /// Elements that contain vertex `v`.
    ///
    /// Starts at the element of the vertex's V2HF reference and spreads across
    /// sibling links of half-facets that contain `v`. Each element is entered
    /// at most once, so closed rings terminate on revisiting and open
    /// (boundary) fans terminate at their naked half-facets. Elements are
    /// returned in the order they are reached.
    pub fn vertex_incident_elements(&self, v: VertexKey) -> Vec<ElementKey> {
        let Some(start) = self.mesh.vertices().get(v).and_then(|vx| vx.incident_half_facet())
        else {
            return Vec::new();
        };

        let elements = self.mesh.elements();
        let mut entered: HashSet<ElementKey> = HashSet::new();
        let mut result = Vec::new();
        let mut stack = vec![start.element];

        while let Some(ek) = stack.pop() {
            if !entered.insert(ek) {
                continue;
            }
            let Some(e) = elements.get(ek) else {
                continue;
            };
            if !e.contains_vertex(v) {
                continue;
            }
            result.push(ek);
            for local in 1..=e.half_facet_count() {
                if !e.half_facet_contains(local, v) {
                    continue;
                }
                for hf in self.half_facet_siblings(e.half_facet_ref(local)) {
                    if !entered.contains(&hf.element) {
                        stack.push(hf.element);
                    }
                }
            }
        }
        result
    }

    /// Vertices joined to `v` by an edge of some incident element.
    pub fn vertex_adjacent_vertices(&self, v: VertexKey) -> Vec<VertexKey> {
        let mut result: Vec<VertexKey> = Vec::new();
        let mut push = |w: VertexKey| {
            if w != v && !result.contains(&w) {
                result.push(w);
            }
        };
        for ek in self.vertex_incident_elements(v) {
            let Some(e) = self.mesh.elements().get(ek) else {
                continue;
            };
            match e.dimension() {
                2 => {
                    if let Some((prev, next)) = e.polygon_neighbors(v) {
                        push(prev);
                        push(next);
                    }
                }
                _ => {
                    for (a, b) in e.edges() {
                        if a == v {
                            push(b);
                        } else if b == v {
                            push(a);
                        }
                    }
                }
            }
        }
        result
    }

    /// Number of vertices adjacent to `v`.
    pub fn vertex_valence(&self, v: VertexKey) -> usize {
        self.vertex_adjacent_vertices(v).len()
    }

    /// Whether the half-facet stored as `v`'s V2HF reference is naked.
    pub fn is_naked_vertex(&self, v: VertexKey) -> bool {
        self.mesh
            .vertices()
            .get(v)
            .and_then(|vx| vx.incident_half_facet())
            .and_then(|hf| self.sibling_of(hf))
            .is_some_and(Sibling::is_naked)
    }

    /// All naked vertices, in key order.
    pub fn naked_vertices(&self) -> Vec<VertexKey> {
        self.mesh
            .vertex_keys()
            .filter(|&v| self.is_naked_vertex(v))
            .collect()
    }

    /// Neighbours of `v` reached through naked 2D edges.
    pub fn naked_neighbors(&self, v: VertexKey) -> Vec<VertexKey> {
        let mut result = Vec::new();
        for ek in self.vertex_incident_elements(v) {
            let Some(e) = self.mesh.elements().get(ek) else {
                continue;
            };
            if !e.element_type().is_face() {
                continue;
            }
            for local in 1..=e.half_facet_count() {
                if !e.sibling_unchecked(local).is_naked() {
                    continue;
                }
                let edge = e.half_facet_unchecked(local);
                let other = if edge[0] == v {
                    edge[1]
                } else if edge[1] == v {
                    edge[0]
                } else {
                    continue;
                };
                if !result.contains(&other) {
                    result.push(other);
                }
            }
        }
        result
    }

    // ==================== Element queries ====================

    /// Elements across the linked half-facets of `ek`, including every
    /// element on a non-manifold facet's cycle.
    pub fn element_adjacent_elements(&self, ek: ElementKey) -> Vec<ElementKey> {
        let Some(e) = self.mesh.elements().get(ek) else {
            return Vec::new();
        };
        let mut result = Vec::new();
        for local in 1..=e.half_facet_count() {
            for hf in self.half_facet_siblings(e.half_facet_ref(local)) {
                if hf.element != ek && !result.contains(&hf.element) {
                    result.push(hf.element);
                }
            }
        }
        result
    }

    /// Half-facets that share `hf`'s facet, `hf` excluded.
    ///
    /// One for a manifold interior facet, none for a naked one, and the rest
    /// of the sibling cycle when more than two elements share the facet.
    pub fn half_facet_siblings(&self, hf: HalfFacetRef) -> Vec<HalfFacetRef> {
        traversal::sibling_chain(self.mesh, hf).members
    }

    /// Elements with at least one naked half-facet, in key order.
    pub fn naked_elements(&self) -> Vec<ElementKey> {
        self.mesh
            .elements()
            .iter()
            .filter(|(_, e)| e.has_naked_half_facet())
            .map(|(k, _)| k)
            .collect()
    }

    /// Centroid of the element's vertices.
    pub fn element_center(&self, ek: ElementKey) -> Option<Point3<f64>> {
        let e = self.mesh.elements().get(ek)?;
        let points = self.positions_of(e.vertices());
        geometry::centroid(&points)
    }

    /// Unit normal of a 2D element (Newell's method), `None` otherwise.
    pub fn element_normal(&self, ek: ElementKey) -> Option<Vector3<f64>> {
        let e = self.mesh.elements().get(ek)?;
        if !e.element_type().is_face() {
            return None;
        }
        geometry::safe_normalize(&geometry::newell_normal(&self.positions_of(e.vertices())))
    }

    // ==================== Boundary and edge queries ====================

    /// Naked edges of 2D elements, each in the winding of its element.
    pub fn naked_edges(&self) -> Vec<(VertexKey, VertexKey)> {
        let mut result = Vec::new();
        for e in self.mesh.elements().values() {
            if !e.element_type().is_face() {
                continue;
            }
            for local in 1..=e.half_facet_count() {
                if e.sibling_unchecked(local).is_naked() {
                    let edge = e.half_facet_unchecked(local);
                    result.push((edge[0], edge[1]));
                }
            }
        }
        result
    }

    /// Naked faces of 3D elements, each as its outward vertex cycle.
    pub fn naked_faces(&self) -> Vec<Vec<VertexKey>> {
        let mut result = Vec::new();
        for e in self.mesh.elements().values() {
            if !e.element_type().is_volume() {
                continue;
            }
            for local in 1..=e.half_facet_count() {
                if e.sibling_unchecked(local).is_naked() {
                    result.push(e.half_facet_unchecked(local));
                }
            }
        }
        result
    }

    /// Every edge of the mesh exactly once.
    ///
    /// Polygon edges are walked as half-facets: visiting one marks its
    /// sibling chain too, so a shared edge is emitted from whichever element reaches
    /// it first. Polyhedral and bar edges come from each element's vertex
    /// cycles and are deduplicated against the pairs collected so far. The
    /// visit marks live only for the duration of the call.
    pub fn unique_edges(&self) -> Vec<(VertexKey, VertexKey)> {
        let mut marks = VisitMarks::new();
        let mut seen: HashSet<(VertexKey, VertexKey)> = HashSet::new();
        let mut result = Vec::new();
        let mut emit = |a: VertexKey, b: VertexKey, result: &mut Vec<_>| {
            let canonical = if a < b { (a, b) } else { (b, a) };
            if seen.insert(canonical) {
                result.push((a, b));
            }
        };

        for e in self.mesh.elements().values() {
            if e.element_type().is_face() {
                for local in 1..=e.half_facet_count() {
                    let hf = e.half_facet_ref(local);
                    if !marks.register_with_sibling(self.mesh, hf) {
                        continue;
                    }
                    let edge = e.half_facet_unchecked(local);
                    emit(edge[0], edge[1], &mut result);
                }
            } else {
                for (a, b) in e.edges() {
                    emit(a, b, &mut result);
                }
            }
        }
        result
    }

    /// `V - E + F` over the 2D elements of the mesh.
    pub fn euler_characteristic(&self) -> i64 {
        let faces: Vec<&Element> = self
            .mesh
            .elements()
            .values()
            .filter(|e| e.element_type().is_face())
            .collect();
        let used: HashSet<VertexKey> = faces
            .iter()
            .flat_map(|e| e.vertices().iter().copied())
            .collect();
        used.len() as i64 - self.unique_edges().len() as i64 + faces.len() as i64
    }

    // ==================== Helpers ====================

    pub(crate) fn sibling_of(&self, hf: HalfFacetRef) -> Option<Sibling> {
        let e = self.mesh.elements().get(hf.element)?;
        let local = hf.local as usize;
        (local >= 1 && local <= e.half_facet_count()).then(|| e.sibling_unchecked(local))
    }

    pub(crate) fn positions_of(&self, keys: &[VertexKey]) -> Vec<Point3<f64>> {
        keys.iter()
            .filter_map(|&k| self.mesh.vertices().get(k).map(|v| v.position))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_elements, build_from_quads, build_from_triangles, ElementType};

    fn k(raw: u32) -> VertexKey {
        VertexKey::new(raw)
    }

    fn single_quad() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap()
    }

    fn grid(n: usize) -> Mesh {
        let mut vertices = Vec::new();
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(Point3::new(i as f64, j as f64, 0.0));
            }
        }
        let mut faces = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let v00 = j * (n + 1) + i;
                faces.push([v00, v00 + 1, v00 + n + 2, v00 + n + 1]);
            }
        }
        build_from_quads(&vertices, &faces).unwrap()
    }

    fn sorted<T: Ord>(mut v: Vec<T>) -> Vec<T> {
        v.sort();
        v
    }

    #[test]
    fn test_single_quad_naked_edges() {
        let mesh = single_quad();
        let topo = mesh.topology();
        assert_eq!(
            topo.naked_edges(),
            vec![(k(0), k(1)), (k(1), k(2)), (k(2), k(3)), (k(3), k(0))]
        );
        assert_eq!(topo.naked_vertices().len(), 4);
    }

    #[test]
    fn test_single_quad_corner_adjacency() {
        let mesh = single_quad();
        let topo = mesh.topology();
        assert_eq!(sorted(topo.vertex_adjacent_vertices(k(0))), vec![k(1), k(3)]);
        assert_eq!(sorted(topo.vertex_adjacent_vertices(k(2))), vec![k(1), k(3)]);
        assert_eq!(topo.vertex_valence(k(1)), 2);
    }

    #[test]
    fn test_two_triangles_unique_edges() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();
        let topo = mesh.topology();
        let edges = topo.unique_edges();
        assert_eq!(edges.len(), 5);
        let diagonal = edges
            .iter()
            .filter(|&&(a, b)| (a, b) == (k(0), k(2)) || (a, b) == (k(2), k(0)))
            .count();
        assert_eq!(diagonal, 1);
        assert_eq!(topo.unique_edges(), edges);
    }

    #[test]
    fn test_interior_vertex_ring_is_closed() {
        let mesh = grid(2);
        let topo = mesh.topology();
        // center vertex of a 3x3 grid of vertices
        let center = k(4);
        assert_eq!(topo.vertex_incident_elements(center).len(), 4);
        assert_eq!(
            sorted(topo.vertex_adjacent_vertices(center)),
            vec![k(1), k(3), k(5), k(7)]
        );
        assert!(!topo.is_naked_vertex(center));
        assert_eq!(topo.naked_vertices().len(), 8);
    }

    #[test]
    fn test_boundary_fan_is_open() {
        let mesh = grid(2);
        let topo = mesh.topology();
        // bottom middle vertex touches two quads
        assert_eq!(sorted(topo.vertex_incident_elements(k(1))), vec![
            ElementKey::new(0),
            ElementKey::new(1)
        ]);
        assert_eq!(sorted(topo.naked_neighbors(k(1))), vec![k(0), k(2)]);
        assert!(topo.is_naked_vertex(k(1)));
    }

    #[test]
    fn test_unknown_keys_yield_empty_results() {
        let mesh = single_quad();
        let topo = mesh.topology();
        assert!(topo.vertex_incident_elements(k(99)).is_empty());
        assert!(topo.vertex_adjacent_vertices(k(99)).is_empty());
        assert!(topo.element_adjacent_elements(ElementKey::new(99)).is_empty());
        assert!(!topo.is_naked_vertex(k(99)));
        assert!(topo.element_center(ElementKey::new(99)).is_none());
    }

    #[test]
    fn test_element_adjacency_and_geometry() {
        let mesh = grid(2);
        let topo = mesh.topology();
        assert_eq!(sorted(topo.element_adjacent_elements(ElementKey::new(0))), vec![
            ElementKey::new(1),
            ElementKey::new(2)
        ]);
        assert_eq!(topo.naked_elements().len(), 4);
        assert_eq!(topo.element_center(ElementKey::new(3)), Some(Point3::new(1.5, 1.5, 0.0)));
        let n = topo.element_normal(ElementKey::new(0)).unwrap();
        assert!((n - Vector3::z()).norm() < 1e-12);
    }

    #[test]
    fn test_grid_euler_characteristic() {
        let mesh = grid(3);
        assert_eq!(mesh.topology().euler_characteristic(), 1);
    }

    #[test]
    fn test_tetrahedra_queries() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let mesh = build_from_elements(&vertices, &[
            (ElementType::Tetrahedron, vec![0, 1, 2, 3]),
            (ElementType::Tetrahedron, vec![1, 2, 3, 4]),
        ])
        .unwrap();
        let topo = mesh.topology();

        // 5 vertices: 9 edges (complete graph minus (0, 4))
        assert_eq!(topo.unique_edges().len(), 9);
        assert_eq!(topo.naked_faces().len(), 6);
        assert_eq!(sorted(topo.vertex_incident_elements(k(1))), vec![
            ElementKey::new(0),
            ElementKey::new(1)
        ]);
        assert_eq!(sorted(topo.vertex_adjacent_vertices(k(0))), vec![k(1), k(2), k(3)]);
        assert_eq!(topo.vertex_valence(k(1)), 4);
        assert!(topo.naked_edges().is_empty());
        assert_eq!(topo.naked_vertices().len(), 5);
    }

    #[test]
    fn test_bars_chain() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let mesh = build_from_elements(&vertices, &[
            (ElementType::Bar, vec![0, 1]),
            (ElementType::Bar, vec![1, 2]),
        ])
        .unwrap();
        let topo = mesh.topology();
        assert_eq!(topo.vertex_incident_elements(k(1)).len(), 2);
        assert_eq!(sorted(topo.vertex_adjacent_vertices(k(1))), vec![k(0), k(2)]);
        assert_eq!(topo.unique_edges().len(), 2);
        assert!(!topo.is_naked_vertex(k(1)));
        assert!(topo.is_naked_vertex(k(0)));
    }

    #[test]
    fn test_edge_shared_by_three_triangles() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap();
        let topo = mesh.topology();
        let all = vec![ElementKey::new(0), ElementKey::new(1), ElementKey::new(2)];

        assert_eq!(sorted(topo.vertex_incident_elements(k(0))), all);
        assert_eq!(sorted(topo.vertex_incident_elements(k(1))), all);
        assert_eq!(sorted(topo.vertex_adjacent_vertices(k(0))), vec![k(1), k(2), k(3), k(4)]);
        for v in mesh.vertex_keys() {
            for w in topo.vertex_adjacent_vertices(v) {
                assert!(topo.vertex_adjacent_vertices(w).contains(&v), "{w:?} misses {v:?}");
            }
        }
        assert_eq!(sorted(topo.element_adjacent_elements(ElementKey::new(2))), vec![
            ElementKey::new(0),
            ElementKey::new(1)
        ]);

        // The shared edge is interior; the six outer edges are naked
        let naked = topo.naked_edges();
        assert_eq!(naked.len(), 6);
        assert!(naked.iter().all(|&(a, b)| !(a.raw() < 2 && b.raw() < 2)));
        assert_eq!(topo.unique_edges().len(), 7);
        assert!(topo.validate().is_empty());
    }
}
