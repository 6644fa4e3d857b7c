//! Mesh subdivision algorithms.
//!
//! Both schemes read a mesh with current topology and emit a new, finer mesh
//! with its own topology built. Original vertices keep their keys; new face
//! and edge points take fresh keys starting at the input's next free vertex
//! key. Every pass follows the same steps:
//!
//! 1. Compute new positions for the original vertices
//! 2. Insert a vertex per face center (Catmull-Clark only) and per edge,
//!    walking half-facets once per sibling chain
//! 3. Replace each face by its children
//! 4. Position the edge points from the original face centers
//! 5. Build topology on the result
//!
//! # Loop Subdivision (Triangle Meshes)
//!
//! Loop subdivision (Loop, 1987) splits each triangle into four. Inputs with
//! other polygons are triangulated first.
//!
//! # Catmull-Clark Subdivision (Polygon Meshes)
//!
//! Catmull-Clark subdivision (Catmull & Clark, 1978) replaces each n-gon by n
//! quads around its face point.
//!
//! # Example
//!
//! ```
//! use ahf_mesh::prelude::*;
//! use ahf_mesh::algo::subdivide::{catmull_clark, SubdivideOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//!
//! let fine = catmull_clark(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(fine.num_elements(), 16);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.
//! - Catmull, E. & Clark, J. (1978). "Recursively generated B-spline surfaces
//!   on arbitrary topological meshes." Computer-Aided Design, 10(6), 350-355.

mod catmull_clark;
mod loop_subdivision;

use std::collections::HashMap;

use nalgebra::Point3;
use rayon::prelude::*;

pub use catmull_clark::catmull_clark;
pub use loop_subdivision::loop_subdivision;

use crate::error::{MeshError, Result};
use crate::mesh::{HalfFacetRef, Mesh, VertexKey};
use crate::topology::VisitMarks;

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: true,
        }
    }

    /// Set the number of iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// Fail unless topology is current and every element is a polygon.
pub(crate) fn check_surface(mesh: &Mesh, operation: &'static str) -> Result<()> {
    mesh.require_topology(operation)?;
    if let Some(e) = mesh.elements().values().find(|e| !e.element_type().is_face()) {
        return Err(MeshError::UnsupportedElement {
            operation,
            element: e.key(),
            element_type: e.element_type(),
        });
    }
    Ok(())
}

/// One new vertex per edge, shared by every half-facet on the edge's sibling chain.
#[derive(Debug)]
struct EdgePoints {
    keys: HashMap<HalfFacetRef, VertexKey>,
    /// Each edge once, as the half-facet that claimed it.
    edges: Vec<(VertexKey, HalfFacetRef)>,
}

impl EdgePoints {
    /// Walk every polygon half-facet and assign keys from `first` upwards.
    fn assign(mesh: &Mesh, first: VertexKey) -> Result<Self> {
        let topo = mesh.topology();
        let mut marks = VisitMarks::new();
        let mut keys = HashMap::new();
        let mut edges = Vec::new();
        let mut next = Some(first.raw());

        for e in mesh.elements().values() {
            for local in 1..=e.half_facet_count() {
                let hf = e.half_facet_ref(local);
                if !marks.register_with_sibling(mesh, hf) {
                    continue;
                }
                let raw = next.ok_or(MeshError::KeySpaceExhausted("vertex"))?;
                let key = VertexKey::new(raw);
                next = raw.checked_add(1);
                keys.insert(hf, key);
                for other in topo.half_facet_siblings(hf) {
                    keys.insert(other, key);
                }
                edges.push((key, hf));
            }
        }
        Ok(Self { keys, edges })
    }

    fn key(&self, hf: HalfFacetRef) -> Result<VertexKey> {
        self.keys
            .get(&hf)
            .copied()
            .ok_or(MeshError::ElementNotFound(hf.element))
    }

    fn len(&self) -> usize {
        self.edges.len()
    }

    /// Compute a position for every edge point.
    fn positions<F>(&self, parallel: bool, rule: F) -> Vec<(VertexKey, Point3<f64>)>
    where
        F: Fn(HalfFacetRef) -> Point3<f64> + Sync + Send,
    {
        if parallel {
            self.edges.par_iter().map(|&(k, hf)| (k, rule(hf))).collect()
        } else {
            self.edges.iter().map(|&(k, hf)| (k, rule(hf))).collect()
        }
    }
}

/// Apply `rule` to every vertex key of `mesh`, in key order.
fn vertex_positions<F>(mesh: &Mesh, parallel: bool, rule: F) -> Vec<(VertexKey, Point3<f64>)>
where
    F: Fn(VertexKey) -> Point3<f64> + Sync + Send,
{
    let keys: Vec<VertexKey> = mesh.vertex_keys().collect();
    if parallel {
        keys.into_par_iter().map(|v| (v, rule(v))).collect()
    } else {
        keys.into_iter().map(|v| (v, rule(v))).collect()
    }
}

/// Local id of the half-facet that ends at vertex slot `i` of an n-gon.
#[inline]
fn incoming_local(i: usize, n: usize) -> usize {
    if i == 0 {
        n
    } else {
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_elements, build_from_quads, ElementType};

    #[test]
    fn test_options_builders() {
        let options = SubdivideOptions::new(3).sequential();
        assert_eq!(options.iterations, 3);
        assert!(!options.parallel);
        let options = SubdivideOptions::default().with_iterations(2).with_parallel(true);
        assert_eq!(options.iterations, 2);
        assert!(options.parallel);
    }

    #[test]
    fn test_edge_points_shared_between_siblings() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mesh = build_from_quads(&vertices, &[[0, 1, 4, 3], [1, 2, 5, 4]]).unwrap();
        let points = EdgePoints::assign(&mesh, mesh.find_next_vertex_key().unwrap()).unwrap();
        assert_eq!(points.len(), 7);

        let a = HalfFacetRef::new(crate::mesh::ElementKey::new(0), 2);
        let b = HalfFacetRef::new(crate::mesh::ElementKey::new(1), 4);
        assert_eq!(points.key(a).unwrap(), points.key(b).unwrap());
        assert_eq!(points.edges[0].0, VertexKey::new(6));
    }

    #[test]
    fn test_check_surface_rejects_volumes() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let mesh =
            build_from_elements(&vertices, &[(ElementType::Tetrahedron, vec![0, 1, 2, 3])]).unwrap();
        assert!(matches!(
            check_surface(&mesh, "test"),
            Err(MeshError::UnsupportedElement { element_type: ElementType::Tetrahedron, .. })
        ));
    }

    #[test]
    fn test_incoming_local_wraps() {
        assert_eq!(incoming_local(0, 4), 4);
        assert_eq!(incoming_local(2, 4), 2);
    }
}
