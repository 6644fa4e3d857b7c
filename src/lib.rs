//! # ahf-mesh
//!
//! Polygonal and polyhedral meshes in array-based half-facet (AHF) form.
//!
//! Each element stores its vertex keys and, for every local half-facet (edge
//! of a polygon, face of a polyhedron, endpoint of a bar), a link to the
//! sibling half-facet of the neighbouring element that shares it. All
//! adjacency is derived from these links; nothing else is stored.
//!
//! ## Features
//!
//! - **Element types**: bars, triangles, quads, general polygons, tetrahedra,
//!   pyramids, prisms and hexahedra in one mesh
//! - **Stable keys**: vertices and elements are addressed by keys that survive
//!   removals and subdivision
//! - **Topology queries**: incident elements, adjacent vertices, naked
//!   boundary, unique edges, normals and curvature
//! - **Subdivision**: Catmull-Clark and Loop
//! - **Transforms**: parallel translate/scale/rotate/mirror/jitter
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use ahf_mesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_elements(), 4);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use ahf_mesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh = build_from_triangles(&vertices, &faces).unwrap();
//! let topo = mesh.topology();
//! let v = VertexKey::new(0);
//!
//! for neighbor in topo.vertex_adjacent_vertices(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//! for element in topo.vertex_incident_elements(v) {
//!     println!("Incident element: {:?}", element);
//! }
//!
//! // Local half-facets are numbered from 1
//! let e = mesh.element(ElementKey::new(0)).unwrap();
//! assert!(e.is_naked_half_facet(1).unwrap());
//! ```
//!
//! ## Logging
//!
//! The crate reports pass summaries at `debug` level and non-manifold input
//! at `warn` level through the [`log`] facade. It never installs a logger.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod topology;

pub use error::{MeshError, Result};

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use ahf_mesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::geometry::Plane;
    pub use crate::mesh::{
        build_from_elements, build_from_polygons, build_from_quads, build_from_triangles,
        to_face_vertex, Element, ElementKey, ElementType, HalfFacetRef, Mesh, Sibling, Vertex,
        VertexKey,
    };
    pub use crate::topology::{NormalOptions, Topology};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_elements(), 4);

        let topo = mesh.topology();
        assert!(topo.validate().is_empty());
        assert_eq!(topo.unique_edges().len(), 6);

        // Closed surface: nothing is naked
        for v in mesh.vertex_keys() {
            assert!(!topo.is_naked_vertex(v), "vertex {:?} should not be on boundary", v);
        }
        assert!(topo.naked_edges().is_empty());
    }
}
