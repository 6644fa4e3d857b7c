//! Mesh vertices.

use nalgebra::{Point3, Vector3};

use super::key::VertexKey;
use super::sibling::HalfFacetRef;

/// A vertex of an AHF mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    key: VertexKey,

    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// Cached unit normal, written by `Mesh::update_vertex_normals`.
    pub normal: Option<Vector3<f64>>,

    /// One incident half-facet (V2HF). Set by topology build; a naked
    /// half-facet is preferred so boundary vertices can be recognised in O(1).
    pub(crate) v2hf: Option<HalfFacetRef>,
}

impl Vertex {
    /// Create a vertex at `position`.
    pub fn new(key: VertexKey, position: Point3<f64>) -> Self {
        Self {
            key,
            position,
            normal: None,
            v2hf: None,
        }
    }

    /// Create a vertex from coordinates.
    pub fn from_coords(key: VertexKey, x: f64, y: f64, z: f64) -> Self {
        Self::new(key, Point3::new(x, y, z))
    }

    /// The vertex key.
    #[inline]
    pub fn key(&self) -> VertexKey {
        self.key
    }

    /// The stored incident half-facet, if topology has been built.
    #[inline]
    pub fn incident_half_facet(&self) -> Option<HalfFacetRef> {
        self.v2hf
    }

    /// Forget derived state (V2HF and normal).
    pub(crate) fn reset_topology(&mut self) {
        self.v2hf = None;
        self.normal = None;
    }
}
