//! Vertex normals.

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use super::Topology;
use crate::geometry;
use crate::mesh::VertexKey;

/// Options for vertex normal computation.
#[derive(Debug, Clone)]
pub struct NormalOptions {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl NormalOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
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

impl Topology<'_> {
    /// Unit normal at vertex `v`.
    ///
    /// Each incident polygon contributes the normalized cross product of the
    /// two edges leaving `v` along its winding. Incident polyhedra contribute
    /// through their naked faces only, so a solid gets outward normals on its
    /// surface. Returns the zero vector when nothing contributes or the
    /// contributions cancel.
    pub fn compute_vertex_normal(&self, v: VertexKey) -> Vector3<f64> {
        let Some(p) = self.mesh().vertices().get(v).map(|vx| vx.position) else {
            return Vector3::zeros();
        };
        let mut sum = Vector3::zeros();
        for ek in self.vertex_incident_elements(v) {
            let Some(e) = self.mesh().elements().get(ek) else {
                continue;
            };
            match e.dimension() {
                2 => sum += self.corner_term(&p, e.vertices(), v),
                3 => {
                    for local in 1..=e.half_facet_count() {
                        if e.sibling_unchecked(local).is_naked() && e.half_facet_contains(local, v) {
                            sum += self.corner_term(&p, &e.half_facet_unchecked(local), v);
                        }
                    }
                }
                _ => {}
            }
        }
        geometry::safe_normalize(&sum).unwrap_or_else(Vector3::zeros)
    }

    /// Normals of every vertex, in key order.
    ///
    /// Positions are only read, so the result does not depend on the order
    /// in which vertices are processed.
    pub fn compute_all_vertices_normals(
        &self,
        options: &NormalOptions,
    ) -> Vec<(VertexKey, Vector3<f64>)> {
        let keys: Vec<VertexKey> = self.mesh().vertex_keys().collect();
        if options.parallel {
            keys.into_par_iter()
                .map(|v| (v, self.compute_vertex_normal(v)))
                .collect()
        } else {
            keys.into_iter()
                .map(|v| (v, self.compute_vertex_normal(v)))
                .collect()
        }
    }

    fn corner_term(&self, p: &Point3<f64>, cycle: &[VertexKey], v: VertexKey) -> Vector3<f64> {
        let Some(i) = cycle.iter().position(|&w| w == v) else {
            return Vector3::zeros();
        };
        let n = cycle.len();
        let vertices = self.mesh().vertices();
        let (Some(prev), Some(next)) = (
            vertices.get(cycle[(i + n - 1) % n]),
            vertices.get(cycle[(i + 1) % n]),
        ) else {
            return Vector3::zeros();
        };
        let cross = (next.position - p).cross(&(prev.position - p));
        geometry::safe_normalize(&cross).unwrap_or_else(Vector3::zeros)
    }
}
