//! Discrete Gaussian curvature via angle defect.
//!
//! The curvature at a vertex is its angle defect divided by an area share:
//! one n-th of the area of every incident n-gon. Interior vertices measure the
//! defect against `2π`, naked vertices against `π`.
//!
//! # References
//!
//! - Meyer, M., et al. (2003). "Discrete Differential-Geometry Operators for
//!   Triangulated 2-Manifolds." Visualization and Mathematics III.

use std::f64::consts::{PI, TAU};

use rayon::prelude::*;

use super::Topology;
use crate::geometry;
use crate::mesh::VertexKey;

/// Options for curvature computation.
#[derive(Debug, Clone)]
pub struct CurvatureOptions {
    /// Whether to use parallel execution (default: true).
    pub parallel: bool,
}

impl Default for CurvatureOptions {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl CurvatureOptions {
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
    /// Angle defect at `v` over its incident polygons.
    ///
    /// Returns 0 for vertices without incident polygons.
    pub fn vertex_angle_defect(&self, v: VertexKey) -> f64 {
        let (angle_sum, _, count) = self.corner_angles_and_area(v);
        if count == 0 {
            return 0.0;
        }
        let full = if self.is_naked_vertex(v) { PI } else { TAU };
        full - angle_sum
    }

    /// Gaussian curvature at `v`.
    ///
    /// Returns 0 where the area share vanishes.
    pub fn compute_vertex_curvature(&self, v: VertexKey) -> f64 {
        let (_, area, _) = self.corner_angles_and_area(v);
        if area < 1e-12 {
            return 0.0;
        }
        self.vertex_angle_defect(v) / area
    }

    /// Gaussian curvature of every vertex, in key order.
    pub fn compute_all_vertices_curvature(&self, options: &CurvatureOptions) -> Vec<(VertexKey, f64)> {
        let keys: Vec<VertexKey> = self.mesh().vertex_keys().collect();
        if options.parallel {
            keys.into_par_iter()
                .map(|v| (v, self.compute_vertex_curvature(v)))
                .collect()
        } else {
            keys.into_iter()
                .map(|v| (v, self.compute_vertex_curvature(v)))
                .collect()
        }
    }

    /// Sum of corner angles at `v`, its area share, and the polygon count.
    fn corner_angles_and_area(&self, v: VertexKey) -> (f64, f64, usize) {
        let Some(p) = self.mesh().vertices().get(v).map(|vx| vx.position) else {
            return (0.0, 0.0, 0);
        };
        let mut angle_sum = 0.0;
        let mut area = 0.0;
        let mut count = 0;
        for ek in self.vertex_incident_elements(v) {
            let Some(e) = self.mesh().elements().get(ek) else {
                continue;
            };
            let Some((prev, next)) = e.polygon_neighbors(v) else {
                continue;
            };
            let (Ok(prev), Ok(next)) = (self.mesh().position(prev), self.mesh().position(next))
            else {
                continue;
            };
            angle_sum += geometry::angle_at(&p, &prev, &next);
            let polygon = self.positions_of(e.vertices());
            area += geometry::newell_normal(&polygon).norm() * 0.5 / polygon.len() as f64;
            count += 1;
        }
        (angle_sum, area, count)
    }
}
