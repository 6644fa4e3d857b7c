//! Rigid and affine vertex transforms.
//!
//! Every transform moves positions in place and leaves topology untouched.
//! Updates fan out over the vertex container with rayon; each vertex's new
//! position depends only on its own old position, so the result is the same
//! in any processing order.
//!
//! Cached vertex normals follow the transform where that is well defined
//! (translation, rotation, uniform scaling) and are dropped otherwise.
//!
//! # Example
//!
//! ```
//! use ahf_mesh::algo::transform::{rotate, translate};
//! use ahf_mesh::mesh::{build_from_triangles, VertexKey};
//! use nalgebra::{Point3, Vector3};
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! translate(&mut mesh, &Vector3::new(0.0, 0.0, 2.0));
//! rotate(&mut mesh, &Vector3::z(), std::f64::consts::FRAC_PI_2, &Point3::origin()).unwrap();
//!
//! let p = mesh.position(VertexKey::new(1)).unwrap();
//! assert!((p - Point3::new(0.0, 1.0, 2.0)).norm() < 1e-12);
//! ```

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Rotation3, Unit, Vector3};
use rand::Rng;
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::geometry::Plane;
use crate::mesh::{Mesh, Vertex, VertexKey};

/// Apply `f` to every vertex in parallel.
fn for_each_vertex<F>(mesh: &mut Mesh, f: F)
where
    F: Fn(&mut Vertex) + Sync + Send,
{
    mesh.vertices.map_mut().par_iter_mut().for_each(|(_, v)| f(v));
}

/// Move every vertex by `offset`.
pub fn translate(mesh: &mut Mesh, offset: &Vector3<f64>) {
    let offset = *offset;
    for_each_vertex(mesh, |v| v.position += offset);
}

/// Scale uniformly about `center`.
///
/// A negative factor turns the mesh inside out, so cached normals are
/// flipped with it.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] for a zero or non-finite factor.
pub fn scale(mesh: &mut Mesh, factor: f64, center: &Point3<f64>) -> Result<()> {
    if factor == 0.0 || !factor.is_finite() {
        return Err(MeshError::invalid_param("factor", factor, "must be finite and non-zero"));
    }
    let center = *center;
    for_each_vertex(mesh, |v| {
        v.position = center + (v.position - center) * factor;
        if factor < 0.0 {
            v.normal = v.normal.map(|n| -n);
        }
    });
    Ok(())
}

/// Rotate by `angle` radians about `axis` through `center`.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] for a zero-length axis.
pub fn rotate(
    mesh: &mut Mesh,
    axis: &Vector3<f64>,
    angle: f64,
    center: &Point3<f64>,
) -> Result<()> {
    let axis = Unit::try_new(*axis, 1e-12)
        .ok_or_else(|| MeshError::invalid_param("axis", format!("{axis:?}"), "zero length"))?;
    let rotation = Rotation3::from_axis_angle(&axis, angle);
    let center = *center;
    for_each_vertex(mesh, |v| {
        v.position = center + rotation * (v.position - center);
        v.normal = v.normal.map(|n| rotation * n);
    });
    Ok(())
}

/// Apply a homogeneous transform to every position.
///
/// Cached normals are dropped.
pub fn transform(mesh: &mut Mesh, matrix: &Matrix4<f64>) {
    let matrix = *matrix;
    for_each_vertex(mesh, |v| {
        v.position = matrix.transform_point(&v.position);
        v.normal = None;
    });
}

/// Reflect every position across `plane`.
///
/// Element winding is left as is, so the mirrored surface faces inward
/// relative to the original. Cached normals are cleared; recompute them with
/// [`Mesh::update_vertex_normals`].
pub fn mirror(mesh: &mut Mesh, plane: &Plane) {
    let plane = *plane;
    for_each_vertex(mesh, |v| {
        v.position = plane.reflect(&v.position);
        v.normal = None;
    });
}

/// Displace every vertex by a random offset in `[-amplitude, amplitude)` per
/// axis.
///
/// Offsets are drawn from `rng` in vertex key order before any vertex moves,
/// so a seeded generator gives reproducible results. Cached normals are
/// dropped.
///
/// # Errors
///
/// [`MeshError::InvalidParameter`] for a negative or non-finite amplitude.
pub fn jitter<R: Rng>(mesh: &mut Mesh, amplitude: f64, rng: &mut R) -> Result<()> {
    if amplitude < 0.0 || !amplitude.is_finite() {
        return Err(MeshError::invalid_param(
            "amplitude",
            amplitude,
            "must be finite and non-negative",
        ));
    }
    if amplitude == 0.0 {
        return Ok(());
    }

    let keys: Vec<VertexKey> = mesh.vertex_keys().collect();
    let offsets: HashMap<VertexKey, Vector3<f64>> = keys
        .into_iter()
        .map(|k| {
            let d = Vector3::new(
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
                rng.gen_range(-amplitude..amplitude),
            );
            (k, d)
        })
        .collect();

    for_each_vertex(mesh, |v| {
        if let Some(d) = offsets.get(&v.key()) {
            v.position += d;
        }
        v.normal = None;
    });
    Ok(())
}
