//! Triangulation of polygon meshes.
//!
//! Quads are split along their shorter diagonal; larger polygons are split
//! into a fan around their first vertex. Triangles pass through unchanged.

use log::debug;

use crate::error::{MeshError, Result};
use crate::mesh::{ElementType, Mesh, VertexKey};

/// Build an all-triangle copy of a polygon mesh.
///
/// Vertices keep their keys and positions. Triangles are keyed in the order
/// their parent elements appear. Topology is built on the result.
///
/// # Errors
///
/// [`MeshError::UnsupportedElement`] if the mesh contains bars or polyhedra.
///
/// # Example
///
/// ```
/// use ahf_mesh::algo::triangulate::triangulate;
/// use ahf_mesh::mesh::build_from_quads;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// let quads = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
/// let tris = triangulate(&quads).unwrap();
/// assert_eq!(tris.num_elements(), 2);
/// ```
pub fn triangulate(mesh: &Mesh) -> Result<Mesh> {
    let mut out = Mesh::new();
    for v in mesh.vertices().values() {
        out.add_vertex_with_key(v.key(), v.position)?;
    }

    let mut split = 0usize;
    for e in mesh.elements().values() {
        let ty = e.element_type();
        if !ty.is_face() {
            return Err(MeshError::UnsupportedElement {
                operation: "triangulate",
                element: e.key(),
                element_type: ty,
            });
        }
        let triangles = split_polygon(mesh, e.vertices())?;
        if triangles.len() > 1 {
            split += 1;
        }
        for tri in triangles {
            out.add_element(ElementType::Triangle, tri.to_vec())?;
        }
    }

    out.build_topology(true);
    debug!(
        "triangulate: {} elements ({} split) -> {} triangles",
        mesh.num_elements(),
        split,
        out.num_elements()
    );
    Ok(out)
}

fn split_polygon(mesh: &Mesh, vs: &[VertexKey]) -> Result<Vec<[VertexKey; 3]>> {
    match vs.len() {
        3 => Ok(vec![[vs[0], vs[1], vs[2]]]),
        4 => {
            let d02 = (mesh.position(vs[2])? - mesh.position(vs[0])?).norm_squared();
            let d13 = (mesh.position(vs[3])? - mesh.position(vs[1])?).norm_squared();
            if d02 <= d13 {
                Ok(vec![[vs[0], vs[1], vs[2]], [vs[0], vs[2], vs[3]]])
            } else {
                Ok(vec![[vs[0], vs[1], vs[3]], [vs[1], vs[2], vs[3]]])
            }
        }
        n => Ok((1..n - 1).map(|i| [vs[0], vs[i], vs[i + 1]]).collect()),
    }
}
