//! Mesh construction utilities.
//!
//! This module builds AHF meshes from face-vertex lists as commonly found in
//! mesh file formats. Vertex `i` of the input is stored under key `i`,
//! element `j` under key `j`, and topology is built before returning.

use nalgebra::Point3;

use super::ahf::Mesh;
use super::element_type::ElementType;
use super::key::{ElementKey, VertexKey};
use crate::error::{MeshError, Result};

/// Build a mesh from vertices and triangle faces.
///
/// # Example
/// ```
/// use ahf_mesh::mesh::build_from_triangles;
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_elements(), 1);
/// ```
pub fn build_from_triangles(vertices: &[Point3<f64>], faces: &[[usize; 3]]) -> Result<Mesh> {
    let elements: Vec<(ElementType, Vec<usize>)> = faces
        .iter()
        .map(|f| (ElementType::Triangle, f.to_vec()))
        .collect();
    build_from_elements(vertices, &elements)
}

/// Build a mesh from vertices and quad faces (counter-clockwise).
pub fn build_from_quads(vertices: &[Point3<f64>], faces: &[[usize; 4]]) -> Result<Mesh> {
    let elements: Vec<(ElementType, Vec<usize>)> =
        faces.iter().map(|f| (ElementType::Quad, f.to_vec())).collect();
    build_from_elements(vertices, &elements)
}

/// Build a mesh from vertices and polygons of any size (at least 3 sides).
pub fn build_from_polygons(vertices: &[Point3<f64>], faces: &[Vec<usize>]) -> Result<Mesh> {
    let mut elements = Vec::with_capacity(faces.len());
    for face in faces {
        let ty = ElementType::from_vertex_count(2, face.len()).ok_or(MeshError::InvalidArity {
            element_type: ElementType::Polygon(face.len()),
            expected: 3,
            actual: face.len(),
        })?;
        elements.push((ty, face.clone()));
    }
    build_from_elements(vertices, &elements)
}

/// Build a mesh from vertices and typed elements of any dimension.
///
/// # Example
/// ```
/// use ahf_mesh::mesh::{build_from_elements, ElementType};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(0.0, 0.0, 1.0),
///     Point3::new(1.0, 1.0, 1.0),
/// ];
/// let tets = vec![
///     (ElementType::Tetrahedron, vec![0, 1, 2, 3]),
///     (ElementType::Tetrahedron, vec![1, 2, 3, 4]),
/// ];
/// let mesh = build_from_elements(&vertices, &tets).unwrap();
/// assert_eq!(mesh.dimension(), 3);
/// ```
pub fn build_from_elements(
    vertices: &[Point3<f64>],
    elements: &[(ElementType, Vec<usize>)],
) -> Result<Mesh> {
    if elements.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    // Validate vertex indices and degeneracy up front so errors carry input positions
    for (ei, (ty, indices)) in elements.iter().enumerate() {
        if indices.len() != ty.vertex_count() {
            return Err(MeshError::InvalidArity {
                element_type: *ty,
                expected: ty.vertex_count(),
                actual: indices.len(),
            });
        }
        for (i, &vi) in indices.iter().enumerate() {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { element: ei, vertex: vi });
            }
            if indices[..i].contains(&vi) {
                return Err(MeshError::DegenerateElement { element: ei });
            }
        }
    }

    let mut mesh = Mesh::new();
    for (i, &pos) in vertices.iter().enumerate() {
        mesh.add_vertex_with_key(VertexKey::new(i as u32), pos)?;
    }
    for (ei, (ty, indices)) in elements.iter().enumerate() {
        let keys = indices.iter().map(|&vi| VertexKey::new(vi as u32)).collect();
        mesh.add_element_with_key(ElementKey::new(ei as u32), *ty, keys)?;
    }

    mesh.build_topology(true);
    Ok(mesh)
}

/// Convert a mesh back to a face-vertex representation.
///
/// Vertices are emitted in key order; faces hold indices into that list.
/// Only 2D elements are emitted.
pub fn to_face_vertex(mesh: &Mesh) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let index_of: std::collections::HashMap<VertexKey, usize> = mesh
        .vertex_keys()
        .enumerate()
        .map(|(i, k)| (k, i))
        .collect();
    let vertices = mesh.vertices().values().map(|v| v.position).collect();
    let faces = mesh
        .elements()
        .values()
        .filter(|e| e.element_type().is_face())
        .map(|e| e.vertices().iter().map(|k| index_of[k]).collect())
        .collect();
    (vertices, faces)
}
