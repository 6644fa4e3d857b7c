//! Loop subdivision for triangle meshes.

use std::collections::HashMap;

use log::debug;
use nalgebra::Point3;

use crate::algo::triangulate::triangulate;
use crate::error::Result;
use crate::geometry;
use crate::mesh::{ElementKey, ElementType, HalfFacetRef, Mesh, VertexKey};
use crate::topology::Topology;

use super::{check_surface, vertex_positions, EdgePoints, SubdivideOptions};

/// Performs Loop subdivision on a polygon mesh.
///
/// Non-triangle faces are triangulated first, then each iteration splits
/// every triangle into four.
///
/// # Vertex Rules
///
/// - **Interior vertex** of valence n: `β = 3/(8n)` for n > 3, otherwise
///   `3/16`; with `c = nβ` the new position is `(1 - c)P + c·avg(neighbours)`
/// - **Boundary vertex**: average over naked neighbours `w` of
///   `(midpoint(v, w) + v) / 2`
/// - **Interior edge** `(a, b)`: `(a + b + 3(c1 + c2)) / 8` with `c1`, `c2`
///   the centroids of the two adjacent triangles
/// - **Naked edge**: midpoint
///
/// Vertices with no usable neighbours keep their position.
///
/// # Errors
///
/// [`MeshError::StaleTopology`](crate::MeshError::StaleTopology) if topology
/// is not current, [`MeshError::UnsupportedElement`](crate::MeshError::UnsupportedElement)
/// for bars or polyhedra. With `iterations == 0` a clean copy is returned.
///
/// # Example
///
/// ```
/// use ahf_mesh::prelude::*;
/// use ahf_mesh::algo::subdivide::{loop_subdivision, SubdivideOptions};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
/// let fine = loop_subdivision(&mesh, &SubdivideOptions::new(1)).unwrap();
/// assert_eq!(fine.num_vertices(), 6);
/// assert_eq!(fine.num_elements(), 4);
/// ```
pub fn loop_subdivision(mesh: &Mesh, options: &SubdivideOptions) -> Result<Mesh> {
    check_surface(mesh, "loop_subdivision")?;
    if options.iterations == 0 {
        return Ok(mesh.clean_copy());
    }

    let all_triangles = mesh
        .elements()
        .values()
        .all(|e| e.element_type() == ElementType::Triangle);
    let mut current = if all_triangles {
        loop_subdivide_once(mesh, options.parallel)?
    } else {
        loop_subdivide_once(&triangulate(mesh)?, options.parallel)?
    };
    for _ in 1..options.iterations {
        current = loop_subdivide_once(&current, options.parallel)?;
    }
    Ok(current)
}

/// Perform one iteration of Loop subdivision on an all-triangle mesh.
fn loop_subdivide_once(mesh: &Mesh, parallel: bool) -> Result<Mesh> {
    let topo = mesh.topology();

    let centroids: HashMap<ElementKey, Point3<f64>> = mesh
        .element_keys()
        .filter_map(|ek| topo.element_center(ek).map(|c| (ek, c)))
        .collect();

    // Step 1: updated positions of original vertices
    let vertex_points = vertex_positions(mesh, parallel, |v| vertex_point(&topo, v));
    let mut out = Mesh::new();
    for &(key, pos) in &vertex_points {
        out.add_vertex_with_key(key, pos)?;
    }

    // Steps 2 and 4: edge points
    let edge_points = EdgePoints::assign(mesh, out.find_next_vertex_key()?)?;
    let edge_positions = edge_points.positions(parallel, |hf| edge_point(&topo, &centroids, hf));
    for &(key, pos) in &edge_positions {
        out.add_vertex_with_key(key, pos)?;
    }

    // Step 3: three corner triangles and the medial triangle
    for e in mesh.elements().values() {
        let &[a, b, c] = e.vertices() else {
            continue;
        };
        let ab = edge_points.key(e.half_facet_ref(1))?;
        let bc = edge_points.key(e.half_facet_ref(2))?;
        let ca = edge_points.key(e.half_facet_ref(3))?;
        out.add_element(ElementType::Triangle, vec![a, ab, ca])?;
        out.add_element(ElementType::Triangle, vec![b, bc, ab])?;
        out.add_element(ElementType::Triangle, vec![c, ca, bc])?;
        out.add_element(ElementType::Triangle, vec![ab, bc, ca])?;
    }

    // Step 5
    out.build_topology(true);
    debug!(
        "loop: {} vertices, {} triangles -> {} vertices ({} edge points), {} triangles",
        mesh.num_vertices(),
        mesh.num_elements(),
        out.num_vertices(),
        edge_points.len(),
        out.num_elements()
    );
    Ok(out)
}

/// Loop weight `β` for an interior vertex of valence `n`.
fn loop_beta(n: usize) -> f64 {
    if n > 3 {
        3.0 / (8.0 * n as f64)
    } else {
        3.0 / 16.0
    }
}

fn vertex_point(topo: &Topology<'_>, v: VertexKey) -> Point3<f64> {
    let mesh = topo.mesh();
    let Ok(p) = mesh.position(v) else {
        return Point3::origin();
    };

    if topo.is_naked_vertex(v) {
        let pulled: Vec<Point3<f64>> = topo
            .naked_neighbors(v)
            .into_iter()
            .filter_map(|w| mesh.position(w).ok())
            .map(|q| geometry::midpoint(&geometry::midpoint(&p, &q), &p))
            .collect();
        return geometry::centroid(&pulled).unwrap_or(p);
    }

    let neighbors: Vec<Point3<f64>> = topo
        .vertex_adjacent_vertices(v)
        .into_iter()
        .filter_map(|w| mesh.position(w).ok())
        .collect();
    let Some(avg) = geometry::centroid(&neighbors) else {
        return p;
    };
    let coef = loop_beta(neighbors.len()) * neighbors.len() as f64;
    Point3::from(p.coords * (1.0 - coef) + avg.coords * coef)
}

fn edge_point(
    topo: &Topology<'_>,
    centroids: &HashMap<ElementKey, Point3<f64>>,
    hf: HalfFacetRef,
) -> Point3<f64> {
    let mesh = topo.mesh();
    let Some(e) = mesh.elements().get(hf.element) else {
        return Point3::origin();
    };
    let local = hf.local as usize;
    let ends = e.half_facet_unchecked(local);
    let (Ok(a), Ok(b)) = (mesh.position(ends[0]), mesh.position(ends[1])) else {
        return Point3::origin();
    };

    // naked and non-manifold edges are creases
    let siblings = topo.half_facet_siblings(hf);
    let [other] = siblings.as_slice() else {
        return geometry::midpoint(&a, &b);
    };
    match (centroids.get(&hf.element), centroids.get(&other.element)) {
        (Some(c1), Some(c2)) => {
            Point3::from((a.coords + b.coords + 3.0 * (c1.coords + c2.coords)) / 8.0)
        }
        _ => geometry::midpoint(&a, &b),
    }
}
