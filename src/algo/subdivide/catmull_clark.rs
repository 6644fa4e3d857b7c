//! Catmull-Clark subdivision for polygon meshes.

use std::collections::HashMap;

use log::debug;
use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::geometry;
use crate::mesh::{ElementKey, ElementType, HalfFacetRef, Mesh, VertexKey};
use crate::topology::Topology;

use super::{check_surface, incoming_local, vertex_positions, EdgePoints, SubdivideOptions};

/// Performs Catmull-Clark subdivision on a polygon mesh.
///
/// Each iteration replaces every n-gon by n quads, so any polygon input
/// becomes an all-quad mesh after the first pass.
///
/// # Arguments
///
/// * `mesh` - The mesh to subdivide; must have current topology and only 2D
///   elements
/// * `options` - Subdivision parameters
///
/// # Vertex Rules
///
/// - **Face point**: centroid of face vertices
/// - **Edge point**: `(endpoints + adjacent face points) / (2 + faces)`, the
///   plain midpoint on a naked edge
/// - **Vertex point**: `(F + 2R + (n-3)P) / n` where:
///   - F = average of incident face points
///   - R = average of midpoints to adjacent vertices
///   - P = original position
///   - n = number of adjacent vertices
/// - **Boundary vertex point**: average of the midpoints to its naked
///   neighbours
///
/// Vertices with no usable neighbours keep their position.
///
/// # Errors
///
/// [`MeshError::StaleTopology`](crate::MeshError::StaleTopology) if topology
/// is not current, [`MeshError::UnsupportedElement`](crate::MeshError::UnsupportedElement)
/// for bars or polyhedra. With `iterations == 0` a clean copy is returned.
pub fn catmull_clark(mesh: &Mesh, options: &SubdivideOptions) -> Result<Mesh> {
    check_surface(mesh, "catmull_clark")?;
    if options.iterations == 0 {
        return Ok(mesh.clean_copy());
    }

    let mut current = catmull_clark_once(mesh, options.parallel)?;
    for _ in 1..options.iterations {
        current = catmull_clark_once(&current, options.parallel)?;
    }
    Ok(current)
}

/// Perform one iteration of Catmull-Clark subdivision.
fn catmull_clark_once(mesh: &Mesh, parallel: bool) -> Result<Mesh> {
    let topo = mesh.topology();

    // Face points
    let face_points: HashMap<ElementKey, Point3<f64>> = mesh
        .element_keys()
        .filter_map(|ek| topo.element_center(ek).map(|c| (ek, c)))
        .collect();

    // Step 1: updated positions of original vertices
    let vertex_points = vertex_positions(mesh, parallel, |v| vertex_point(&topo, &face_points, v));

    let mut out = Mesh::new();
    for &(key, pos) in &vertex_points {
        out.add_vertex_with_key(key, pos)?;
    }

    // Step 2: face point and edge point vertices
    let mut face_keys: HashMap<ElementKey, VertexKey> = HashMap::with_capacity(face_points.len());
    for ek in mesh.element_keys() {
        if let Some(&c) = face_points.get(&ek) {
            face_keys.insert(ek, out.add_vertex(c)?);
        }
    }
    let edge_points = EdgePoints::assign(mesh, out.find_next_vertex_key()?)?;

    // Step 4 positions depend only on the original mesh; the vertices must
    // exist before the child quads reference them
    let edge_positions = edge_points.positions(parallel, |hf| edge_point(&topo, &face_points, hf));
    for &(key, pos) in &edge_positions {
        out.add_vertex_with_key(key, pos)?;
    }

    // Step 3: n quads per n-gon, wound like the parent
    for e in mesh.elements().values() {
        let Some(&center) = face_keys.get(&e.key()) else {
            continue;
        };
        let vs = e.vertices();
        let n = vs.len();
        for (i, &corner) in vs.iter().enumerate() {
            let outgoing = edge_points.key(e.half_facet_ref(i + 1))?;
            let incoming = edge_points.key(e.half_facet_ref(incoming_local(i, n)))?;
            out.add_element(ElementType::Quad, vec![corner, outgoing, center, incoming])?;
        }
    }

    // Step 5
    out.build_topology(true);
    debug!(
        "catmull-clark: {} vertices, {} faces -> {} vertices ({} face points, {} edge points), {} faces",
        mesh.num_vertices(),
        mesh.num_elements(),
        out.num_vertices(),
        face_keys.len(),
        edge_points.len(),
        out.num_elements()
    );
    Ok(out)
}

fn vertex_point(
    topo: &Topology<'_>,
    face_points: &HashMap<ElementKey, Point3<f64>>,
    v: VertexKey,
) -> Point3<f64> {
    let mesh = topo.mesh();
    let Ok(p) = mesh.position(v) else {
        return Point3::origin();
    };

    if topo.is_naked_vertex(v) {
        let midpoints: Vec<Point3<f64>> = topo
            .naked_neighbors(v)
            .into_iter()
            .filter_map(|w| mesh.position(w).ok())
            .map(|q| geometry::midpoint(&p, &q))
            .collect();
        return geometry::centroid(&midpoints).unwrap_or(p);
    }

    let midpoints: Vec<Point3<f64>> = topo
        .vertex_adjacent_vertices(v)
        .into_iter()
        .filter_map(|w| mesh.position(w).ok())
        .map(|q| geometry::midpoint(&p, &q))
        .collect();
    let centers: Vec<Point3<f64>> = topo
        .vertex_incident_elements(v)
        .into_iter()
        .filter_map(|ek| face_points.get(&ek).copied())
        .collect();
    let (Some(r), Some(f)) = (geometry::centroid(&midpoints), geometry::centroid(&centers)) else {
        return p;
    };

    let n = midpoints.len() as f64;
    let sum: Vector3<f64> = f.coords + 2.0 * r.coords + (n - 3.0) * p.coords;
    Point3::from(sum / n)
}

fn edge_point(
    topo: &Topology<'_>,
    face_points: &HashMap<ElementKey, Point3<f64>>,
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

    let siblings = topo.half_facet_siblings(hf);
    if siblings.is_empty() {
        return geometry::midpoint(&a, &b);
    }
    let mut sum = a.coords + b.coords;
    let mut count = 2.0;
    for ek in std::iter::once(hf.element).chain(siblings.iter().map(|s| s.element)) {
        if let Some(c) = face_points.get(&ek) {
            sum += c.coords;
            count += 1.0;
        }
    }
    Point3::from(sum / count)
}
