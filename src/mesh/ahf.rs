//! The AHF mesh aggregate.
//!
//! A [`Mesh`] owns an ordered vertex container and an ordered element
//! container. Connectivity lives entirely in the elements' sibling slots and
//! the vertices' V2HF back-references, both derived by
//! [`Mesh::build_topology`]. Structural mutation (adding or removing vertices
//! and elements) marks that derived state stale; moving vertices does not.

use nalgebra::{Point3, Vector3};

use super::container::{ElementContainer, VertexContainer};
use super::element::Element;
use super::element_type::ElementType;
use super::key::{ElementKey, VertexKey};
use super::vertex::Vertex;
use crate::error::{MeshError, Result};
use crate::topology::{self, NormalOptions, Topology};

/// A polygonal/polyhedral mesh in array-based half-facet form.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub(crate) vertices: VertexContainer,
    pub(crate) elements: ElementContainer,
    topology_built: bool,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of elements.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Whether the mesh has neither vertices nor elements.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.elements.is_empty()
    }

    /// Vertex stored under `key`.
    pub fn vertex(&self, key: VertexKey) -> Result<&Vertex> {
        self.vertices.get(key).ok_or(MeshError::VertexNotFound(key))
    }

    /// Element stored under `key`.
    pub fn element(&self, key: ElementKey) -> Result<&Element> {
        self.elements.get(key).ok_or(MeshError::ElementNotFound(key))
    }

    /// Position of the vertex stored under `key`.
    pub fn position(&self, key: VertexKey) -> Result<Point3<f64>> {
        self.vertex(key).map(|v| v.position)
    }

    /// Vertex storage.
    #[inline]
    pub fn vertices(&self) -> &VertexContainer {
        &self.vertices
    }

    /// Element storage.
    #[inline]
    pub fn elements(&self) -> &ElementContainer {
        &self.elements
    }

    /// Vertex keys in ascending order.
    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.vertices.keys()
    }

    /// Element keys in ascending order.
    pub fn element_keys(&self) -> impl Iterator<Item = ElementKey> + '_ {
        self.elements.keys()
    }

    /// The key the next auto-keyed vertex will receive.
    ///
    /// Fails with [`MeshError::KeySpaceExhausted`] once `u32::MAX` is taken.
    pub fn find_next_vertex_key(&self) -> Result<VertexKey> {
        self.vertices
            .next_key()
            .ok_or(MeshError::KeySpaceExhausted("vertex"))
    }

    /// The key the next auto-keyed element will receive.
    pub fn find_next_element_key(&self) -> Result<ElementKey> {
        self.elements
            .next_key()
            .ok_or(MeshError::KeySpaceExhausted("element"))
    }

    /// Highest element dimension present (0 for a mesh without elements).
    pub fn dimension(&self) -> usize {
        self.elements.values().map(Element::dimension).max().unwrap_or(0)
    }

    /// Whether sibling links and V2HF references reflect the current elements.
    #[inline]
    pub fn is_topology_built(&self) -> bool {
        self.topology_built
    }

    /// Axis-aligned bounding box of all vertex positions.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut iter = self.vertices.values();
        let first = iter.next()?.position;
        let (mut min, mut max) = (first, first);
        for v in iter {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        Some((min, max))
    }

    // ==================== Mutation ====================

    /// Add a vertex under the next free key and return that key.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> Result<VertexKey> {
        let key = self.find_next_vertex_key()?;
        self.add_vertex_with_key(key, position)?;
        Ok(key)
    }

    /// Add a vertex under a caller-chosen key.
    pub fn add_vertex_with_key(&mut self, key: VertexKey, position: Point3<f64>) -> Result<()> {
        self.vertices
            .insert(key, Vertex::new(key, position))
            .map_err(|_| MeshError::DuplicateVertexKey(key))?;
        self.topology_built = false;
        Ok(())
    }

    /// Remove a vertex and every element that references it.
    pub fn remove_vertex(&mut self, key: VertexKey) -> Result<Vertex> {
        let vertex = self.vertices.remove(key).ok_or(MeshError::VertexNotFound(key))?;
        let dependents: Vec<ElementKey> = self
            .elements
            .iter()
            .filter(|(_, e)| e.contains_vertex(key))
            .map(|(k, _)| k)
            .collect();
        for ek in dependents {
            self.elements.remove(ek);
        }
        self.topology_built = false;
        Ok(vertex)
    }

    /// Move a vertex. Topology is unaffected.
    pub fn set_vertex_position(&mut self, key: VertexKey, position: Point3<f64>) -> Result<()> {
        let v = self.vertices.get_mut(key).ok_or(MeshError::VertexNotFound(key))?;
        v.position = position;
        Ok(())
    }

    /// Overwrite the cached normal of a vertex.
    pub fn set_vertex_normal(&mut self, key: VertexKey, normal: Vector3<f64>) -> Result<()> {
        let v = self.vertices.get_mut(key).ok_or(MeshError::VertexNotFound(key))?;
        v.normal = Some(normal);
        Ok(())
    }

    /// Add an element under the next free key and return that key.
    pub fn add_element(
        &mut self,
        element_type: ElementType,
        vertices: Vec<VertexKey>,
    ) -> Result<ElementKey> {
        let key = self.find_next_element_key()?;
        self.add_element_with_key(key, element_type, vertices)?;
        Ok(key)
    }

    /// Add an element under a caller-chosen key.
    ///
    /// Fails if the key is taken, the vertex count does not fit the type, a
    /// vertex repeats, or a vertex key is unknown.
    pub fn add_element_with_key(
        &mut self,
        key: ElementKey,
        element_type: ElementType,
        vertices: Vec<VertexKey>,
    ) -> Result<()> {
        if key.raw() == u32::MAX {
            return Err(MeshError::invalid_param("element key", key, "reserved value"));
        }
        if self.elements.contains(key) {
            return Err(MeshError::DuplicateElementKey(key));
        }
        let count = element_type.half_facet_count();
        if count > usize::from(u16::MAX) {
            return Err(MeshError::invalid_param(
                "half-facet count",
                count,
                "local half-facet ids are 16-bit",
            ));
        }
        let expected = element_type.vertex_count();
        if vertices.len() != expected || expected < element_type.dimension() + 1 {
            return Err(MeshError::InvalidArity {
                element_type,
                expected,
                actual: vertices.len(),
            });
        }
        for (i, &v) in vertices.iter().enumerate() {
            if !self.vertices.contains(v) {
                return Err(MeshError::VertexNotFound(v));
            }
            if vertices[..i].contains(&v) {
                return Err(MeshError::DegenerateElement {
                    element: key.index(),
                });
            }
        }
        self.elements
            .insert(key, Element::new(key, element_type, vertices))
            .map_err(|_| MeshError::DuplicateElementKey(key))?;
        self.topology_built = false;
        Ok(())
    }

    /// Remove an element. Its vertices stay in the mesh.
    pub fn remove_element(&mut self, key: ElementKey) -> Result<Element> {
        let element = self.elements.remove(key).ok_or(MeshError::ElementNotFound(key))?;
        self.topology_built = false;
        Ok(element)
    }

    /// Remove all vertices and elements.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.elements.clear();
        self.topology_built = false;
    }

    /// Copy of vertex positions and element vertex lists without any derived
    /// state: no normals, no V2HF, every half-facet naked, topology stale.
    pub fn clean_copy(&self) -> Mesh {
        let mut copy = self.clone();
        for v in copy.vertices.values_mut() {
            v.reset_topology();
        }
        for e in copy.elements.values_mut() {
            e.clear_siblings();
        }
        copy.topology_built = false;
        copy
    }

    // ==================== Topology ====================

    /// Derive sibling half-facet links and V2HF references.
    ///
    /// Does nothing when topology is already current, unless
    /// `force_full_rebuild` is set. Must not run concurrently with queries.
    pub fn build_topology(&mut self, force_full_rebuild: bool) {
        if self.topology_built && !force_full_rebuild {
            return;
        }
        topology::build::build(&mut self.vertices, &mut self.elements);
        self.topology_built = true;
    }

    /// Query engine over this mesh.
    #[inline]
    pub fn topology(&self) -> Topology<'_> {
        Topology::new(self)
    }

    /// Compute and store a normal on every vertex.
    ///
    /// Normals are computed from a snapshot of the current positions and
    /// written afterwards.
    pub fn update_vertex_normals(&mut self, options: &NormalOptions) -> Result<()> {
        if !self.topology_built {
            return Err(MeshError::stale("update_vertex_normals"));
        }
        let normals = self.topology().compute_all_vertices_normals(options);
        for (key, normal) in normals {
            if let Some(v) = self.vertices.get_mut(key) {
                v.normal = Some(normal);
            }
        }
        Ok(())
    }

    /// Fail with [`MeshError::StaleTopology`] unless topology is current.
    pub(crate) fn require_topology(&self, operation: &'static str) -> Result<()> {
        if self.topology_built {
            Ok(())
        } else {
            Err(MeshError::stale(operation))
        }
    }
}
