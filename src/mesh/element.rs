//! Half-facet elements.
//!
//! An [`Element`] is one cell of the mesh: its ordered vertex keys, its type
//! (which fixes the local half-facet numbering) and one sibling slot per
//! half-facet. The vertex list never changes after creation; sibling slots are
//! rewritten by topology build.

use super::element_type::{ElementType, HalfFacetLocals};
use super::key::{ElementKey, VertexKey};
use super::sibling::{HalfFacetRef, PackedSibling, Sibling};
use crate::error::{MeshError, Result};

/// A mesh cell with its sibling half-facet links.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    key: ElementKey,
    element_type: ElementType,
    vertices: Vec<VertexKey>,
    siblings: Vec<PackedSibling>,
}

impl Element {
    /// Create an element with all half-facets naked.
    ///
    /// The caller has already checked arity and vertex distinctness.
    pub(crate) fn new(key: ElementKey, element_type: ElementType, vertices: Vec<VertexKey>) -> Self {
        let siblings = vec![PackedSibling::NAKED; element_type.half_facet_count()];
        Self {
            key,
            element_type,
            vertices,
            siblings,
        }
    }

    /// The element key.
    #[inline]
    pub fn key(&self) -> ElementKey {
        self.key
    }

    /// The element type.
    #[inline]
    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Topological dimension (1, 2 or 3).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.element_type.dimension()
    }

    /// Vertex keys in local order.
    #[inline]
    pub fn vertices(&self) -> &[VertexKey] {
        &self.vertices
    }

    /// Number of local half-facets.
    #[inline]
    pub fn half_facet_count(&self) -> usize {
        self.siblings.len()
    }

    /// Iterate over the valid local half-facet ids, `1..=half_facet_count()`.
    pub fn half_facet_ids(&self) -> impl Iterator<Item = u16> {
        1..=self.siblings.len() as u16
    }

    /// Whether `v` is one of this element's vertices.
    #[inline]
    pub fn contains_vertex(&self, v: VertexKey) -> bool {
        self.vertices.contains(&v)
    }

    /// Local position of `v` in the vertex list.
    #[inline]
    pub fn local_index_of(&self, v: VertexKey) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }

    /// Ordered vertex keys of half-facet `local` (1-based).
    ///
    /// A polygon edge yields two keys in the element's winding, a polyhedron
    /// face yields its vertex cycle, a bar endpoint yields one key.
    pub fn half_facet(&self, local: usize) -> Result<Vec<VertexKey>> {
        self.check_local(local)?;
        Ok(self.half_facet_unchecked(local))
    }

    /// Sibling of half-facet `local`.
    pub fn sibling(&self, local: usize) -> Result<Sibling> {
        self.check_local(local)?;
        Ok(self.siblings[local - 1].unpack())
    }

    /// Element across half-facet `local`, `None` if the half-facet is naked.
    pub fn sibling_element(&self, local: usize) -> Result<Option<ElementKey>> {
        Ok(self.sibling(local)?.half_facet().map(|hf| hf.element))
    }

    /// Local id of the sibling half-facet, `None` if the half-facet is naked.
    pub fn sibling_half_facet(&self, local: usize) -> Result<Option<u16>> {
        Ok(self.sibling(local)?.half_facet().map(|hf| hf.local))
    }

    /// Whether half-facet `local` has no sibling.
    pub fn is_naked_half_facet(&self, local: usize) -> Result<bool> {
        self.check_local(local)?;
        Ok(self.siblings[local - 1].is_naked())
    }

    /// Whether any half-facet of this element is naked.
    pub fn has_naked_half_facet(&self) -> bool {
        self.siblings.iter().any(|s| s.is_naked())
    }

    /// Previous and next vertex around a polygon, seen from `v`.
    ///
    /// `None` if `v` is not a vertex of this element or the element is not 2D.
    pub fn polygon_neighbors(&self, v: VertexKey) -> Option<(VertexKey, VertexKey)> {
        if !self.element_type.is_face() {
            return None;
        }
        let i = self.local_index_of(v)?;
        let n = self.vertices.len();
        Some((self.vertices[(i + n - 1) % n], self.vertices[(i + 1) % n]))
    }

    /// Directed edges of the element.
    ///
    /// Polygons yield their boundary edges in winding order. Polyhedra yield
    /// each geometric edge once, taken from the first face that visits it.
    pub fn edges(&self) -> Vec<(VertexKey, VertexKey)> {
        match self.element_type.dimension() {
            1 => vec![(self.vertices[0], self.vertices[1])],
            2 => {
                let n = self.vertices.len();
                (0..n)
                    .map(|i| (self.vertices[i], self.vertices[(i + 1) % n]))
                    .collect()
            }
            _ => {
                let mut edges: Vec<(VertexKey, VertexKey)> = Vec::new();
                for local in 1..=self.half_facet_count() {
                    let face = self.half_facet_unchecked(local);
                    for i in 0..face.len() {
                        let (a, b) = (face[i], face[(i + 1) % face.len()]);
                        if !edges.contains(&(a, b)) && !edges.contains(&(b, a)) {
                            edges.push((a, b));
                        }
                    }
                }
                edges
            }
        }
    }

    pub(crate) fn half_facet_unchecked(&self, local: usize) -> Vec<VertexKey> {
        match self.element_type.half_facet_locals(local) {
            HalfFacetLocals::Point(i) => vec![self.vertices[i]],
            HalfFacetLocals::Edge(a, b) => vec![self.vertices[a], self.vertices[b]],
            HalfFacetLocals::Face(locals) => locals.iter().map(|&i| self.vertices[i]).collect(),
        }
    }

    /// Whether half-facet `local` contains vertex `v`.
    pub(crate) fn half_facet_contains(&self, local: usize, v: VertexKey) -> bool {
        match self.element_type.half_facet_locals(local) {
            HalfFacetLocals::Point(i) => self.vertices[i] == v,
            HalfFacetLocals::Edge(a, b) => self.vertices[a] == v || self.vertices[b] == v,
            HalfFacetLocals::Face(locals) => locals.iter().any(|&i| self.vertices[i] == v),
        }
    }

    #[inline]
    pub(crate) fn sibling_unchecked(&self, local: usize) -> Sibling {
        self.siblings[local - 1].unpack()
    }

    #[inline]
    pub(crate) fn set_sibling(&mut self, local: usize, sibling: Sibling) {
        self.siblings[local - 1] = PackedSibling::pack(sibling);
    }

    pub(crate) fn clear_siblings(&mut self) {
        self.siblings.fill(PackedSibling::NAKED);
    }

    /// Reference to one of this element's own half-facets.
    #[inline]
    pub(crate) fn half_facet_ref(&self, local: usize) -> HalfFacetRef {
        HalfFacetRef::new(self.key, local as u16)
    }

    fn check_local(&self, local: usize) -> Result<()> {
        if local == 0 || local > self.siblings.len() {
            return Err(MeshError::HalfFacetOutOfRange {
                element: self.key,
                local,
                count: self.siblings.len(),
            });
        }
        Ok(())
    }
}
