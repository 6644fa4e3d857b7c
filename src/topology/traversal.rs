//! Visited-half-facet bookkeeping for traversals.
//!
//! Traversals that must touch each shared half-facet once (unique edges,
//! edge-point insertion during subdivision) mark half-facets in a
//! [`VisitMarks`] session instead of in the elements themselves. A session is
//! owned by the traversal that created it, so the marks vanish on every exit
//! path and repeated calls always start clean.

use std::collections::HashSet;

use crate::mesh::{HalfFacetRef, Mesh, Sibling};

/// Per-traversal set of visited half-facets.
#[derive(Debug, Default, Clone)]
pub struct VisitMarks {
    visited: HashSet<HalfFacetRef>,
}

impl VisitMarks {
    /// Start an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one half-facet as visited.
    #[inline]
    pub fn register_visit(&mut self, hf: HalfFacetRef) {
        self.visited.insert(hf);
    }

    /// Mark a half-facet and every half-facet on its sibling chain.
    ///
    /// Returns `false` if the half-facet had already been visited, in which
    /// case nothing changes.
    pub fn register_with_sibling(&mut self, mesh: &Mesh, hf: HalfFacetRef) -> bool {
        if !self.visited.insert(hf) {
            return false;
        }
        self.visited.extend(sibling_chain(mesh, hf).members);
        true
    }

    /// Whether a half-facet has been visited in this session.
    #[inline]
    pub fn is_visited(&self, hf: HalfFacetRef) -> bool {
        self.visited.contains(&hf)
    }

    /// Number of visited half-facets.
    #[inline]
    pub fn len(&self) -> usize {
        self.visited.len()
    }

    /// Whether nothing has been visited.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }

    /// Reset every mark.
    pub fn clean_visits(&mut self) {
        self.visited.clear();
    }
}

/// The half-facets reached from one half-facet by following sibling links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SiblingChain {
    /// Linked half-facets in link order, the start excluded.
    pub members: Vec<HalfFacetRef>,
    /// Whether the links lead back to the start.
    pub closed: bool,
}

/// Follow sibling links from `hf`.
///
/// A manifold facet yields at most one member. A facet shared by more than
/// two elements yields the rest of its cycle. The walk stops on returning to
/// `hf`, at a naked or unresolvable slot, or on a repeated half-facet.
pub(crate) fn sibling_chain(mesh: &Mesh, hf: HalfFacetRef) -> SiblingChain {
    let mut members = Vec::new();
    let mut current = hf;
    loop {
        let link = mesh
            .elements()
            .get(current.element)
            .filter(|e| (1..=e.half_facet_count()).contains(&(current.local as usize)))
            .map(|e| e.sibling_unchecked(current.local as usize));
        let Some(Sibling::Linked(next)) = link else {
            return SiblingChain {
                members,
                closed: false,
            };
        };
        if next == hf {
            return SiblingChain {
                members,
                closed: true,
            };
        }
        if members.contains(&next) {
            return SiblingChain {
                members,
                closed: false,
            };
        }
        members.push(next);
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_triangles, ElementKey};
    use nalgebra::Point3;

    #[test]
    fn test_sibling_marked_together() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3]]).unwrap();

        // Shared edge (2, 0) is half-facet 3 of element 0 and (0, 2) half-facet 1 of element 1
        let a = HalfFacetRef::new(ElementKey::new(0), 3);
        let b = HalfFacetRef::new(ElementKey::new(1), 1);

        let mut marks = VisitMarks::new();
        assert!(marks.register_with_sibling(&mesh, a));
        assert!(marks.is_visited(b));
        assert!(!marks.register_with_sibling(&mesh, a));
        assert_eq!(marks.len(), 2);

        marks.clean_visits();
        assert!(marks.is_empty());
        assert!(!marks.is_visited(a));
    }

    #[test]
    fn test_chain_around_shared_edge() {
        // Three triangles on the edge (0, 1)
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3], [0, 1, 4]]).unwrap();

        let start = HalfFacetRef::new(ElementKey::new(0), 1);
        let chain = sibling_chain(&mesh, start);
        assert!(chain.closed);
        let mut others: Vec<ElementKey> = chain.members.iter().map(|hf| hf.element).collect();
        others.sort();
        assert_eq!(others, vec![ElementKey::new(1), ElementKey::new(2)]);

        let mut marks = VisitMarks::new();
        assert!(marks.register_with_sibling(&mesh, start));
        for hf in chain.members {
            assert!(marks.is_visited(hf));
            assert!(!marks.register_with_sibling(&mesh, hf));
        }
    }

    #[test]
    fn test_chain_of_naked_half_facet_is_open() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let chain = sibling_chain(&mesh, HalfFacetRef::new(ElementKey::new(0), 1));
        assert!(chain.members.is_empty());
        assert!(!chain.closed);
    }
}
