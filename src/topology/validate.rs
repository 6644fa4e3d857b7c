//! Consistency checks on derived topology.

use std::fmt;

use super::traversal::sibling_chain;
use super::Topology;
use crate::mesh::{HalfFacetRef, Sibling, VertexKey};

/// A violated topology invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopologyIssue {
    /// `from` links to `to`, but following the links from `to` never leads
    /// back to `from`.
    AsymmetricSibling {
        /// The linking half-facet.
        from: HalfFacetRef,
        /// Its recorded sibling.
        to: HalfFacetRef,
    },
    /// A sibling link names a missing element or an out-of-range half-facet.
    DanglingSibling {
        /// The linking half-facet.
        from: HalfFacetRef,
        /// The unresolvable target.
        to: HalfFacetRef,
    },
    /// Two linked half-facets do not span the same vertices.
    MismatchedSibling {
        /// The linking half-facet.
        from: HalfFacetRef,
        /// Its recorded sibling.
        to: HalfFacetRef,
    },
    /// A vertex's V2HF reference does not contain the vertex.
    BadIncidentHalfFacet {
        /// The vertex.
        vertex: VertexKey,
        /// Its stored reference.
        half_facet: HalfFacetRef,
    },
}

impl fmt::Display for TopologyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AsymmetricSibling { from, to } => {
                write!(f, "{from:?} links to {to:?} whose chain does not lead back")
            }
            Self::DanglingSibling { from, to } => {
                write!(f, "{from:?} links to missing half-facet {to:?}")
            }
            Self::MismatchedSibling { from, to } => {
                write!(f, "{from:?} and {to:?} span different vertices")
            }
            Self::BadIncidentHalfFacet { vertex, half_facet } => {
                write!(f, "{vertex:?} stores incident {half_facet:?} which does not contain it")
            }
        }
    }
}

impl Topology<'_> {
    /// Check that sibling links close (a pair links both ways, a
    /// non-manifold facet forms one cycle), sibling vertex sets and V2HF
    /// references.
    ///
    /// Returns every issue found; an empty list means the links are
    /// consistent. Always empty right after [`Mesh::build_topology`].
    ///
    /// [`Mesh::build_topology`]: crate::mesh::Mesh::build_topology
    pub fn validate(&self) -> Vec<TopologyIssue> {
        let mut issues = Vec::new();
        let elements = self.mesh().elements();

        for e in elements.values() {
            for local in 1..=e.half_facet_count() {
                let Sibling::Linked(to) = e.sibling_unchecked(local) else {
                    continue;
                };
                let from = e.half_facet_ref(local);
                if self.sibling_of(to).is_none() {
                    issues.push(TopologyIssue::DanglingSibling { from, to });
                    continue;
                }
                if !sibling_chain(self.mesh(), from).closed {
                    issues.push(TopologyIssue::AsymmetricSibling { from, to });
                }
                let mut mine = e.half_facet_unchecked(local);
                let mut theirs = elements
                    .get(to.element)
                    .map(|other| other.half_facet_unchecked(to.local as usize))
                    .unwrap_or_default();
                mine.sort_unstable();
                theirs.sort_unstable();
                if mine != theirs {
                    issues.push(TopologyIssue::MismatchedSibling { from, to });
                }
            }
        }

        for v in self.mesh().vertices().values() {
            let Some(hf) = v.incident_half_facet() else {
                continue;
            };
            let contains = elements.get(hf.element).is_some_and(|e| {
                let local = hf.local as usize;
                local >= 1 && local <= e.half_facet_count() && e.half_facet_contains(local, v.key())
            });
            if !contains {
                issues.push(TopologyIssue::BadIncidentHalfFacet {
                    vertex: v.key(),
                    half_facet: hf,
                });
            }
        }
        issues
    }
}
