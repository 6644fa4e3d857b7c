//! Derivation of sibling half-facet links.
//!
//! Two half-facets are siblings when they belong to elements of the same
//! dimension and span the same vertex set. A pair links both ways; three or
//! more link into a cycle in element-key order, so every element sharing the
//! facet can be reached from any of them. Links are rebuilt from scratch on
//! every call.

use std::collections::HashMap;

use log::{debug, warn};

use crate::mesh::{ElementContainer, HalfFacetRef, Sibling, VertexContainer, VertexKey};

/// Half-facet identity: element dimension plus sorted vertex keys.
type FacetKey = (usize, Vec<VertexKey>);

/// Rebuild every sibling slot and every V2HF reference.
pub(crate) fn build(vertices: &mut VertexContainer, elements: &mut ElementContainer) {
    for e in elements.values_mut() {
        e.clear_siblings();
    }
    for v in vertices.values_mut() {
        v.v2hf = None;
    }

    // Pass 1: group half-facets by the vertex set they span
    let mut groups: HashMap<FacetKey, Vec<HalfFacetRef>> = HashMap::new();
    for e in elements.values() {
        for local in 1..=e.half_facet_count() {
            let mut facet = e.half_facet_unchecked(local);
            facet.sort_unstable();
            groups
                .entry((e.dimension(), facet))
                .or_default()
                .push(e.half_facet_ref(local));
        }
    }

    // Pass 2: link each group into a cycle; a pair links both ways
    let mut links: Vec<(HalfFacetRef, HalfFacetRef)> = Vec::new();
    let mut non_manifold = 0usize;
    for ((_, facet), group) in &groups {
        if group.len() < 2 {
            continue;
        }
        if group.len() > 2 {
            non_manifold += 1;
            warn!(
                "half-facet {:?} is shared by {} elements, linking them in a cycle",
                facet,
                group.len()
            );
        }
        for (i, &from) in group.iter().enumerate() {
            links.push((from, group[(i + 1) % group.len()]));
        }
    }
    for &(from, to) in &links {
        if let Some(e) = elements.get_mut(from.element) {
            e.set_sibling(from.local as usize, Sibling::Linked(to));
        }
    }

    // Pass 3: V2HF, preferring a naked half-facet so boundary vertices are
    // recognisable from their stored reference alone
    let mut naked_count = 0usize;
    for e in elements.values() {
        for local in 1..=e.half_facet_count() {
            let naked = e.sibling_unchecked(local).is_naked();
            if naked {
                naked_count += 1;
            }
            for vk in e.half_facet_unchecked(local) {
                let Some(v) = vertices.get_mut(vk) else {
                    continue;
                };
                if v.v2hf.is_none() || (naked && !v2hf_is_naked(elements, v.v2hf)) {
                    v.v2hf = Some(e.half_facet_ref(local));
                }
            }
        }
    }

    debug!(
        "built topology: {} elements, {} sibling links, {} naked half-facets, {} non-manifold",
        elements.len(),
        links.len(),
        naked_count,
        non_manifold
    );
}

fn v2hf_is_naked(elements: &ElementContainer, v2hf: Option<HalfFacetRef>) -> bool {
    v2hf.and_then(|hf| {
        elements
            .get(hf.element)
            .map(|e| e.sibling_unchecked(hf.local as usize).is_naked())
    })
    .unwrap_or(false)
}
