//! Sibling half-facet links.
//!
//! Each local half-facet of an element owns one sibling slot naming the
//! coincident half-facet of a neighbouring element, or marking it naked.
//! Slots are stored packed in a single `u64`; the packing is private to this
//! module.

use super::key::ElementKey;

/// A half-facet addressed by its element and 1-based local id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfFacetRef {
    /// Owning element.
    pub element: ElementKey,
    /// Local half-facet id within the element (1-based).
    pub local: u16,
}

impl HalfFacetRef {
    /// Create a half-facet reference.
    #[inline]
    pub const fn new(element: ElementKey, local: u16) -> Self {
        Self { element, local }
    }
}

/// The sibling of a half-facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sibling {
    /// No neighbouring element shares this half-facet.
    Naked,
    /// The coincident half-facet of the neighbour.
    Linked(HalfFacetRef),
}

impl Sibling {
    /// Whether the half-facet is on the boundary.
    #[inline]
    pub fn is_naked(self) -> bool {
        matches!(self, Sibling::Naked)
    }

    /// The linked half-facet, if any.
    #[inline]
    pub fn half_facet(self) -> Option<HalfFacetRef> {
        match self {
            Sibling::Naked => None,
            Sibling::Linked(hf) => Some(hf),
        }
    }
}

/// Packed sibling slot: `((element + 1) << 32) | local`, `0` when naked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PackedSibling(u64);

impl PackedSibling {
    pub(crate) const NAKED: Self = Self(0);

    #[inline]
    pub(crate) fn pack(sibling: Sibling) -> Self {
        match sibling {
            Sibling::Naked => Self::NAKED,
            Sibling::Linked(hf) => {
                Self(((hf.element.raw() as u64 + 1) << 32) | hf.local as u64)
            }
        }
    }

    #[inline]
    pub(crate) fn unpack(self) -> Sibling {
        if self.0 == 0 {
            return Sibling::Naked;
        }
        let element = ElementKey::new(((self.0 >> 32) - 1) as u32);
        let local = (self.0 & 0xFFFF_FFFF) as u16;
        Sibling::Linked(HalfFacetRef::new(element, local))
    }

    #[inline]
    pub(crate) fn is_naked(self) -> bool {
        self.0 == 0
    }
}
