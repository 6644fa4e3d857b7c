//! Element types and their local half-facet tables.
//!
//! A half-facet is a codimension-1 boundary piece of an element: an endpoint
//! of a bar, an edge of a polygon, or a face of a polyhedron. Local ids are
//! 1-based; id `i` of a polygon is the edge from vertex `i - 1` to vertex
//! `i mod n`. Polyhedral face tables list local vertex indices ordered so the
//! face normal points outward for a positively oriented element.

const TETRAHEDRON_FACES: &[&[usize]] = &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];

const PYRAMID_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[0, 1, 4],
    &[1, 2, 4],
    &[2, 3, 4],
    &[3, 0, 4],
];

const PRISM_FACES: &[&[usize]] = &[
    &[0, 2, 1],
    &[3, 4, 5],
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[2, 0, 3, 5],
];

const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 3, 2, 1],
    &[4, 5, 6, 7],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
];

/// The kind of cell an element represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// A line segment (dimension 1).
    Bar,
    /// A triangle (dimension 2).
    Triangle,
    /// A quadrilateral (dimension 2).
    Quad,
    /// A polygon with the given number of sides, at least 3 (dimension 2).
    Polygon(usize),
    /// A tetrahedron (dimension 3).
    Tetrahedron,
    /// A square-based pyramid, apex last (dimension 3).
    Pyramid,
    /// A triangular prism, bottom triangle then top triangle (dimension 3).
    Prism,
    /// A hexahedron, bottom quad then top quad (dimension 3).
    Hexahedron,
}

impl ElementType {
    /// Pick the element type for `count` vertices of topological dimension `dimension`.
    ///
    /// Returns `None` if no type matches.
    pub fn from_vertex_count(dimension: usize, count: usize) -> Option<Self> {
        match (dimension, count) {
            (1, 2) => Some(Self::Bar),
            (2, 3) => Some(Self::Triangle),
            (2, 4) => Some(Self::Quad),
            (2, n) if n > 4 => Some(Self::Polygon(n)),
            (3, 4) => Some(Self::Tetrahedron),
            (3, 5) => Some(Self::Pyramid),
            (3, 6) => Some(Self::Prism),
            (3, 8) => Some(Self::Hexahedron),
            _ => None,
        }
    }

    /// Topological dimension: 1 for bars, 2 for faces, 3 for volumes.
    #[inline]
    pub fn dimension(self) -> usize {
        match self {
            Self::Bar => 1,
            Self::Triangle | Self::Quad | Self::Polygon(_) => 2,
            Self::Tetrahedron | Self::Pyramid | Self::Prism | Self::Hexahedron => 3,
        }
    }

    /// Number of vertices an element of this type has.
    pub fn vertex_count(self) -> usize {
        match self {
            Self::Bar => 2,
            Self::Triangle => 3,
            Self::Quad | Self::Tetrahedron => 4,
            Self::Polygon(n) => n,
            Self::Pyramid => 5,
            Self::Prism => 6,
            Self::Hexahedron => 8,
        }
    }

    /// Number of half-facets.
    pub fn half_facet_count(self) -> usize {
        match self.face_table() {
            Some(table) => table.len(),
            None => self.vertex_count(),
        }
    }

    /// Local vertex indices (0-based) forming half-facet `local` (1-based).
    ///
    /// The caller guarantees `1 <= local <= half_facet_count()`.
    pub(crate) fn half_facet_locals(self, local: usize) -> HalfFacetLocals {
        debug_assert!(local >= 1 && local <= self.half_facet_count());
        match self.dimension() {
            1 => HalfFacetLocals::Point(local - 1),
            2 => {
                let n = self.vertex_count();
                HalfFacetLocals::Edge(local - 1, local % n)
            }
            _ => match self.face_table() {
                Some(table) => HalfFacetLocals::Face(table[local - 1]),
                None => HalfFacetLocals::Face(&[]),
            },
        }
    }

    /// Whether this is a polygonal (2D) element type.
    #[inline]
    pub fn is_face(self) -> bool {
        self.dimension() == 2
    }

    /// Whether this is a polyhedral (3D) element type.
    #[inline]
    pub fn is_volume(self) -> bool {
        self.dimension() == 3
    }

    fn face_table(self) -> Option<&'static [&'static [usize]]> {
        match self {
            Self::Tetrahedron => Some(TETRAHEDRON_FACES),
            Self::Pyramid => Some(PYRAMID_FACES),
            Self::Prism => Some(PRISM_FACES),
            Self::Hexahedron => Some(HEXAHEDRON_FACES),
            _ => None,
        }
    }
}

/// Local vertex indices of one half-facet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HalfFacetLocals {
    Point(usize),
    Edge(usize, usize),
    Face(&'static [usize]),
}
