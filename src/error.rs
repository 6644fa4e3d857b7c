//! Error types for ahf-mesh.
//!
//! Incidence and adjacency queries never fail: an unknown key yields an empty
//! result. The variants below cover direct key access, malformed input, and
//! preconditions of the algorithms.

use thiserror::Error;

use crate::mesh::{ElementKey, ElementType, VertexKey};

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// The input contains no elements.
    #[error("mesh has no elements")]
    EmptyMesh,

    /// An element references a vertex index outside the vertex list.
    #[error("element {element} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// Position of the element in the input list.
        element: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An element repeats one of its vertices.
    #[error("element {element} is degenerate (has duplicate vertices)")]
    DegenerateElement {
        /// Position of the element in the input list.
        element: usize,
    },

    /// The vertex count does not match the element type.
    #[error("{element_type:?} expects {expected} vertices, got {actual}")]
    InvalidArity {
        /// Requested element type.
        element_type: ElementType,
        /// Vertices required by the type.
        expected: usize,
        /// Vertices supplied.
        actual: usize,
    },

    /// No vertex is stored under this key.
    #[error("vertex {0:?} not found")]
    VertexNotFound(VertexKey),

    /// No element is stored under this key.
    #[error("element {0:?} not found")]
    ElementNotFound(ElementKey),

    /// A vertex is already stored under this key.
    #[error("vertex key {0:?} already in use")]
    DuplicateVertexKey(VertexKey),

    /// An element is already stored under this key.
    #[error("element key {0:?} already in use")]
    DuplicateElementKey(ElementKey),

    /// A local half-facet id outside `1..=count`.
    #[error("half-facet {local} out of range for element {element:?} (1..={count})")]
    HalfFacetOutOfRange {
        /// The element queried.
        element: ElementKey,
        /// The requested local id.
        local: usize,
        /// Number of half-facets of the element.
        count: usize,
    },

    /// Sibling links are out of date; call `Mesh::build_topology` first.
    #[error("mesh topology is stale, build_topology must run before {operation}")]
    StaleTopology {
        /// The operation that required current topology.
        operation: &'static str,
    },

    /// The operation does not support this kind of element.
    #[error("{operation} does not support {element_type:?} element {element:?}")]
    UnsupportedElement {
        /// The operation that was attempted.
        operation: &'static str,
        /// The offending element.
        element: ElementKey,
        /// Its type.
        element_type: ElementType,
    },

    /// Every key above the largest stored key is taken.
    #[error("no {0} key left above the largest stored key")]
    KeySpaceExhausted(&'static str),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a stale-topology error for the named operation.
    pub(crate) fn stale(operation: &'static str) -> Self {
        MeshError::StaleTopology { operation }
    }
}
