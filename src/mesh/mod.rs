//! Core mesh data structures.
//!
//! This module provides the array-based half-facet (AHF) representation.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], which owns an ordered [`VertexContainer`] and
//! an ordered [`ElementContainer`]. Each [`Element`] stores its vertex keys and
//! one sibling slot per local half-facet; adjacency is never stored anywhere
//! else. Each [`Vertex`] stores one incident half-facet (V2HF).
//!
//! # Keys
//!
//! Entities are addressed by stable keys, [`VertexKey`] and [`ElementKey`],
//! that do not depend on storage order.
//!
//! # Construction
//!
//! ```
//! use ahf_mesh::mesh::{build_from_quads, Mesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: Mesh = build_from_quads(&vertices, &[[0, 1, 2, 3]]).unwrap();
//! assert!(mesh.is_topology_built());
//! ```

mod ahf;
mod builder;
mod container;
mod element;
mod element_type;
mod key;
mod sibling;
mod vertex;

pub use ahf::Mesh;
pub use builder::{
    build_from_elements, build_from_polygons, build_from_quads, build_from_triangles,
    to_face_vertex,
};
pub use container::{Container, ElementContainer, VertexContainer};
pub use element::Element;
pub use element_type::ElementType;
pub use key::{ElementKey, Key, VertexKey};
pub use sibling::{HalfFacetRef, Sibling};
pub use vertex::Vertex;
