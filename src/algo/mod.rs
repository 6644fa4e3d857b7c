//! Mesh processing algorithms.
//!
//! - **Subdivision**: Catmull-Clark and Loop, each producing a new mesh
//! - **Triangulation**: polygon meshes to triangle meshes
//! - **Transforms**: parallel position updates that keep topology

pub mod subdivide;
pub mod transform;
pub mod triangulate;
