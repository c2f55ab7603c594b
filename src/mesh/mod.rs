//! Triangle mesh storage.
//!
//! [`Mesh`] keeps vertex attributes in parallel arrays the way host editors
//! hand them over; [`MeshBuilder`] is the append-only arena the UV
//! subdivider writes into.

pub mod builder;
pub mod geometry;
pub mod inspect;

pub use builder::MeshBuilder;
pub use geometry::{Mesh, Vertex};
pub use inspect::{out_of_range_uvs, triangles_using_vertex, MeshInfo};
