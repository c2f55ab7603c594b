//! UV-space subdivision.
//!
//! Triangles whose texture coordinates run past the unit square are cut
//! along integer UV lines until every piece fits in a single tile, then each
//! piece is shifted by whole tiles back into `[0, 1]`.

pub mod format;
pub mod range;
pub mod split;
pub mod subdivide;

pub use format::format_uvs;
pub use range::{integer_between, needs_subdivision, uvs_close, values_close};
pub use split::{split_triangle, Piece, SplitPattern};
pub use subdivide::{subdivide_mesh_uv, SubdivideConfig, SubdivideStats, UvSubdivider};
