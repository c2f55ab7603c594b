//! # uvtile
//!
//! A Rust library for preparing textured meshes for texture atlasing.
//!
//! ## Overview
//!
//! Tiled UVs (coordinates outside `[0, 1]`) cannot be placed in an atlas
//! cell as-is. This library splits such triangles along integer UV lines
//! until every piece fits in one tile, shifts each piece back into the
//! unit square, then packs the textures into a single atlas with
//! mipmap-safe padding and remaps the UVs into their cells.
//!
//! ## Quick Start
//!
//! ```ignore
//! use uvtile::{subdivide_mesh_uv, pack_images, compose_atlas, load_mesh};
//!
//! // Make every triangle fit in one UV tile
//! let mesh = load_mesh("tiled_floor.obj")?;
//! let normalized = subdivide_mesh_uv(&mesh, 1.0)?;
//!
//! // Pack two textures into a 2048x2048 atlas
//! let pack = pack_images(&[(512, 512), (256, 1024)], 2048, 2)?;
//! let atlas = compose_atlas(&pack, &images)?;
//! atlas.save_png("atlas.png")?;
//! ```
//!
//! ## Combining Parts
//!
//! [`combine_parts`] runs the whole pipeline for several mesh parts that
//! each sample their own texture:
//!
//! ```ignore
//! use uvtile::{combine_parts, CombineConfig, MeshPart};
//!
//! let parts = vec![MeshPart::new(floor, 0), MeshPart::new(wall, 1)];
//! let output = combine_parts(&parts, &textures, &CombineConfig::default())?;
//! ```

pub mod atlas;
pub mod combine;
pub mod error;
pub mod io;
pub mod mesh;
pub mod types;
pub mod uv;

// Re-export main types for convenience
pub use atlas::{
    compose_atlas, pack_images, AtlasRect, ImageSource, PackResult, PackerConfig, TextureAtlas,
    UvTransform,
};
pub use combine::{combine_parts, CombineConfig, CombinedOutput, MeshPart};
pub use error::{Error, Result};
pub use io::{load_mesh, save_mesh, ObjExport};
pub use mesh::{Mesh, MeshBuilder, MeshInfo, Vertex};
pub use types::{BoundingBox, UvBounds};
pub use uv::{subdivide_mesh_uv, SubdivideConfig, UvSubdivider};

#[cfg(feature = "wasm")]
pub mod wasm;
