//! Texture atlas building.
//!
//! This module packs multiple textures into a single square atlas with
//! mipmap-safe padding, composes the atlas pixels, and remaps UV
//! coordinates into each texture's cell.

pub mod compose;
pub mod packer;
pub mod padding;
pub mod remap;
pub mod scale;

pub use compose::{compose_atlas, ImageSource, TextureAtlas};
pub use packer::{
    effective_padding, pack_images, pack_images_with_padding, AtlasRect, PackResult, PackerConfig,
};
pub use padding::{
    assess_quality, edge_padding, mip_levels, mipmap_safe_padding, QualityGrade, QualityReport,
};
pub use remap::{remap_uvs, UvTransform};
pub use scale::{scale_bilinear, scale_point};
