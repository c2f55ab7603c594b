//! Merge textured mesh parts into one mesh sharing one atlas.

use crate::atlas::{compose_atlas, remap_uvs, PackResult, PackerConfig, TextureAtlas, UvTransform};
use crate::error::Result;
use crate::mesh::Mesh;
use crate::uv::{SubdivideConfig, UvSubdivider};
use image::{Rgba, RgbaImage};
use std::ops::Range;

/// One input mesh and the texture it samples.
#[derive(Debug, Clone)]
pub struct MeshPart {
    pub mesh: Mesh,
    /// Index into the image list passed to [`combine_parts`].
    pub texture: usize,
}

impl MeshPart {
    pub fn new(mesh: Mesh, texture: usize) -> Self {
        Self { mesh, texture }
    }
}

/// Configuration for [`combine_parts`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CombineConfig {
    pub subdivide: SubdivideConfig,
    pub packer: PackerConfig,
}

impl CombineConfig {
    pub fn with_subdivide(mut self, subdivide: SubdivideConfig) -> Self {
        self.subdivide = subdivide;
        self
    }

    pub fn with_packer(mut self, packer: PackerConfig) -> Self {
        self.packer = packer;
        self
    }
}

/// Result of [`combine_parts`].
#[derive(Debug, Clone)]
pub struct CombinedOutput {
    /// All parts, UV-normalized and remapped into the atlas.
    pub mesh: Mesh,
    /// The single texture every part now samples.
    pub atlas: TextureAtlas,
    /// Placement data; `None` when fewer than two textures were given.
    pub pack: Option<PackResult>,
    /// Vertex range of each part inside `mesh`.
    pub part_ranges: Vec<Range<usize>>,
}

/// Normalize, merge and atlas a set of mesh parts.
///
/// Each part's UVs are first subdivided into the unit square, then mapped
/// into its texture's cell of the atlas. With a single texture the image is
/// used as-is and UVs stay in the unit square. Parts pointing at a missing
/// texture keep their normalized UVs.
pub fn combine_parts(
    parts: &[MeshPart],
    images: &[RgbaImage],
    config: &CombineConfig,
) -> Result<CombinedOutput> {
    let subdivider = UvSubdivider::with_config(config.subdivide);

    let mut mesh = Mesh::new();
    let mut part_ranges = Vec::with_capacity(parts.len());
    for (index, part) in parts.iter().enumerate() {
        let normalized = subdivider.subdivide(&part.mesh)?;
        let start = mesh.vertex_count();
        mesh.merge(&normalized);
        tracing::debug!(
            "Part {}: {} vertices at {}..{}",
            index,
            normalized.vertex_count(),
            start,
            mesh.vertex_count()
        );
        part_ranges.push(start..mesh.vertex_count());
    }

    let (atlas, pack) = match images {
        [] => {
            tracing::warn!("No textures given, using a white atlas");
            let atlas = TextureAtlas {
                size: 1,
                image: RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255])),
            };
            (atlas, None)
        }
        [single] => {
            let atlas = TextureAtlas {
                // Used as-is, so possibly not square.
                size: single.width().max(single.height()),
                image: single.clone(),
            };
            (atlas, None)
        }
        _ => {
            let sizes: Vec<(u32, u32)> = images.iter().map(|image| image.dimensions()).collect();
            let pack = config.packer.pack(&sizes)?;
            let atlas = compose_atlas(&pack, images)?;
            (atlas, Some(pack))
        }
    };

    for (index, (part, range)) in parts.iter().zip(&part_ranges).enumerate() {
        let transform = match &pack {
            Some(pack) => UvTransform::for_image(pack, part.texture),
            None if part.texture < images.len() => Some(UvTransform::identity()),
            None => None,
        };
        match transform {
            Some(transform) => remap_uvs(&mut mesh.uvs, range.clone(), &transform),
            None => tracing::warn!(
                "Part {} uses texture {} of {}, keeping its UVs",
                index,
                part.texture,
                images.len()
            ),
        }
    }

    tracing::info!(
        "Combined {} parts into {} vertices, {} triangles, {}x{} atlas",
        parts.len(),
        mesh.vertex_count(),
        mesh.triangle_count(),
        atlas.width(),
        atlas.height()
    );

    Ok(CombinedOutput {
        mesh,
        atlas,
        pack,
        part_ranges,
    })
}
