//! Seam-safe UV remapping into atlas cells.

use super::packer::PackResult;
use super::padding::mipmap_safe_padding;
use std::ops::Range;

/// Maps unit-square UVs into one atlas cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// Shrunk cell origin.
    pub offset: [f32; 2],
    /// Shrunk cell size.
    pub scale: [f32; 2],
    /// Unshrunk cell bounds used for the final clamp.
    bounds_min: [f32; 2],
    bounds_max: [f32; 2],
}

impl UvTransform {
    /// Leaves UVs in the unit square as they are.
    pub fn identity() -> Self {
        Self {
            offset: [0.0, 0.0],
            scale: [1.0, 1.0],
            bounds_min: [0.0, 0.0],
            bounds_max: [1.0, 1.0],
        }
    }

    /// Transform for a cell, pulled inward by the mipmap-safe margin.
    ///
    /// Cells too small for the margin are shrunk to 90% around their
    /// center instead.
    pub fn seam_safe(offset: [f32; 2], scale: [f32; 2], atlas_size: u32) -> Self {
        let margin = mipmap_safe_padding(atlas_size);
        let mut shrunk_scale = [scale[0] - 2.0 * margin, scale[1] - 2.0 * margin];
        let mut shrunk_offset = [offset[0] + margin, offset[1] + margin];

        if shrunk_scale[0] <= 0.0 || shrunk_scale[1] <= 0.0 {
            tracing::warn!(
                "Cell {:?} too small for a {:.4} UV margin, shrinking to 90%",
                scale,
                margin
            );
            shrunk_scale = [scale[0] * 0.9, scale[1] * 0.9];
            shrunk_offset = [
                offset[0] + (scale[0] - shrunk_scale[0]) * 0.5,
                offset[1] + (scale[1] - shrunk_scale[1]) * 0.5,
            ];
        }

        Self {
            offset: shrunk_offset,
            scale: shrunk_scale,
            bounds_min: offset,
            bounds_max: [offset[0] + scale[0], offset[1] + scale[1]],
        }
    }

    /// Seam-safe transform for the image at `index` of a pack.
    pub fn for_image(result: &PackResult, index: usize) -> Option<Self> {
        let offset = *result.uv_offsets.get(index)?;
        let scale = *result.uv_scales.get(index)?;
        Some(Self::seam_safe(offset, scale, result.atlas_size))
    }

    /// Map one UV, clamping the input to the unit square first.
    pub fn apply(&self, uv: [f32; 2]) -> [f32; 2] {
        let mut out = [0.0; 2];
        for axis in 0..2 {
            let local = uv[axis].clamp(0.0, 1.0);
            out[axis] = (self.offset[axis] + local * self.scale[axis])
                .clamp(self.bounds_min[axis], self.bounds_max[axis]);
        }
        out
    }
}

/// Apply `transform` to `uvs[range]` in place.
pub fn remap_uvs(uvs: &mut [[f32; 2]], range: Range<usize>, transform: &UvTransform) {
    let end = range.end.min(uvs.len());
    let start = range.start.min(end);
    for uv in &mut uvs[start..end] {
        *uv = transform.apply(*uv);
    }
}
