//! Atlas pixel composition.

use super::packer::{AtlasRect, PackResult};
use super::padding::edge_padding;
use super::scale::scale_bilinear;
use crate::error::{Error, Result};
use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::Path;

/// Atlas background. Transparent black would darken filtered edges.
const FILL: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Indexed set of source images for composition.
pub trait ImageSource {
    /// Size of the image at `index`, or `None` if there is no such image.
    fn dimensions(&self, index: usize) -> Option<(u32, u32)>;

    /// RGBA value of one pixel. Only called with in-bounds coordinates.
    fn pixel(&self, index: usize, x: u32, y: u32) -> [u8; 4];

    /// Copy the image at `index` into an owned buffer.
    fn to_image(&self, index: usize) -> Option<RgbaImage> {
        let (width, height) = self.dimensions(index)?;
        Some(RgbaImage::from_fn(width, height, |x, y| {
            Rgba(self.pixel(index, x, y))
        }))
    }
}

impl ImageSource for [RgbaImage] {
    fn dimensions(&self, index: usize) -> Option<(u32, u32)> {
        self.get(index).map(|image| image.dimensions())
    }

    fn pixel(&self, index: usize, x: u32, y: u32) -> [u8; 4] {
        self[index].get_pixel(x, y).0
    }

    fn to_image(&self, index: usize) -> Option<RgbaImage> {
        self.get(index).cloned()
    }
}

impl ImageSource for Vec<RgbaImage> {
    fn dimensions(&self, index: usize) -> Option<(u32, u32)> {
        self.as_slice().dimensions(index)
    }

    fn pixel(&self, index: usize, x: u32, y: u32) -> [u8; 4] {
        self.as_slice().pixel(index, x, y)
    }

    fn to_image(&self, index: usize) -> Option<RgbaImage> {
        self.as_slice().to_image(index)
    }
}

/// A composed texture atlas.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    /// Side of the atlas in pixels.
    ///
    /// Composed atlases are square. A lone texture used directly keeps its
    /// own dimensions and `size` holds its longer side; read
    /// [`width`](Self::width) and [`height`](Self::height) for the real extent.
    pub size: u32,
    /// RGBA pixel data.
    pub image: RgbaImage,
}

impl TextureAtlas {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Export the atlas as PNG bytes.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        let cursor = std::io::Cursor::new(&mut bytes);
        let encoder = image::codecs::png::PngEncoder::new(cursor);

        encoder
            .write_image(
                self.image.as_raw(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .map_err(|e| Error::Compose(format!("Failed to encode PNG: {}", e)))?;

        Ok(bytes)
    }

    /// Write the atlas to `path` as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_png()?)?;
        Ok(())
    }
}

/// Draw every placed image into a fresh atlas and extrude its edges.
///
/// Images whose size differs from their rect are scaled bilinearly first.
/// Edge pixels are repeated outward `edge_padding(atlas_size)` times,
/// never beyond the pack's padding.
pub fn compose_atlas<S>(result: &PackResult, source: &S) -> Result<TextureAtlas>
where
    S: ImageSource + ?Sized,
{
    let size = result.atlas_size;
    if size == 0 {
        return Err(Error::InvalidAtlas("atlas size must be non-zero".to_string()));
    }
    let mut atlas = RgbaImage::from_pixel(size, size, FILL);

    for rect in &result.rects {
        let (width, height) = source.dimensions(rect.source_index).ok_or_else(|| {
            Error::Compose(format!("no source image for index {}", rect.source_index))
        })?;
        if rect.x as u64 + rect.width as u64 > size as u64
            || rect.y as u64 + rect.height as u64 > size as u64
        {
            return Err(Error::Compose(format!(
                "rect for image {} lies outside the {}x{} atlas",
                rect.source_index, size, size
            )));
        }

        if (width, height) == (rect.width, rect.height) {
            for y in 0..height {
                for x in 0..width {
                    let pixel = source.pixel(rect.source_index, x, y);
                    atlas.put_pixel(rect.x + x, rect.y + y, Rgba(pixel));
                }
            }
        } else {
            let original = source.to_image(rect.source_index).ok_or_else(|| {
                Error::Compose(format!("no source image for index {}", rect.source_index))
            })?;
            tracing::debug!(
                "Scaling image {} from {}x{} to {}x{}",
                rect.source_index,
                width,
                height,
                rect.width,
                rect.height
            );
            let scaled = scale_bilinear(&original, rect.width, rect.height);
            image::imageops::replace(&mut atlas, &scaled, rect.x as i64, rect.y as i64);
        }
    }

    let layers = edge_padding(size).min(result.padding);
    for rect in &result.rects {
        extrude_edges(&mut atlas, rect, layers);
    }

    Ok(TextureAtlas { size, image: atlas })
}

/// Fill `layers` pixels around `rect` with its nearest edge pixel.
///
/// Corner regions take the corner pixel; anything past the atlas border
/// is skipped.
fn extrude_edges(atlas: &mut RgbaImage, rect: &AtlasRect, layers: u32) {
    if layers == 0 || rect.width == 0 || rect.height == 0 {
        return;
    }
    let (atlas_w, atlas_h) = atlas.dimensions();
    let x_start = rect.x.saturating_sub(layers);
    let y_start = rect.y.saturating_sub(layers);
    let x_end = (rect.x + rect.width + layers).min(atlas_w);
    let y_end = (rect.y + rect.height + layers).min(atlas_h);

    for y in y_start..y_end {
        for x in x_start..x_end {
            let inside_x = (rect.x..rect.x + rect.width).contains(&x);
            let inside_y = (rect.y..rect.y + rect.height).contains(&y);
            if inside_x && inside_y {
                continue;
            }
            let sx = x.clamp(rect.x, rect.x + rect.width - 1);
            let sy = y.clamp(rect.y, rect.y + rect.height - 1);
            let pixel = *atlas.get_pixel(sx, sy);
            atlas.put_pixel(x, y, pixel);
        }
    }
}
