//! Texture resampling used when a source image must be resized to its rect.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Resize with bilinear (triangle) filtering.
pub fn scale_bilinear(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    resize(source, width, height, FilterType::Triangle)
}

/// Resize with nearest-neighbour sampling.
pub fn scale_point(source: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    resize(source, width, height, FilterType::Nearest)
}

fn resize(source: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    if source.width() == 0 || source.height() == 0 {
        return RgbaImage::new(width, height);
    }
    imageops::resize(source, width, height, filter)
}
