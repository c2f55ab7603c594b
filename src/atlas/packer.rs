//! Binary-tree rectangle packing.

use super::padding::edge_padding;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Content area of one source image inside the atlas, in pixels.
///
/// Padding surrounds the rect on every side; it is not included here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position of the image in the caller's input list.
    pub source_index: usize,
}

impl AtlasRect {
    /// Grow the rect by `padding` on every side.
    pub fn padded(&self, padding: u32) -> (u32, u32, u32, u32) {
        (
            self.x.saturating_sub(padding),
            self.y.saturating_sub(padding),
            self.width + padding * 2,
            self.height + padding * 2,
        )
    }
}

/// Placement of every input image plus its UV transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackResult {
    pub atlas_size: u32,
    /// Effective padding each image was placed with.
    pub padding: u32,
    /// Rects in placement order (largest area first).
    pub rects: Vec<AtlasRect>,
    /// Per source index: rect origin over atlas size.
    pub uv_offsets: Vec<[f32; 2]>,
    /// Per source index: rect size over atlas size.
    pub uv_scales: Vec<[f32; 2]>,
}

impl PackResult {
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Rect placed for the image at `source_index`.
    pub fn rect_for(&self, source_index: usize) -> Option<&AtlasRect> {
        self.rects.iter().find(|r| r.source_index == source_index)
    }

    /// Fraction of the atlas covered by image content.
    pub fn coverage(&self) -> f32 {
        if self.atlas_size == 0 {
            return 0.0;
        }
        let used: u64 = self
            .rects
            .iter()
            .map(|r| r.width as u64 * r.height as u64)
            .sum();
        used as f32 / (self.atlas_size as f64 * self.atlas_size as f64) as f32
    }
}

/// Atlas packing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackerConfig {
    /// Side of the square atlas in pixels.
    pub atlas_size: u32,
    /// Minimum padding around each image; raised to the mipmap-safe width.
    pub base_padding: u32,
    /// Upper bound when growing the atlas.
    pub max_atlas_size: u32,
    /// Double the atlas until everything fits, up to `max_atlas_size`.
    pub grow: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            atlas_size: 2048,
            base_padding: 2,
            max_atlas_size: 8192,
            grow: false,
        }
    }
}

impl PackerConfig {
    pub fn with_atlas_size(mut self, atlas_size: u32) -> Self {
        self.atlas_size = atlas_size;
        self
    }

    pub fn with_base_padding(mut self, base_padding: u32) -> Self {
        self.base_padding = base_padding;
        self
    }

    pub fn with_max_atlas_size(mut self, max_atlas_size: u32) -> Self {
        self.max_atlas_size = max_atlas_size;
        self
    }

    pub fn with_grow(mut self, grow: bool) -> Self {
        self.grow = grow;
        self
    }

    /// Pack `sizes` with this configuration.
    ///
    /// With `grow` set, a failed pack is retried at twice the atlas size
    /// until it fits or `max_atlas_size` is exceeded.
    pub fn pack(&self, sizes: &[(u32, u32)]) -> Result<PackResult> {
        let mut atlas_size = self.atlas_size;
        loop {
            match pack_images(sizes, atlas_size, self.base_padding) {
                Err(Error::ImageDoesNotFit { .. })
                    if self.grow && atlas_size.saturating_mul(2) <= self.max_atlas_size =>
                {
                    tracing::debug!("Atlas {} too small, growing", atlas_size);
                    atlas_size *= 2;
                }
                result => return result,
            }
        }
    }
}

/// Padding applied around each image for an atlas of side `atlas_size`.
pub fn effective_padding(atlas_size: u32, base_padding: u32) -> u32 {
    base_padding.max(2 * edge_padding(atlas_size))
}

/// Pack images of the given `(width, height)` into a square atlas.
///
/// Images are placed largest area first with mipmap-safe padding. The
/// whole pack fails if any image cannot be placed.
pub fn pack_images(sizes: &[(u32, u32)], atlas_size: u32, base_padding: u32) -> Result<PackResult> {
    pack_images_with_padding(sizes, atlas_size, effective_padding(atlas_size, base_padding))
}

/// Pack images with exactly `padding` pixels around each one.
pub fn pack_images_with_padding(
    sizes: &[(u32, u32)],
    atlas_size: u32,
    padding: u32,
) -> Result<PackResult> {
    if sizes.is_empty() {
        return Ok(PackResult {
            atlas_size,
            padding,
            ..Default::default()
        });
    }
    if atlas_size == 0 {
        return Err(Error::InvalidAtlas("atlas size must be non-zero".to_string()));
    }
    if let Some(index) = sizes.iter().position(|&(w, h)| w == 0 || h == 0) {
        return Err(Error::InvalidAtlas(format!("image {} has zero size", index)));
    }

    // Largest area first; stable sort keeps input order on ties.
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(sizes[i].0 as u64 * sizes[i].1 as u64));

    let mut tree = PackTree::new(atlas_size);
    let mut rects = Vec::with_capacity(sizes.len());
    for index in order {
        let (width, height) = sizes[index];
        let does_not_fit = || Error::ImageDoesNotFit {
            index,
            width,
            height,
            atlas_size,
        };
        let padded_width = padding
            .checked_mul(2)
            .and_then(|p| width.checked_add(p))
            .ok_or_else(does_not_fit)?;
        let padded_height = padding
            .checked_mul(2)
            .and_then(|p| height.checked_add(p))
            .ok_or_else(does_not_fit)?;

        let node = tree.insert(padded_width, padded_height).ok_or_else(does_not_fit)?;
        let (x, y) = tree.origin(node);
        let rect = AtlasRect {
            x: x + padding,
            y: y + padding,
            width,
            height,
            source_index: index,
        };
        tracing::debug!(
            "Placed image {} ({}x{}) at ({}, {})",
            index,
            width,
            height,
            rect.x,
            rect.y
        );
        rects.push(rect);
    }

    let mut uv_offsets = vec![[0.0; 2]; sizes.len()];
    let mut uv_scales = vec![[0.0; 2]; sizes.len()];
    let size = atlas_size as f32;
    for rect in &rects {
        uv_offsets[rect.source_index] = [rect.x as f32 / size, rect.y as f32 / size];
        uv_scales[rect.source_index] = [rect.width as f32 / size, rect.height as f32 / size];
    }

    tracing::info!(
        "Packed {} images into {}x{} atlas (padding {})",
        rects.len(),
        atlas_size,
        atlas_size,
        padding
    );

    Ok(PackResult {
        atlas_size,
        padding,
        rects,
        uv_offsets,
        uv_scales,
    })
}

/// Free or occupied region of the atlas.
#[derive(Debug, Clone, Copy)]
struct PackNode {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

impl PackNode {
    fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            used: false,
            right: None,
            down: None,
        }
    }
}

/// Arena of pack nodes; index 0 is the root spanning the whole atlas.
struct PackTree {
    nodes: Vec<PackNode>,
}

impl PackTree {
    fn new(atlas_size: u32) -> Self {
        Self {
            nodes: vec![PackNode::new(0, 0, atlas_size, atlas_size)],
        }
    }

    fn origin(&self, node: usize) -> (u32, u32) {
        (self.nodes[node].x, self.nodes[node].y)
    }

    /// Claim a `width` x `height` region, returning the node placed at its origin.
    fn insert(&mut self, width: u32, height: u32) -> Option<usize> {
        let mut pending = vec![0usize];

        // Right subtree before down subtree, depth first.
        while let Some(id) = pending.pop() {
            let node = self.nodes[id];
            if node.used {
                pending.extend(node.down);
                pending.extend(node.right);
                continue;
            }
            if width > node.width || height > node.height {
                continue;
            }

            self.nodes[id].used = true;
            if width == node.width && height == node.height {
                return Some(id);
            }

            let dw = node.width - width;
            let dh = node.height - height;
            let (right, down) = if dw > dh {
                (
                    PackNode::new(node.x + width, node.y, dw, height),
                    PackNode::new(node.x, node.y + height, node.width, dh),
                )
            } else {
                (
                    PackNode::new(node.x + width, node.y, dw, node.height),
                    PackNode::new(node.x, node.y + height, width, dh),
                )
            };
            self.nodes[id].right = Some(self.push(right));
            self.nodes[id].down = Some(self.push(down));
            return Some(id);
        }

        None
    }

    fn push(&mut self, node: PackNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: (u32, u32, u32, u32), b: (u32, u32, u32, u32)) -> bool {
        a.0 < b.0 + b.2 && b.0 < a.0 + a.2 && a.1 < b.1 + b.3 && b.1 < a.1 + a.3
    }

    fn assert_valid(result: &PackResult) {
        for (i, a) in result.rects.iter().enumerate() {
            let pa = a.padded(result.padding);
            assert!(pa.0 + pa.2 <= result.atlas_size, "{:?} past right edge", a);
            assert!(pa.1 + pa.3 <= result.atlas_size, "{:?} past bottom edge", a);
            for b in &result.rects[i + 1..] {
                assert!(!overlaps(pa, b.padded(result.padding)), "{:?} overlaps {:?}", a, b);
            }
        }
        for (offset, scale) in result.uv_offsets.iter().zip(&result.uv_scales) {
            assert!(offset[0] + scale[0] <= 1.0);
            assert!(offset[1] + scale[1] <= 1.0);
        }
    }

    #[test]
    fn test_empty_input() {
        let result = pack_images(&[], 256, 2).unwrap();
        assert!(result.is_empty());
        assert!(result.uv_offsets.is_empty());
    }

    #[test]
    fn test_effective_padding() {
        assert_eq!(effective_padding(256, 2), 18);
        assert_eq!(effective_padding(2048, 2), 24);
        assert_eq!(effective_padding(2048, 32), 32);
    }

    #[test]
    fn test_three_images_with_base_padding() {
        let sizes = [(64, 64), (128, 64), (64, 128)];
        let result = pack_images_with_padding(&sizes, 256, 2).unwrap();

        assert_eq!(result.rects.len(), 3);
        assert_valid(&result);
        let placed: u32 = result.rects.iter().map(|r| r.width * r.height).sum();
        assert!(placed <= 256 * 256);

        // Ties on area keep input order.
        let order: Vec<usize> = result.rects.iter().map(|r| r.source_index).collect();
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(result.rect_for(1).map(|r| (r.x, r.y)), Some((2, 2)));
        assert_eq!(result.uv_scales[1], [0.5, 0.25]);
    }

    #[test]
    fn test_three_images_with_mipmap_padding() {
        let sizes = [(64, 64), (128, 64), (64, 128)];

        // 18px of padding leaves no room for both long images in 256.
        assert!(matches!(
            pack_images(&sizes, 256, 2),
            Err(Error::ImageDoesNotFit { index: 2, .. })
        ));

        let result = pack_images(&sizes, 512, 2).unwrap();
        assert_eq!(result.padding, 20);
        assert_valid(&result);
    }

    #[test]
    fn test_image_too_large() {
        let result = pack_images(&[(300, 300)], 256, 2);
        match result {
            Err(Error::ImageDoesNotFit {
                index,
                width,
                height,
                atlas_size,
            }) => {
                assert_eq!(index, 0);
                assert_eq!((width, height), (300, 300));
                assert_eq!(atlas_size, 256);
            }
            other => panic!("expected ImageDoesNotFit, got {:?}", other),
        }
    }

    #[test]
    fn test_huge_padding_does_not_fit() {
        assert!(matches!(
            pack_images(&[(4, 4)], 256, 3_000_000_000),
            Err(Error::ImageDoesNotFit { index: 0, .. })
        ));
        assert!(matches!(
            pack_images_with_padding(&[(4, 4)], 256, u32::MAX / 2),
            Err(Error::ImageDoesNotFit { index: 0, .. })
        ));
    }

    #[test]
    fn test_exact_fit() {
        let result = pack_images_with_padding(&[(128, 128)], 128, 0).unwrap();
        assert_eq!(result.rects[0], AtlasRect { x: 0, y: 0, width: 128, height: 128, source_index: 0 });
        assert_eq!(result.uv_offsets[0], [0.0, 0.0]);
        assert_eq!(result.uv_scales[0], [1.0, 1.0]);
    }

    #[test]
    fn test_four_quadrants() {
        let sizes = [(64, 64); 4];
        let result = pack_images_with_padding(&sizes, 128, 0).unwrap();
        assert_valid(&result);
        assert!((result.coverage() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(pack_images(&[(16, 16)], 0, 2), Err(Error::InvalidAtlas(_))));
        assert!(matches!(pack_images(&[(16, 0)], 256, 2), Err(Error::InvalidAtlas(_))));
    }

    #[test]
    fn test_config_grows_atlas() {
        let sizes = [(64, 64), (128, 64), (64, 128)];
        let config = PackerConfig::default()
            .with_atlas_size(256)
            .with_max_atlas_size(1024)
            .with_grow(true);

        let result = config.pack(&sizes).unwrap();
        assert_eq!(result.atlas_size, 512);

        let fixed = config.with_grow(false).pack(&sizes);
        assert!(matches!(fixed, Err(Error::ImageDoesNotFit { .. })));
    }

    #[test]
    fn test_config_growth_capped() {
        let config = PackerConfig::default()
            .with_atlas_size(256)
            .with_max_atlas_size(512)
            .with_grow(true);
        assert!(matches!(
            config.pack(&[(1000, 1000)]),
            Err(Error::ImageDoesNotFit { atlas_size: 512, .. })
        ));
    }

    proptest::proptest! {
        #[test]
        fn test_random_packs_never_overlap(
            sizes in proptest::collection::vec((1u32..96, 1u32..96), 1..24),
            padding in 0u32..6,
        ) {
            if let Ok(result) = pack_images_with_padding(&sizes, 512, padding) {
                proptest::prop_assert_eq!(result.rects.len(), sizes.len());
                assert_valid(&result);
            }
        }
    }
}
