//! Mipmap-aware padding sizes and atlas quality grading.

use serde::Serialize;

/// Number of mip levels for a square texture of side `size`.
pub fn mip_levels(size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    size.ilog2() + 1
}

/// Edge extrusion width in pixels for an atlas of side `atlas_size`.
///
/// One pixel per mip level, never less than two.
pub fn edge_padding(atlas_size: u32) -> u32 {
    mip_levels(atlas_size).max(2)
}

/// Inward UV margin keeping samples clear of a cell's extruded border.
pub fn mipmap_safe_padding(atlas_size: u32) -> f32 {
    if atlas_size == 0 {
        return 0.0;
    }
    (edge_padding(atlas_size) as f32 + 0.5) / atlas_size as f32
}

/// Coarse risk grade for visible seams at low mip levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            QualityGrade::Excellent => "excellent: seams very unlikely",
            QualityGrade::Good => "good: seams unlikely",
            QualityGrade::Fair => "fair: faint seams possible",
            QualityGrade::Poor => "poor: seams likely",
        };
        f.write_str(text)
    }
}

/// Result of [`assess_quality`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityReport {
    pub grade: QualityGrade,
    /// Smallest texture side over atlas side.
    pub texture_ratio: f32,
    /// Padding over smallest texture side.
    pub padding_ratio: f32,
    /// Smallest texture side that keeps seams in check for this padding.
    pub recommended_min_texture: u32,
}

/// Grade how well `padding` protects the smallest texture in an atlas.
pub fn assess_quality(atlas_size: u32, smallest_texture: u32, padding: u32) -> QualityReport {
    let texture_ratio = if atlas_size == 0 {
        0.0
    } else {
        smallest_texture as f32 / atlas_size as f32
    };
    let padding_ratio = if smallest_texture == 0 {
        0.0
    } else {
        padding as f32 / smallest_texture as f32
    };

    let grade = if padding_ratio >= 0.2 && texture_ratio >= 0.1 {
        QualityGrade::Excellent
    } else if padding_ratio >= 0.1 && texture_ratio >= 0.05 {
        QualityGrade::Good
    } else if padding_ratio >= 0.05 {
        QualityGrade::Fair
    } else {
        QualityGrade::Poor
    };

    QualityReport {
        grade,
        texture_ratio,
        padding_ratio,
        recommended_min_texture: padding * 10,
    }
}
