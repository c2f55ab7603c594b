//! Shared types used throughout the library.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    pub fn volume(&self) -> f32 {
        let [x, y, z] = self.dimensions();
        x * y * z
    }

    pub fn surface_area(&self) -> f32 {
        let [x, y, z] = self.dimensions();
        2.0 * (x * y + x * z + y * z)
    }
}

/// Axis-aligned bounds in UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UvBounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl UvBounds {
    pub fn from_uvs(uvs: impl Iterator<Item = [f32; 2]>) -> Option<Self> {
        let mut min = [f32::MAX; 2];
        let mut max = [f32::MIN; 2];
        let mut has_uvs = false;

        for uv in uvs {
            has_uvs = true;
            for i in 0..2 {
                min[i] = min[i].min(uv[i]);
                max[i] = max[i].max(uv[i]);
            }
        }

        has_uvs.then_some(Self { min, max })
    }

    /// Check if the bounds lie inside the unit square.
    pub fn is_unit(&self) -> bool {
        self.min[0] >= 0.0 && self.min[1] >= 0.0 && self.max[0] <= 1.0 && self.max[1] <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_points() {
        let bounds = BoundingBox::from_points(
            [[0.0, 1.0, 2.0], [2.0, -1.0, 4.0]].into_iter(),
        )
        .unwrap();

        assert_eq!(bounds.min, [0.0, -1.0, 2.0]);
        assert_eq!(bounds.max, [2.0, 1.0, 4.0]);
        assert_eq!(bounds.center(), [1.0, 0.0, 3.0]);
        assert_eq!(bounds.dimensions(), [2.0, 2.0, 2.0]);
        assert!((bounds.volume() - 8.0).abs() < 1e-6);
        assert!((bounds.surface_area() - 24.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_bounds() {
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
        assert!(UvBounds::from_uvs(std::iter::empty()).is_none());
    }

    #[test]
    fn test_uv_bounds() {
        let bounds = UvBounds::from_uvs([[0.0, 0.5], [1.5, 0.25]].into_iter()).unwrap();
        assert_eq!(bounds.min, [0.0, 0.25]);
        assert_eq!(bounds.max, [1.5, 0.5]);
        assert!(!bounds.is_unit());
    }
}
