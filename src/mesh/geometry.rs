//! Mesh geometry types.

use crate::error::{Error, Result};
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

const DEFAULT_NORMAL: [f32; 3] = [0.0, 1.0, 0.0];
const DEFAULT_TANGENT: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const DEFAULT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// One vertex with all of its attributes.
///
/// Optional attributes are `None` when the owning mesh does not carry them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Normal vector.
    pub normal: Option<[f32; 3]>,
    /// Tangent (xyz + handedness in w).
    pub tangent: Option<[f32; 4]>,
    /// Vertex color (RGBA).
    pub color: Option<[f32; 4]>,
}

impl Vertex {
    pub fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            uv,
            normal: None,
            tangent: None,
            color: None,
        }
    }

    pub fn with_normal(mut self, normal: [f32; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_tangent(mut self, tangent: [f32; 4]) -> Self {
        self.tangent = Some(tangent);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = Some(color);
        self
    }

    /// Interpolate every attribute towards `other` at parameter `t`.
    ///
    /// The interpolated normal is renormalized. An attribute is kept only
    /// when both endpoints carry it.
    pub fn lerp(&self, other: &Vertex, t: f32) -> Vertex {
        let position = Vec3::from(self.position).lerp(Vec3::from(other.position), t);
        let uv = Vec2::from(self.uv).lerp(Vec2::from(other.uv), t);

        let normal = match (self.normal, other.normal) {
            (Some(a), Some(b)) => Some(
                Vec3::from(a)
                    .lerp(Vec3::from(b), t)
                    .normalize_or_zero()
                    .to_array(),
            ),
            _ => None,
        };
        let tangent = match (self.tangent, other.tangent) {
            (Some(a), Some(b)) => Some(Vec4::from(a).lerp(Vec4::from(b), t).to_array()),
            _ => None,
        };
        let color = match (self.color, other.color) {
            (Some(a), Some(b)) => Some(Vec4::from(a).lerp(Vec4::from(b), t).to_array()),
            _ => None,
        };

        Vertex {
            position: position.to_array(),
            uv: uv.to_array(),
            normal,
            tangent,
            color,
        }
    }
}

/// A triangle mesh in structure-of-arrays layout.
///
/// `normals`, `tangents` and `colors` are either empty (attribute absent) or
/// exactly as long as `positions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (unit length).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<[f32; 3]>,
    /// Vertex tangents.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tangents: Vec<[f32; 4]>,
    /// Vertex colors (RGBA).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub colors: Vec<[f32; 4]>,
    /// Texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices (three per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this mesh contains no vertices.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }

    pub fn has_colors(&self) -> bool {
        !self.colors.is_empty()
    }

    /// Vertex indices of triangle `index`.
    pub fn triangle(&self, index: usize) -> [u32; 3] {
        let base = index * 3;
        [
            self.indices[base],
            self.indices[base + 1],
            self.indices[base + 2],
        ]
    }

    /// Iterate over all triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Gather all attributes of vertex `index`.
    pub fn vertex(&self, index: u32) -> Vertex {
        let i = index as usize;
        Vertex {
            position: self.positions[i],
            uv: self.uvs[i],
            normal: self.normals.get(i).copied(),
            tangent: self.tangents.get(i).copied(),
            color: self.colors.get(i).copied(),
        }
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(vertex.position);
        self.uvs.push(vertex.uv);
        if let Some(normal) = vertex.normal {
            self.normals.push(normal);
        }
        if let Some(tangent) = vertex.tangent {
            self.tangents.push(tangent);
        }
        if let Some(color) = vertex.color {
            self.colors.push(color);
        }
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Check the attribute and index invariants.
    pub fn validate(&self) -> Result<()> {
        let count = self.positions.len();

        if self.uvs.len() != count {
            return Err(Error::InvalidMesh(format!(
                "{} uvs for {} vertices",
                self.uvs.len(),
                count
            )));
        }
        for (name, len) in [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("colors", self.colors.len()),
        ] {
            if len != 0 && len != count {
                return Err(Error::InvalidMesh(format!(
                    "{} {} for {} vertices",
                    len, name, count
                )));
            }
        }
        let finite = |uv: &[f32; 2]| uv[0].is_finite() && uv[1].is_finite();
        if let Some(bad) = self.uvs.iter().position(|uv| !finite(uv)) {
            return Err(Error::InvalidMesh(format!("vertex {} has a non-finite uv", bad)));
        }
        if self.indices.len() % 3 != 0 {
            return Err(Error::InvalidMesh(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(&bad) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(Error::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad, count
            )));
        }

        Ok(())
    }

    /// Merge another mesh into this one, offsetting indices appropriately.
    ///
    /// When only one side carries an optional attribute, the other side is
    /// filled with a neutral default so the arrays stay parallel.
    pub fn merge(&mut self, other: &Mesh) {
        if self.is_empty() {
            *self = other.clone();
            return;
        }
        if other.is_empty() {
            return;
        }

        let offset = self.positions.len() as u32;
        let own_count = self.positions.len();
        let other_count = other.positions.len();

        merge_attribute(&mut self.normals, &other.normals, own_count, other_count, DEFAULT_NORMAL);
        merge_attribute(&mut self.tangents, &other.tangents, own_count, other_count, DEFAULT_TANGENT);
        merge_attribute(&mut self.colors, &other.colors, own_count, other_count, DEFAULT_COLOR);

        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + offset));
    }

}

fn merge_attribute<T: Copy>(
    own: &mut Vec<T>,
    other: &[T],
    own_count: usize,
    other_count: usize,
    default: T,
) {
    match (own.is_empty(), other.is_empty()) {
        (true, true) => {}
        (false, false) => own.extend_from_slice(other),
        (false, true) => own.extend(std::iter::repeat(default).take(other_count)),
        (true, false) => {
            own.extend(std::iter::repeat(default).take(own_count));
            own.extend_from_slice(other);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f32) -> Mesh {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Vertex::new([offset, 0.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([offset + 1.0, 0.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([offset, 0.0, 1.0], [0.0, 1.0]));
        mesh.add_triangle(v0, v1, v2);
        mesh
    }

    #[test]
    fn test_mesh_creation() {
        let mesh = triangle(0.0);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());
        assert_eq!(mesh.triangle(0), [0, 1, 2]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_mesh_merge() {
        let mut mesh1 = triangle(0.0);
        let mesh2 = triangle(2.0);
        mesh1.merge(&mesh2);

        assert_eq!(mesh1.vertex_count(), 6);
        assert_eq!(mesh1.triangle_count(), 2);
        // Second triangle indices should be offset by 3
        assert_eq!(mesh1.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh1.positions[3], [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_merge_fills_missing_attributes() {
        let mut mesh1 = triangle(0.0);
        let mut mesh2 = Mesh::new();
        for uv in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            mesh2.add_vertex(
                Vertex::new([0.0, 0.0, 0.0], uv)
                    .with_normal([0.0, 0.0, 1.0])
                    .with_color([1.0, 0.0, 0.0, 1.0]),
            );
        }
        mesh2.add_triangle(0, 1, 2);

        mesh1.merge(&mesh2);

        assert_eq!(mesh1.normals.len(), 6);
        assert_eq!(mesh1.colors.len(), 6);
        assert!(mesh1.tangents.is_empty());
        assert_eq!(mesh1.normals[0], DEFAULT_NORMAL);
        assert_eq!(mesh1.normals[3], [0.0, 0.0, 1.0]);
        assert!(mesh1.validate().is_ok());
    }

    #[test]
    fn test_merge_into_empty() {
        let mut mesh = Mesh::new();
        mesh.merge(&triangle(0.0));
        assert_eq!(mesh, triangle(0.0));
    }

    #[test]
    fn test_validate_rejects_mismatched_attributes() {
        let mut mesh = triangle(0.0);
        mesh.normals.push([0.0, 1.0, 0.0]);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = triangle(0.0);
        mesh.indices.push(7);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = triangle(0.0);
        mesh.indices.extend([0, 1, 9]);
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));

        let mut mesh = triangle(0.0);
        mesh.uvs[1] = [f32::INFINITY, 0.0];
        assert!(matches!(mesh.validate(), Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_vertex_lerp() {
        let a = Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0])
            .with_normal([1.0, 0.0, 0.0])
            .with_color([0.0, 0.0, 0.0, 1.0]);
        let b = Vertex::new([2.0, 0.0, 0.0], [2.0, 1.0])
            .with_normal([0.0, 1.0, 0.0])
            .with_color([1.0, 1.0, 1.0, 1.0]);

        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.position, [1.0, 0.0, 0.0]);
        assert_eq!(mid.uv, [1.0, 0.5]);
        assert_eq!(mid.color, Some([0.5, 0.5, 0.5, 1.0]));
        assert!(mid.tangent.is_none());

        let n = mid.normal.unwrap();
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_json_skips_absent_attributes() {
        let json = serde_json::to_string(&triangle(0.0)).unwrap();
        assert!(!json.contains("normals"));
        let back: Mesh = serde_json::from_str(&json).unwrap();
        assert_eq!(back, triangle(0.0));
    }
}
