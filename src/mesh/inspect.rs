//! Mesh statistics and UV diagnostics.

use super::geometry::Mesh;
use crate::types::{BoundingBox, UvBounds};
use crate::uv::needs_subdivision;
use serde::Serialize;

/// Summary of a mesh's contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshInfo {
    pub vertex_count: usize,
    pub triangle_count: usize,
    pub has_normals: bool,
    pub has_tangents: bool,
    pub has_colors: bool,
    /// Position bounds, `None` for an empty mesh.
    pub bounds: Option<BoundingBox>,
    /// UV bounds, `None` for an empty mesh.
    pub uv_bounds: Option<UvBounds>,
    /// Vertices whose UV lies outside [0,1] on either axis.
    pub out_of_range_uvs: usize,
    /// Triangles the UV subdivider would split or reformat.
    pub triangles_over_threshold: usize,
}

impl MeshInfo {
    pub fn from_mesh(mesh: &Mesh, threshold: f32) -> Self {
        let triangles_over_threshold = mesh
            .triangles()
            .filter(|t| {
                let uvs = t.map(|i| mesh.uvs[i as usize]);
                needs_subdivision(&uvs, threshold)
            })
            .count();

        Self {
            vertex_count: mesh.vertex_count(),
            triangle_count: mesh.triangle_count(),
            has_normals: mesh.has_normals(),
            has_tangents: mesh.has_tangents(),
            has_colors: mesh.has_colors(),
            bounds: BoundingBox::from_points(mesh.positions.iter().copied()),
            uv_bounds: UvBounds::from_uvs(mesh.uvs.iter().copied()),
            out_of_range_uvs: mesh.uvs.iter().filter(|uv| !uv_in_unit(uv)).count(),
            triangles_over_threshold,
        }
    }
}

fn uv_in_unit(uv: &[f32; 2]) -> bool {
    (0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1])
}

/// Indices of all triangles that reference `vertex`.
pub fn triangles_using_vertex(mesh: &Mesh, vertex: u32) -> Vec<usize> {
    mesh.triangles()
        .enumerate()
        .filter(|(_, t)| t.contains(&vertex))
        .map(|(i, _)| i)
        .collect()
}

/// Every vertex whose UV lies outside [0,1], with that UV.
pub fn out_of_range_uvs(mesh: &Mesh) -> Vec<(usize, [f32; 2])> {
    let found: Vec<_> = mesh
        .uvs
        .iter()
        .enumerate()
        .filter(|(_, uv)| !uv_in_unit(uv))
        .map(|(i, uv)| (i, *uv))
        .collect();

    if !found.is_empty() {
        tracing::warn!("{} vertices have UVs outside [0,1]", found.len());
    }
    found
}
