//! Append-only mesh arena used while rebuilding a mesh.

use super::geometry::{Mesh, Vertex};

/// Growing output mesh shared by every split of a subdivision pass.
///
/// Vertices are only ever appended, so indices handed out stay valid for
/// the lifetime of the builder.
#[derive(Debug)]
pub struct MeshBuilder {
    mesh: Mesh,
}

impl MeshBuilder {
    /// Start from a copy of `source`'s vertices, without any triangles.
    pub fn from_vertices(source: &Mesh) -> Self {
        Self {
            mesh: Mesh {
                positions: source.positions.clone(),
                normals: source.normals.clone(),
                tangents: source.tangents.clone(),
                colors: source.colors.clone(),
                uvs: source.uvs.clone(),
                indices: Vec::with_capacity(source.indices.len()),
            },
        }
    }

    /// All attributes of an existing vertex.
    pub fn vertex(&self, index: u32) -> Vertex {
        self.mesh.vertex(index)
    }

    /// UV of an existing vertex.
    pub fn uv(&self, index: u32) -> [f32; 2] {
        self.mesh.uvs[index as usize]
    }

    /// UVs of a triangle's three corners.
    pub fn triangle_uvs(&self, triangle: [u32; 3]) -> [[f32; 2]; 3] {
        triangle.map(|i| self.uv(i))
    }

    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.mesh.add_vertex(vertex)
    }

    pub fn push_triangle(&mut self, triangle: [u32; 3]) {
        self.mesh.add_triangle(triangle[0], triangle[1], triangle[2]);
    }

    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    pub fn finish(self) -> Mesh {
        self.mesh
    }
}
