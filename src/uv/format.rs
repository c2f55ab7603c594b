//! Integer-offset pass that moves each triangle's UVs into the unit tile.

use super::range::needs_subdivision;
use crate::mesh::Mesh;

/// Shift every out-of-range triangle by whole tiles so its UVs land in [0,1].
///
/// Vertices referenced by more than one triangle are cloned before the
/// shift so neighbouring triangles keep their own UVs. Returns the number
/// of triangles that were shifted.
pub fn format_uvs(mesh: &mut Mesh, threshold: f32) -> usize {
    let mut use_counts = vec![0u32; mesh.vertex_count()];
    for &index in &mesh.indices {
        use_counts[index as usize] += 1;
    }

    let mut formatted = 0;
    for triangle in 0..mesh.triangle_count() {
        let base = triangle * 3;
        let corners = mesh.triangle(triangle);
        let uvs = corners.map(|i| mesh.uvs[i as usize]);
        if !needs_subdivision(&uvs, threshold) {
            continue;
        }

        let shared = corners.map(|i| use_counts[i as usize] > 1);
        for (corner, &index) in corners.iter().enumerate() {
            if shared[corner] {
                let clone = mesh.add_vertex(mesh.vertex(index));
                use_counts[index as usize] -= 1;
                use_counts.push(1);
                mesh.indices[base + corner] = clone;
            }
        }

        let shift = [
            tile_shift([uvs[0][0], uvs[1][0], uvs[2][0]]),
            tile_shift([uvs[0][1], uvs[1][1], uvs[2][1]]),
        ];
        for (corner, uv) in uvs.iter().enumerate() {
            let index = mesh.indices[base + corner] as usize;
            mesh.uvs[index] = [uv[0] + shift[0], uv[1] + shift[1]];
        }
        formatted += 1;
    }

    formatted
}

/// Whole-tile offset for one axis of a triangle.
///
/// Negative coordinates are lifted by `ceil(|min|)`; otherwise the
/// coordinates are lowered by `floor(min)`.
fn tile_shift(values: [f32; 3]) -> f32 {
    let min = values[0].min(values[1]).min(values[2]);

    if values.iter().any(|&v| v < 0.0) {
        min.abs().ceil()
    } else if values.iter().any(|&v| v > 0.0) {
        -min.floor()
    } else {
        0.0
    }
}
