//! Single-step triangle split along integer UV lines.
//!
//! Each edge is cut at most once, at the first integer its U range crosses
//! (or its V range when U crosses none). The three optional cut points give
//! eight split patterns, each with a fixed sub-triangle layout.

use super::range::{integer_between, uvs_close};
use crate::mesh::{MeshBuilder, Vertex};

/// Which edges of a triangle were cut.
///
/// Bit 0 is edge 1→2, bit 1 is edge 2→3, bit 2 is edge 3→1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitPattern {
    None,
    Edge12,
    Edge23,
    Edge31,
    Edges12And23,
    Edges12And31,
    Edges23And31,
    All,
}

impl SplitPattern {
    pub fn from_mask(mask: u8) -> Self {
        match mask & 0b111 {
            0b000 => SplitPattern::None,
            0b001 => SplitPattern::Edge12,
            0b010 => SplitPattern::Edge23,
            0b100 => SplitPattern::Edge31,
            0b011 => SplitPattern::Edges12And23,
            0b101 => SplitPattern::Edges12And31,
            0b110 => SplitPattern::Edges23And31,
            _ => SplitPattern::All,
        }
    }

    /// Sub-triangles produced by this pattern, wound like the source.
    fn layout(self) -> &'static [[Corner; 3]] {
        use Corner::*;
        match self {
            SplitPattern::None => &[[V1, V2, V3]],
            SplitPattern::Edge12 => &[[V1, P12, V3], [V2, V3, P12]],
            SplitPattern::Edge23 => &[[V1, V2, P23], [V1, P23, V3]],
            SplitPattern::Edge31 => &[[V1, V2, P31], [V2, V3, P31]],
            SplitPattern::Edges12And23 => &[[V1, P12, P23], [V2, P23, P12], [V3, V1, P23]],
            SplitPattern::Edges12And31 => &[[V1, P12, P31], [V2, V3, P12], [V3, P31, P12]],
            SplitPattern::Edges23And31 => &[[V1, V2, P31], [V2, P23, P31], [V3, P31, P23]],
            SplitPattern::All => &[
                [V1, P12, P31],
                [V2, P23, P12],
                [V3, P31, P23],
                [P12, P23, P31],
            ],
        }
    }
}

/// A sub-triangle corner: an original vertex or an edge cut point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    V1,
    V2,
    V3,
    P12,
    P23,
    P31,
}

/// One triangle produced by a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub triangle: [u32; 3],
    /// `true` when the piece already fits in one UV cell.
    pub close: bool,
}

/// Interpolated vertex where the edge `a → b` crosses an integer UV line.
fn edge_cut(a: &Vertex, b: &Vertex) -> Option<Vertex> {
    for axis in 0..2 {
        if let Some(value) = integer_between(a.uv[axis], b.uv[axis]) {
            let t = (value - a.uv[axis]) / (b.uv[axis] - a.uv[axis]);
            let mut cut = a.lerp(b, t);
            cut.uv[axis] = value;
            return Some(cut);
        }
    }
    None
}

/// Split `triangle` once, appending cut vertices to `builder`.
///
/// Cut vertices are appended once per sub-triangle that uses them, so no
/// two pieces share a new vertex. Original corners keep their indices.
/// Pieces are returned in emission order.
pub fn split_triangle(builder: &mut MeshBuilder, triangle: [u32; 3]) -> (SplitPattern, Vec<Piece>) {
    let [v1, v2, v3] = triangle.map(|i| builder.vertex(i));

    let cuts = [edge_cut(&v1, &v2), edge_cut(&v2, &v3), edge_cut(&v3, &v1)];
    let mask = cuts
        .iter()
        .enumerate()
        .fold(0u8, |mask, (bit, cut)| if cut.is_some() { mask | (1 << bit) } else { mask });
    let pattern = SplitPattern::from_mask(mask);

    if pattern == SplitPattern::None {
        let close = uvs_close(&builder.triangle_uvs(triangle));
        return (pattern, vec![Piece { triangle, close }]);
    }

    let pieces = pattern
        .layout()
        .iter()
        .map(|corners| {
            let indices = corners.map(|corner| match corner {
                Corner::V1 => triangle[0],
                Corner::V2 => triangle[1],
                Corner::V3 => triangle[2],
                Corner::P12 => push_cut(builder, cuts[0]),
                Corner::P23 => push_cut(builder, cuts[1]),
                Corner::P31 => push_cut(builder, cuts[2]),
            });
            Piece {
                triangle: indices,
                close: uvs_close(&builder.triangle_uvs(indices)),
            }
        })
        .collect();

    (pattern, pieces)
}

fn push_cut(builder: &mut MeshBuilder, cut: Option<Vertex>) -> u32 {
    // Layouts only reference cut points whose bit is set in the mask.
    match cut {
        Some(vertex) => builder.push_vertex(vertex),
        None => unreachable!("split layout references an uncut edge"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;

    fn builder_for(uvs: [[f32; 2]; 3]) -> MeshBuilder {
        let mut mesh = Mesh::new();
        for uv in uvs {
            mesh.add_vertex(
                Vertex::new([uv[0], 0.0, uv[1]], uv).with_normal([0.0, 1.0, 0.0]),
            );
        }
        mesh.add_triangle(0, 1, 2);
        MeshBuilder::from_vertices(&mesh)
    }

    #[test]
    fn test_pattern_from_mask() {
        assert_eq!(SplitPattern::from_mask(0), SplitPattern::None);
        assert_eq!(SplitPattern::from_mask(0b001), SplitPattern::Edge12);
        assert_eq!(SplitPattern::from_mask(0b110), SplitPattern::Edges23And31);
        assert_eq!(SplitPattern::from_mask(0b111), SplitPattern::All);
    }

    #[test]
    fn test_layout_sizes() {
        for mask in 0..8u8 {
            let pattern = SplitPattern::from_mask(mask);
            let expected = match mask.count_ones() {
                0 => 1,
                1 => 2,
                2 => 3,
                _ => 4,
            };
            assert_eq!(pattern.layout().len(), expected, "{:?}", pattern);
        }
    }

    #[test]
    fn test_split_all_edges() {
        let mut builder = builder_for([[0.0, 0.0], [1.5, 0.0], [0.0, 1.5]]);
        let (pattern, pieces) = split_triangle(&mut builder, [0, 1, 2]);

        assert_eq!(pattern, SplitPattern::All);
        assert_eq!(pieces.len(), 4);
        // Each cut point is duplicated into every piece that uses it: 3 x 3 copies.
        assert_eq!(builder.vertex_count(), 3 + 9);
        // The corner-3 piece still spans V from 0.5 to 1.5.
        let close: Vec<bool> = pieces.iter().map(|p| p.close).collect();
        assert_eq!(close, vec![true, true, false, true]);

        assert_eq!(builder.uv(pieces[0].triangle[1]), [1.0, 0.0]);
        assert_eq!(builder.uv(pieces[0].triangle[2]), [0.0, 1.0]);
        let p23 = builder.uv(pieces[1].triangle[1]);
        assert_eq!(p23[0], 1.0);
        assert!((p23[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_split_single_edge() {
        // Corner 3 sits exactly on U = 1, so only edge 1-2 crosses a line.
        let mut builder = builder_for([[0.0, 0.0], [1.5, 0.0], [1.0, 0.5]]);
        let (pattern, pieces) = split_triangle(&mut builder, [0, 1, 2]);

        assert_eq!(pattern, SplitPattern::Edge12);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].triangle[0], 0);
        assert_eq!(pieces[0].triangle[2], 2);
        assert_eq!(pieces[1].triangle[0], 1);
        assert_eq!(pieces[1].triangle[1], 2);
        assert_ne!(pieces[0].triangle[1], pieces[1].triangle[2]);
        assert!(pieces.iter().all(|p| p.close));
    }

    #[test]
    fn test_cut_interpolates_attributes() {
        let mut builder = builder_for([[0.0, 0.0], [2.0, 1.0], [0.0, 0.5]]);
        let (_, pieces) = split_triangle(&mut builder, [0, 1, 2]);

        let cut = builder.vertex(pieces[0].triangle[1]);
        assert_eq!(cut.uv, [1.0, 0.5]);
        assert_eq!(cut.position, [1.0, 0.0, 0.5]);
        assert_eq!(cut.normal, Some([0.0, 1.0, 0.0]));
        assert!(cut.color.is_none());
    }

    #[test]
    fn test_uncut_triangle_is_returned() {
        let mut builder = builder_for([[1.2, 1.2], [1.8, 1.2], [1.2, 1.8]]);
        let (pattern, pieces) = split_triangle(&mut builder, [0, 1, 2]);

        assert_eq!(pattern, SplitPattern::None);
        assert_eq!(pieces, vec![Piece { triangle: [0, 1, 2], close: true }]);
        assert_eq!(builder.vertex_count(), 3);
    }

    #[test]
    fn test_v_axis_used_when_u_does_not_cross() {
        let mut builder = builder_for([[0.2, 0.0], [0.4, 2.5], [0.3, 0.1]]);
        let (_, pieces) = split_triangle(&mut builder, [0, 1, 2]);

        let cut = builder.uv(pieces[0].triangle[1]);
        assert_eq!(cut[1], 1.0);
        assert!((cut[0] - 0.28).abs() < 1e-6);
    }
}
