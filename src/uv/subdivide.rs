//! Mesh-level UV subdivision driver.

use super::format::format_uvs;
use super::range::needs_subdivision;
use super::split::split_triangle;
use crate::error::{Error, Result};
use crate::mesh::{Mesh, MeshBuilder};

/// Subdivision configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubdivideConfig {
    /// Triangles with any UV below 0 or above this value are processed.
    pub threshold: f32,
    /// Fixed limit on nested splits for one source triangle. `None` derives
    /// the limit from the number of tile boundaries the triangle crosses.
    pub max_depth: Option<u32>,
}

impl Default for SubdivideConfig {
    fn default() -> Self {
        Self {
            threshold: 1.0,
            max_depth: None,
        }
    }
}

impl SubdivideConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Nesting allowed for a triangle with the given corner UVs.
    pub fn depth_limit(&self, uvs: &[[f32; 2]; 3]) -> u32 {
        self.max_depth.unwrap_or_else(|| depth_budget(uvs))
    }
}

const DEPTH_SLACK: u32 = 16;

/// Twice the tiles spanned on both axes, plus slack.
///
/// Nesting grows with the number of crossed tile boundaries.
fn depth_budget(uvs: &[[f32; 2]; 3]) -> u32 {
    let span = |axis: usize| {
        let min = uvs.iter().map(|uv| uv[axis]).fold(f32::INFINITY, f32::min);
        let max = uvs.iter().map(|uv| uv[axis]).fold(f32::NEG_INFINITY, f32::max);
        (max - min).ceil()
    };
    // Float to int casts saturate.
    (((span(0) + span(1)) * 2.0) as u32).saturating_add(DEPTH_SLACK)
}

/// Counters collected during a subdivision pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubdivideStats {
    /// Source triangles that went through the splitter.
    pub processed_triangles: usize,
    /// Split steps performed, including nested ones.
    pub splits: usize,
    /// Deepest nesting reached by any source triangle.
    pub max_depth_reached: u32,
    /// Triangles moved by the formatting pass.
    pub formatted_triangles: usize,
    /// Vertices appended beyond the source vertex count.
    pub added_vertices: usize,
}

/// Pending triangle on the work stack.
struct WorkItem {
    triangle: [u32; 3],
    depth: u32,
    close: bool,
}

/// Rebuilds meshes so every triangle's UVs fit in one unit tile.
#[derive(Debug, Clone, Default)]
pub struct UvSubdivider {
    config: SubdivideConfig,
}

impl UvSubdivider {
    /// Create a subdivider with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a subdivider with a custom configuration.
    pub fn with_config(config: SubdivideConfig) -> Self {
        Self { config }
    }

    /// Subdivide and format `mesh`, returning the new mesh.
    pub fn subdivide(&self, mesh: &Mesh) -> Result<Mesh> {
        self.subdivide_with_stats(mesh).map(|(mesh, _)| mesh)
    }

    /// Like [`subdivide`](Self::subdivide), also returning pass counters.
    pub fn subdivide_with_stats(&self, mesh: &Mesh) -> Result<(Mesh, SubdivideStats)> {
        let (builder, mut stats) = self.split_pass(mesh)?;
        let mut output = builder.finish();

        stats.formatted_triangles = format_uvs(&mut output, self.config.threshold);
        stats.added_vertices = output.vertex_count() - mesh.vertex_count();

        tracing::debug!(
            "Subdivided {} of {} triangles into {} ({} splits, depth {}, {} formatted)",
            stats.processed_triangles,
            mesh.triangle_count(),
            output.triangle_count(),
            stats.splits,
            stats.max_depth_reached,
            stats.formatted_triangles
        );

        Ok((output, stats))
    }

    /// Run the splitter only, leaving UVs in their original tiles.
    pub fn split_only(&self, mesh: &Mesh) -> Result<Mesh> {
        self.split_pass(mesh).map(|(builder, _)| builder.finish())
    }

    fn split_pass(&self, mesh: &Mesh) -> Result<(MeshBuilder, SubdivideStats)> {
        mesh.validate()?;

        let mut builder = MeshBuilder::from_vertices(mesh);
        let mut stats = SubdivideStats::default();
        let mut stack: Vec<WorkItem> = Vec::new();

        for (source, triangle) in mesh.triangles().enumerate() {
            if !needs_subdivision(&builder.triangle_uvs(triangle), self.config.threshold) {
                builder.push_triangle(triangle);
                continue;
            }

            stats.processed_triangles += 1;
            let limit = self.config.depth_limit(&builder.triangle_uvs(triangle));
            stack.push(WorkItem {
                triangle,
                depth: 0,
                close: false,
            });

            // Depth-first, so output order matches a recursive walk.
            while let Some(item) = stack.pop() {
                if item.close {
                    builder.push_triangle(item.triangle);
                    continue;
                }
                if item.depth > limit {
                    return Err(Error::SubdivisionLimit {
                        triangle: source,
                        depth: item.depth,
                    });
                }

                let (_, pieces) = split_triangle(&mut builder, item.triangle);
                stats.splits += 1;
                stats.max_depth_reached = stats.max_depth_reached.max(item.depth);

                if let [piece] = pieces.as_slice() {
                    // Nothing crossed an integer line: keep the triangle as-is.
                    builder.push_triangle(piece.triangle);
                    continue;
                }
                for piece in pieces.into_iter().rev() {
                    stack.push(WorkItem {
                        triangle: piece.triangle,
                        depth: item.depth + 1,
                        close: piece.close,
                    });
                }
            }
        }

        Ok((builder, stats))
    }
}

/// Subdivide `mesh` with the given UV threshold and a span-derived depth limit.
pub fn subdivide_mesh_uv(mesh: &Mesh, threshold: f32) -> Result<Mesh> {
    UvSubdivider::with_config(SubdivideConfig::default().with_threshold(threshold)).subdivide(mesh)
}
