//! Wavefront OBJ import and export.
//!
//! Import understands positions (with optional vertex colors), texture
//! coordinates, normals and polygonal faces. Export writes a single object
//! with one material referencing an optional texture.

use crate::combine::CombinedOutput;
use crate::error::{Error, Result};
use crate::mesh::Mesh;
use std::fmt::Write;
use std::path::Path;

/// Parse OBJ text into a mesh.
///
/// Every distinct `v/vt/vn` combination used by a face becomes one output
/// vertex and polygons are fan-triangulated. Objects and groups are merged
/// into one mesh. Vertices without a texture coordinate get `(0, 0)`.
/// Material libraries are not read.
pub fn parse_obj(text: &str) -> Result<Mesh> {
    let mut reader = text.as_bytes();
    let (models, _) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        Ok(Default::default())
    })
    .map_err(|e| Error::Parse(format!("OBJ: {}", e)))?;

    let mut mesh = Mesh::new();
    for model in &models {
        mesh.merge(&model_to_mesh(&model.mesh));
    }

    tracing::debug!(
        "Parsed OBJ: {} models, {} vertices, {} triangles",
        models.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Read and parse an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Mesh> {
    let text = std::fs::read_to_string(path)?;
    parse_obj(&text)
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Convert one single-indexed tobj mesh, padding missing attributes.
fn model_to_mesh(model: &tobj::Mesh) -> Mesh {
    let positions: Vec<[f32; 3]> = model
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();
    let count = positions.len();

    let mut uvs: Vec<[f32; 2]> = model
        .texcoords
        .chunks_exact(2)
        .map(|t| [t[0], t[1]])
        .collect();
    uvs.resize(count, [0.0, 0.0]);

    let mut normals: Vec<[f32; 3]> = model
        .normals
        .chunks_exact(3)
        .map(|n| [n[0], n[1], n[2]])
        .collect();
    if !normals.is_empty() {
        normals.resize(count, [0.0, 1.0, 0.0]);
    }

    let mut colors: Vec<[f32; 4]> = model
        .vertex_color
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2], 1.0])
        .collect();
    if !colors.is_empty() {
        colors.resize(count, [1.0, 1.0, 1.0, 1.0]);
    }

    Mesh {
        positions,
        normals,
        tangents: Vec::new(),
        colors,
        uvs,
        indices: model.indices.clone(),
    }
}

/// Export a mesh to OBJ format.
/// Returns (obj_content, mtl_content) as strings.
///
/// Vertex colors are written as `v x y z r g b`; alpha is dropped.
pub fn export_obj(mesh: &Mesh, name: &str, texture: Option<&str>) -> Result<(String, String)> {
    let total_verts = mesh.vertex_count();
    let total_tris = mesh.triangle_count();

    // ~60 bytes per v/vt/vn line, ~40 per face
    let mut obj = String::with_capacity(256 + total_verts * 180 + total_tris * 40);
    let mut mtl = String::with_capacity(256);

    writeln!(obj, "# uvtile OBJ export").unwrap();
    writeln!(obj, "# Vertices: {}", total_verts).unwrap();
    writeln!(obj, "# Triangles: {}", total_tris).unwrap();
    writeln!(obj).unwrap();
    writeln!(obj, "mtllib {}.mtl", name).unwrap();
    writeln!(obj, "o {}", name).unwrap();
    writeln!(obj).unwrap();

    for (i, p) in mesh.positions.iter().enumerate() {
        match mesh.colors.get(i) {
            Some(c) => {
                writeln!(obj, "v {} {} {} {} {} {}", p[0], p[1], p[2], c[0], c[1], c[2]).unwrap()
            }
            None => writeln!(obj, "v {} {} {}", p[0], p[1], p[2]).unwrap(),
        }
    }
    writeln!(obj).unwrap();

    for uv in &mesh.uvs {
        writeln!(obj, "vt {} {}", uv[0], uv[1]).unwrap();
    }
    writeln!(obj).unwrap();

    let with_normals = mesh.has_normals();
    if with_normals {
        for n in &mesh.normals {
            writeln!(obj, "vn {} {} {}", n[0], n[1], n[2]).unwrap();
        }
        writeln!(obj).unwrap();
    }

    writeln!(obj, "usemtl {}_material", name).unwrap();
    for [a, b, c] in mesh.triangles() {
        let (i0, i1, i2) = (a + 1, b + 1, c + 1);
        if with_normals {
            writeln!(obj, "f {}/{}/{} {}/{}/{} {}/{}/{}", i0, i0, i0, i1, i1, i1, i2, i2, i2).unwrap();
        } else {
            writeln!(obj, "f {}/{} {}/{} {}/{}", i0, i0, i1, i1, i2, i2).unwrap();
        }
    }

    writeln!(mtl, "# uvtile material").unwrap();
    writeln!(mtl).unwrap();
    writeln!(mtl, "newmtl {}_material", name).unwrap();
    writeln!(mtl, "Ka 1.0 1.0 1.0").unwrap();
    writeln!(mtl, "Kd 1.0 1.0 1.0").unwrap();
    writeln!(mtl, "Ks 0.0 0.0 0.0").unwrap();
    writeln!(mtl, "Ns 10.0").unwrap();
    writeln!(mtl, "d 1.0").unwrap();
    writeln!(mtl, "illum 1").unwrap();
    if let Some(texture) = texture {
        writeln!(mtl, "map_Kd {}", texture).unwrap();
    }

    Ok((obj, mtl))
}

/// OBJ, MTL and atlas PNG for a combined mesh, ready to write to disk.
pub struct ObjExport {
    pub name: String,
    pub obj: String,
    pub mtl: String,
    pub texture_png: Vec<u8>,
}

impl ObjExport {
    pub fn from_combined(output: &CombinedOutput, name: &str) -> Result<Self> {
        let texture = format!("{}_atlas.png", name);
        let (obj, mtl) = export_obj(&output.mesh, name, Some(&texture))?;
        let texture_png = output.atlas.to_png()?;
        Ok(Self {
            name: name.to_string(),
            obj,
            mtl,
            texture_png,
        })
    }

    /// Write `<name>.obj`, `<name>.mtl` and `<name>_atlas.png` into `dir`.
    pub fn write_to_dir(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(format!("{}.obj", self.name)), &self.obj)?;
        std::fs::write(dir.join(format!("{}.mtl", self.name)), &self.mtl)?;
        std::fs::write(dir.join(format!("{}_atlas.png", self.name)), &self.texture_png)?;
        Ok(())
    }
}
