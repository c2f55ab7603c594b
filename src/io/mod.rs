//! Mesh file input and output.
//!
//! Meshes are read and written as JSON (the serde form of [`Mesh`]) or as
//! Wavefront OBJ. The format is picked from the file extension.

pub mod obj;

pub use obj::{export_obj, load_obj, parse_obj, ObjExport};

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use std::path::Path;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Json,
    Obj,
}

impl MeshFormat {
    /// Pick a format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(MeshFormat::Json),
            Some("obj") => Ok(MeshFormat::Obj),
            _ => Err(Error::UnsupportedFormat(format!(
                "'{}', expected .json or .obj",
                path.display()
            ))),
        }
    }
}

/// Parse a mesh from JSON and check it.
pub fn mesh_from_json(text: &str) -> Result<Mesh> {
    let mesh: Mesh = serde_json::from_str(text)?;
    mesh.validate()?;
    Ok(mesh)
}

/// Serialize a mesh as pretty-printed JSON.
pub fn mesh_to_json(mesh: &Mesh) -> Result<String> {
    Ok(serde_json::to_string_pretty(mesh)?)
}

/// Load a mesh, choosing the parser from the extension.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh> {
    let path = path.as_ref();
    let mesh = match MeshFormat::from_path(path)? {
        MeshFormat::Json => mesh_from_json(&std::fs::read_to_string(path)?)?,
        MeshFormat::Obj => load_obj(path)?,
    };
    tracing::info!(
        "Loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Save a mesh, choosing the writer from the extension.
///
/// OBJ output also writes a sibling `.mtl` file. OBJ vertex colors carry
/// RGB only, so alpha reads back as 1.0 and tangents are not written.
pub fn save_mesh(mesh: &Mesh, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Json => std::fs::write(path, mesh_to_json(mesh)?)?,
        MeshFormat::Obj => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("mesh");
            let (obj, mtl) = export_obj(mesh, name, None)?;
            std::fs::write(path, obj)?;
            std::fs::write(path.with_extension("mtl"), mtl)?;
        }
    }
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(MeshFormat::from_path(&PathBuf::from("a/b.json")).unwrap(), MeshFormat::Json);
        assert_eq!(MeshFormat::from_path(&PathBuf::from("mesh.OBJ")).unwrap(), MeshFormat::Obj);
        assert!(matches!(
            MeshFormat::from_path(&PathBuf::from("mesh.glb")),
            Err(Error::UnsupportedFormat(_))
        ));
        assert!(matches!(
            load_mesh("mesh"),
            Err(Error::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_json_optional_attributes() {
        let text = r#"{
            "positions": [[0,0,0],[1,0,0],[0,1,0]],
            "uvs": [[0,0],[2,0],[0,2]],
            "indices": [0,1,2]
        }"#;
        let mesh = mesh_from_json(text).unwrap();
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.has_normals());

        let json = mesh_to_json(&mesh).unwrap();
        assert!(!json.contains("normals"));
        assert_eq!(mesh_from_json(&json).unwrap(), mesh);
    }

    #[test]
    fn test_json_rejects_bad_indices() {
        let text = r#"{"positions": [[0,0,0]], "uvs": [[0,0]], "indices": [0,1,2]}"#;
        assert!(matches!(mesh_from_json(text), Err(Error::InvalidMesh(_))));
    }
}
