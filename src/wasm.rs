//! WASM bindings for uvtile.
//!
//! This module provides JavaScript-friendly APIs for use in the browser.
//! Meshes cross the boundary as flat typed arrays.

use crate::atlas::pack_images;
use crate::mesh::Mesh;
use crate::uv::{SubdivideConfig, UvSubdivider};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the browser console
    console_error_panic_hook::set_once();
}

fn to_js(e: crate::Error) -> JsError {
    JsError::new(&e.to_string())
}

/// Subdivided mesh as flat arrays.
#[wasm_bindgen]
pub struct SubdivideResult {
    positions: Vec<f32>,
    uvs: Vec<f32>,
    normals: Vec<f32>,
    indices: Vec<u32>,
}

#[wasm_bindgen]
impl SubdivideResult {
    /// Positions, three floats per vertex.
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.positions.as_slice())
    }

    /// UVs, two floats per vertex.
    #[wasm_bindgen(getter)]
    pub fn uvs(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.uvs.as_slice())
    }

    /// Normals, three floats per vertex; empty when the input had none.
    #[wasm_bindgen(getter)]
    pub fn normals(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.normals.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> js_sys::Uint32Array {
        js_sys::Uint32Array::from(self.indices.as_slice())
    }

    #[wasm_bindgen(getter)]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[wasm_bindgen(getter)]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Split triangles along integer UV lines and move their UVs into [0, 1].
///
/// `normals` may be empty.
#[wasm_bindgen]
pub fn subdivide_uvs(
    positions: &[f32],
    uvs: &[f32],
    normals: &[f32],
    indices: &[u32],
    threshold: f32,
) -> Result<SubdivideResult, JsError> {
    let mesh = Mesh {
        positions: positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
        normals: normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]).collect(),
        tangents: Vec::new(),
        colors: Vec::new(),
        uvs: uvs.chunks_exact(2).map(|uv| [uv[0], uv[1]]).collect(),
        indices: indices.to_vec(),
    };

    let config = SubdivideConfig::default().with_threshold(threshold);
    let output = UvSubdivider::with_config(config)
        .subdivide(&mesh)
        .map_err(to_js)?;

    Ok(SubdivideResult {
        positions: output.positions.iter().flatten().copied().collect(),
        uvs: output.uvs.iter().flatten().copied().collect(),
        normals: output.normals.iter().flatten().copied().collect(),
        indices: output.indices,
    })
}

/// Subdivide a mesh given in the JSON mesh format, returning JSON.
#[wasm_bindgen]
pub fn subdivide_mesh_json(json: &str, threshold: f32) -> Result<String, JsError> {
    let mesh = crate::io::mesh_from_json(json).map_err(to_js)?;
    let output = crate::subdivide_mesh_uv(&mesh, threshold).map_err(to_js)?;
    crate::io::mesh_to_json(&output).map_err(to_js)
}

/// Pack images by size and return the placement as JSON.
///
/// The result has `atlas_size`, `padding`, `rects`, `uv_offsets` and
/// `uv_scales`.
#[wasm_bindgen]
pub fn pack_sizes(
    widths: &[u32],
    heights: &[u32],
    atlas_size: u32,
    padding: u32,
) -> Result<String, JsError> {
    if widths.len() != heights.len() {
        return Err(JsError::new(&format!(
            "{} widths for {} heights",
            widths.len(),
            heights.len()
        )));
    }
    let sizes: Vec<(u32, u32)> = widths.iter().copied().zip(heights.iter().copied()).collect();
    let result = pack_images(&sizes, atlas_size, padding).map_err(to_js)?;
    serde_json::to_string(&result).map_err(|e| JsError::new(&format!("Invalid JSON: {}", e)))
}
