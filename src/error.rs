//! Error types for uvtile.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for subdivision, packing and I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read, decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Mesh attribute arrays or indices are inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A triangle kept splitting past the configured depth.
    #[error("Subdivision limit exceeded: triangle {triangle} reached depth {depth}")]
    SubdivisionLimit {
        /// Index of the source triangle (in the input index buffer).
        triangle: usize,
        /// Depth at which the limit was hit.
        depth: u32,
    },

    /// An image could not be placed in the atlas.
    #[error("Image {index} ({width}x{height}) does not fit in a {atlas_size}x{atlas_size} atlas")]
    ImageDoesNotFit {
        /// Index of the image in the caller's input list.
        index: usize,
        width: u32,
        height: u32,
        atlas_size: u32,
    },

    /// Atlas parameters or an image descriptor are unusable.
    #[error("Invalid atlas: {0}")]
    InvalidAtlas(String),

    /// Failed to compose the atlas pixels.
    #[error("Atlas composition error: {0}")]
    Compose(String),

    /// Failed to parse a mesh file.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The file extension names no supported mesh format.
    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),
}
