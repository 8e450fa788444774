//! Errors reported by the host layer.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Viewport must be at least 1x1 pixels
    #[error("Invalid viewport size: {0}x{1}")]
    InvalidViewportSize(u32, u32),

    /// Object refers to a material that hasn't been added
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// Instance refers to a mesh that hasn't been added
    #[error("Unknown mesh: {0}")]
    UnknownMesh(String),

    /// Mesh index points past the vertex buffer
    #[error("Degenerate mesh: index {index} out of {vertices} vertices")]
    DegenerateMesh { index: u32, vertices: usize },

    /// Mesh index buffer doesn't describe whole triangles
    #[error("Degenerate mesh: {0} indices don't form whole triangles")]
    IncompleteTriangles(usize),

    #[error("Mismatched mesh normals: expected {positions}, got {normals}")]
    MismatchedNormals { positions: usize, normals: usize },

    #[error("Image export failed: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
