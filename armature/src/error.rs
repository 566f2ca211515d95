//! Import error types

use thiserror::Error;

/// Hard failures of [`crate::import_scene`].
///
/// Everything else (missing bones, missing channels, empty key tracks,
/// bone-less meshes) degrades to empty or default data instead of failing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// A face with other than 3 indices. Input must be triangulated.
    #[error("submesh {submesh} face {face} has {arity} indices (only triangles are supported)")]
    MalformedMesh {
        submesh: usize,
        face: usize,
        arity: usize,
    },

    /// A face referencing a vertex outside its submesh
    #[error(
        "submesh {submesh} face {face} references vertex {index} but the submesh has {vertex_count} vertices"
    )]
    InvalidFaceIndex {
        submesh: usize,
        face: usize,
        index: u32,
        vertex_count: usize,
    },
}
