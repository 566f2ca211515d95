//! Submesh geometry: face decoding, attribute normalization, and merging

mod faces;
mod merge;
pub mod normalize;
mod types;

pub use faces::decode_faces;
pub use merge::{merge, GeometryAccumulator};
pub use types::{Entry, MeshGeometry};
