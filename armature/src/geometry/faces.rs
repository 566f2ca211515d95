//! Face decoding

use crate::error::ImportError;

/// Flatten polygon faces into a local index list and a triangle list.
///
/// Every face must have exactly 3 indices, each below `vertex_count`. There is
/// no partial recovery: the first offending face fails the whole submesh.
pub fn decode_faces(
    submesh: usize,
    faces: &[Vec<u32>],
    vertex_count: usize,
) -> Result<(Vec<u32>, Vec<[u32; 3]>), ImportError> {
    let mut indices = Vec::with_capacity(faces.len() * 3);
    let mut triangles = Vec::with_capacity(faces.len());

    for (face, polygon) in faces.iter().enumerate() {
        let &[a, b, c] = polygon.as_slice() else {
            return Err(ImportError::MalformedMesh {
                submesh,
                face,
                arity: polygon.len(),
            });
        };

        if let Some(&index) = [a, b, c].iter().find(|&&i| i as usize >= vertex_count) {
            return Err(ImportError::InvalidFaceIndex {
                submesh,
                face,
                index,
                vertex_count,
            });
        }

        indices.extend_from_slice(&[a, b, c]);
        triangles.push([a, b, c]);
    }

    Ok((indices, triangles))
}
