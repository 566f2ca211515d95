//! Multi-submesh merging

use glam::{Vec2, Vec3, Vec4};

use super::types::{Entry, MeshGeometry};
use crate::skeleton::VertexBoneData;

/// Append every attribute stream of `source` onto `destination`.
///
/// Attribute streams are concatenated; indices and faces are copied verbatim
/// and stay local to their submesh (resolve them through
/// [`Entry::base_vertex`]).
///
/// Callers should hand in submeshes with matching attribute sets. When only
/// one side has a stream, the other side is padded with the attribute default
/// so that a present stream always covers every vertex.
pub fn merge(source: &MeshGeometry, destination: &mut MeshGeometry) {
    let dest_len = destination.positions.len();
    let src_len = source.positions.len();

    append_stream(
        "normals",
        &mut destination.normals,
        dest_len,
        source.normals.as_deref(),
        src_len,
        Vec3::Y,
    );
    append_stream(
        "tangents",
        &mut destination.tangents,
        dest_len,
        source.tangents.as_deref(),
        src_len,
        Vec3::X,
    );
    append_stream(
        "texcoords",
        &mut destination.texcoords,
        dest_len,
        source.texcoords.as_deref(),
        src_len,
        Vec2::ZERO,
    );
    append_stream(
        "colors",
        &mut destination.colors,
        dest_len,
        source.colors.as_deref(),
        src_len,
        Vec4::ONE,
    );
    append_stream(
        "bone data",
        &mut destination.bone_data,
        dest_len,
        source.bone_data.as_deref(),
        src_len,
        VertexBoneData::default(),
    );

    destination.positions.extend_from_slice(&source.positions);
    destination.indices.extend_from_slice(&source.indices);
    destination.faces.extend_from_slice(&source.faces);
}

fn append_stream<T: Copy>(
    attribute: &str,
    destination: &mut Option<Vec<T>>,
    dest_len: usize,
    source: Option<&[T]>,
    src_len: usize,
    default: T,
) {
    match (destination.as_mut(), source) {
        (Some(dst), Some(src)) => dst.extend_from_slice(src),
        (Some(dst), None) => {
            if src_len > 0 {
                tracing::warn!(
                    "Submesh is missing {}, padding {} vertices with defaults",
                    attribute,
                    src_len
                );
            }
            dst.extend(std::iter::repeat_n(default, src_len));
        }
        (None, Some(src)) => {
            let mut stream = Vec::with_capacity(dest_len + src.len());
            if dest_len > 0 {
                tracing::warn!(
                    "Earlier submeshes are missing {}, padding {} vertices with defaults",
                    attribute,
                    dest_len
                );
                stream.extend(std::iter::repeat_n(default, dest_len));
            }
            stream.extend_from_slice(src);
            *destination = Some(stream);
        }
        (None, None) => {}
    }
}

/// Merged geometry plus the draw entry of every appended submesh
#[derive(Debug, Clone, Default)]
pub struct GeometryAccumulator {
    pub geometry: MeshGeometry,
    pub entries: Vec<Entry>,
}

impl GeometryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex offset the next appended submesh will receive
    pub fn next_base_vertex(&self) -> u32 {
        self.geometry.positions.len() as u32
    }

    /// Record a draw entry for `source` and merge it in
    pub fn append(&mut self, source: &MeshGeometry, material_index: i32) -> Entry {
        let entry = Entry {
            vertex_count: source.vertex_count() as u32,
            index_count: source.index_count() as u32,
            base_vertex: self.geometry.positions.len() as u32,
            base_index: self.geometry.indices.len() as u32,
            material_index,
            enabled: true,
        };

        merge(source, &mut self.geometry);
        self.entries.push(entry);
        entry
    }

    pub fn finish(self) -> (MeshGeometry, Vec<Entry>) {
        (self.geometry, self.entries)
    }
}
