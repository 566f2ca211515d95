//! Geometry data types

use std::ops::Range;

use glam::{Vec2, Vec3, Vec4};

use crate::skeleton::VertexBoneData;

/// Vertex attribute streams of one submesh or of the merged mesh.
///
/// An optional stream is either absent or holds exactly one element per
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Vec<Vec3>>,
    pub texcoords: Option<Vec<Vec2>>,
    pub colors: Option<Vec<Vec4>>,
    pub bone_data: Option<Vec<VertexBoneData>>,
    /// Triangle indices, local to the owning submesh
    pub indices: Vec<u32>,
    pub faces: Vec<[u32; 3]>,
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_tangents(&self) -> bool {
        self.tangents.is_some()
    }

    pub fn has_texcoords(&self) -> bool {
        self.texcoords.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    pub fn has_bone_data(&self) -> bool {
        self.bone_data.is_some()
    }

    /// Check that every present stream matches the vertex count
    pub fn is_consistent(&self) -> bool {
        let n = self.positions.len();
        self.normals.as_ref().is_none_or(|s| s.len() == n)
            && self.tangents.as_ref().is_none_or(|s| s.len() == n)
            && self.texcoords.as_ref().is_none_or(|s| s.len() == n)
            && self.colors.as_ref().is_none_or(|s| s.len() == n)
            && self.bone_data.as_ref().is_none_or(|s| s.len() == n)
    }
}

/// Draw range of one submesh inside the merged buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub vertex_count: u32,
    pub index_count: u32,
    /// Added to every index of this entry at draw time
    pub base_vertex: u32,
    /// First index of this entry in the merged index buffer
    pub base_index: u32,
    pub material_index: i32,
    pub enabled: bool,
}

impl Entry {
    /// Slice range of this entry in the merged index buffer
    pub fn index_range(&self) -> Range<usize> {
        let start = self.base_index as usize;
        start..start + self.index_count as usize
    }

    /// Slice range of this entry in the merged vertex streams
    pub fn vertex_range(&self) -> Range<usize> {
        let start = self.base_vertex as usize;
        start..start + self.vertex_count as usize
    }
}
