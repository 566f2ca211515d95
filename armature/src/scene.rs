//! Source scene description
//!
//! Plain data handed to [`crate::import_scene`] by a format front end. The
//! pipeline only ever reads these types.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::animation::{QuatKey, VectorKey};

/// A named node of the source scene graph
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self {
        Self {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    /// Builder-style child attachment
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }
}

/// One weighted vertex influence of a bone, indexed locally to its submesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    pub vertex: u32,
    pub weight: f32,
}

/// A bone as seen by one submesh
#[derive(Debug, Clone, PartialEq)]
pub struct SourceBone {
    pub name: String,
    /// Inverse bind matrix (mesh space -> bone space)
    pub offset_matrix: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// A submesh as provided by the format front end
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMesh {
    pub name: String,
    pub material_index: i32,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tangents: Option<Vec<Vec3>>,
    /// First texture coordinate channel only
    pub texcoords: Option<Vec<Vec2>>,
    /// First color channel only
    pub colors: Option<Vec<Vec4>>,
    /// Polygon faces; each must have exactly 3 indices
    pub faces: Vec<Vec<u32>>,
    pub bones: Vec<SourceBone>,
}

/// Keys targeting one scene node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceChannel {
    pub node_name: String,
    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scale_keys: Vec<VectorKey>,
}

/// An animation clip; times are in ticks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceClip {
    pub name: String,
    pub duration: f32,
    pub ticks_per_second: f32,
    pub channels: Vec<SourceChannel>,
}

impl SourceClip {
    pub fn channel(&self, node_name: &str) -> Option<&SourceChannel> {
        self.channels.iter().find(|c| c.node_name == node_name)
    }
}

/// Everything the importer consumes
#[derive(Debug, Clone, PartialEq)]
pub struct SourceScene {
    pub root: SceneNode,
    pub meshes: Vec<SourceMesh>,
    pub clips: Vec<SourceClip>,
}
