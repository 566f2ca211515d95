//! Top-level import pipeline

use glam::Mat4;

use crate::animation::{bind_animation, Animation, ChannelSample, PoseEvaluator};
use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::geometry::normalize::normalize_submesh;
use crate::geometry::{decode_faces, Entry, GeometryAccumulator, MeshGeometry};
use crate::scene::{SourceMesh, SourceScene};
use crate::skeleton::{build_skeleton, BoneTable, Skeleton, WeightAccumulator};

/// Result of [`import_scene`]: everything a skinning renderer needs
#[derive(Debug, Clone)]
pub struct SkinnedModel {
    /// Merged attribute streams; indices are local to each entry
    pub geometry: MeshGeometry,
    pub entries: Vec<Entry>,
    pub bones: BoneTable,
    pub skeleton: Skeleton,
    pub animations: Vec<Animation>,
    pub evaluator: PoseEvaluator,
}

impl SkinnedModel {
    /// Length of every skinning matrix array
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    pub fn is_skinned(&self) -> bool {
        !self.skeleton.is_empty()
    }

    pub fn animation(&self, name: &str) -> Option<&Animation> {
        self.animations.iter().find(|a| a.name == name)
    }

    pub fn animation_index(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }

    /// Skinning matrices for animation `index` at `time` (in ticks)
    pub fn evaluate(&self, index: usize, time: f32) -> Option<Vec<Mat4>> {
        let animation = self.animations.get(index)?;
        Some(self.evaluate_animation(animation, time))
    }

    /// Skinning matrices for any animation bound to this model's skeleton
    pub fn evaluate_animation(&self, animation: &Animation, time: f32) -> Vec<Mat4> {
        self.evaluator
            .evaluate(animation, time, &self.skeleton, self.bone_count())
    }

    /// Per-bone local track samples for animation `index` at `time` (in ticks)
    pub fn sample_channels(&self, index: usize, time: f32) -> Option<Vec<ChannelSample>> {
        let animation = self.animations.get(index)?;
        Some(self.evaluator.sample_channels(animation, time, &self.skeleton))
    }

    /// Skinning matrices of the bind pose.
    ///
    /// Each bone uses its local transform under its parent bone. Transforms
    /// of non-bone ancestors (such as an "Armature" node) are not applied, so
    /// the result is the identity set only when those ancestors are identity.
    pub fn bind_pose(&self) -> Vec<Mat4> {
        self.evaluate_animation(&Animation::default(), 0.0)
    }
}

/// Import a parsed scene.
///
/// Submeshes are processed in order: faces are decoded (non-triangles abort
/// the whole import), missing attributes are filled in, bones are registered
/// and their weights recorded at global vertex indices, and the submesh is
/// merged. The skeleton and animations are built afterwards.
pub fn import_scene(scene: &SourceScene, options: &ImportOptions) -> Result<SkinnedModel, ImportError> {
    let mut accumulator = GeometryAccumulator::new();
    let mut bones = BoneTable::new();
    let mut weights = WeightAccumulator::new();

    for (submesh, mesh) in scene.meshes.iter().enumerate() {
        let mut geometry = submesh_geometry(submesh, mesh)?;
        normalize_submesh(&mut geometry, options);

        let base_vertex = accumulator.next_base_vertex();
        for bone in &mesh.bones {
            let bone_index = bones.register(&bone.name, bone.offset_matrix);
            for weight in &bone.weights {
                if weight.vertex as usize >= mesh.positions.len() {
                    tracing::warn!(
                        "Submesh {} bone '{}' weights vertex {} past the end ({} vertices), skipping",
                        submesh,
                        bone.name,
                        weight.vertex,
                        mesh.positions.len()
                    );
                    continue;
                }
                weights.add(base_vertex + weight.vertex, bone_index, weight.weight);
            }
        }

        let entry = accumulator.append(&geometry, mesh.material_index);
        tracing::debug!(
            "Submesh {} '{}': {} vertices, {} indices, {} bones, base vertex {}",
            submesh,
            mesh.name,
            entry.vertex_count,
            entry.index_count,
            mesh.bones.len(),
            entry.base_vertex
        );
    }

    let (mut geometry, entries) = accumulator.finish();
    if !bones.is_empty() {
        geometry.bone_data = Some(weights.into_vertex_stream(geometry.vertex_count()));
    }

    let skeleton = build_skeleton(&scene.root, &bones);

    let animations: Vec<Animation> = scene
        .clips
        .iter()
        .map(|clip| {
            let mut animation = bind_animation(clip, &scene.root, &skeleton);
            if animation.ticks_per_second <= 0.0 {
                animation.ticks_per_second = options.default_ticks_per_second;
            }
            animation
        })
        .collect();

    tracing::info!(
        "Imported {} submeshes: {} vertices, {} indices, {} bones, {} animations",
        entries.len(),
        geometry.vertex_count(),
        geometry.index_count(),
        bones.len(),
        animations.len()
    );

    Ok(SkinnedModel {
        geometry,
        entries,
        bones,
        skeleton,
        animations,
        evaluator: PoseEvaluator::with_mode(options.rotation_interpolation),
    })
}

/// Copy one source submesh into pipeline form.
///
/// Optional streams whose length does not match the vertex count are
/// treated as absent.
fn submesh_geometry(submesh: usize, mesh: &SourceMesh) -> Result<MeshGeometry, ImportError> {
    let vertex_count = mesh.positions.len();
    let (indices, faces) = decode_faces(submesh, &mesh.faces, vertex_count)?;

    Ok(MeshGeometry {
        positions: mesh.positions.clone(),
        normals: complete_stream(submesh, "normals", mesh.normals.as_ref(), vertex_count),
        tangents: complete_stream(submesh, "tangents", mesh.tangents.as_ref(), vertex_count),
        texcoords: complete_stream(submesh, "texcoords", mesh.texcoords.as_ref(), vertex_count),
        colors: complete_stream(submesh, "colors", mesh.colors.as_ref(), vertex_count),
        bone_data: None,
        indices,
        faces,
    })
}

fn complete_stream<T: Clone>(
    submesh: usize,
    attribute: &str,
    stream: Option<&Vec<T>>,
    vertex_count: usize,
) -> Option<Vec<T>> {
    match stream {
        Some(s) if s.len() == vertex_count => Some(s.clone()),
        Some(s) => {
            tracing::warn!(
                "Submesh {} has mismatched {} count ({} vs {} vertices), ignoring {}",
                submesh,
                attribute,
                s.len(),
                vertex_count,
                attribute
            );
            None
        }
        None => None,
    }
}
