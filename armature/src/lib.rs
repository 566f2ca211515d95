//! Armature: skinned mesh import and pose evaluation
//!
//! Turns an already-parsed scene (node tree, submeshes with bone influences,
//! animation clips) into the data a GPU skinning renderer consumes:
//!
//! - one merged vertex/index buffer with per-submesh [`Entry`] draw ranges
//! - a [`BoneTable`] mapping bone names to stable indices and offset matrices
//! - four weighted bone slots per vertex ([`VertexBoneData`])
//! - a [`Skeleton`] containing only the nodes that are actual bones
//! - [`Animation`]s bound to that skeleton
//! - per-frame skinning matrices from [`PoseEvaluator`]
//!
//! The crate performs no I/O. Format front ends (see `armature-gltf`) fill in
//! the [`scene`] types and call [`import_scene`].
//!
//! # Usage
//!
//! ```ignore
//! use armature::{import_scene, ImportOptions};
//!
//! let model = import_scene(&scene, &ImportOptions::default())?;
//! if let Some(matrices) = model.evaluate(0, 0.5) {
//!     upload_bone_uniforms(&pack_bone_matrices(&matrices));
//! }
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod import;
pub mod math;
pub mod scene;
pub mod skeleton;

pub use animation::{
    bind_animation, Animation, BoneKeyframes, ChannelSample, Keyframe, LinearMatrixBlend, PoseEvaluator,
    QuatKey, RotationInterpolation, RotationInterpolator, Slerp, VectorKey,
};
pub use config::ImportOptions;
pub use error::ImportError;
pub use geometry::{merge, Entry, GeometryAccumulator, MeshGeometry};
pub use import::{import_scene, SkinnedModel};
pub use math::{pack_bone_matrices, BoneMatrix3x4};
pub use skeleton::{
    build_skeleton, Bone, BoneEntry, BoneId, BoneTable, Skeleton, VertexBoneData,
    WeightAccumulator, MAX_BONE_INFLUENCES,
};
