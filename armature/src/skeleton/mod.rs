//! Bones: name registry, per-vertex weights, and the bone tree

mod hierarchy;
mod table;
mod weights;

pub use hierarchy::{build_skeleton, Bone, BoneId, Skeleton};
pub use table::{BoneEntry, BoneTable};
pub use weights::{VertexBoneData, WeightAccumulator, MAX_BONE_INFLUENCES};
