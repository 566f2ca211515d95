//! Pose evaluation: keyframe sampling and hierarchical matrix composition

use glam::{Mat4, Vec3};

use super::interpolate::{RotationInterpolation, RotationInterpolator};
use super::keyframe::{Animation, Keyframe, QuatKey, VectorKey};
use crate::skeleton::{Bone, BoneId, Skeleton};

/// Locate the keys bracketing `time`.
///
/// Returns `(from, to, frac)`. `from` is the first index whose successor is
/// at or after `time`, or the last key if there is none, in which case `to`
/// wraps to key 0 and its time is shifted forward by `duration`. `frac` is
/// clamped to [0, 1]; a zero-length span yields 0.
pub fn find_key_span<T>(keys: &[Keyframe<T>], time: f32, duration: f32) -> Option<(usize, usize, f32)> {
    if keys.is_empty() {
        return None;
    }

    let last = keys.len() - 1;
    let from = (0..last)
        .find(|&i| keys[i + 1].time >= time)
        .unwrap_or(last);
    let to = (from + 1) % keys.len();

    let start = keys[from].time;
    let mut end = keys[to].time;
    if end < start {
        // Wrapped past the last key
        end += duration;
    }

    let span = end - start;
    let frac = if span > 0.0 {
        ((time - start) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some((from, to, frac))
}

/// Linearly interpolated position or scale at `time`
pub fn sample_vector(keys: &[VectorKey], time: f32, duration: f32) -> Option<Vec3> {
    find_key_span(keys, time, duration).map(|(from, to, frac)| keys[from].value.lerp(keys[to].value, frac))
}

/// Rotation matrix at `time`, blended by `interpolator`
pub fn sample_rotation<R: RotationInterpolator>(
    keys: &[QuatKey],
    time: f32,
    duration: f32,
    interpolator: &R,
) -> Option<Mat4> {
    find_key_span(keys, time, duration)
        .map(|(from, to, frac)| interpolator.blend(keys[from].value, keys[to].value, frac))
}

/// Local track values of one animated bone at a point in time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSample {
    pub bone: BoneId,
    /// Index into the skinning matrix array
    pub index: u32,
    pub position: Option<Vec3>,
    pub rotation: Option<Mat4>,
    pub scale: Option<Vec3>,
}

/// Computes skinning matrices for a skeleton at a point in an animation.
///
/// Holds no state besides the rotation strategy; evaluating different
/// animations against one skeleton from several threads is fine.
#[derive(Debug, Clone, Copy)]
pub struct PoseEvaluator<R = RotationInterpolation> {
    interpolator: R,
}

impl<R: RotationInterpolator> PoseEvaluator<R> {
    pub fn new(interpolator: R) -> Self {
        Self { interpolator }
    }

    pub fn interpolator(&self) -> &R {
        &self.interpolator
    }

    /// One skinning matrix per bone index (`global * offset`).
    ///
    /// Slots of bone indices that are not reachable in `skeleton` are left
    /// as [`Mat4::ZERO`]. With no bones the result is empty.
    pub fn evaluate(
        &self,
        animation: &Animation,
        time: f32,
        skeleton: &Skeleton,
        bone_count: usize,
    ) -> Vec<Mat4> {
        let mut matrices = vec![Mat4::ZERO; bone_count];
        self.evaluate_into(animation, time, skeleton, &mut matrices);
        matrices
    }

    /// Same as [`Self::evaluate`] but writes into a caller-owned buffer.
    /// Slots of unreachable bones are not touched.
    pub fn evaluate_into(
        &self,
        animation: &Animation,
        time: f32,
        skeleton: &Skeleton,
        matrices: &mut [Mat4],
    ) {
        for &root in skeleton.roots() {
            self.visit(animation, time, skeleton, root, Mat4::IDENTITY, matrices);
        }
    }

    /// Animated transform of `bone` relative to its parent bone
    pub fn bone_transform(&self, animation: &Animation, time: f32, id: BoneId, bone: &Bone) -> Mat4 {
        let Some(keys) = animation.keyframes(id).filter(|k| !k.is_empty()) else {
            return bone.local_transform;
        };

        let duration = animation.duration;
        let translation = sample_vector(&keys.positions, time, duration)
            .map(Mat4::from_translation)
            .unwrap_or(Mat4::IDENTITY);
        let rotation = sample_rotation(&keys.rotations, time, duration, &self.interpolator)
            .unwrap_or(Mat4::IDENTITY);
        let scale = sample_vector(&keys.scales, time, duration)
            .map(Mat4::from_scale)
            .unwrap_or(Mat4::IDENTITY);

        translation * rotation * scale
    }

    /// Sampled tracks of every bone with bound keys, parents before
    /// children. A track without keys samples to `None`.
    pub fn sample_channels(&self, animation: &Animation, time: f32, skeleton: &Skeleton) -> Vec<ChannelSample> {
        let duration = animation.duration;
        skeleton
            .iter_depth_first()
            .into_iter()
            .filter_map(|id| {
                let keys = animation.keyframes(id)?;
                let bone = skeleton.try_get(id)?;
                Some(ChannelSample {
                    bone: id,
                    index: bone.index,
                    position: sample_vector(&keys.positions, time, duration),
                    rotation: sample_rotation(&keys.rotations, time, duration, &self.interpolator),
                    scale: sample_vector(&keys.scales, time, duration),
                })
            })
            .collect()
    }

    fn visit(
        &self,
        animation: &Animation,
        time: f32,
        skeleton: &Skeleton,
        id: BoneId,
        parent_global: Mat4,
        matrices: &mut [Mat4],
    ) {
        let bone = skeleton.get(id);
        let global = parent_global * self.bone_transform(animation, time, id, bone);

        match matrices.get_mut(bone.index as usize) {
            Some(slot) => *slot = global * bone.offset_matrix,
            None => tracing::warn!(
                "Bone '{}' has index {} outside the {} output matrices",
                bone.name,
                bone.index,
                matrices.len()
            ),
        }

        for &child in &bone.children {
            self.visit(animation, time, skeleton, child, global, matrices);
        }
    }
}

impl Default for PoseEvaluator<RotationInterpolation> {
    fn default() -> Self {
        Self::new(RotationInterpolation::default())
    }
}

impl PoseEvaluator<RotationInterpolation> {
    pub fn with_mode(mode: RotationInterpolation) -> Self {
        Self::new(mode)
    }
}
