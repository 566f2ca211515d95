//! Keyframe animation: clip binding and pose evaluation

mod binder;
mod interpolate;
mod keyframe;
mod pose;

pub use binder::bind_animation;
pub use interpolate::{LinearMatrixBlend, RotationInterpolation, RotationInterpolator, Slerp};
pub use keyframe::{Animation, BoneKeyframes, Keyframe, QuatKey, VectorKey};
pub use pose::{find_key_span, sample_rotation, sample_vector, ChannelSample, PoseEvaluator};
