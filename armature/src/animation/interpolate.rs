//! Rotation key blending strategies

use glam::{Mat4, Quat};
use serde::{Deserialize, Serialize};

/// Blends two rotation keys into a rotation matrix
pub trait RotationInterpolator {
    fn blend(&self, from: Quat, to: Quat, t: f32) -> Mat4;
}

/// Componentwise blend of the two rotation matrices.
///
/// The result is not orthonormal between keys. Kept as the default so poses
/// match assets authored against this behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearMatrixBlend;

impl RotationInterpolator for LinearMatrixBlend {
    fn blend(&self, from: Quat, to: Quat, t: f32) -> Mat4 {
        let a = Mat4::from_quat(from);
        let b = Mat4::from_quat(to);
        a + (b - a) * t
    }
}

/// Spherical linear interpolation of the quaternions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Slerp;

impl RotationInterpolator for Slerp {
    fn blend(&self, from: Quat, to: Quat, t: f32) -> Mat4 {
        Mat4::from_quat(from.slerp(to, t))
    }
}

/// Config-facing selector between the built-in strategies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationInterpolation {
    #[default]
    LinearMatrixBlend,
    Slerp,
}

impl RotationInterpolator for RotationInterpolation {
    fn blend(&self, from: Quat, to: Quat, t: f32) -> Mat4 {
        match self {
            Self::LinearMatrixBlend => LinearMatrixBlend.blend(from, to, t),
            Self::Slerp => Slerp.blend(from, to, t),
        }
    }
}
