//! GPU upload layout for skinning matrices

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// 3x4 affine bone matrix (row-major storage, POD type)
///
/// Stores 3 rows of a 4x4 affine matrix. The implicit 4th row is [0, 0, 0, 1].
/// Each row stores [Xx, Xy, Xz, Tx] etc.
///
/// Memory layout (48 bytes):
/// - row0: rotation row 0 + translation X
/// - row1: rotation row 1 + translation Y
/// - row2: rotation row 2 + translation Z
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BoneMatrix3x4 {
    /// First row: [m00, m01, m02, tx]
    pub row0: [f32; 4],
    /// Second row: [m10, m11, m12, ty]
    pub row1: [f32; 4],
    /// Third row: [m20, m21, m22, tz]
    pub row2: [f32; 4],
}

impl BoneMatrix3x4 {
    /// Identity bone matrix (no transformation)
    pub const IDENTITY: Self = Self {
        row0: [1.0, 0.0, 0.0, 0.0],
        row1: [0.0, 1.0, 0.0, 0.0],
        row2: [0.0, 0.0, 1.0, 0.0],
    };

    /// Drop the bottom row of a column-major glam matrix
    pub fn from_mat4(m: &Mat4) -> Self {
        Self {
            row0: m.row(0).to_array(),
            row1: m.row(1).to_array(),
            row2: m.row(2).to_array(),
        }
    }

    /// Rebuild the full matrix with an implicit [0, 0, 0, 1] bottom row
    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&[
            [self.row0[0], self.row1[0], self.row2[0], 0.0],
            [self.row0[1], self.row1[1], self.row2[1], 0.0],
            [self.row0[2], self.row1[2], self.row2[2], 0.0],
            [self.row0[3], self.row1[3], self.row2[3], 1.0],
        ])
    }

    /// Convert to flat f32 array for GPU upload (row-major)
    pub fn to_array(&self) -> [f32; 12] {
        bytemuck::cast(*self)
    }
}

/// Convert evaluated skinning matrices to the 3x4 upload layout
pub fn pack_bone_matrices(matrices: &[Mat4]) -> Vec<BoneMatrix3x4> {
    matrices.iter().map(BoneMatrix3x4::from_mat4).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    #[test]
    fn test_identity() {
        let m = BoneMatrix3x4::from_mat4(&Mat4::IDENTITY);
        assert_eq!(m, BoneMatrix3x4::IDENTITY);
    }

    #[test]
    fn test_translation_lands_in_last_column() {
        let m = BoneMatrix3x4::from_mat4(&Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(m.row0[3], 1.0);
        assert_eq!(m.row1[3], 2.0);
        assert_eq!(m.row2[3], 3.0);
        assert_eq!(
            m.to_array(),
            [1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 2.0, 0.0, 0.0, 1.0, 3.0]
        );
    }

    #[test]
    fn test_affine_matrix_survives_packing() {
        let source = Mat4::from_scale_rotation_translation(
            Vec3::new(1.0, 2.0, 0.5),
            Quat::from_rotation_y(0.7),
            Vec3::new(-4.0, 0.25, 9.0),
        );
        let packed = BoneMatrix3x4::from_mat4(&source);
        assert!(packed.to_mat4().abs_diff_eq(source, 1e-6));
    }

    #[test]
    fn test_pack_bone_matrices_keeps_order() {
        let matrices = [
            Mat4::IDENTITY,
            Mat4::from_translation(Vec3::X),
            Mat4::from_translation(Vec3::Y),
        ];
        let packed = pack_bone_matrices(&matrices);
        assert_eq!(packed.len(), 3);
        assert_eq!(packed[1].row0[3], 1.0);
        assert_eq!(packed[2].row1[3], 1.0);
        assert_eq!(bytemuck::cast_slice::<BoneMatrix3x4, u8>(&packed).len(), 3 * 48);
    }
}
