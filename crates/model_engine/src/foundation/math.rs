//! Math utilities and types
//!
//! Provides the vector and matrix types used by models, transforms and the
//! geometry derivation routines. All types are `f32` nalgebra aliases.

pub use nalgebra::{Matrix4, Rotation3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// 2 * Pi
    pub const TAU: f32 = 2.0 * PI;

    /// Magnitude below which a vector is not normalized
    pub const NORMALIZE_EPSILON: f32 = 1e-6;
}

/// Extension trait for Mat4 with in-place composition helpers
///
/// Each `then_*` method right-multiplies `self` by the named transform, so a
/// chain `identity.then_translate(..).then_rotate_xyz(..).then_scale(..)`
/// yields `T * R * S` and applies scale to local geometry first.
pub trait Mat4Ext {
    /// Translation matrix
    fn translation(offset: &Vec3) -> Mat4;

    /// Rotation matrix from Euler angles (radians). X is applied first, then Y, then Z.
    fn rotation_xyz(angles: &Vec3) -> Mat4;

    /// Right-multiply by a translation
    fn then_translate(self, offset: &Vec3) -> Mat4;

    /// Right-multiply by an Euler XYZ rotation
    fn then_rotate_xyz(self, angles: &Vec3) -> Mat4;

    /// Right-multiply by a non-uniform scale
    fn then_scale(self, factors: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn translation(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn rotation_xyz(angles: &Vec3) -> Mat4 {
        Rotation3::from_euler_angles(angles.x, angles.y, angles.z).to_homogeneous()
    }

    fn then_translate(self, offset: &Vec3) -> Mat4 {
        self * Self::translation(offset)
    }

    fn then_rotate_xyz(self, angles: &Vec3) -> Mat4 {
        self * Self::rotation_xyz(angles)
    }

    fn then_scale(self, factors: &Vec3) -> Mat4 {
        self * Mat4::new_nonuniform_scaling(factors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_rotation_x_first() {
        // X then Z: +Y about X by 90 becomes +Z, then Z rotation leaves it alone
        let angles = Vec3::new(constants::PI / 2.0, 0.0, constants::PI / 2.0);
        let rotated = Mat4::rotation_xyz(&angles).transform_vector(&Vec3::y());
        assert_relative_eq!(rotated, Vec3::z(), epsilon = EPSILON);
    }

    #[test]
    fn test_chain_is_translate_rotate_scale() {
        let matrix = Mat4::identity()
            .then_translate(&Vec3::new(0.0, 5.0, 0.0))
            .then_rotate_xyz(&Vec3::new(0.0, 0.0, constants::PI / 2.0))
            .then_scale(&Vec3::new(2.0, 1.0, 1.0));

        // scale x by 2, rotate onto +Y, then lift by 5
        let point = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3::new(0.0, 7.0, 0.0), epsilon = 1e-5);
    }
}
