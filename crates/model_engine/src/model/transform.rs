//! Local transform composition
//!
//! A model's matrix is rebuilt from scratch as `T * R * S`: scale is applied
//! to local geometry first, then the Euler XYZ rotation, then translation.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Compose a model matrix from position, Euler rotation (radians) and scale
pub fn compose(position: &Vec3, rotation: &Vec3, scale: &Vec3) -> Mat4 {
    Mat4::identity()
        .then_translate(position)
        .then_rotate_xyz(rotation)
        .then_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::PI, Point3};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_by_default() {
        let matrix = compose(&Vec3::zeros(), &Vec3::zeros(), &Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(matrix, Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_scale_applied_before_translation() {
        let matrix = compose(&Vec3::new(1.0, 0.0, 0.0), &Vec3::zeros(), &Vec3::new(2.0, 2.0, 2.0));

        let origin = matrix.transform_point(&Point3::origin());
        assert_relative_eq!(origin, Point3::new(1.0, 0.0, 0.0), epsilon = EPSILON);

        let unit_x = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(unit_x, Point3::new(3.0, 0.0, 0.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_between_scale_and_translation() {
        let matrix = compose(
            &Vec3::new(0.0, 0.0, -4.0),
            &Vec3::new(0.0, PI / 2.0, 0.0),
            &Vec3::new(3.0, 1.0, 1.0),
        );

        // (1,0,0) -> scaled (3,0,0) -> about Y by 90 -> (0,0,-3) -> translated
        let point = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(point, Point3::new(0.0, 0.0, -7.0), epsilon = 1e-5);
    }
}
