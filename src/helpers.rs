//! Utility functions for bowlsim

use bevy::prelude::*;

/// Project a vector onto the horizontal (XZ) plane.
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Angle in degrees between the horizontal projections of two vectors.
/// Returns 0.0 when either projection is degenerate.
pub fn horizontal_angle_between(a: Vec3, b: Vec3) -> f32 {
    let fa = flatten(a);
    let fb = flatten(b);
    if fa.length_squared() < 1e-8 || fb.length_squared() < 1e-8 {
        return 0.0;
    }
    let cos = (fa.dot(fb) / (fa.length() * fb.length())).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_drops_y() {
        let v = flatten(Vec3::new(1.0, 5.0, -2.0));
        assert_eq!(v, Vec3::new(1.0, 0.0, -2.0));
    }

    #[test]
    fn test_horizontal_angle_ignores_vertical_component() {
        let a = Vec3::new(0.0, 10.0, 1.0);
        let b = Vec3::new(0.0, -3.0, 1.0);
        assert!(horizontal_angle_between(a, b) < 1e-3);
    }

    #[test]
    fn test_horizontal_angle_right_angle() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 0.0, 1.0);
        assert!((horizontal_angle_between(a, b) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_horizontal_angle_degenerate_is_zero() {
        let a = Vec3::new(0.0, 4.0, 0.0);
        let b = Vec3::new(1.0, 0.0, 1.0);
        assert_eq!(horizontal_angle_between(a, b), 0.0);
    }
}
