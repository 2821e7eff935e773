//! Conversions to and from `glam`, which shares our memory layouts: quaternions
//! are (x, y, z, w) and matrices are column-major.

use glam::{DVec3, Mat4, Quat, Vec3};

use crate::{Rotation, Transform4x4, Vector3};

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for DVec3 {
    fn from(v: Vector3) -> Self {
        DVec3::new(v.x as f64, v.y as f64, v.z as f64)
    }
}

/// Narrows to f32; only meaningful for values already close to the camera.
impl From<DVec3> for Vector3 {
    fn from(v: DVec3) -> Self {
        Vector3::from_f64(v.x, v.y, v.z)
    }
}

impl From<Rotation> for Quat {
    fn from(q: Rotation) -> Self {
        Quat::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl From<Quat> for Rotation {
    fn from(q: Quat) -> Self {
        Rotation::from_array(q.to_array())
    }
}

impl From<Transform4x4> for Mat4 {
    fn from(m: Transform4x4) -> Self {
        Mat4::from_cols_array(m.as_array())
    }
}

impl From<Mat4> for Transform4x4 {
    fn from(m: Mat4) -> Self {
        Transform4x4::from_cols_array(m.to_cols_array())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_quat_round_trip_is_exact() {
        let q = Rotation::new(1.0, 2.0, 4.0, 8.0);
        let g = Quat::from(q);
        assert_eq!((g.x, g.y, g.z, g.w), (1.0, 2.0, 4.0, 8.0));
        assert_eq!(Rotation::from(g), q);
    }

    #[test]
    fn test_matrix_round_trip_keeps_column_order() {
        let mut values = [0.0; 16];
        for (i, v) in values.iter_mut().enumerate() {
            *v = i as f32;
        }
        let m = Transform4x4::from_cols_array(values);
        let g = Mat4::from(m);
        assert_eq!(g.w_axis.x, 12.0);
        assert_eq!(g.x_axis.y, 1.0);
        assert_eq!(Transform4x4::from(g), m);
    }

    #[test]
    fn test_vector_conversions() {
        let v = Vector3::new(0.5, -1.5, 3.0);
        assert_eq!(Vector3::from(Vec3::from(v)), v);
        assert_eq!(DVec3::from(v), DVec3::new(0.5, -1.5, 3.0));
        assert_eq!(Vector3::from(DVec3::new(0.5, -1.5, 3.0)), v);
    }
}
