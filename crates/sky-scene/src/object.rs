use glam::DVec3;
use sky_math::{DELTA, Rotation, Transform4x4, Vector3};

/// Anything with a pose in the scene: the camera, a planet, the sun.
///
/// The orientation is the single source of truth for the object's axes and
/// matrices, which are derived on demand. It is kept unit length: every
/// mutation renormalizes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    orientation: Rotation,
    position: DVec3,
    velocity: Vector3,
}

impl Default for SceneObject {
    fn default() -> Self {
        Self {
            orientation: Rotation::IDENTITY,
            position: DVec3::ZERO,
            velocity: Vector3::ZERO,
        }
    }
}

impl SceneObject {
    /// An object at rest at `position`. `orientation` is normalized.
    pub fn new(position: DVec3, orientation: Rotation) -> Self {
        let mut object = Self {
            position,
            ..Self::default()
        };
        object.set_orientation(orientation);
        object
    }

    pub fn orientation(&self) -> Rotation {
        self.orientation
    }

    /// Replace the orientation. The value is normalized before it is stored,
    /// including quaternions too large to square in f32. A zero or non-finite
    /// quaternion leaves NaN behind.
    pub fn set_orientation(&mut self, orientation: Rotation) {
        self.orientation = orientation
            .try_normalized()
            .unwrap_or_else(|_| orientation.normalized());
        self.debug_check_unit();
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    pub fn velocity(&self) -> Vector3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.velocity = velocity;
    }

    /// Turn by `angle` radians about the world-space unit vector `axis`.
    pub fn rotate(&mut self, axis: Vector3, angle: f32) {
        self.rotate_by(Rotation::from_axis_angle(axis, angle));
    }

    /// Prepend `rotation` (world space) to the current orientation.
    pub fn rotate_by(&mut self, rotation: Rotation) {
        self.orientation.rotate(rotation);
        self.orientation.normalize();
        self.debug_check_unit();
    }

    pub fn view_axis(&self) -> Vector3 {
        self.orientation.view_axis()
    }

    pub fn up_axis(&self) -> Vector3 {
        self.orientation.up_axis()
    }

    pub fn right_axis(&self) -> Vector3 {
        self.orientation.right_axis()
    }

    /// View matrix for camera-relative rendering: rotation only, since the
    /// camera sits at the origin of camera-relative space.
    pub fn view_matrix(&self) -> Transform4x4 {
        Transform4x4::view_matrix(self.orientation, Vector3::ZERO)
    }

    /// View matrix with the world translation folded in. The position is
    /// narrowed to f32 first, so this loses precision far from the origin.
    pub fn absolute_view_matrix(&self) -> Transform4x4 {
        Transform4x4::view_matrix(self.orientation, Vector3::from(self.position))
    }

    /// Offset from `camera` to this object, subtracted in f64 and then
    /// narrowed to f32.
    pub fn relative_position(&self, camera: &SceneObject) -> Vector3 {
        Vector3::from(self.position - camera.position)
    }

    /// Model matrix in camera-relative space: this object's orientation with
    /// a translation of `position - camera.position`.
    pub fn model_matrix(&self, camera: &SceneObject) -> Transform4x4 {
        Transform4x4::model_matrix(self.orientation, self.relative_position(camera))
    }

    /// One explicit Euler step.
    ///
    /// `velocity += accel * seconds`, then drag scales the velocity by
    /// `1 - resistance * seconds` (skipped when `resistance <= DELTA`), then
    /// `position += velocity * seconds`.
    pub fn accelerate(&mut self, accel: Vector3, seconds: f32, resistance: f32) {
        self.velocity += accel * seconds;
        if resistance > DELTA {
            self.velocity *= 1.0 - resistance * seconds;
        }
        self.position += DVec3::from(self.velocity) * seconds as f64;
    }

    fn debug_check_unit(&self) {
        debug_assert!(
            !self.orientation.is_finite() || self.orientation.is_unit(1e-4),
            "orientation drifted from unit length: {}",
            self.orientation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_is_identity_at_origin() {
        let object = SceneObject::default();
        assert_eq!(object.orientation(), Rotation::IDENTITY);
        assert_eq!(object.position(), DVec3::ZERO);
        assert_eq!(object.velocity(), Vector3::ZERO);
        assert_eq!(object.view_axis(), -Vector3::Z);
        assert_eq!(object.up_axis(), Vector3::Y);
        assert_eq!(object.right_axis(), Vector3::X);
    }

    #[test]
    fn test_set_orientation_normalizes() {
        let mut object = SceneObject::default();
        object.set_orientation(Rotation::new(0.0, 0.0, 2.0, 2.0));
        assert!(object.orientation().is_unit(1e-6));
        assert!(object.right_axis().approx_eq(Vector3::Y, 1e-6));
    }

    #[test]
    fn test_new_normalizes_orientation() {
        let object = SceneObject::new(DVec3::new(1.0, 2.0, 3.0), Rotation::new(0.0, 0.0, 0.0, 5.0));
        assert_eq!(object.orientation(), Rotation::IDENTITY);
        assert_eq!(object.position(), DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_huge_orientation_normalizes() {
        let object = SceneObject::new(DVec3::ZERO, Rotation::new(1e20, 1e20, 1e20, 1e20));
        assert!(object.orientation().is_unit(1e-6));
        assert!(object.orientation().approx_eq(Rotation::new(0.5, 0.5, 0.5, 0.5), 1e-6));
    }

    #[test]
    fn test_zero_orientation_is_nan() {
        let object = SceneObject::new(DVec3::ZERO, Rotation::new(0.0, 0.0, 0.0, 0.0));
        assert!(!object.orientation().is_finite());
    }

    #[test]
    fn test_tiny_orientation_normalizes() {
        let mut object = SceneObject::default();
        object.set_orientation(Rotation::new(0.0, 0.0, 0.0, 1e-7));
        assert!(object.orientation().approx_eq(Rotation::IDENTITY, 1e-6));
    }

    #[test]
    fn test_accelerate_from_rest() {
        let mut object = SceneObject::default();
        object.accelerate(Vector3::X, 1.0, 0.0);
        assert_eq!(object.velocity(), Vector3::X);
        assert_eq!(object.position(), DVec3::X);
    }

    #[test]
    fn test_accelerate_with_resistance() {
        let mut object = SceneObject::default();
        object.accelerate(Vector3::new(0.0, 10.0, 0.0), 0.5, 0.1);
        // v = 5 * (1 - 0.05), p = v * 0.5
        assert!((object.velocity().y - 4.75).abs() < 1e-5);
        assert!((object.position().y - 2.375).abs() < 1e-5);
    }

    #[test]
    fn test_coasting_keeps_velocity() {
        let mut object = SceneObject::default();
        object.set_velocity(Vector3::new(0.0, 0.0, -2.0));
        for _ in 0..4 {
            object.accelerate(Vector3::ZERO, 0.25, 0.0);
        }
        assert_eq!(object.velocity(), Vector3::new(0.0, 0.0, -2.0));
        assert!((object.position().z + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_turns_view_axis() {
        let mut object = SceneObject::default();
        object.rotate(Vector3::Y, FRAC_PI_2);
        assert!(object.view_axis().approx_eq(-Vector3::X, 1e-6));
        assert!(object.up_axis().approx_eq(Vector3::Y, 1e-6));
    }

    #[test]
    fn test_rotate_is_world_space() {
        let mut object = SceneObject::default();
        object.rotate(Vector3::Y, FRAC_PI_2);
        // The world X axis, not the object's rotated right axis.
        object.rotate(Vector3::X, FRAC_PI_2);
        let expected = Rotation::from_axis_angle(Vector3::X, FRAC_PI_2)
            * Rotation::from_axis_angle(Vector3::Y, FRAC_PI_2);
        assert!(object.orientation().approx_eq(expected, 1e-6));
    }

    #[test]
    fn test_many_small_rotations_stay_unit() {
        let mut object = SceneObject::default();
        let axis = Vector3::new(0.3, -0.8, 0.5).normalized();
        for _ in 0..10_000 {
            object.rotate(axis, 0.001);
        }
        assert!(object.orientation().is_unit(1e-5));
    }

    #[test]
    fn test_view_matrix_has_no_translation() {
        let mut camera = SceneObject::new(
            DVec3::new(1.0e6, -3.0e5, 42.0),
            Rotation::from_axis_angle(Vector3::Z, 0.4),
        );
        camera.set_velocity(Vector3::X);
        let view = camera.view_matrix();
        assert_eq!(view.translation(), Vector3::ZERO);
        assert!(view.is_orthonormal(1e-5));
    }

    #[test]
    fn test_absolute_view_matrix_maps_camera_to_origin() {
        let camera = SceneObject::new(
            DVec3::new(3.0, 4.0, 5.0),
            Rotation::from_axis_angle(Vector3::X, -0.7),
        );
        let eye = camera.absolute_view_matrix().transform_vector(Vector3::new(3.0, 4.0, 5.0));
        assert!(eye.approx_eq(Vector3::ZERO, 1e-5));
    }

    #[test]
    fn test_model_matrix_at_camera_position_has_zero_translation() {
        let camera = SceneObject::new(DVec3::new(7.5, -1.0, 2.0), Rotation::IDENTITY);
        let object = SceneObject::new(
            DVec3::new(7.5, -1.0, 2.0),
            Rotation::from_axis_angle(Vector3::Y, 1.0),
        );
        let model = object.model_matrix(&camera);
        assert_eq!(model.translation(), Vector3::ZERO);
        assert!(model.is_orthonormal(1e-5));
    }

    #[test]
    fn test_model_matrix_is_camera_relative() {
        let camera = SceneObject::new(DVec3::new(100.0, 0.0, 0.0), Rotation::IDENTITY);
        let object = SceneObject::new(DVec3::new(90.0, 5.0, 0.0), Rotation::IDENTITY);
        assert_eq!(object.relative_position(&camera), Vector3::new(-10.0, 5.0, 0.0));
        assert_eq!(object.model_matrix(&camera).translation(), Vector3::new(-10.0, 5.0, 0.0));
    }
}
