//! Six-degrees-of-freedom camera flight over a planet.
//!
//! Arrow-key style yaw/pitch/roll about the camera's own axes, thrust along
//! view/right and the local vertical, a boost modifier, full stop, linear
//! drag, and a spherical ground the camera cannot pass through.

use glam::DVec3;
use sky_config::FlightConfig;
use sky_math::{DELTA, Vector3};

use crate::SceneObject;

/// Controls held during one frame. Window/input backends map their keys onto
/// this; the flight model never sees key codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlightInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    /// Thrust away from the planet center.
    pub ascend: bool,
    /// Thrust toward the planet center.
    pub descend: bool,
    pub boost: bool,
    /// Kill all velocity. Overrides every thrust control.
    pub full_stop: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub roll_left: bool,
    pub roll_right: bool,
}

/// Applies [`FlightInput`] to a [`SceneObject`] using the tuning in
/// [`FlightConfig`].
#[derive(Clone, Debug, Default)]
pub struct FlightController {
    config: FlightConfig,
}

impl FlightController {
    pub fn new(config: FlightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlightConfig {
        &self.config
    }

    /// Advance `object` by one frame of `seconds`. Orientation changes first,
    /// so thrust uses the new axes.
    ///
    /// Returns `true` when the object hit the ground this frame.
    pub fn apply(&self, object: &mut SceneObject, input: &FlightInput, seconds: f32) -> bool {
        self.orient(object, input, seconds);

        if input.full_stop {
            object.set_velocity(Vector3::ZERO);
            return false;
        }

        let accel = self.thrust(object, input);
        object.accelerate(accel, seconds, self.config.resistance);
        self.resolve_ground(object)
    }

    fn orient(&self, object: &mut SceneObject, input: &FlightInput, seconds: f32) {
        let step = seconds * self.config.radians_per_second;

        // Yaw about the current up axis
        if input.yaw_right {
            object.rotate(object.up_axis(), -step);
        }
        if input.yaw_left {
            object.rotate(object.up_axis(), step);
        }

        // Pitch about the current right axis
        if input.pitch_down {
            object.rotate(object.right_axis(), -step);
        }
        if input.pitch_up {
            object.rotate(object.right_axis(), step);
        }

        // Roll about the view axis
        if input.roll_left {
            object.rotate(object.view_axis(), -step);
        }
        if input.roll_right {
            object.rotate(object.view_axis(), step);
        }
    }

    fn thrust(&self, object: &SceneObject, input: &FlightInput) -> Vector3 {
        let mut thrust = self.config.thrust;
        if input.boost {
            thrust *= self.config.boost_multiplier;
        }

        let mut accel = Vector3::ZERO;
        if input.forward {
            accel += object.view_axis() * thrust;
        }
        if input.backward {
            accel -= object.view_axis() * thrust;
        }
        if input.right {
            accel += object.right_axis() * thrust;
        }
        if input.left {
            accel -= object.right_axis() * thrust;
        }

        // "Up" is away from the planet center, not the camera's up axis.
        if input.ascend || input.descend {
            let position = object.position();
            if position != DVec3::ZERO {
                let vertical = Vector3::from(position.normalize());
                if input.ascend {
                    accel += vertical * thrust;
                }
                if input.descend {
                    accel -= vertical * thrust;
                }
            }
        }
        accel
    }

    /// Push `object` back out to the ground sphere and reflect its velocity.
    fn resolve_ground(&self, object: &mut SceneObject) -> bool {
        let radius = self.config.ground_radius;
        let position = object.position();
        let distance = position.length();
        if distance >= radius {
            return false;
        }

        let direction = if distance > 0.0 {
            position / distance
        } else {
            DVec3::from(object.up_axis())
        };
        let pushed = direction * (radius * (1.0 + DELTA as f64));
        object.set_position(pushed);
        object.set_velocity(-object.velocity());
        tracing::debug!(
            depth = radius - distance,
            x = pushed.x,
            y = pushed.y,
            z = pushed.z,
            "camera hit the ground, pushed back out"
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sky_math::Rotation;

    fn controller() -> FlightController {
        FlightController::new(FlightConfig {
            resistance: 0.0,
            ..FlightConfig::default()
        })
    }

    /// Facing -Z, well above a radius-10 ground.
    fn camera() -> SceneObject {
        SceneObject::new(DVec3::new(0.0, 50.0, 0.0), Rotation::IDENTITY)
    }

    #[test]
    fn test_no_input_coasts() {
        let mut object = camera();
        object.set_velocity(Vector3::new(1.0, 0.0, 0.0));
        let hit = controller().apply(&mut object, &FlightInput::default(), 1.0);
        assert!(!hit);
        assert_eq!(object.velocity(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(object.position(), DVec3::new(1.0, 50.0, 0.0));
        assert_eq!(object.orientation(), Rotation::IDENTITY);
    }

    #[test]
    fn test_forward_thrust_follows_view_axis() {
        let mut object = camera();
        let input = FlightInput {
            forward: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 0.5);
        assert!(object.velocity().approx_eq(Vector3::new(0.0, 0.0, -0.5), 1e-6));
    }

    #[test]
    fn test_boost_multiplies_thrust() {
        let mut object = camera();
        let input = FlightInput {
            right: true,
            boost: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 1.0);
        assert!(object.velocity().approx_eq(Vector3::new(10.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_opposite_controls_cancel() {
        let mut object = camera();
        let input = FlightInput {
            forward: true,
            backward: true,
            left: true,
            right: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 1.0);
        assert!(object.velocity().approx_eq(Vector3::ZERO, 1e-6));
    }

    #[test]
    fn test_ascend_is_radial() {
        let mut object = SceneObject::new(DVec3::new(30.0, 0.0, 40.0), Rotation::IDENTITY);
        let input = FlightInput {
            ascend: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 1.0);
        assert!(object.velocity().approx_eq(Vector3::new(0.6, 0.0, 0.8), 1e-6));
    }

    #[test]
    fn test_vertical_thrust_at_origin_is_skipped() {
        let controller = FlightController::new(FlightConfig {
            ground_radius: 0.0,
            resistance: 0.0,
            ..FlightConfig::default()
        });
        let mut object = SceneObject::default();
        let input = FlightInput {
            ascend: true,
            ..Default::default()
        };
        controller.apply(&mut object, &input, 1.0);
        assert_eq!(object.velocity(), Vector3::ZERO);
    }

    #[test]
    fn test_full_stop_overrides_thrust() {
        let mut object = camera();
        object.set_velocity(Vector3::new(3.0, -2.0, 1.0));
        let input = FlightInput {
            full_stop: true,
            forward: true,
            boost: true,
            ..Default::default()
        };
        let hit = controller().apply(&mut object, &input, 1.0);
        assert!(!hit);
        assert_eq!(object.velocity(), Vector3::ZERO);
        assert_eq!(object.position(), DVec3::new(0.0, 50.0, 0.0));
    }

    #[test]
    fn test_resistance_slows_coasting() {
        let controller = FlightController::new(FlightConfig::default());
        let mut object = camera();
        object.set_velocity(Vector3::new(0.0, 0.0, -4.0));
        controller.apply(&mut object, &FlightInput::default(), 1.0);
        // Default drag removes 10% per second.
        assert!((object.velocity().z + 3.6).abs() < 1e-5);
    }

    #[test]
    fn test_yaw_right_turns_view_right() {
        let mut object = camera();
        let input = FlightInput {
            yaw_right: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 0.1);
        let view = object.view_axis();
        assert!(view.x > 0.0);
        assert!(view.z < 0.0);
        assert!(object.up_axis().approx_eq(Vector3::Y, 1e-6));
    }

    #[test]
    fn test_pitch_down_lowers_view() {
        let mut object = camera();
        let input = FlightInput {
            pitch_down: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 0.1);
        assert!(object.view_axis().y < 0.0);
        assert!(object.right_axis().approx_eq(Vector3::X, 1e-6));
    }

    #[test]
    fn test_roll_right_tilts_up_axis_right() {
        let mut object = camera();
        let input = FlightInput {
            roll_right: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 0.1);
        assert!(object.up_axis().x > 0.0);
        assert!(object.view_axis().approx_eq(-Vector3::Z, 1e-6));
    }

    #[test]
    fn test_opposite_turns_cancel() {
        let mut object = camera();
        let input = FlightInput {
            yaw_left: true,
            yaw_right: true,
            ..Default::default()
        };
        controller().apply(&mut object, &input, 0.25);
        assert!(object.orientation().approx_eq(Rotation::IDENTITY, 1e-6));
    }

    #[test]
    fn test_ground_collision_pushes_out_and_reflects() {
        let mut object = SceneObject::new(DVec3::new(0.0, 10.5, 0.0), Rotation::IDENTITY);
        object.set_velocity(Vector3::new(0.0, -1.0, 0.0));
        let hit = controller().apply(&mut object, &FlightInput::default(), 1.0);
        assert!(hit);
        let expected = 10.0 * (1.0 + DELTA as f64);
        assert!((object.position().y - expected).abs() < 1e-9);
        assert_eq!(object.position().x, 0.0);
        assert_eq!(object.velocity(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_ground_at_origin_uses_up_axis() {
        let mut object = SceneObject::default();
        let hit = controller().apply(&mut object, &FlightInput::default(), 0.1);
        assert!(hit);
        assert!(object.position().y > 10.0);
        assert!(object.position().x.abs() < 1e-12);
    }
}
