//! Movement Driver
//!
//! Converts continuous horizontal input into target horizontal velocity
//! every physics step. Direct velocity assignment with no smoothing or
//! acceleration curve: instantaneous response, a documented
//! simplification rather than a bug.

use crate::controller::config::ControllerConfig;
use crate::physics::PhysicsBody;

/// Horizontal velocity driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct MovementDriver;

impl MovementDriver {
    /// Set horizontal velocity to `axis * move_speed`, leaving the
    /// vertical component untouched. The axis is clamped to `[-1, 1]`;
    /// non-finite input reads as released.
    pub fn apply(&self, axis: f32, body: &mut dyn PhysicsBody, config: &ControllerConfig) {
        let axis = if axis.is_finite() {
            axis.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let mut velocity = body.velocity();
        velocity.x = axis * config.move_speed;
        body.set_velocity(velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::physics::Body2d;

    #[test]
    fn test_full_deflection_sets_exact_speed() {
        let config = ControllerConfig {
            move_speed: 6.0,
            ..Default::default()
        };
        let mut body = Body2d::new(Vec2::ZERO, 0.0);
        body.set_velocity(Vec2::new(0.0, -2.5));

        MovementDriver.apply(1.0, &mut body, &config);
        assert_eq!(body.velocity(), Vec2::new(6.0, -2.5));

        MovementDriver.apply(-1.0, &mut body, &config);
        assert_eq!(body.velocity(), Vec2::new(-6.0, -2.5));
    }

    #[test]
    fn test_axis_clamped_and_sanitized() {
        let config = ControllerConfig {
            move_speed: 4.0,
            ..Default::default()
        };
        let mut body = Body2d::new(Vec2::ZERO, 0.0);

        MovementDriver.apply(3.0, &mut body, &config);
        assert_eq!(body.velocity().x, 4.0);

        MovementDriver.apply(f32::NAN, &mut body, &config);
        assert_eq!(body.velocity().x, 0.0);
    }

    #[test]
    fn test_zero_input_stops_immediately() {
        let config = ControllerConfig::default();
        let mut body = Body2d::new(Vec2::ZERO, 0.0);
        body.set_velocity(Vec2::new(5.0, 1.0));

        MovementDriver.apply(0.0, &mut body, &config);
        assert_eq!(body.velocity(), Vec2::new(0.0, 1.0));
    }
}
