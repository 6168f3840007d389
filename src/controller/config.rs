//! Controller Configuration
//!
//! All tunables are supplied at construction and immutable thereafter.
//! Malformed values are a construction-time contract violation and are
//! rejected eagerly by [`ControllerConfig::validate`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::vec2::Vec2;
use crate::physics::GroundFilter;

/// Configuration error (fail fast, construction time).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A tunable that must be finite and non-negative was not.
    #[error("{field} must be finite and non-negative (got {value})")]
    InvalidTunable {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: f32,
    },

    /// `jump_cut_multiplier` outside `[0, 1]`.
    #[error("jump_cut_multiplier must be within [0, 1] (got {0})")]
    CutMultiplierOutOfRange(f32),

    /// Ground-check region with a non-positive half-extent.
    #[error("ground_check_half_extents must be positive on both axes (got {0:?})")]
    DegenerateGroundRegion(Vec2),

    /// A configured offset with a non-finite component.
    #[error("{field} must have finite components (got {value:?})")]
    InvalidOffset {
        /// Name of the offending field
        field: &'static str,
        /// Supplied value
        value: Vec2,
    },
}

/// Immutable locomotion and combat-trigger tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Horizontal speed at full axis deflection (units/s)
    pub move_speed: f32,

    /// Upward impulse magnitude applied on jump (units/s, unit mass)
    pub jump_force: f32,

    /// Vertical velocity multiplier applied when jump is released
    /// mid-ascent (variable jump height). Must be within `[0, 1]`.
    pub jump_cut_multiplier: f32,

    /// Grace window after leaving ground during which a jump is still
    /// permitted (seconds)
    pub coyote_time: f32,

    /// Grace window during which an early jump press is remembered and
    /// honored on landing (seconds)
    pub jump_buffer_time: f32,

    /// Ground-check region center, as an offset from the body position
    pub ground_check_offset: Vec2,

    /// Ground-check region half-extents (both components > 0)
    pub ground_check_half_extents: Vec2,

    /// Which surfaces count as ground
    pub ground_filter: GroundFilter,

    /// Attack origin anchor, as an offset from the body position.
    /// Mirrored horizontally when facing left.
    pub attack_origin_offset: Vec2,

    /// Attack reach from the attack origin (units)
    pub attack_range: f32,

    /// Vertical velocities at or below this magnitude count as settled
    /// when clearing the jumping flag on landing
    pub settle_epsilon: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            jump_force: 12.8,
            jump_cut_multiplier: 0.5,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            ground_check_offset: Vec2::new(0.0, -0.5),
            ground_check_half_extents: Vec2::new(0.4, 0.1),
            ground_filter: GroundFilter::GROUND,
            attack_origin_offset: Vec2::new(0.6, 0.2),
            attack_range: 0.5,
            settle_epsilon: 0.01,
        }
    }
}

impl ControllerConfig {
    /// Validate every tunable. Called by
    /// [`Controller::new`](crate::controller::Controller::new).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("move_speed", self.move_speed),
            ("jump_force", self.jump_force),
            ("coyote_time", self.coyote_time),
            ("jump_buffer_time", self.jump_buffer_time),
            ("attack_range", self.attack_range),
            ("settle_epsilon", self.settle_epsilon),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTunable { field, value });
            }
        }

        if !self.jump_cut_multiplier.is_finite()
            || !(0.0..=1.0).contains(&self.jump_cut_multiplier)
        {
            return Err(ConfigError::CutMultiplierOutOfRange(
                self.jump_cut_multiplier,
            ));
        }

        if !self.ground_check_half_extents.is_finite()
            || self.ground_check_half_extents.x <= 0.0
            || self.ground_check_half_extents.y <= 0.0
        {
            return Err(ConfigError::DegenerateGroundRegion(
                self.ground_check_half_extents,
            ));
        }

        for (field, value) in [
            ("ground_check_offset", self.ground_check_offset),
            ("attack_origin_offset", self.attack_origin_offset),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidOffset { field, value });
            }
        }

        Ok(())
    }
}
