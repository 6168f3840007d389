//! Ground Sensor
//!
//! Samples the ground-overlap query once per physics step. The cached
//! boolean is the only grounding truth for that step; nothing infers
//! groundedness mid-step.

use crate::controller::config::ControllerConfig;
use crate::physics::{GroundQuery, PhysicsBody};

/// Per-step ground sensing with a cached result.
#[derive(Clone, Debug, Default)]
pub struct GroundSensor {
    is_grounded: bool,
}

impl GroundSensor {
    /// Sensor that has not sampled yet (reads as airborne).
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the overlap test for this step and cache the result.
    ///
    /// Must be the first thing a physics step does; every later stage of
    /// the step consumes the cached value.
    pub fn sample(
        &mut self,
        body: &dyn PhysicsBody,
        query: &dyn GroundQuery,
        config: &ControllerConfig,
    ) -> bool {
        let center = body.position() + config.ground_check_offset;
        self.is_grounded = query.overlaps(
            center,
            config.ground_check_half_extents,
            config.ground_filter,
        );
        self.is_grounded
    }

    /// Result of the most recent sample.
    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }
}
