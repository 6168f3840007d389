//! Timer Bank
//!
//! The two input-forgiveness countdowns: coyote time and jump buffer.
//! Both are bounded, reset-to-full (never accumulated) and clamped at
//! zero, so grace windows cannot stack across airborne excursions.

use serde::{Deserialize, Serialize};

/// Coyote and jump-buffer countdown timers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerBank {
    coyote: f32,
    jump_buffer: f32,
}

impl TimerBank {
    /// Both timers expired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decay both timers by one frame's elapsed time.
    ///
    /// While grounded the coyote timer is pinned at `coyote_time`; it only
    /// counts down once airborne. The jump buffer decays unconditionally.
    pub fn advance(&mut self, dt: f32, is_grounded: bool, coyote_time: f32) {
        let dt = dt.max(0.0);
        if is_grounded {
            self.coyote = coyote_time;
        } else {
            self.coyote = (self.coyote - dt).max(0.0);
        }
        self.jump_buffer = (self.jump_buffer - dt).max(0.0);
    }

    /// Arm the jump buffer to its full duration (on jump press).
    pub fn arm_buffer(&mut self, jump_buffer_time: f32) {
        self.jump_buffer = jump_buffer_time;
    }

    /// Zero both timers. Called exactly once per executed jump so a single
    /// buffered request can never trigger twice.
    pub fn clear_for_jump(&mut self) {
        self.coyote = 0.0;
        self.jump_buffer = 0.0;
    }

    /// Seconds remaining in which a jump is still permitted after leaving
    /// the ground.
    pub fn coyote_remaining(&self) -> f32 {
        self.coyote
    }

    /// Seconds remaining in which a buffered jump press is still honorable.
    pub fn buffer_remaining(&self) -> f32 {
        self.jump_buffer
    }
}
