//! Jump State Machine
//!
//! Combines ground sensing, the timer bank and discrete press/release
//! events to decide whether and when a jump impulse fires, and whether an
//! in-progress ascent gets cut short.
//!
//! Coyote time forward-compensates a press arriving just after leaving a
//! platform edge; jump buffering forward-compensates a press arriving just
//! before landing. [`JumpStateMachine::execute`] is the single path that
//! fires an impulse and sets the jumping flag; the grounded-and-settled
//! refresh is the single path that clears it.

use serde::{Deserialize, Serialize};

use crate::controller::config::ControllerConfig;
use crate::controller::timers::TimerBank;
use crate::core::vec2::Vec2;
use crate::physics::PhysicsBody;

/// Tagged jump phase, computed each step from sensor + timer inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpPhase {
    /// Supported by ground
    Grounded,
    /// Airborne, but within the post-edge grace window
    CoyoteWindow,
    /// Airborne with no grace remaining
    Airborne,
    /// A jump impulse was applied and the body has not settled since
    Ascending,
}

/// Jump transition logic. Holds only the ascent flag; all tunables come
/// from the config and all timing from the [`TimerBank`].
#[derive(Clone, Debug, Default)]
pub struct JumpStateMachine {
    is_jumping: bool,
}

impl JumpStateMachine {
    /// Machine with no ascent in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// True from the instant an impulse is applied until the body is
    /// grounded again with settled vertical velocity.
    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    /// A jump may fire when supported by ground or inside the coyote
    /// window, and no ascent is already in progress.
    pub fn can_jump(&self, is_grounded: bool, timers: &TimerBank) -> bool {
        (is_grounded || timers.coyote_remaining() > 0.0) && !self.is_jumping
    }

    /// Compute the current phase. `Ascending` dominates the other states.
    pub fn phase(&self, is_grounded: bool, timers: &TimerBank) -> JumpPhase {
        if self.is_jumping {
            JumpPhase::Ascending
        } else if is_grounded {
            JumpPhase::Grounded
        } else if timers.coyote_remaining() > 0.0 {
            JumpPhase::CoyoteWindow
        } else {
            JumpPhase::Airborne
        }
    }

    /// Grounded-and-settled refresh. Runs before buffer processing each
    /// physics step; the only path that clears the jumping flag.
    pub fn refresh(
        &mut self,
        is_grounded: bool,
        body: &dyn PhysicsBody,
        config: &ControllerConfig,
    ) {
        if is_grounded && body.velocity().y <= config.settle_epsilon {
            self.is_jumping = false;
        }
    }

    /// Fire the jump impulse.
    ///
    /// Zeroes the vertical velocity component (so residual fall speed does
    /// not eat the impulse), applies an upward impulse of `jump_force`,
    /// zeroes both grace timers and marks the ascent. Every call site is
    /// gated by [`can_jump`](Self::can_jump).
    pub fn execute(
        &mut self,
        timers: &mut TimerBank,
        body: &mut dyn PhysicsBody,
        config: &ControllerConfig,
    ) {
        self.is_jumping = true;
        timers.clear_for_jump();

        let mut velocity = body.velocity();
        velocity.y = 0.0;
        body.set_velocity(velocity);
        body.apply_impulse(Vec2::new(0.0, config.jump_force));
    }

    /// Jump-release handler: shorten an ascent in progress.
    ///
    /// Scales positive vertical velocity by `jump_cut_multiplier` and
    /// returns the new value; a no-op (`None`) while descending or
    /// grounded.
    pub fn cut(&self, body: &mut dyn PhysicsBody, config: &ControllerConfig) -> Option<f32> {
        let mut velocity = body.velocity();
        if velocity.y > 0.0 {
            velocity.y *= config.jump_cut_multiplier;
            body.set_velocity(velocity);
            Some(velocity.y)
        } else {
            None
        }
    }
}
