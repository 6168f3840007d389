//! Controller Events
//!
//! Observable outcomes accumulated during frame/step processing and
//! drained by the embedder with
//! [`Controller::take_events`](crate::controller::Controller::take_events).
//! Attack resolution (hit detection, damage) happens downstream of
//! [`ControllerEvent::AttackStruck`]; this crate only originates the
//! request and the hit-frame trigger.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;

/// Something the controller did that collaborators may react to.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ControllerEvent {
    /// A jump impulse fired.
    JumpExecuted {
        /// True when the jump came from the buffered-press path on a
        /// physics step, false when it fired synchronously inside the
        /// press handler.
        buffered: bool,
    },

    /// An in-progress ascent was cut short by a jump release.
    JumpCut {
        /// Vertical velocity after scaling
        scaled_velocity: f32,
    },

    /// The attack button was pressed; the combat/animation system should
    /// begin the attack.
    AttackRequested,

    /// The animation relay reached the attack's hit frame.
    AttackStruck {
        /// World-space attack origin, mirrored for the current facing
        origin: Vec2,
    },
}
