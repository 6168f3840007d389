//! Facing State
//!
//! Sticky left/right orientation derived from horizontal input sign.
//! Zero input leaves facing unchanged. Dependent local offsets (the
//! attack-origin anchor) are mirrored by negating their horizontal
//! component while facing left.

use crate::core::vec2::Vec2;

/// Left/right orientation flag. Starts facing right.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FacingState {
    facing_left: bool,
}

impl FacingState {
    /// Facing right.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip on a signed input, sticky on zero.
    pub fn update(&mut self, horizontal_input: f32) {
        if horizontal_input < 0.0 && !self.facing_left {
            self.facing_left = true;
        } else if horizontal_input > 0.0 && self.facing_left {
            self.facing_left = false;
        }
    }

    /// Current orientation. Exposed so the rendering collaborator can
    /// mirror the sprite.
    pub fn is_facing_left(&self) -> bool {
        self.facing_left
    }

    /// Mirror a local offset for the current orientation.
    pub fn mirror(&self, offset: Vec2) -> Vec2 {
        if self.facing_left {
            offset.mirror_x()
        } else {
            offset
        }
    }
}
