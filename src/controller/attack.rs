//! Attack Trigger
//!
//! Converts the discrete attack-press event into a "begin attack" request
//! and exposes the hit-frame trigger the animation/VFX relay calls back
//! into. No hit detection, damage or effect-window timing lives here.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::controller::events::ControllerEvent;
use crate::controller::Controller;
use crate::core::vec2::Vec2;

/// Stateless pass-through from input press to attack request, and from
/// the animation hit frame to the strike notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackTrigger;

impl AttackTrigger {
    /// Event for the attack-press: ask the combat/animation system to
    /// begin an attack.
    pub fn request(&self) -> ControllerEvent {
        ControllerEvent::AttackRequested
    }

    /// Event for the animation's designated hit frame, carrying the
    /// facing-mirrored world-space attack origin.
    pub fn strike(&self, origin: Vec2) -> ControllerEvent {
        ControllerEvent::AttackStruck { origin }
    }
}

/// Animation/VFX-side relay.
///
/// The animation system holds one of these and calls
/// [`relay_execute_attack`](Self::relay_execute_attack) at the designated
/// hit frame; it forwards to the controller's
/// [`execute_attack`](Controller::execute_attack). Holds the controller
/// weakly so a destroyed character is a no-op, not a fault.
pub struct AttackVfxRelay {
    controller: Weak<RefCell<Controller>>,
}

impl AttackVfxRelay {
    /// Create a relay bound to `controller`.
    pub fn new(controller: &Rc<RefCell<Controller>>) -> Self {
        Self {
            controller: Rc::downgrade(controller),
        }
    }

    /// Forward the hit-frame callback to the controller.
    pub fn relay_execute_attack(&self) {
        if let Some(controller) = self.controller.upgrade() {
            controller.borrow_mut().execute_attack();
        }
    }
}
