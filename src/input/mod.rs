//! Input Source
//!
//! Replaces the ambient global input singleton with an explicitly
//! constructed hub that is handed to the controller at enable time.
//!
//! The hub carries two kinds of input:
//!
//! - a continuous **move axis** in `[-1, 1]`, sampled on demand;
//! - discrete **events** (jump press/release, attack press) delivered
//!   synchronously to registered listeners at the moment they are
//!   published. No queuing: a handler runs on the calling thread inside
//!   [`InputHub::publish`].
//!
//! Subscriptions use registration tokens so subscribe/unsubscribe is
//! idempotent; listeners are held weakly, so a dropped listener is pruned
//! rather than called stale.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Discrete input event (parameterless notification).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Jump button went down this instant
    JumpPressed,
    /// Jump button was released
    JumpReleased,
    /// Attack button went down this instant
    AttackPressed,
}

/// Receiver of discrete input events.
pub trait InputListener {
    /// Handle one event. Runs synchronously inside [`InputHub::publish`].
    fn on_input(&mut self, event: InputEvent);
}

/// Registration token returned by [`InputHub::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriberId(u64);

/// Explicitly constructed input source.
pub struct InputHub {
    move_axis: f32,
    jump_held: bool,
    next_id: u64,
    listeners: Vec<(SubscriberId, Weak<RefCell<dyn InputListener>>)>,
}

impl InputHub {
    /// Create a hub with no listeners and a centered move axis.
    pub fn new() -> Self {
        Self {
            move_axis: 0.0,
            jump_held: false,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Current move axis in `[-1, 1]`.
    pub fn move_axis(&self) -> f32 {
        self.move_axis
    }

    /// Set the move axis. Clamped to `[-1, 1]`; non-finite input is
    /// treated as released (0).
    pub fn set_move_axis(&mut self, value: f32) {
        self.move_axis = if value.is_finite() {
            value.clamp(-1.0, 1.0)
        } else {
            0.0
        };
    }

    /// Whether the jump button is currently held (tracked from
    /// press/release events).
    pub fn jump_held(&self) -> bool {
        self.jump_held
    }

    /// Register a listener. Returns the token needed to unsubscribe.
    pub fn subscribe(&mut self, listener: Weak<RefCell<dyn InputListener>>) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Remove a listener by token. Unknown or already-removed tokens are
    /// a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.listeners.retain(|(sid, _)| *sid != id);
    }

    /// Number of live registrations.
    pub fn subscriber_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|(_, l)| l.strong_count() > 0)
            .count()
    }

    /// Deliver one event to every live listener, in subscription order.
    ///
    /// Handlers execute synchronously on the calling thread. Dead
    /// listeners are pruned before delivery.
    pub fn publish(&mut self, event: InputEvent) {
        match event {
            InputEvent::JumpPressed => self.jump_held = true,
            InputEvent::JumpReleased => self.jump_held = false,
            InputEvent::AttackPressed => {}
        }

        self.listeners.retain(|(_, l)| l.strong_count() > 0);

        // Upgrade first so a handler dropping another listener mid-delivery
        // cannot invalidate the iteration.
        let live: Vec<Rc<RefCell<dyn InputListener>>> = self
            .listeners
            .iter()
            .filter_map(|(_, l)| l.upgrade())
            .collect();

        for listener in live {
            listener.borrow_mut().on_input(event);
        }
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}
