//! # Platformer Controller
//!
//! Single-entity 2D platformer locomotion and combat-trigger controller.
//! Turns continuous movement input and discrete jump/attack events into
//! physics-body velocity changes and facing state, while compensating for
//! human input timing imprecision (coyote time, jump buffering).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  PLATFORMER CONTROLLER                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Shared primitives                         │
//! │  └── vec2.rs     - 2D vector (f32)                           │
//! │                                                              │
//! │  physics/        - Injected capability seams                 │
//! │  ├── PhysicsBody - velocity get/set + impulse + position     │
//! │  ├── Body2d      - minimal integrating body (demo/tests)     │
//! │  ├── GroundQuery - region-overlap predicate                  │
//! │  └── AabbWorld   - static AABB set implementation            │
//! │                                                              │
//! │  input/          - Input source (replaces global singleton)  │
//! │  └── InputHub    - move axis + synchronous observer channel  │
//! │                                                              │
//! │  controller/     - The state machine                         │
//! │  ├── config.rs   - Immutable tunables, fail-fast validation  │
//! │  ├── timers.rs   - Coyote + jump-buffer countdowns           │
//! │  ├── ground.rs   - Per-step ground sensing                   │
//! │  ├── jump.rs     - Jump state machine (buffer, cut, coyote)  │
//! │  ├── movement.rs - Horizontal velocity driver                │
//! │  ├── facing.rs   - Sticky left/right orientation             │
//! │  ├── attack.rs   - Attack trigger + animation relay hook     │
//! │  └── events.rs   - Observable controller outcomes            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Update Model
//!
//! Single-threaded and frame-driven. Two update rates:
//!
//! - **Variable-rate** ([`Controller::frame_update`]): timer decay and
//!   facing, driven by elapsed wall time per frame.
//! - **Fixed-rate** ([`Controller::physics_step`]): ground sensing, jump
//!   state refresh, buffered-jump processing, movement application, in
//!   exactly that order.
//!
//! Discrete input events are delivered synchronously by [`input::InputHub`];
//! a jump press with the jump window open fires its impulse inside the
//! handler, otherwise it only arms the buffer timer.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod controller;
pub mod core;
pub mod input;
pub mod physics;

// Re-export commonly used types
pub use self::controller::attack::AttackVfxRelay;
pub use self::controller::config::{ConfigError, ControllerConfig};
pub use self::controller::events::ControllerEvent;
pub use self::controller::jump::JumpPhase;
pub use self::controller::Controller;
pub use self::core::vec2::Vec2;
pub use self::input::{InputEvent, InputHub, InputListener, SubscriberId};
pub use self::physics::{AabbWorld, Body2d, GroundFilter, GroundQuery, PhysicsBody};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed physics step rate (Hz)
pub const PHYSICS_TICK_RATE: u32 = 60;

/// Fixed physics step duration in seconds
pub const PHYSICS_STEP_SECONDS: f32 = 1.0 / 60.0;
