//! Physics Capability Seams
//!
//! The controller never talks to a concrete physics engine. It is handed
//! two capability objects at construction:
//!
//! - [`PhysicsBody`]: read/write the body's current velocity, apply an
//!   impulse, and read its position (needed to place the ground-check
//!   region and the attack origin).
//! - [`GroundQuery`]: a region-overlap predicate filtered by ground
//!   classification. Only the boolean result is consumed.
//!
//! [`Body2d`] and [`AabbWorld`] are the minimal implementations shipped
//! for the demo binary and for tests.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;

// =============================================================================
// GROUND CLASSIFICATION
// =============================================================================

bitflags::bitflags! {
    /// Layer-mask-style classification for ground overlap queries.
    ///
    /// A query matches a surface when the two masks intersect.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct GroundFilter: u32 {
        /// Solid terrain
        const GROUND = 1 << 0;
        /// One-way / moving platforms
        const PLATFORM = 1 << 1;
    }
}

impl Default for GroundFilter {
    fn default() -> Self {
        GroundFilter::GROUND
    }
}

impl Serialize for GroundFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for GroundFilter {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(GroundFilter::from_bits_truncate(bits))
    }
}

// =============================================================================
// CAPABILITY TRAITS
// =============================================================================

/// Injected physics-body capability.
///
/// The controller performs read-modify-write on the body's velocity every
/// physics step and applies an upward impulse when a jump fires. It never
/// integrates positions itself.
pub trait PhysicsBody {
    /// Current world-space position of the body.
    fn position(&self) -> Vec2;

    /// Current velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrite the velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Apply an instantaneous impulse (unit mass: added to velocity).
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Injected ground-overlap query capability.
pub trait GroundQuery {
    /// True when any surface matching `filter` overlaps the axis-aligned
    /// region described by `center` and `half_extents`.
    fn overlaps(&self, center: Vec2, half_extents: Vec2, filter: GroundFilter) -> bool;
}

// =============================================================================
// BODY2D
// =============================================================================

/// Minimal integrating 2D body.
///
/// Semi-implicit Euler with constant downward gravity. Used by the demo
/// binary and as the fake body in tests; a real embedding injects its own
/// engine body behind [`PhysicsBody`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Body2d {
    position: Vec2,
    velocity: Vec2,
    gravity: f32,
}

impl Body2d {
    /// Create a body at rest at `position` with downward gravity
    /// `gravity` (units/s², positive = pulls down).
    pub fn new(position: Vec2, gravity: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            gravity,
        }
    }

    /// Advance the body by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.velocity.y -= self.gravity * dt;
        self.position = self.position + self.velocity * dt;
    }

    /// Land the body on a surface at height `y`: snap position and zero
    /// any downward velocity.
    pub fn land_at(&mut self, y: f32) {
        self.position.y = y;
        if self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
    }
}

impl PhysicsBody for Body2d {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        self.velocity = self.velocity + impulse;
    }
}

// =============================================================================
// AABB WORLD
// =============================================================================

/// One static axis-aligned box with a classification mask.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Aabb {
    /// Box center
    pub center: Vec2,
    /// Box half-extents (both components > 0)
    pub half_extents: Vec2,
    /// Classification of this surface
    pub filter: GroundFilter,
}

impl Aabb {
    /// AABB-vs-AABB overlap test.
    fn intersects(&self, center: Vec2, half_extents: Vec2) -> bool {
        (self.center.x - center.x).abs() <= self.half_extents.x + half_extents.x
            && (self.center.y - center.y).abs() <= self.half_extents.y + half_extents.y
    }
}

/// Static set of classified AABBs implementing [`GroundQuery`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AabbWorld {
    boxes: Vec<Aabb>,
}

impl AabbWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a classified box.
    pub fn add_box(&mut self, center: Vec2, half_extents: Vec2, filter: GroundFilter) {
        self.boxes.push(Aabb {
            center,
            half_extents,
            filter,
        });
    }
}

impl GroundQuery for AabbWorld {
    fn overlaps(&self, center: Vec2, half_extents: Vec2, filter: GroundFilter) -> bool {
        self.boxes
            .iter()
            .any(|b| b.filter.intersects(filter) && b.intersects(center, half_extents))
    }
}
