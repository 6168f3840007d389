//! Shared primitives used across the controller.

pub mod vec2;
