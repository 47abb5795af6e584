//! MAGI Particles - pooled ambient particle layer
//!
//! Provides a fixed pool of styled particle elements with:
//! - Creation once at startup, restyling afterwards (no allocation per particle)
//! - Randomized "bit" and "bubble" looks with depth-based opacity, scale and blur
//! - A timer-driven recycle sweep that slows down while the page is hidden

pub mod particle;
pub mod system;

pub use particle::{Length, ParticleElement, ParticleKind, ParticlePool, ParticleSlot, ParticleStyle};
pub use system::{ParticleSystem, ParticleTimer, SweepReport};
