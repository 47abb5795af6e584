//! MAGI Core - Foundational types for the MAGI effects runtime
//!
//! This crate provides the types every other MAGI crate depends on:
//! - `Color`, `Point` - drawing primitives shared by all effects
//! - `PerformanceTier`, `DeviceProfile`, `EffectBudget` - capability probing
//! - Error types and Result alias

mod error;
mod tier;
mod types;

pub use error::{MagiError, Result};
pub use tier::{DeviceProfile, EffectBudget, PerformanceTier};
pub use types::{Color, Point};
