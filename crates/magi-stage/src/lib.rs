//! MAGI Stage - wires every effect into one page runtime
//!
//! - `StageConfig`: layered configuration (global < project < env vars)
//! - `BootSequence`: boot overlay timeline
//! - `Stage`: owns the scheduler, matrix engine, particles and effects, and
//!   routes page events to them

pub mod boot;
pub mod config;
pub mod stage;

pub use boot::{BootPhase, BootSequence};
pub use config::StageConfig;
pub use stage::{FrameReport, Stage, StageReport};
