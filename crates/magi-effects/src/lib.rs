//! MAGI Effects - secondary animated surfaces
//!
//! Every effect owns its canvas and draws only to it. `HoloWave`,
//! `SonicWave` and `CursorTrail` are [`magi_runtime::RenderTask`]s for the
//! shared scheduler; `LclField` runs its own gated loop, and `GlitchText`
//! is stepped by a timer.

pub mod cursor;
pub mod glitch;
pub mod holo;
pub mod lcl;
pub mod sonic;

pub use cursor::CursorTrail;
pub use glitch::{GlitchText, GLITCH_CHARS, GLITCH_STEP_MS};
pub use holo::HoloWave;
pub use lcl::{Bubble, LclField, LclFrame};
pub use sonic::{SonicWave, WaveState};
