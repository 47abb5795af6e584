//! MAGI Matrix - falling glyph background
//!
//! One draw algorithm, two hosts:
//! - a worker thread that owns the canvas outright and paces itself, fed
//!   only by [`MatrixMessage`]s
//! - a main-thread task registered with the frame scheduler when the
//!   canvas cannot leave the page
//!
//! [`MatrixRainEngine`] picks one at startup and never switches.

pub mod engine;
pub mod fallback;
pub mod protocol;
pub mod state;
pub mod worker;

pub use engine::{Capabilities, MatrixOptions, MatrixRainEngine, TASK_NAME};
pub use fallback::FallbackRenderer;
pub use protocol::{MatrixMessage, MatrixReport};
pub use state::{MatrixState, DEFAULT_FONT_SIZE, GLYPHS};
pub use worker::{ThreadSpawner, WorkerHandle, WorkerSpawner, WORKER_FPS};
