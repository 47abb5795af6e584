//! MAGI Render - 2D canvas abstraction
//!
//! - `Canvas2d`: the drawing surface trait every effect paints onto
//! - `DrawCommand`: immediate-mode draw operations
//! - `DisplayList`: a canvas that records commands (headless hosts, tests)
//! - `CanvasElement` / `OffscreenSurface`: one-time transfer of a canvas to another thread

mod canvas;
mod command;
mod display_list;
mod element;

pub use canvas::Canvas2d;
pub use command::{DrawCommand, Glow, GradientStop};
pub use display_list::DisplayList;
pub use element::{BoxedCanvas, CanvasElement, OffscreenSurface};
