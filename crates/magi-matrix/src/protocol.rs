//! Messages between the page and the matrix worker

use crossbeam::channel::Sender;
use magi_core::Color;
use magi_render::OffscreenSurface;
use serde::Serialize;
use std::fmt;

/// Everything the page can tell the worker. The worker shares no state with
/// the page; `Init` moves the surface in by value.
pub enum MatrixMessage {
    Init {
        surface: OffscreenSurface,
        /// Viewport size in CSS pixels
        width: u32,
        height: u32,
        dpr: f32,
        font_size: f32,
        color: Color,
        is_light_mode: bool,
    },
    Start,
    Stop,
    Resize {
        width: u32,
        height: u32,
    },
    UpdateColor {
        color: Color,
    },
    UpdateMode {
        is_light_mode: bool,
        is_lcl_mode: bool,
    },
    /// Ask for a snapshot of the worker's state
    Report {
        reply: Sender<MatrixReport>,
    },
    Shutdown,
}

impl MatrixMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            MatrixMessage::Init { .. } => "init",
            MatrixMessage::Start => "start",
            MatrixMessage::Stop => "stop",
            MatrixMessage::Resize { .. } => "resize",
            MatrixMessage::UpdateColor { .. } => "updateColor",
            MatrixMessage::UpdateMode { .. } => "updateMode",
            MatrixMessage::Report { .. } => "report",
            MatrixMessage::Shutdown => "shutdown",
        }
    }
}

impl fmt::Debug for MatrixMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixMessage::Init {
                surface,
                width,
                height,
                ..
            } => write!(f, "Init({} {}x{})", surface.origin(), width, height),
            MatrixMessage::Resize { width, height } => write!(f, "Resize({}x{})", width, height),
            MatrixMessage::UpdateColor { color } => write!(f, "UpdateColor({})", color),
            MatrixMessage::UpdateMode {
                is_light_mode,
                is_lcl_mode,
            } => write!(f, "UpdateMode(light={}, lcl={})", is_light_mode, is_lcl_mode),
            other => f.write_str(other.kind()),
        }
    }
}

/// Snapshot of the renderer, from either host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixReport {
    pub initialized: bool,
    pub running: bool,
    pub frames_drawn: u64,
    pub columns: usize,
    pub width: u32,
    pub height: u32,
    pub color: Color,
    pub is_light_mode: bool,
    pub is_lcl_mode: bool,
}
