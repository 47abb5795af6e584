//! Draw command types

use magi_core::{Color, Point};

/// Shadow/glow applied to a glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    pub radius: f32,
    pub color: Color,
}

impl Glow {
    pub const NONE: Self = Self {
        radius: 0.0,
        color: Color::TRANSPARENT,
    };

    pub const fn new(radius: f32, color: Color) -> Self {
        Self { radius, color }
    }
}

/// A color stop of a linear gradient, `offset` in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Color,
}

/// 2D draw command issued by effects each frame (immediate mode)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect {
        x: f32, y: f32, w: f32, h: f32,
    },
    FillRect {
        x: f32, y: f32, w: f32, h: f32,
        color: Color,
    },
    /// Vertical linear gradient filling a rectangle
    FillGradient {
        x: f32, y: f32, w: f32, h: f32,
        stops: Vec<GradientStop>,
    },
    Glyph {
        x: f32, y: f32,
        glyph: char,
        size: f32,
        color: Color,
        glow: Glow,
    },
    StrokePath {
        points: Vec<Point>,
        color: Color,
        width: f32,
        alpha: f32,
    },
    FillPath {
        points: Vec<Point>,
        color: Color,
        alpha: f32,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
}

impl DrawCommand {
    /// True when this command erases the whole `width` x `height` canvas
    pub fn clears(&self, width: u32, height: u32) -> bool {
        match self {
            DrawCommand::ClearRect { x, y, w, h } => {
                *x <= 0.0 && *y <= 0.0 && *w >= width as f32 && *h >= height as f32
            }
            _ => false,
        }
    }
}
