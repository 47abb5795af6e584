//! The drawing surface trait

use crate::command::{DrawCommand, Glow, GradientStop};
use magi_core::{Color, Point};

/// A 2D drawing surface in physical pixels.
///
/// Implementors only need `width`, `height`, `set_size` and `submit`; the
/// remaining methods are conveniences that build a [`DrawCommand`].
pub trait Canvas2d {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Resize the backing store. Resizing wipes the canvas.
    fn set_size(&mut self, width: u32, height: u32);

    fn submit(&mut self, command: DrawCommand);

    fn clear(&mut self) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.submit(DrawCommand::ClearRect { x: 0.0, y: 0.0, w, h });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.submit(DrawCommand::FillRect { x, y, w, h, color });
    }

    /// Fill the whole canvas
    fn fill(&mut self, color: Color) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.fill_rect(0.0, 0.0, w, h, color);
    }

    fn fill_vertical_gradient(&mut self, top: Color, bottom: Color) {
        let (w, h) = (self.width() as f32, self.height() as f32);
        self.submit(DrawCommand::FillGradient {
            x: 0.0,
            y: 0.0,
            w,
            h,
            stops: vec![
                GradientStop { offset: 0.0, color: top },
                GradientStop { offset: 1.0, color: bottom },
            ],
        });
    }

    fn fill_glyph(&mut self, glyph: char, x: f32, y: f32, size: f32, color: Color, glow: Glow) {
        self.submit(DrawCommand::Glyph {
            x,
            y,
            glyph,
            size,
            color,
            glow,
        });
    }

    fn stroke_path(&mut self, points: Vec<Point>, color: Color, width: f32, alpha: f32) {
        if points.len() < 2 {
            return;
        }
        self.submit(DrawCommand::StrokePath {
            points,
            color,
            width,
            alpha,
        });
    }

    fn fill_path(&mut self, points: Vec<Point>, color: Color, alpha: f32) {
        if points.len() < 3 {
            return;
        }
        self.submit(DrawCommand::FillPath {
            points,
            color,
            alpha,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.submit(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}

impl<C: Canvas2d + ?Sized> Canvas2d for Box<C> {
    fn width(&self) -> u32 {
        (**self).width()
    }

    fn height(&self) -> u32 {
        (**self).height()
    }

    fn set_size(&mut self, width: u32, height: u32) {
        (**self).set_size(width, height);
    }

    fn submit(&mut self, command: DrawCommand) {
        (**self).submit(command);
    }
}
