//! Header oscilloscope strip

use magi_core::{Color, Point, Result};
use magi_render::Canvas2d;
use magi_runtime::RenderTask;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub const HOLO_HEIGHT: u32 = 48;

const MID: f32 = 24.0;
const DRIFT: f32 = 1.5;

/// Two overlaid waves across the viewport: a slow beating carrier and a
/// faint jittery interference line
pub struct HoloWave<C> {
    canvas: C,
    color: Color,
    offset: f32,
    rng: Xoshiro256PlusPlus,
}

impl<C: Canvas2d> HoloWave<C> {
    pub fn new(mut canvas: C, viewport_width: u32, color: Color, seed: u64) -> Self {
        canvas.set_size(viewport_width, HOLO_HEIGHT);
        Self {
            canvas,
            color,
            offset: 0.0,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    pub fn resize(&mut self, viewport_width: u32) {
        self.canvas.set_size(viewport_width, HOLO_HEIGHT);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }
}

impl<C: Canvas2d> RenderTask for HoloWave<C> {
    fn draw(&mut self) -> Result<()> {
        self.canvas.clear();
        let width = self.canvas.width();
        let off = self.offset;

        let carrier = (0..width)
            .step_by(2)
            .map(|i| {
                let i = i as f32;
                let y = MID + ((i + off) * 0.02).sin() * 12.0 * ((i + off * 0.5) * 0.01).sin();
                Point::new(i, y)
            })
            .collect();
        self.canvas.stroke_path(carrier, self.color, 1.5, 1.0);

        let rng = &mut self.rng;
        let interference = (0..width)
            .step_by(4)
            .map(|i| {
                let i = i as f32;
                let jitter = (rng.random::<f32>() - 0.5) * 3.0;
                Point::new(i, MID + ((i - off * 2.0) * 0.1).sin() * 5.0 + jitter)
            })
            .collect();
        self.canvas.stroke_path(interference, self.color, 0.5, 0.5);

        self.offset += DRIFT;
        Ok(())
    }
}
