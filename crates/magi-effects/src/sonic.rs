//! Assistant voice waveform

use magi_core::{Color, MagiError, Point, Result};
use magi_render::Canvas2d;
use magi_runtime::RenderTask;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_WIDTH: u32 = 300;
pub const SONIC_HEIGHT: u32 = 120;

const BASELINE: f32 = 60.0;

/// What the assistant is doing, which sets the wave's character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveState {
    #[default]
    Normal,
    Hover,
    Thinking,
    /// Amplitude follows a smoothed random target
    Speaking,
    Flat,
}

impl fmt::Display for WaveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WaveState::Normal => "normal",
            WaveState::Hover => "hover",
            WaveState::Thinking => "thinking",
            WaveState::Speaking => "speaking",
            WaveState::Flat => "flat",
        };
        f.write_str(name)
    }
}

impl FromStr for WaveState {
    type Err = MagiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "normal" => Ok(WaveState::Normal),
            "hover" => Ok(WaveState::Hover),
            "thinking" => Ok(WaveState::Thinking),
            "speaking" => Ok(WaveState::Speaking),
            "flat" => Ok(WaveState::Flat),
            other => Err(MagiError::InvalidConfig(format!("unknown wave state '{}'", other))),
        }
    }
}

pub struct SonicWave<C> {
    canvas: C,
    color: Color,
    state: WaveState,
    speed: f32,
    amplitude: f32,
    frequency: f32,
    phase: f32,
    rng: Xoshiro256PlusPlus,
}

impl<C: Canvas2d> SonicWave<C> {
    /// A zero `container_width` falls back to [`DEFAULT_WIDTH`]
    pub fn new(mut canvas: C, container_width: u32, color: Color, seed: u64) -> Self {
        canvas.set_size(width_or_default(container_width), SONIC_HEIGHT);
        Self {
            canvas,
            color,
            state: WaveState::Normal,
            speed: 0.05,
            amplitude: 5.0,
            frequency: 0.02,
            phase: 0.0,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Takes effect on the next draw
    pub fn set_state(&mut self, state: WaveState) {
        self.state = state;
    }

    pub fn state(&self) -> WaveState {
        self.state
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn resize(&mut self, container_width: u32) {
        self.canvas.set_size(width_or_default(container_width), SONIC_HEIGHT);
    }

    /// `(speed, amplitude, frequency)` used by the last draw
    pub fn params(&self) -> (f32, f32, f32) {
        (self.speed, self.amplitude, self.frequency)
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    fn apply_state(&mut self) {
        match self.state {
            WaveState::Normal => (self.speed, self.amplitude, self.frequency) = (0.05, 5.0, 0.02),
            WaveState::Hover => (self.speed, self.amplitude, self.frequency) = (0.1, 15.0, 0.05),
            WaveState::Thinking => (self.speed, self.amplitude, self.frequency) = (0.2, 8.0, 0.08),
            WaveState::Speaking => {
                self.speed = 0.15;
                self.frequency = 0.1;
                let target = 20.0 * self.rng.random::<f32>();
                self.amplitude += (target - self.amplitude) * 0.1;
            }
            // frequency carries over from the previous state
            WaveState::Flat => (self.amplitude, self.speed) = (1.0, 0.01),
        }
    }
}

fn width_or_default(width: u32) -> u32 {
    if width == 0 {
        DEFAULT_WIDTH
    } else {
        width
    }
}

impl<C: Canvas2d> RenderTask for SonicWave<C> {
    fn draw(&mut self) -> Result<()> {
        let width = self.canvas.width();
        if width == 0 {
            return Ok(());
        }
        self.canvas.clear();
        self.apply_state();

        let (f, a, phase) = (self.frequency, self.amplitude, self.phase);
        let wave: Vec<Point> = (0..width)
            .map(|x| {
                let x = x as f32;
                let y = BASELINE + (x * f + phase).sin() * a + (x * f * 2.0 + phase * 1.5).sin() * (a / 2.0);
                Point::new(x, y)
            })
            .collect();

        let bottom = SONIC_HEIGHT as f32;
        let mut area = wave.clone();
        area.push(Point::new(width as f32, bottom));
        area.push(Point::new(0.0, bottom));

        self.canvas.stroke_path(wave, self.color, 1.5, 1.0);
        self.canvas.fill_path(area, self.color, 0.1);

        self.phase += self.speed;
        Ok(())
    }
}
