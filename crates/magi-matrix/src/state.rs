//! Column state and the per-frame draw shared by both hosts

use magi_core::Color;
use magi_render::{Canvas2d, Glow};
use rand::Rng;

/// Katakana, digits and Latin capitals
pub const GLYPHS: &str = "アァカサタナハマヤャラワガザダバパイィキシチニヒミリヰギジヂビピウゥクスツヌフムユュルグズブヅプエェケセテネヘメレヱゲゼデベペオォコソトノホモヨョロヲゴゾドボポヴッン0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

const GLOW_RADIUS: f32 = 14.0;
const FLASH_GLOW_RADIUS: f32 = 20.0;
const FLASH_CHANCE: f64 = 0.98;
const RESET_CHANCE: f64 = 0.975;

/// Falling-column state. One drop per `font_size`-wide column, measured in rows.
#[derive(Debug, Clone)]
pub struct MatrixState {
    drops: Vec<f64>,
    font_size: f32,
    color: Color,
    is_light_mode: bool,
    is_lcl_mode: bool,
    device_pixel_ratio: f32,
    glyphs: Vec<char>,
}

impl MatrixState {
    /// `device_pixel_ratio` is clamped to at most 1; the rain renders at CSS
    /// resolution or below.
    pub fn new(font_size: f32, color: Color, is_light_mode: bool, device_pixel_ratio: f32) -> Self {
        let font_size = if font_size.is_finite() && font_size > 0.0 {
            font_size
        } else {
            DEFAULT_FONT_SIZE
        };
        Self {
            drops: Vec::new(),
            font_size,
            color,
            is_light_mode,
            is_lcl_mode: false,
            device_pixel_ratio: clamp_dpr(device_pixel_ratio),
            glyphs: GLYPHS.chars().collect(),
        }
    }

    pub fn drops(&self) -> &[f64] {
        &self.drops
    }

    pub fn columns(&self) -> usize {
        self.drops.len()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_light_mode(&self) -> bool {
        self.is_light_mode
    }

    pub fn is_lcl_mode(&self) -> bool {
        self.is_lcl_mode
    }

    pub fn device_pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f32) {
        self.device_pixel_ratio = clamp_dpr(dpr);
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_modes(&mut self, is_light_mode: bool, is_lcl_mode: bool) {
        self.is_light_mode = is_light_mode;
        self.is_lcl_mode = is_lcl_mode;
    }

    /// Size the canvas for a `css_width` x `css_height` viewport and rebuild
    /// the column list. Existing columns keep their drop; new columns start
    /// somewhere above the top edge.
    pub fn resize<C, R>(&mut self, canvas: &mut C, css_width: u32, css_height: u32, rng: &mut R)
    where
        C: Canvas2d + ?Sized,
        R: Rng,
    {
        let width = (css_width as f32 * self.device_pixel_ratio).floor() as u32;
        let height = (css_height as f32 * self.device_pixel_ratio).floor() as u32;
        canvas.set_size(width, height);

        let columns = (width as f32 / self.font_size).floor() as usize;
        let rows = height as f64 / self.font_size as f64;
        let existing = self.drops.len();
        self.drops.truncate(columns);
        for _ in existing..columns {
            self.drops.push((rng.random::<f64>() * -rows).floor());
        }
    }

    /// Draw one frame. Returns false when skipped because LCL mode is active.
    pub fn draw<C, R>(&mut self, canvas: &mut C, rng: &mut R) -> bool
    where
        C: Canvas2d + ?Sized,
        R: Rng,
    {
        if self.is_lcl_mode {
            return false;
        }

        let (fade, flash) = if self.is_light_mode {
            (Color::rgba8(255, 255, 255, 0.05), Color::BLACK)
        } else {
            (Color::rgba8(0, 0, 0, 0.025), Color::WHITE)
        };
        canvas.fill(fade);

        let glow = Glow::new(GLOW_RADIUS, self.color);
        let flash_glow = Glow::new(FLASH_GLOW_RADIUS, flash);
        let font = self.font_size as f64;
        let height = canvas.height() as f64;

        for (i, drop) in self.drops.iter_mut().enumerate() {
            let glyph = self.glyphs[rng.random_range(0..self.glyphs.len())];
            let x = i as f32 * self.font_size;
            let y = (*drop * font) as f32;
            if rng.random::<f64>() > FLASH_CHANCE {
                canvas.fill_glyph(glyph, x, y, self.font_size, flash, flash_glow);
            } else {
                canvas.fill_glyph(glyph, x, y, self.font_size, self.color, glow);
            }

            if *drop * font > height && rng.random::<f64>() > RESET_CHANCE {
                *drop = 0.0;
            }
            *drop += 1.0;
        }
        true
    }
}

fn clamp_dpr(dpr: f32) -> f32 {
    if dpr.is_finite() && dpr > 0.0 {
        dpr.min(1.0)
    } else {
        1.0
    }
}
