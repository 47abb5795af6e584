//! Drawing primitives shared by every effect

use crate::error::{MagiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A 2D point in canvas pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `target` by `factor`
    pub fn lerp(&self, target: Self, factor: f32) -> Self {
        Self {
            x: self.x + (target.x - self.x) * factor,
            y: self.y + (target.y - self.y) * factor,
        }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl Mul<f32> for Point {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// RGBA color, components in [0, 1].
///
/// Serialized as a CSS color string so config files can say
/// `color = "#39ff14"` or `color = "rgba(255, 140, 0, 0.1)"`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };
    /// Default terminal green of the rain and waveforms
    pub const MAGI_GREEN: Self = Self {
        r: 57.0 / 255.0,
        g: 1.0,
        b: 20.0 / 255.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 0-255 channels and a [0, 1] alpha
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a,
        }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)` or `rgba(..)`
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| MagiError::InvalidColor(input.to_string()));
        }
        let lower = s.to_ascii_lowercase();
        let body = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| MagiError::InvalidColor(input.to_string()))?;

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(MagiError::InvalidColor(input.to_string()));
        }
        let mut channels = [0u8; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u8>()
                .map_err(|_| MagiError::InvalidColor(input.to_string()))?;
        }
        let a = match parts.get(3) {
            Some(alpha) => alpha
                .parse::<f32>()
                .ok()
                .filter(|a| (0.0..=1.0).contains(a))
                .ok_or_else(|| MagiError::InvalidColor(input.to_string()))?,
            None => 1.0,
        };
        Ok(Self::rgba8(channels[0], channels[1], channels[2], a))
    }

    /// CSS form: `#rrggbb` when opaque, `rgba(r, g, b, a)` otherwise
    pub fn to_css(&self) -> String {
        let [r, g, b] = [self.r, self.g, self.b].map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, self.a)
        }
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color::rgba8(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
            1.0,
        )),
        6 => Some(Color::rgba8(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(Color::rgba8(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => None,
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::MAGI_GREEN
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl TryFrom<String> for Color {
    type Error = MagiError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_css()
    }
}
