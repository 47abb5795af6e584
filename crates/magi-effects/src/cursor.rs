//! Tactical cursor trail

use magi_core::{Point, Result};
use magi_runtime::RenderTask;

pub const LEAD_LERP: f32 = 0.15;
pub const TAIL_LERP: f32 = 0.08;

/// Two markers easing toward the pointer at different rates. They only move
/// while tactical mode is on.
#[derive(Debug, Clone)]
pub struct CursorTrail {
    pointer: Point,
    lead: Point,
    tail: Point,
    viewport: (f32, f32),
    tactical: bool,
}

impl CursorTrail {
    /// Everything starts at the viewport center
    pub fn new(width: u32, height: u32) -> Self {
        let center = Point::new(width as f32 / 2.0, height as f32 / 2.0);
        Self {
            pointer: center,
            lead: center,
            tail: center,
            viewport: (width as f32, height as f32),
            tactical: false,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer = Point::new(x, y);
    }

    pub fn set_tactical_mode(&mut self, on: bool) {
        self.tactical = on;
    }

    pub fn is_tactical(&self) -> bool {
        self.tactical
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = (width as f32, height as f32);
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Positions of the two trailing markers
    pub fn trail(&self) -> [Point; 2] {
        [self.lead, self.tail]
    }

    /// HUD readout, e.g. `TGT:640,360`
    pub fn coords_label(&self) -> String {
        format!("TGT:{},{}", self.pointer.x.round(), self.pointer.y.round())
    }

    /// Pointer position as a percentage of the viewport, for glare effects
    pub fn glare(&self) -> (f32, f32) {
        let (w, h) = self.viewport;
        if w <= 0.0 || h <= 0.0 {
            return (50.0, 50.0);
        }
        (self.pointer.x / w * 100.0, self.pointer.y / h * 100.0)
    }
}

impl RenderTask for CursorTrail {
    fn draw(&mut self) -> Result<()> {
        if self.tactical {
            self.lead = self.lead.lerp(self.pointer, LEAD_LERP);
            self.tail = self.tail.lerp(self.pointer, TAIL_LERP);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_outside_tactical_mode() {
        let mut cursor = CursorTrail::new(800, 600);
        cursor.pointer_moved(0.0, 0.0);
        cursor.draw().unwrap();
        assert_eq!(cursor.trail(), [Point::new(400.0, 300.0); 2]);
    }

    #[test]
    fn lead_catches_up_faster_than_tail() {
        let mut cursor = CursorTrail::new(800, 600);
        cursor.set_tactical_mode(true);
        cursor.pointer_moved(500.0, 300.0);
        cursor.draw().unwrap();

        let [lead, tail] = cursor.trail();
        assert!((lead.x - 415.0).abs() < 1e-4);
        assert!((tail.x - 408.0).abs() < 1e-4);

        for _ in 0..200 {
            cursor.draw().unwrap();
        }
        let [lead, tail] = cursor.trail();
        assert!(lead.distance(&cursor.pointer()) < 0.01);
        assert!(tail.distance(&cursor.pointer()) < 0.01);
    }

    #[test]
    fn readouts() {
        let mut cursor = CursorTrail::new(1000, 500);
        cursor.pointer_moved(250.4, 100.6);
        assert_eq!(cursor.coords_label(), "TGT:250,101");
        let (x, y) = cursor.glare();
        assert!((x - 25.04).abs() < 1e-3 && (y - 20.12).abs() < 1e-3);
    }
}
