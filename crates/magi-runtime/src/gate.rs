//! Phase-corrected frame-rate cap

use magi_core::{MagiError, Result};

/// Frame rate used when nothing else is configured
pub const DEFAULT_FPS: f64 = 30.0;

/// Decides which animation frames are rendered under an FPS cap.
///
/// On an accepted frame the baseline moves to `t - (elapsed % interval)`
/// rather than `t`, so rounding error never accumulates into drift.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGate {
    interval_ms: f64,
    last_ms: f64,
}

impl Default for FrameGate {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0 / DEFAULT_FPS,
            last_ms: 0.0,
        }
    }
}

impl FrameGate {
    pub fn new(fps: f64) -> Result<Self> {
        Ok(Self {
            interval_ms: interval_for(fps)?,
            last_ms: 0.0,
        })
    }

    /// Change the cap; the baseline is kept
    pub fn set_fps(&mut self, fps: f64) -> Result<()> {
        self.interval_ms = interval_for(fps)?;
        Ok(())
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Timestamp of the last accepted frame, phase corrected
    pub fn last_ms(&self) -> f64 {
        self.last_ms
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.last_ms = now_ms;
    }

    /// Returns true when the frame at `t_ms` should render
    pub fn accept(&mut self, t_ms: f64) -> bool {
        let elapsed = t_ms - self.last_ms;
        if elapsed <= self.interval_ms {
            return false;
        }
        self.last_ms = t_ms - (elapsed % self.interval_ms);
        true
    }

    /// Like [`FrameGate::accept`], but a frame landing exactly one interval
    /// after the baseline also renders
    pub fn accept_inclusive(&mut self, t_ms: f64) -> bool {
        let elapsed = t_ms - self.last_ms;
        if elapsed < self.interval_ms {
            return false;
        }
        self.last_ms = t_ms - (elapsed % self.interval_ms);
        true
    }
}

fn interval_for(fps: f64) -> Result<f64> {
    if !fps.is_finite() || fps <= 0.0 {
        return Err(MagiError::InvalidConfig(format!(
            "target fps must be a positive number, got {fps}"
        )));
    }
    Ok(1000.0 / fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_from_fps() {
        let gate = FrameGate::new(30.0).unwrap();
        assert!((gate.interval_ms() - 1000.0 / 30.0).abs() < 1e-10);
    }

    #[test]
    fn rejects_bad_fps() {
        assert!(FrameGate::new(0.0).is_err());
        assert!(FrameGate::new(-5.0).is_err());
        assert!(FrameGate::new(f64::NAN).is_err());
        assert!(FrameGate::new(f64::INFINITY).is_err());
    }

    #[test]
    fn frame_within_interval_is_dropped() {
        let mut gate = FrameGate::new(30.0).unwrap();
        gate.reset(0.0);
        assert!(!gate.accept(16.0));
        assert!(!gate.accept(1000.0 / 30.0));
        assert_eq!(gate.last_ms(), 0.0);
    }

    #[test]
    fn late_frame_is_phase_corrected() {
        let mut gate = FrameGate::new(30.0).unwrap();
        gate.reset(100.0);
        assert!(gate.accept(153.0));
        let expected = 153.0 - (53.0 % (1000.0 / 30.0));
        assert!((gate.last_ms() - expected).abs() < 1e-9);
    }

    #[test]
    fn set_fps_keeps_baseline() {
        let mut gate = FrameGate::new(30.0).unwrap();
        gate.reset(42.0);
        gate.set_fps(20.0).unwrap();
        assert_eq!(gate.last_ms(), 42.0);
        assert!((gate.interval_ms() - 50.0).abs() < 1e-10);
        assert!(gate.set_fps(0.0).is_err());
        assert!((gate.interval_ms() - 50.0).abs() < 1e-10);
    }

    #[test]
    fn inclusive_accepts_exact_interval() {
        let mut gate = FrameGate::new(25.0).unwrap();
        gate.reset(0.0);
        assert!(!gate.accept_inclusive(39.0));
        assert!(gate.accept_inclusive(40.0));
        assert_eq!(gate.last_ms(), 40.0);
    }
}
