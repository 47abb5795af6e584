//! Millisecond time sources

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A monotonic high-resolution clock reporting milliseconds since its origin
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Clock shared between the scheduler, timers and worker threads
pub type SharedClock = Arc<dyn Clock>;

/// Wall clock measured from construction
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedClock {
        Arc::new(Self::new())
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    now_bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: f64) {
        self.now_bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, ms: f64) {
        self.set(self.now_ms() + ms);
    }

    /// A shareable handle to this clock
    pub fn shared(&self) -> SharedClock {
        Arc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.now_bits.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0.0);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::starting_at(10.0);
        let shared = clock.shared();
        clock.advance(33.5);
        assert!((shared.now_ms() - 43.5).abs() < 1e-9);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
