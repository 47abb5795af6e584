//! Timer-driven activation and recycling of the particle pool

use crate::particle::ParticlePool;
use magi_runtime::{TimerQueue, Visibility};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Sweep period while the page is visible
pub const SWEEP_VISIBLE_MS: f64 = 500.0;
/// Sweep period while the page is hidden; no visual work is done
pub const SWEEP_HIDDEN_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleTimer {
    /// First, staggered activation of one slot
    Activate(usize),
    Sweep,
}

/// What one call to [`ParticleSystem::advance`] did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub activated: usize,
    pub recycled: usize,
    pub sweeps: usize,
}

/// Owns the pool and drives it from wall-clock timers, independent of
/// animation frames.
pub struct ParticleSystem {
    pool: ParticlePool,
    rng: Xoshiro256PlusPlus,
    timers: TimerQueue<ParticleTimer>,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        let (pool, _) = ParticlePool::init(0, 0.0);
        Self {
            pool,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            timers: TimerQueue::new(),
        }
    }

    /// Build a pool of `capacity` elements and schedule their staggered first
    /// activations plus the first sweep. Re-initializing discards the old pool.
    pub fn init(&mut self, capacity: usize, now_ms: f64) {
        let (pool, schedule) = ParticlePool::init(capacity, now_ms);
        self.pool = pool;
        self.timers = TimerQueue::new();
        if capacity == 0 {
            return;
        }
        for (index, due) in schedule.into_iter().enumerate() {
            self.timers.schedule(due, ParticleTimer::Activate(index));
        }
        self.timers
            .schedule_after(now_ms, SWEEP_VISIBLE_MS, ParticleTimer::Sweep);
    }

    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Due time of the next timer, for hosts that sleep between polls
    pub fn next_due(&mut self) -> Option<f64> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire every timer due at `now_ms`
    pub fn advance(&mut self, now_ms: f64, visibility: Visibility) -> SweepReport {
        let mut report = SweepReport::default();
        while let Some(timer) = self.timers.pop_due(now_ms) {
            match timer {
                ParticleTimer::Activate(index) => {
                    if self.pool.activate(index, true, now_ms, &mut self.rng) {
                        report.activated += 1;
                    }
                }
                ParticleTimer::Sweep => {
                    report.sweeps += 1;
                    let period = match visibility {
                        Visibility::Hidden => SWEEP_HIDDEN_MS,
                        Visibility::Visible => {
                            report.recycled += self.sweep(now_ms);
                            SWEEP_VISIBLE_MS
                        }
                    };
                    self.timers.schedule_after(now_ms, period, ParticleTimer::Sweep);
                }
            }
        }
        report
    }

    fn sweep(&mut self, now_ms: f64) -> usize {
        let expired = self.pool.expired(now_ms);
        for &index in &expired {
            self.pool.recycle(index);
            self.pool.activate(index, false, now_ms, &mut self.rng);
        }
        if !expired.is_empty() {
            log::debug!("[particles] recycled {} element(s)", expired.len());
        }
        expired.len()
    }
}
