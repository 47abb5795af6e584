//! The shared, frame-rate-capped animation loop

use crate::clock::SharedClock;
use crate::event::Visibility;
use crate::gate::{FrameGate, DEFAULT_FPS};
use crate::system::{DrawFn, RenderTask, TaskRegistry};
use magi_core::Result;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle of an outstanding animation-frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub u64);

/// What the scheduler did with a delivered animation frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not running (or nothing was requested); the frame is dropped and no
    /// new frame is requested
    Idle,
    /// Within the frame interval; next frame requested, nothing drawn
    Skipped,
    /// Tasks ran; next frame requested
    Rendered { tasks: usize, failed: usize },
}

/// Counters for the animation loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub requests_issued: u64,
    pub frames_delivered: u64,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub task_failures: u64,
}

/// Runs every registered draw task at most `target_fps` times per second.
///
/// The host owns the display: whenever [`FrameScheduler::pending_request`] is
/// `Some`, it delivers the next vsync timestamp through
/// [`FrameScheduler::on_animation_frame`]. At most one request is ever
/// outstanding. Hiding the page stops the loop entirely.
pub struct FrameScheduler {
    clock: SharedClock,
    gate: FrameGate,
    target_fps: f64,
    running: bool,
    tasks: TaskRegistry,
    pending: Option<FrameRequestId>,
    next_request: u64,
    stats: SchedulerStats,
}

impl FrameScheduler {
    /// Create a scheduler capped at [`DEFAULT_FPS`]
    pub fn new(clock: SharedClock) -> Self {
        Self {
            clock,
            gate: FrameGate::default(),
            target_fps: DEFAULT_FPS,
            running: false,
            tasks: TaskRegistry::new(),
            pending: None,
            next_request: 0,
            stats: SchedulerStats::default(),
        }
    }

    pub fn with_fps(clock: SharedClock, fps: f64) -> Result<Self> {
        let mut scheduler = Self::new(clock);
        scheduler.configure(fps)?;
        Ok(scheduler)
    }

    /// Set the frame-rate cap. Takes effect on the next delivered frame.
    pub fn configure(&mut self, target_fps: f64) -> Result<()> {
        self.gate.set_fps(target_fps)?;
        self.target_fps = target_fps;
        Ok(())
    }

    pub fn target_fps(&self) -> f64 {
        self.target_fps
    }

    pub fn frame_interval_ms(&self) -> f64 {
        self.gate.interval_ms()
    }

    /// Phase-corrected timestamp of the last rendered frame
    pub fn last_frame_ms(&self) -> f64 {
        self.gate.last_ms()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_request(&self) -> Option<FrameRequestId> {
        self.pending
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Add a draw task, replacing any task with the same name in place
    pub fn register(&mut self, name: &str, draw: impl FnMut() -> Result<()> + 'static) {
        let boxed: DrawFn = Box::new(draw);
        if self.tasks.register(name, boxed) {
            log::warn!("[render_core] task '{}' re-registered, replacing previous", name);
        } else {
            log::info!("[render_core] task added: {}", name);
        }
    }

    /// Register a shared effect; the scheduler keeps a reference for the session
    pub fn register_task<T: RenderTask + 'static>(&mut self, name: &str, task: Rc<RefCell<T>>) {
        self.register(name, move || task.borrow_mut().draw());
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.tasks.unregister(name);
        if removed {
            log::info!("[render_core] task removed: {}", name);
        }
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains(name)
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.names()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Start the loop. No-op while already running.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.gate.reset(self.clock.now_ms());
        self.request_frame();
    }

    /// Stop the loop and cancel the outstanding frame request. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.pending = None;
    }

    /// Page visibility hook: hidden pages hibernate, visible pages resume
    pub fn on_visibility(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                if self.running {
                    log::info!("[render_core] system hibernating");
                }
                self.stop();
            }
            Visibility::Visible => {
                if !self.running {
                    log::info!("[render_core] system resumed");
                }
                self.start();
            }
        }
    }

    /// Deliver an animation frame stamped `t_ms`
    pub fn on_animation_frame(&mut self, t_ms: f64) -> FrameOutcome {
        if self.pending.take().is_none() || !self.running {
            return FrameOutcome::Idle;
        }
        self.stats.frames_delivered += 1;

        // Keep ticking even on frames that do not render
        self.request_frame();

        if !self.gate.accept(t_ms) {
            self.stats.frames_skipped += 1;
            return FrameOutcome::Skipped;
        }

        let (tasks, failed) = self.tasks.run_all();
        self.stats.frames_rendered += 1;
        self.stats.task_failures += failed as u64;
        FrameOutcome::Rendered { tasks, failed }
    }

    fn request_frame(&mut self) {
        self.next_request += 1;
        self.stats.requests_issued += 1;
        self.pending = Some(FrameRequestId(self.next_request));
    }
}
