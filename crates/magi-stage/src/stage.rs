//! The page runtime: one scheduler, one matrix engine, and the effects around them

use crate::boot::{BootPhase, BootSequence};
use crate::config::StageConfig;
use magi_core::{Color, EffectBudget, PerformanceTier, Point, Result};
use magi_effects::{CursorTrail, GlitchText, HoloWave, LclField, LclFrame, SonicWave, WaveState, GLITCH_STEP_MS};
use magi_matrix::{Capabilities, MatrixOptions, MatrixRainEngine, MatrixReport, WorkerSpawner};
use magi_particles::ParticleSystem;
use magi_render::{CanvasElement, DisplayList};
use magi_runtime::{
    Debouncer, EventBus, FrameOutcome, FrameScheduler, PageEvent, SharedClock, TimerId, TimerQueue, Visibility,
};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Resize events are coalesced for this long before the rain is rebuilt
pub const RESIZE_DEBOUNCE_MS: f64 = 50.0;

type Shared<T> = Rc<RefCell<T>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StageTimer {
    GlitchStep,
}

/// What one delivered animation frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub scheduler: FrameOutcome,
    /// `None` when the LCL field is not available on this device
    pub lcl: Option<LclFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchedulerSummary {
    pub running: bool,
    pub target_fps: f64,
    pub tasks: Vec<String>,
    pub requests_issued: u64,
    pub frames_delivered: u64,
    pub frames_rendered: u64,
    pub frames_skipped: u64,
    pub task_failures: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticleSummary {
    pub capacity: usize,
    pub in_use: usize,
    pub creations: usize,
    pub recycled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LclSummary {
    pub mounted: bool,
    pub frames_drawn: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BootSummary {
    pub phase: BootPhase,
    pub progress: u8,
    pub status: &'static str,
}

/// Snapshot of the whole stage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub tier: PerformanceTier,
    pub budget: EffectBudget,
    pub visible: bool,
    pub scheduler: SchedulerSummary,
    pub matrix_mode: &'static str,
    pub matrix: Option<MatrixReport>,
    pub particles: Option<ParticleSummary>,
    pub lcl: Option<LclSummary>,
    pub wave_state: Option<WaveState>,
    pub cursor_trail: Option<[Point; 2]>,
    pub status_text: String,
    pub boot: Option<BootSummary>,
}

/// Composition root of the page runtime.
///
/// The host drives it with three calls: [`Stage::dispatch`] for page events,
/// [`Stage::animation_frame`] whenever [`Stage::wants_frame`] is true, and
/// [`Stage::advance_timers`] for wall-clock timers.
pub struct Stage {
    config: StageConfig,
    budget: EffectBudget,
    clock: SharedClock,
    scheduler: FrameScheduler,
    events: EventBus,
    visibility: Visibility,
    viewport: (u32, u32),
    light_mode: bool,
    lcl_mode: bool,
    started: bool,

    matrix: MatrixRainEngine,
    hidden_matrix_canvas: Option<CanvasElement>,
    particles: Option<ParticleSystem>,
    particle_recycles: usize,
    holo: Shared<HoloWave<DisplayList>>,
    sonic: Option<Shared<SonicWave<DisplayList>>>,
    cursor: Option<Shared<CursorTrail>>,
    lcl: Option<LclField<DisplayList>>,

    glitch: GlitchText,
    glitch_timer: Option<TimerId>,
    timers: TimerQueue<StageTimer>,
    resize: Debouncer,
    boot: Option<BootSequence>,
}

impl Stage {
    pub fn new(config: StageConfig, clock: SharedClock, spawner: &dyn WorkerSpawner) -> Result<Self> {
        config.validate()?;
        let budget = config.budget();
        let viewport = config.viewport();
        let seed = config.seed;
        let color = config.matrix.color;
        log::info!(
            "[stage] tier {} at {} fps, {} particles",
            budget.tier,
            budget.target_fps,
            budget.particle_count
        );

        let mut scheduler = FrameScheduler::with_fps(clock.clone(), budget.target_fps)?;

        let mut matrix_canvas = CanvasElement::new("matrix-bg", Box::new(DisplayList::new(0, 0)))
            .with_offscreen_support(config.device.offscreen_transfer);
        let (matrix, hidden_matrix_canvas) = if budget.matrix_rain {
            let options = MatrixOptions {
                font_size: config.matrix.font_size,
                color,
                is_light_mode: false,
                device_pixel_ratio: config.viewport.device_pixel_ratio,
                allow_worker: config.matrix.worker,
                seed,
            };
            let engine = MatrixRainEngine::init(
                matrix_canvas,
                viewport,
                Capabilities::from_profile(&config.device),
                &options,
                &mut scheduler,
                spawner,
            );
            match engine {
                Ok(engine) => (engine, None),
                Err(err) => {
                    log::warn!("[stage] matrix rain unavailable: {}", err);
                    (MatrixRainEngine::Disabled, None)
                }
            }
        } else {
            let engine = MatrixRainEngine::disabled(&mut matrix_canvas);
            (engine, Some(matrix_canvas))
        };

        let particles = (budget.particles && budget.particle_count > 0)
            .then(|| ParticleSystem::new(seed.wrapping_add(1)));

        let holo = Rc::new(RefCell::new(HoloWave::new(
            DisplayList::new(0, 0),
            viewport.0,
            color,
            seed.wrapping_add(2),
        )));
        scheduler.register_task("HoloWave", holo.clone());

        let sonic = budget.sonic_wave.then(|| {
            let sonic = Rc::new(RefCell::new(SonicWave::new(
                DisplayList::new(0, 0),
                0,
                color,
                seed.wrapping_add(3),
            )));
            scheduler.register_task("SonicWave", sonic.clone());
            sonic
        });

        let cursor = budget.cursor_trail.then(|| {
            let cursor = Rc::new(RefCell::new(CursorTrail::new(viewport.0, viewport.1)));
            scheduler.register_task("CursorTrail", cursor.clone());
            cursor
        });

        let lcl = if budget.lcl {
            Some(LclField::new(
                DisplayList::new(0, 0),
                config.viewport.device_pixel_ratio,
                seed.wrapping_add(4),
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            budget,
            clock,
            scheduler,
            events: EventBus::new(),
            visibility: Visibility::Visible,
            viewport,
            light_mode: false,
            lcl_mode: false,
            started: false,
            matrix,
            hidden_matrix_canvas,
            particles,
            particle_recycles: 0,
            holo,
            sonic,
            cursor,
            lcl,
            glitch: GlitchText::new(seed.wrapping_add(5)),
            glitch_timer: None,
            timers: TimerQueue::new(),
            resize: Debouncer::new(RESIZE_DEBOUNCE_MS),
            boot: None,
        })
    }

    /// Start the boot overlay, the render loop and the particle pool. No-op
    /// once started.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let now = self.clock.now_ms();
        self.boot = Some(BootSequence::start(now));
        if self.visibility.is_visible() {
            self.scheduler.start();
        }
        let capacity = self.budget.particle_count;
        if let Some(particles) = self.particles.as_mut() {
            particles.init(capacity, now);
        }
        if self.lcl_mode {
            self.mount_lcl(now);
        }
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn budget(&self) -> &EffectBudget {
        &self.budget
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn matrix(&self) -> &MatrixRainEngine {
        &self.matrix
    }

    pub fn particles(&self) -> Option<&ParticleSystem> {
        self.particles.as_ref()
    }

    pub fn lcl(&self) -> Option<&LclField<DisplayList>> {
        self.lcl.as_ref()
    }

    pub fn holo(&self) -> Shared<HoloWave<DisplayList>> {
        self.holo.clone()
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The matrix canvas, kept hidden when the budget turned the rain off
    pub fn hidden_matrix_canvas(&self) -> Option<&CanvasElement> {
        self.hidden_matrix_canvas.as_ref()
    }

    /// Queue an event; it is handled on the next frame or timer poll
    pub fn post(&mut self, event: PageEvent) {
        self.events.push(event);
    }

    /// Handle an event now, after anything already queued
    pub fn dispatch(&mut self, event: PageEvent) {
        self.events.push(event);
        self.process_events();
    }

    fn process_events(&mut self) {
        for event in self.events.drain() {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: PageEvent) {
        let now = self.clock.now_ms();
        match event {
            PageEvent::VisibilityChanged(visibility) => {
                self.visibility = visibility;
                if self.started {
                    self.scheduler.on_visibility(visibility);
                }
                self.matrix.on_visibility(visibility);
            }
            PageEvent::Resized { width, height } => {
                self.viewport = (width, height);
                self.holo.borrow_mut().resize(width);
                if let Some(cursor) = &self.cursor {
                    cursor.borrow_mut().resize(width, height);
                }
                if let Some(lcl) = self.lcl.as_mut() {
                    if lcl.is_mounted() {
                        lcl.resize(width, height);
                    }
                }
                self.resize.trigger(now);
            }
            PageEvent::ThemeChanged { color } => self.set_color(color),
            PageEvent::LightModeChanged(light) => {
                self.light_mode = light;
                self.matrix.set_modes(self.light_mode, self.lcl_mode);
            }
            PageEvent::LclModeChanged(on) => {
                self.lcl_mode = on;
                self.matrix.set_modes(self.light_mode, self.lcl_mode);
                if on && self.started {
                    self.mount_lcl(now);
                } else if !on {
                    if let Some(lcl) = self.lcl.as_mut() {
                        lcl.unmount();
                    }
                }
            }
        }
    }

    fn set_color(&mut self, color: Color) {
        self.matrix.set_color(color);
        self.holo.borrow_mut().set_color(color);
        if let Some(sonic) = &self.sonic {
            sonic.borrow_mut().set_color(color);
        }
    }

    fn mount_lcl(&mut self, now: f64) {
        let (viewport, visibility) = (self.viewport, self.visibility);
        if let Some(lcl) = self.lcl.as_mut() {
            lcl.mount(viewport, now, visibility);
        }
    }

    /// True while the scheduler or the LCL field holds a frame request
    pub fn wants_frame(&self) -> bool {
        self.scheduler.pending_request().is_some()
            || self
                .lcl
                .as_ref()
                .is_some_and(|lcl| lcl.pending_request().is_some())
    }

    /// Deliver the display's next frame timestamp to every frame consumer
    pub fn animation_frame(&mut self, t_ms: f64) -> FrameReport {
        self.process_events();
        let scheduler = self.scheduler.on_animation_frame(t_ms);
        let visibility = self.visibility;
        let lcl = self
            .lcl
            .as_mut()
            .map(|lcl| lcl.on_animation_frame(t_ms, visibility));
        FrameReport { scheduler, lcl }
    }

    /// Fire wall-clock timers due at `now_ms`: particle sweeps, the resize
    /// debounce, glitch steps and the boot timeline
    pub fn advance_timers(&mut self, now_ms: f64) {
        self.process_events();

        if let Some(particles) = self.particles.as_mut() {
            self.particle_recycles += particles.advance(now_ms, self.visibility).recycled;
        }

        if self.resize.poll(now_ms) {
            let (width, height) = self.viewport;
            self.matrix.resize(width, height);
        }

        while let Some(timer) = self.timers.pop_due(now_ms) {
            match timer {
                StageTimer::GlitchStep => {
                    self.glitch_timer = None;
                    if self.glitch.step() {
                        self.glitch_timer =
                            Some(self.timers.schedule_after(now_ms, GLITCH_STEP_MS, StageTimer::GlitchStep));
                    }
                }
            }
        }

        if let Some(boot) = self.boot.as_mut() {
            boot.advance(now_ms);
        }
    }

    pub fn set_wave_state(&mut self, state: WaveState) {
        if let Some(sonic) = &self.sonic {
            sonic.borrow_mut().set_state(state);
        }
    }

    pub fn set_tactical_mode(&mut self, on: bool) {
        if let Some(cursor) = &self.cursor {
            cursor.borrow_mut().set_tactical_mode(on);
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if let Some(cursor) = &self.cursor {
            cursor.borrow_mut().pointer_moved(x, y);
        }
    }

    /// Decode `text` into the status line, one half-character per step
    pub fn glitch_status(&mut self, text: &str) {
        if let Some(id) = self.glitch_timer.take() {
            self.timers.cancel(id);
        }
        self.glitch.set_text(text);
        let now = self.clock.now_ms();
        self.glitch_timer = Some(self.timers.schedule_after(now, GLITCH_STEP_MS, StageTimer::GlitchStep));
    }

    pub fn status_text(&self) -> &str {
        self.glitch.current()
    }

    /// Page content finished loading; lets the boot overlay complete
    pub fn content_ready(&mut self) {
        let now = self.clock.now_ms();
        if let Some(boot) = self.boot.as_mut() {
            boot.content_ready(now);
        }
    }

    pub fn boot(&self) -> Option<&BootSequence> {
        self.boot.as_ref()
    }

    pub fn report(&self) -> StageReport {
        let stats = self.scheduler.stats();
        let running = self.scheduler.is_running();
        StageReport {
            tier: self.budget.tier,
            budget: self.budget.clone(),
            visible: self.visibility.is_visible(),
            scheduler: SchedulerSummary {
                running,
                target_fps: self.scheduler.target_fps(),
                tasks: self.scheduler.task_names().into_iter().map(String::from).collect(),
                requests_issued: stats.requests_issued,
                frames_delivered: stats.frames_delivered,
                frames_rendered: stats.frames_rendered,
                frames_skipped: stats.frames_skipped,
                task_failures: stats.task_failures,
            },
            matrix_mode: self.matrix.mode(),
            matrix: self.matrix.report(running),
            particles: self.particles.as_ref().map(|p| ParticleSummary {
                capacity: p.pool().capacity(),
                in_use: p.pool().in_use_count(),
                creations: p.pool().creations(),
                recycled: self.particle_recycles,
            }),
            lcl: self.lcl.as_ref().map(|lcl| LclSummary {
                mounted: lcl.is_mounted(),
                frames_drawn: lcl.frames_drawn(),
            }),
            wave_state: self.sonic.as_ref().map(|s| s.borrow().state()),
            cursor_trail: self.cursor.as_ref().map(|c| c.borrow().trail()),
            status_text: self.glitch.current().to_string(),
            boot: self.boot.as_ref().map(|b| BootSummary {
                phase: b.phase(),
                progress: b.progress(),
                status: b.status(),
            }),
        }
    }
}

impl Drop for Stage {
    fn drop(&mut self) {
        self.scheduler.stop();
        self.matrix.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_core::{DeviceProfile, MagiError};
    use magi_matrix::{ThreadSpawner, WorkerHandle, TASK_NAME};
    use magi_render::Canvas2d;
    use magi_runtime::ManualClock;

    struct NoWorkers;

    impl WorkerSpawner for NoWorkers {
        fn spawn(&self, _clock: SharedClock, _seed: u64) -> Result<WorkerHandle> {
            Err(MagiError::WorkerSpawn("workers unavailable".to_string()))
        }
    }

    fn desktop() -> StageConfig {
        StageConfig::default()
    }

    fn low_end_phone() -> StageConfig {
        StageConfig {
            device: DeviceProfile {
                mobile: true,
                touch: true,
                memory_gb: 2.0,
                cores: 2,
                ..DeviceProfile::default()
            },
            ..StageConfig::default()
        }
    }

    /// Drive frames every `step` ms from `from` to `to`, polling timers too
    fn run(stage: &mut Stage, clock: &ManualClock, from: f64, to: f64, step: f64) {
        let mut t = from;
        while t <= to {
            clock.set(t);
            stage.advance_timers(t);
            if stage.wants_frame() {
                stage.animation_frame(t);
            }
            t += step;
        }
    }

    #[test]
    fn desktop_fallback_registers_all_tasks() {
        let clock = ManualClock::new();
        let stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        assert_eq!(stage.matrix().mode(), "fallback");
        assert_eq!(
            stage.scheduler().task_names(),
            vec![TASK_NAME, "HoloWave", "SonicWave", "CursorTrail"]
        );
        assert!(stage.particles().is_some());
        assert!(stage.lcl().is_some());
    }

    #[test]
    fn low_end_phone_runs_lean() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(low_end_phone(), clock.shared(), &NoWorkers).unwrap();
        assert_eq!(stage.matrix().mode(), "disabled");
        assert!(stage.hidden_matrix_canvas().is_some_and(|c| c.is_hidden()));
        assert_eq!(stage.scheduler().task_names(), vec!["HoloWave"]);
        assert!(stage.particles().is_none());
        assert!(stage.lcl().is_none());
        assert_eq!(stage.scheduler().target_fps(), 20.0);

        stage.start();
        let report = stage.report();
        assert_eq!(report.tier, PerformanceTier::Low);
        assert!(report.matrix.is_none());
        assert!(report.wave_state.is_none());
    }

    #[test]
    fn end_to_end_thirty_fps() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        assert!(stage.wants_frame());

        // one second of a 144 Hz display
        run(&mut stage, &clock, 1000.0 / 144.0, 1000.0, 1000.0 / 144.0);
        let report = stage.report();
        let rendered = report.scheduler.frames_rendered;
        assert!((29..=31).contains(&rendered), "rendered {}", rendered);
        assert_eq!(report.scheduler.task_failures, 0);
        assert_eq!(report.matrix.unwrap().frames_drawn, rendered);
    }

    #[test]
    fn hidden_page_stops_the_loop() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        run(&mut stage, &clock, 0.0, 200.0, 16.0);

        stage.dispatch(PageEvent::VisibilityChanged(Visibility::Hidden));
        assert!(!stage.wants_frame());
        let before = stage.report().scheduler.frames_rendered;
        run(&mut stage, &clock, 208.0, 1000.0, 16.0);
        assert_eq!(stage.report().scheduler.frames_rendered, before);

        stage.dispatch(PageEvent::VisibilityChanged(Visibility::Visible));
        assert!(stage.wants_frame());
        run(&mut stage, &clock, 1008.0, 1200.0, 16.0);
        assert!(stage.report().scheduler.frames_rendered > before);
    }

    #[test]
    fn theme_and_modes_reach_the_rain() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        stage.dispatch(PageEvent::ThemeChanged {
            color: Color::from_hex(0xff4500),
        });
        stage.dispatch(PageEvent::LightModeChanged(true));

        let matrix = stage.report().matrix.unwrap();
        assert_eq!(matrix.color, Color::from_hex(0xff4500));
        assert!(matrix.is_light_mode);
        assert!(!matrix.is_lcl_mode);
    }

    #[test]
    fn lcl_mode_mounts_field_and_pauses_rain() {
        let clock = ManualClock::starting_at(5_000.0);
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        stage.dispatch(PageEvent::LclModeChanged(true));

        let report = stage.report();
        assert!(report.matrix.unwrap().is_lcl_mode);
        assert!(report.lcl.as_ref().unwrap().mounted);

        run(&mut stage, &clock, 5_007.0, 6_000.0, 1000.0 / 144.0);
        let report = stage.report();
        assert!(report.lcl.unwrap().frames_drawn >= 25);
        assert_eq!(report.matrix.unwrap().frames_drawn, 0);

        stage.dispatch(PageEvent::LclModeChanged(false));
        assert!(!stage.lcl().unwrap().is_mounted());
        assert!(stage.lcl().unwrap().pending_request().is_none());
    }

    #[test]
    fn resize_is_debounced() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        assert_eq!(stage.report().matrix.unwrap().columns, 80);

        clock.set(100.0);
        stage.dispatch(PageEvent::Resized { width: 800, height: 600 });
        clock.set(130.0);
        stage.dispatch(PageEvent::Resized { width: 640, height: 480 });

        stage.advance_timers(170.0);
        assert_eq!(stage.report().matrix.unwrap().columns, 80);
        assert_eq!(stage.holo().borrow().canvas().width(), 640);

        stage.advance_timers(180.0);
        let matrix = stage.report().matrix.unwrap();
        assert_eq!(matrix.columns, 40);
        assert_eq!((matrix.width, matrix.height), (640, 480));
    }

    #[test]
    fn particles_cycle_on_timers() {
        let clock = ManualClock::new();
        let mut config = desktop();
        config.particles.capacity = Some(12);
        let mut stage = Stage::new(config, clock.shared(), &NoWorkers).unwrap();
        stage.start();

        let mut t = 0.0;
        while t <= 60_000.0 {
            stage.advance_timers(t);
            t += 100.0;
        }
        let particles = stage.report().particles.unwrap();
        assert_eq!(particles.capacity, 12);
        assert_eq!(particles.creations, 12);
        assert_eq!(particles.in_use, 12);
        assert!(particles.recycled >= 12);
    }

    #[test]
    fn glitch_status_resolves() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.glitch_status("NOMINAL");

        let mut t = 0.0;
        while t <= 1_000.0 {
            stage.advance_timers(t);
            t += 10.0;
        }
        assert_eq!(stage.status_text(), "NOMINAL");

        // restarting cancels the previous decode
        clock.set(1_000.0);
        stage.glitch_status("ALERT");
        stage.advance_timers(1_030.0);
        assert_eq!(stage.status_text().chars().count(), 5);
        assert_ne!(stage.status_text(), "ALERT");
    }

    #[test]
    fn boot_completes_after_content() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        stage.advance_timers(700.0);
        assert_eq!(stage.boot().unwrap().progress(), 70);

        clock.set(800.0);
        stage.content_ready();
        stage.advance_timers(800.0);
        assert_eq!(stage.boot().unwrap().phase(), BootPhase::AllGreen);
        stage.advance_timers(2_500.0);
        assert!(stage.boot().unwrap().is_removed());
    }

    #[test]
    fn wave_state_and_cursor_are_routed() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.set_wave_state(WaveState::Thinking);
        stage.set_tactical_mode(true);
        stage.pointer_moved(0.0, 0.0);
        stage.start();
        run(&mut stage, &clock, 0.0, 500.0, 1000.0 / 60.0);

        let report = stage.report();
        assert_eq!(report.wave_state, Some(WaveState::Thinking));
        let [lead, tail] = report.cursor_trail.unwrap();
        assert!(lead.x < 640.0 && tail.x < 640.0);
        assert!(lead.x < tail.x);
    }

    #[test]
    fn report_serializes() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &NoWorkers).unwrap();
        stage.start();
        let json = serde_json::to_value(stage.report()).unwrap();
        assert_eq!(json["tier"], "ultra");
        assert_eq!(json["matrix_mode"], "fallback");
        assert_eq!(json["boot"]["phase"], "render_core");
        assert_eq!(json["matrix"]["color"], "#39ff14");
    }

    #[test]
    fn worker_mode_stage_shuts_down_on_drop() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &ThreadSpawner).unwrap();
        assert_eq!(stage.matrix().mode(), "worker");
        assert!(!stage.scheduler().contains(TASK_NAME));
        stage.start();
        stage.dispatch(PageEvent::VisibilityChanged(Visibility::Hidden));
        assert!(!stage.report().matrix.unwrap().running);
        drop(stage);
    }

    #[test]
    fn worker_draws_while_frames_are_simulated() {
        let clock = ManualClock::new();
        let mut stage = Stage::new(desktop(), clock.shared(), &ThreadSpawner).unwrap();
        stage.start();
        run(&mut stage, &clock, 1000.0 / 60.0, 2000.0, 1000.0 / 60.0);
        assert!(stage.report().scheduler.frames_rendered > 0);

        // the worker keeps wall-clock time, however fast the host simulates
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        let mut drawn = 0;
        while drawn == 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(50));
            drawn = stage.report().matrix.unwrap().frames_drawn;
        }
        assert!(drawn > 0);
    }
}
