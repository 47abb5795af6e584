//! The worker thread that owns the canvas in worker mode

use crate::protocol::{MatrixMessage, MatrixReport};
use crate::state::{MatrixState, DEFAULT_FONT_SIZE};
use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use magi_core::{Color, MagiError, Result};
use magi_render::{Canvas2d, OffscreenSurface};
use magi_runtime::{FrameGate, SharedClock};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::thread::JoinHandle;
use std::time::Duration;

/// Frame cap of the worker's own loop
pub const WORKER_FPS: f64 = 30.0;

/// Wake-up period standing in for vsync inside the worker
const TICK: Duration = Duration::from_micros(16_667);

/// Starts matrix workers. The engine goes through this so hosts (and tests)
/// can observe or refuse spawning.
pub trait WorkerSpawner {
    fn spawn(&self, clock: SharedClock, seed: u64) -> Result<WorkerHandle>;
}

/// Spawns a named OS thread per worker
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl WorkerSpawner for ThreadSpawner {
    fn spawn(&self, clock: SharedClock, seed: u64) -> Result<WorkerHandle> {
        let (sender, receiver) = channel::unbounded();
        let thread = std::thread::Builder::new()
            .name("magi-matrix".to_string())
            .spawn(move || run(receiver, clock, seed))
            .map_err(|e| MagiError::WorkerSpawn(e.to_string()))?;
        Ok(WorkerHandle {
            sender,
            thread: Some(thread),
        })
    }
}

/// Page-side end of a running worker. Dropping it shuts the worker down.
pub struct WorkerHandle {
    sender: Sender<MatrixMessage>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Post a message. On failure the undelivered message is handed back.
    pub fn post(&self, message: MatrixMessage) -> std::result::Result<(), MatrixMessage> {
        log::debug!("[matrix] -> worker: {:?}", message);
        self.sender.send(message).map_err(|e| e.into_inner())
    }

    /// Post a message that carries nothing worth recovering
    pub fn send(&self, message: MatrixMessage) -> Result<()> {
        let kind = message.kind();
        self.post(message)
            .map_err(|_| MagiError::ChannelClosed(format!("matrix worker gone, dropped '{}'", kind)))
    }

    /// Ask the worker for a snapshot, waiting at most `timeout`
    pub fn report(&self, timeout: Duration) -> Result<MatrixReport> {
        let (reply, answer) = channel::bounded(1);
        self.send(MatrixMessage::Report { reply })?;
        answer
            .recv_timeout(timeout)
            .map_err(|e| MagiError::ChannelClosed(format!("matrix worker report: {}", e)))
    }

    pub fn is_alive(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stop the worker thread and wait for it. Idempotent.
    pub fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.sender.send(MatrixMessage::Shutdown);
        if thread.join().is_err() {
            log::warn!("[matrix] worker thread panicked");
        } else {
            log::info!("[matrix] worker shut down");
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

struct MatrixWorker {
    clock: SharedClock,
    surface: Option<OffscreenSurface>,
    state: MatrixState,
    gate: FrameGate,
    rng: Xoshiro256PlusPlus,
    running: bool,
    frames_drawn: u64,
}

impl MatrixWorker {
    fn new(clock: SharedClock, seed: u64) -> Self {
        Self {
            clock,
            surface: None,
            state: MatrixState::new(DEFAULT_FONT_SIZE, Color::MAGI_GREEN, false, 1.0),
            gate: FrameGate::default(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            running: false,
            frames_drawn: 0,
        }
    }

    /// Apply one message. Returns false on shutdown.
    fn handle(&mut self, message: MatrixMessage) -> bool {
        match message {
            MatrixMessage::Init {
                mut surface,
                width,
                height,
                dpr,
                font_size,
                color,
                is_light_mode,
            } => {
                self.state = MatrixState::new(font_size, color, is_light_mode, dpr);
                self.state.resize(&mut surface, width, height, &mut self.rng);
                log::debug!(
                    "[matrix] worker initialized: {} columns on '{}'",
                    self.state.columns(),
                    surface.origin()
                );
                self.surface = Some(surface);
            }
            MatrixMessage::Start => {
                if !self.running {
                    self.running = true;
                    self.gate.reset(self.clock.now_ms());
                }
            }
            MatrixMessage::Stop => self.running = false,
            MatrixMessage::Resize { width, height } => {
                if let Some(surface) = self.surface.as_mut() {
                    self.state.resize(surface, width, height, &mut self.rng);
                }
            }
            MatrixMessage::UpdateColor { color } => self.state.set_color(color),
            MatrixMessage::UpdateMode {
                is_light_mode,
                is_lcl_mode,
            } => {
                self.state.set_modes(is_light_mode, is_lcl_mode);
                if is_lcl_mode {
                    if let Some(surface) = self.surface.as_mut() {
                        surface.clear();
                    }
                }
            }
            MatrixMessage::Report { reply } => {
                let _ = reply.send(self.report());
            }
            MatrixMessage::Shutdown => return false,
        }
        true
    }

    fn tick(&mut self) {
        if !self.running || !self.gate.accept(self.clock.now_ms()) {
            return;
        }
        if let Some(surface) = self.surface.as_mut() {
            if self.state.draw(surface, &mut self.rng) {
                self.frames_drawn += 1;
            }
        }
    }

    fn report(&self) -> MatrixReport {
        let (width, height) = self
            .surface
            .as_ref()
            .map(|s| (s.width(), s.height()))
            .unwrap_or((0, 0));
        MatrixReport {
            initialized: self.surface.is_some(),
            running: self.running,
            frames_drawn: self.frames_drawn,
            columns: self.state.columns(),
            width,
            height,
            color: self.state.color(),
            is_light_mode: self.state.is_light_mode(),
            is_lcl_mode: self.state.is_lcl_mode(),
        }
    }
}

fn run(receiver: Receiver<MatrixMessage>, clock: SharedClock, seed: u64) {
    let mut worker = MatrixWorker::new(clock, seed);
    loop {
        let next = if worker.running {
            receiver.recv_timeout(TICK)
        } else {
            // Nothing to animate; sleep until the page says something
            receiver.recv().map_err(|_| RecvTimeoutError::Disconnected)
        };
        match next {
            Ok(message) => {
                if !worker.handle(message) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        worker.tick();
    }
}
