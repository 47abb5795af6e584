//! Mode selection and the page-facing matrix rain API

use crate::fallback::FallbackRenderer;
use crate::protocol::{MatrixMessage, MatrixReport};
use crate::state::{MatrixState, DEFAULT_FONT_SIZE};
use crate::worker::{WorkerHandle, WorkerSpawner};
use magi_core::{Color, DeviceProfile, MagiError, Result};
use magi_render::CanvasElement;
use magi_runtime::{FrameScheduler, SystemClock, Visibility};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Scheduler task name of the main-thread renderer
pub const TASK_NAME: &str = "MatrixRain";

const REPORT_TIMEOUT: Duration = Duration::from_millis(500);

/// What the host can do for the rain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub offscreen_transfer: bool,
    pub touch_primary: bool,
}

impl Capabilities {
    pub fn from_profile(profile: &DeviceProfile) -> Self {
        Self {
            offscreen_transfer: profile.offscreen_transfer,
            touch_primary: profile.touch,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixOptions {
    pub font_size: f32,
    pub color: Color,
    pub is_light_mode: bool,
    pub device_pixel_ratio: f32,
    /// Set to false to force the main-thread renderer
    pub allow_worker: bool,
    pub seed: u64,
}

impl Default for MatrixOptions {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            color: Color::MAGI_GREEN,
            is_light_mode: false,
            device_pixel_ratio: 1.0,
            allow_worker: true,
            seed: 0x6d61_6769,
        }
    }
}

/// The rain, in whichever mode was chosen at startup
pub enum MatrixRainEngine {
    /// A worker thread owns the canvas and runs its own loop
    Worker(WorkerHandle),
    /// Drawn on the caller's thread by the frame scheduler
    Fallback(Rc<RefCell<FallbackRenderer>>),
    /// Turned off by the effect budget; the canvas is hidden
    Disabled,
}

impl MatrixRainEngine {
    pub fn disabled(canvas: &mut CanvasElement) -> Self {
        log::info!("[matrix] matrix rain disabled (power saving)");
        canvas.set_hidden(true);
        MatrixRainEngine::Disabled
    }

    /// Pick a mode and start rendering.
    ///
    /// Worker mode needs offscreen transfer on a non-touch device. Any
    /// failure while setting the worker up falls back to the main thread.
    /// Errors only when the main-thread renderer cannot be built either.
    /// The worker paces itself on wall-clock time, whatever clock the
    /// scheduler runs on.
    pub fn init(
        mut canvas: CanvasElement,
        viewport: (u32, u32),
        capabilities: Capabilities,
        options: &MatrixOptions,
        scheduler: &mut FrameScheduler,
        spawner: &dyn WorkerSpawner,
    ) -> Result<Self> {
        let worker_capable = options.allow_worker
            && capabilities.offscreen_transfer
            && !capabilities.touch_primary
            && canvas.supports_offscreen();

        if worker_capable {
            match start_worker(&mut canvas, viewport, options, spawner) {
                Ok(handle) => {
                    log::info!("[matrix] render engine: worker mode");
                    return Ok(MatrixRainEngine::Worker(handle));
                }
                Err(err) => {
                    log::warn!("[matrix] worker init failed, falling back to main thread: {}", err)
                }
            }
        }

        let state = MatrixState::new(
            options.font_size,
            options.color,
            options.is_light_mode,
            options.device_pixel_ratio,
        );
        let renderer = FallbackRenderer::new(canvas, state, viewport.0, viewport.1, options.seed)?;
        let renderer = Rc::new(RefCell::new(renderer));
        scheduler.register_task(TASK_NAME, renderer.clone());
        log::info!("[matrix] render engine: main thread");
        Ok(MatrixRainEngine::Fallback(renderer))
    }

    pub fn mode(&self) -> &'static str {
        match self {
            MatrixRainEngine::Worker(_) => "worker",
            MatrixRainEngine::Fallback(_) => "fallback",
            MatrixRainEngine::Disabled => "disabled",
        }
    }

    pub fn set_color(&self, color: Color) {
        match self {
            MatrixRainEngine::Worker(handle) => post(handle, MatrixMessage::UpdateColor { color }),
            MatrixRainEngine::Fallback(renderer) => renderer.borrow_mut().state_mut().set_color(color),
            MatrixRainEngine::Disabled => {}
        }
    }

    pub fn set_modes(&self, is_light_mode: bool, is_lcl_mode: bool) {
        match self {
            MatrixRainEngine::Worker(handle) => post(
                handle,
                MatrixMessage::UpdateMode {
                    is_light_mode,
                    is_lcl_mode,
                },
            ),
            MatrixRainEngine::Fallback(renderer) => renderer
                .borrow_mut()
                .state_mut()
                .set_modes(is_light_mode, is_lcl_mode),
            MatrixRainEngine::Disabled => {}
        }
    }

    /// Viewport resized. Callers debounce this.
    pub fn resize(&self, width: u32, height: u32) {
        match self {
            MatrixRainEngine::Worker(handle) => post(handle, MatrixMessage::Resize { width, height }),
            MatrixRainEngine::Fallback(renderer) => renderer.borrow_mut().resize(width, height),
            MatrixRainEngine::Disabled => {}
        }
    }

    /// Only the worker needs this; the fallback pauses with the scheduler
    pub fn on_visibility(&self, visibility: Visibility) {
        if let MatrixRainEngine::Worker(handle) = self {
            match visibility {
                Visibility::Hidden => {
                    post(handle, MatrixMessage::Stop);
                    log::info!("[matrix] worker hibernating");
                }
                Visibility::Visible => {
                    post(handle, MatrixMessage::Start);
                    log::info!("[matrix] worker resumed");
                }
            }
        }
    }

    /// Snapshot of the renderer. `scheduler_running` is reported for the
    /// main-thread renderer, which has no loop of its own.
    pub fn report(&self, scheduler_running: bool) -> Option<MatrixReport> {
        match self {
            MatrixRainEngine::Worker(handle) => match handle.report(REPORT_TIMEOUT) {
                Ok(report) => Some(report),
                Err(err) => {
                    log::warn!("[matrix] no report from worker: {}", err);
                    None
                }
            },
            MatrixRainEngine::Fallback(renderer) => Some(renderer.borrow_mut().report(scheduler_running)),
            MatrixRainEngine::Disabled => None,
        }
    }

    /// Page unload: join the worker. No-op in other modes.
    pub fn shutdown(&mut self) {
        if let MatrixRainEngine::Worker(handle) = self {
            handle.shutdown();
        }
    }
}

fn post(handle: &WorkerHandle, message: MatrixMessage) {
    if let Err(err) = handle.send(message) {
        log::warn!("[matrix] {}", err);
    }
}

fn start_worker(
    canvas: &mut CanvasElement,
    (width, height): (u32, u32),
    options: &MatrixOptions,
    spawner: &dyn WorkerSpawner,
) -> Result<WorkerHandle> {
    let handle = spawner.spawn(SystemClock::shared(), options.seed)?;
    // Start goes first: if the worker is already gone the canvas has not moved yet
    handle.send(MatrixMessage::Start)?;
    let surface = canvas.transfer_control_to_offscreen()?;

    let init = MatrixMessage::Init {
        surface,
        width,
        height,
        dpr: options.device_pixel_ratio.min(1.0),
        font_size: options.font_size,
        color: options.color,
        is_light_mode: options.is_light_mode,
    };
    if let Err(undelivered) = handle.post(init) {
        // Take the canvas back so the main thread can still draw on it
        if let MatrixMessage::Init { surface, .. } = undelivered {
            let origin = surface.origin().to_string();
            *canvas = CanvasElement::new(origin, surface.into_inner());
        }
        return Err(MagiError::ChannelClosed("matrix worker exited before init".to_string()));
    }
    Ok(handle)
}
