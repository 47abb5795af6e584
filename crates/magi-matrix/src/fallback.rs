//! Main-thread host for the rain, driven by the frame scheduler

use crate::protocol::MatrixReport;
use crate::state::MatrixState;
use magi_core::{MagiError, Result};
use magi_render::{Canvas2d, CanvasElement};
use magi_runtime::RenderTask;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Draws the rain straight onto the page canvas, one frame per scheduler tick
pub struct FallbackRenderer {
    canvas: CanvasElement,
    state: MatrixState,
    rng: Xoshiro256PlusPlus,
    frames_drawn: u64,
}

impl FallbackRenderer {
    /// Size the canvas for the viewport and seed the columns
    pub fn new(mut canvas: CanvasElement, mut state: MatrixState, width: u32, height: u32, seed: u64) -> Result<Self> {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        if canvas.is_transferred() {
            return Err(MagiError::SurfaceTransfer(format!(
                "'{}' has no 2d context",
                canvas.id()
            )));
        }
        if let Some(context) = canvas.context_2d() {
            state.resize(context, width, height, &mut rng);
        }
        Ok(Self {
            canvas,
            state,
            rng,
            frames_drawn: 0,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Some(context) = self.canvas.context_2d() {
            self.state.resize(context, width, height, &mut self.rng);
        }
    }

    pub fn state(&self) -> &MatrixState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut MatrixState {
        &mut self.state
    }

    pub fn canvas(&self) -> &CanvasElement {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut CanvasElement {
        &mut self.canvas
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// `running` is the scheduler's state; the renderer itself never pauses
    pub fn report(&mut self, running: bool) -> MatrixReport {
        let (width, height) = self
            .canvas
            .context_2d()
            .map(|c| (c.width(), c.height()))
            .unwrap_or((0, 0));
        MatrixReport {
            initialized: true,
            running,
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

impl RenderTask for FallbackRenderer {
    fn draw(&mut self) -> Result<()> {
        let context = self.canvas.context_2d().ok_or_else(|| MagiError::DrawError {
            task: crate::engine::TASK_NAME.to_string(),
            message: "canvas context lost".to_string(),
        })?;
        if self.state.draw(context, &mut self.rng) {
            self.frames_drawn += 1;
        }
        Ok(())
    }
}
