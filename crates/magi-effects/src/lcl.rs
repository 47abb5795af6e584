//! LCL fluid background: rising amber bubbles on a red gradient
//!
//! Runs its own frame loop instead of the shared scheduler. While mounted it
//! always holds one frame request; hidden pages keep the request alive but
//! draw nothing.

use magi_core::{Color, Point, Result};
use magi_render::Canvas2d;
use magi_runtime::{FrameGate, FrameRequestId, Visibility};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use std::f32::consts::TAU;

pub const BUBBLE_COUNT: usize = 100;
pub const LCL_FPS: f64 = 30.0;

const PALETTE: [(u8, u8, u8, f32); 3] = [(255, 165, 0, 0.4), (255, 69, 0, 0.3), (255, 140, 0, 0.2)];

#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    pub position: Point,
    pub size: f32,
    pub speed: f32,
    pub color: Color,
    pub wobble: f32,
    pub wobble_speed: f32,
}

impl Bubble {
    fn spawn<R: Rng>(rng: &mut R, width: f32, height: f32, initial: bool) -> Self {
        let x = rng.random::<f32>() * width;
        let y = if initial {
            rng.random::<f32>() * height
        } else {
            height + rng.random::<f32>() * 100.0
        };
        let (r, g, b, a) = PALETTE[rng.random_range(0..PALETTE.len())];
        Self {
            position: Point::new(x, y),
            size: rng.random::<f32>() * 15.0 + 5.0,
            speed: rng.random::<f32>() + 0.5,
            color: Color::rgba8(r, g, b, a),
            wobble: rng.random::<f32>() * TAU,
            wobble_speed: rng.random::<f32>() * 0.05,
        }
    }

    fn update<R: Rng>(&mut self, rng: &mut R, width: f32, height: f32) {
        self.position.y -= self.speed;
        self.wobble += self.wobble_speed;
        self.position.x += self.wobble.sin() * 0.5;
        if self.position.y < -50.0 {
            *self = Bubble::spawn(rng, width, height, false);
        }
    }
}

/// Result of delivering a frame to the field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LclFrame {
    /// Not mounted or nothing requested; no new request
    Idle,
    /// Page hidden; next frame requested, nothing drawn
    Hibernating,
    Skipped,
    Drawn,
}

pub struct LclField<C> {
    canvas: C,
    bubbles: Vec<Bubble>,
    gate: FrameGate,
    device_pixel_ratio: f32,
    mounted: bool,
    pending: Option<FrameRequestId>,
    next_request: u64,
    frames_drawn: u64,
    rng: Xoshiro256PlusPlus,
}

impl<C: Canvas2d> LclField<C> {
    pub fn new(canvas: C, device_pixel_ratio: f32, seed: u64) -> Result<Self> {
        Ok(Self {
            canvas,
            bubbles: Vec::new(),
            gate: FrameGate::new(LCL_FPS)?,
            device_pixel_ratio: device_pixel_ratio.clamp(f32::MIN_POSITIVE, 1.0),
            mounted: false,
            pending: None,
            next_request: 0,
            frames_drawn: 0,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn pending_request(&self) -> Option<FrameRequestId> {
        self.pending
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// Viewport resized, CSS pixels
    pub fn resize(&mut self, width: u32, height: u32) {
        let dpr = self.device_pixel_ratio;
        self.canvas.set_size(
            (width as f32 * dpr).floor() as u32,
            (height as f32 * dpr).floor() as u32,
        );
    }

    /// LCL mode switched on: fresh bubbles, then the first frame runs
    /// immediately at `now_ms`. No-op while mounted.
    pub fn mount(&mut self, viewport: (u32, u32), now_ms: f64, visibility: Visibility) -> LclFrame {
        if self.mounted {
            return LclFrame::Idle;
        }
        self.resize(viewport.0, viewport.1);
        let (w, h) = self.size();
        self.bubbles = (0..BUBBLE_COUNT)
            .map(|_| Bubble::spawn(&mut self.rng, w, h, true))
            .collect();
        self.mounted = true;
        self.gate.reset(0.0);
        log::info!("[lcl] field mounted with {} bubbles", BUBBLE_COUNT);

        self.request_frame();
        self.on_animation_frame(now_ms, visibility)
    }

    /// LCL mode switched off: cancel the outstanding request
    pub fn unmount(&mut self) {
        if self.mounted {
            log::info!("[lcl] field unmounted");
        }
        self.mounted = false;
        self.pending = None;
    }

    pub fn on_animation_frame(&mut self, t_ms: f64, visibility: Visibility) -> LclFrame {
        if self.pending.take().is_none() || !self.mounted {
            return LclFrame::Idle;
        }
        self.request_frame();

        if !visibility.is_visible() {
            return LclFrame::Hibernating;
        }
        if !self.gate.accept_inclusive(t_ms) {
            return LclFrame::Skipped;
        }
        self.draw();
        LclFrame::Drawn
    }

    fn draw(&mut self) {
        let (w, h) = self.size();
        self.canvas.clear();
        self.canvas
            .fill_vertical_gradient(Color::rgba8(255, 140, 0, 0.1), Color::rgba8(139, 0, 0, 0.4));

        let shine = Color::rgba8(255, 255, 255, 0.3);
        for bubble in &mut self.bubbles {
            bubble.update(&mut self.rng, w, h);
            let Bubble {
                position, size, color, ..
            } = *bubble;
            self.canvas.fill_circle(position, size, color);
            self.canvas
                .fill_circle(position - Point::new(size * 0.3, size * 0.3), size * 0.2, shine);
        }
        self.frames_drawn += 1;
    }

    fn request_frame(&mut self) {
        self.next_request += 1;
        self.pending = Some(FrameRequestId(self.next_request));
    }

    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use magi_render::{DisplayList, DrawCommand};

    fn field() -> LclField<DisplayList> {
        LclField::new(DisplayList::new(0, 0), 2.0, 21).unwrap()
    }

    #[test]
    fn mount_spawns_bubbles_and_draws_first_frame() {
        let mut lcl = field();
        assert_eq!(lcl.on_animation_frame(100.0, Visibility::Visible), LclFrame::Idle);

        let frame = lcl.mount((800, 600), 1_000.0, Visibility::Visible);
        assert_eq!(frame, LclFrame::Drawn);
        assert!(lcl.pending_request().is_some());
        assert_eq!(lcl.bubbles().len(), BUBBLE_COUNT);
        // dpr is clamped to 1
        assert_eq!((lcl.canvas().width(), lcl.canvas().height()), (800, 600));

        for bubble in lcl.bubbles() {
            assert!((5.0..20.0).contains(&bubble.size));
            assert!((0.5..1.5).contains(&bubble.speed));
            assert!((0.0..0.05).contains(&bubble.wobble_speed));
        }
        assert_eq!(lcl.mount((800, 600), 1_010.0, Visibility::Visible), LclFrame::Idle);
    }

    #[test]
    fn frame_layout() {
        let mut lcl = field();
        lcl.mount((320, 240), 1_000.0, Visibility::Visible);
        let commands: Vec<_> = lcl.canvas().commands().collect();
        assert_eq!(commands.len(), 2 + BUBBLE_COUNT * 2);
        assert!(commands[0].clears(320, 240));
        match commands[1] {
            DrawCommand::FillGradient { stops, .. } => {
                assert_eq!(stops[0].color, Color::rgba8(255, 140, 0, 0.1));
                assert_eq!(stops[1].color, Color::rgba8(139, 0, 0, 0.4));
            }
            other => panic!("expected gradient, got {:?}", other),
        }
        match (commands[2], commands[3]) {
            (
                DrawCommand::FillCircle { center, radius, .. },
                DrawCommand::FillCircle {
                    center: shine,
                    radius: shine_radius,
                    color,
                },
            ) => {
                assert!((shine.x - (center.x - radius * 0.3)).abs() < 1e-4);
                assert!((shine_radius - radius * 0.2).abs() < 1e-4);
                assert_eq!(*color, Color::rgba8(255, 255, 255, 0.3));
            }
            other => panic!("expected bubble and shine, got {:?}", other),
        }
    }

    #[test]
    fn gated_at_30_fps() {
        let mut lcl = field();
        // 1010 is 30 intervals plus 10ms, so the baseline lands on 1000
        lcl.mount((100, 100), 1_010.0, Visibility::Visible);
        assert_eq!(lcl.on_animation_frame(1_026.0, Visibility::Visible), LclFrame::Skipped);
        assert_eq!(lcl.on_animation_frame(1_044.0, Visibility::Visible), LclFrame::Drawn);
        assert_eq!(lcl.frames_drawn(), 2);
    }

    #[test]
    fn hidden_keeps_requesting_without_work() {
        let mut lcl = field();
        lcl.mount((100, 100), 1_000.0, Visibility::Visible);
        let before = lcl.bubbles().to_vec();
        for i in 1..20 {
            let frame = lcl.on_animation_frame(1_000.0 + i as f64 * 100.0, Visibility::Hidden);
            assert_eq!(frame, LclFrame::Hibernating);
            assert!(lcl.pending_request().is_some());
        }
        assert_eq!(lcl.bubbles(), &before[..]);
        assert_eq!(lcl.frames_drawn(), 1);
    }

    #[test]
    fn unmount_cancels_request() {
        let mut lcl = field();
        lcl.mount((100, 100), 1_000.0, Visibility::Visible);
        lcl.unmount();
        assert!(lcl.pending_request().is_none());
        assert_eq!(lcl.on_animation_frame(2_000.0, Visibility::Visible), LclFrame::Idle);
        assert!(lcl.pending_request().is_none());
    }

    #[test]
    fn bubbles_rise_and_respawn_below() {
        let mut lcl = field();
        lcl.mount((200, 200), 1_000.0, Visibility::Visible);
        let mut t = 1_000.0;
        // the slowest bubble needs under 500 frames to clear 250px
        for _ in 0..600 {
            t += 1000.0 / 30.0 + 0.1;
            lcl.on_animation_frame(t, Visibility::Visible);
        }
        for bubble in lcl.bubbles() {
            assert!(bubble.position.y >= -50.0 - 1.5);
            assert!(bubble.position.y <= 300.0);
        }
        assert_eq!(lcl.frames_drawn(), 601);
    }
}
