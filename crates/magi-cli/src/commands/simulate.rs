//! Simulate command: a headless host that plays the part of the browser

use anyhow::{Context, Result};
use magi_matrix::ThreadSpawner;
use magi_runtime::{ManualClock, PageEvent, Visibility};
use magi_stage::Stage;
use std::path::Path;

/// When the simulated page reports its content as loaded
const CONTENT_READY_MS: f64 = 400.0;

pub struct SimulateArgs {
    pub seconds: f64,
    pub refresh_hz: f64,
    pub hide_at: Option<f64>,
    pub show_at: Option<f64>,
    pub no_worker: bool,
}

pub fn run(path: Option<&Path>, args: SimulateArgs) -> Result<()> {
    if !positive(args.seconds) || !positive(args.refresh_hz) {
        anyhow::bail!("--seconds and --refresh-hz must be positive");
    }

    let mut config = super::load_config(path)?;
    if args.no_worker {
        config.matrix.worker = false;
    }

    let clock = ManualClock::new();
    let mut stage = Stage::new(config, clock.shared(), &ThreadSpawner).context("Failed to build stage")?;
    stage.start();
    stage.glitch_status("SYSTEM NOMINAL");

    let end_ms = args.seconds * 1000.0;
    let vsync_ms = 1000.0 / args.refresh_hz;
    let mut hide_at = args.hide_at.map(|s| s * 1000.0);
    let mut show_at = args.show_at.map(|s| s * 1000.0);
    let mut content_ready = false;

    let mut frame = 1u64;
    loop {
        let t = frame as f64 * vsync_ms;
        if t > end_ms {
            break;
        }
        clock.set(t);

        if hide_at.is_some_and(|at| t >= at) {
            hide_at = None;
            stage.dispatch(PageEvent::VisibilityChanged(Visibility::Hidden));
        }
        if show_at.is_some_and(|at| t >= at) {
            show_at = None;
            stage.dispatch(PageEvent::VisibilityChanged(Visibility::Visible));
        }
        if !content_ready && t >= CONTENT_READY_MS {
            content_ready = true;
            stage.content_ready();
        }

        stage.advance_timers(t);
        if stage.wants_frame() {
            stage.animation_frame(t);
        }
        frame += 1;
    }

    log::info!("[simulate] {} vsyncs at {} Hz", frame - 1, args.refresh_hz);
    let report = stage.report();
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
