//! Boot overlay timeline

use serde::Serialize;

/// Minimum time the overlay stays up, from boot start
pub const MIN_DISPLAY_MS: f64 = 1500.0;
pub const STEP_MS: f64 = 300.0;
pub const FADE_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootPhase {
    RenderCore,
    SecureLink,
    /// Waits for page content, loaded or failed
    TacticalLogs,
    AllGreen,
    Fading,
    Removed,
}

impl BootPhase {
    pub fn progress(self) -> u8 {
        match self {
            BootPhase::RenderCore => 20,
            BootPhase::SecureLink => 40,
            BootPhase::TacticalLogs => 70,
            BootPhase::AllGreen | BootPhase::Fading | BootPhase::Removed => 100,
        }
    }

    pub fn status(self) -> &'static str {
        match self {
            BootPhase::RenderCore => "INITIALIZING RENDER CORE",
            BootPhase::SecureLink => "ESTABLISHING SECURE LINK",
            BootPhase::TacticalLogs => "RETRIEVING TACTICAL LOGS",
            BootPhase::AllGreen | BootPhase::Fading | BootPhase::Removed => {
                "SYSTEM SYNC COMPLETE · ALL GREEN"
            }
        }
    }

    fn next(self) -> Self {
        match self {
            BootPhase::RenderCore => BootPhase::SecureLink,
            BootPhase::SecureLink => BootPhase::TacticalLogs,
            BootPhase::TacticalLogs => BootPhase::AllGreen,
            BootPhase::AllGreen => BootPhase::Fading,
            BootPhase::Fading | BootPhase::Removed => BootPhase::Removed,
        }
    }
}

/// Progress overlay shown while the page boots. Polled with the current time.
#[derive(Debug, Clone)]
pub struct BootSequence {
    started_ms: f64,
    phase: BootPhase,
    entered_ms: f64,
    content_ready_ms: Option<f64>,
}

impl BootSequence {
    pub fn start(now_ms: f64) -> Self {
        log::info!("[boot] {}% {}", BootPhase::RenderCore.progress(), BootPhase::RenderCore.status());
        Self {
            started_ms: now_ms,
            phase: BootPhase::RenderCore,
            entered_ms: now_ms,
            content_ready_ms: None,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn progress(&self) -> u8 {
        self.phase.progress()
    }

    pub fn status(&self) -> &'static str {
        self.phase.status()
    }

    pub fn is_removed(&self) -> bool {
        self.phase == BootPhase::Removed
    }

    /// Page content finished loading, successfully or not. Only the first call counts.
    pub fn content_ready(&mut self, now_ms: f64) {
        if self.content_ready_ms.is_none() {
            self.content_ready_ms = Some(now_ms);
        }
    }

    /// When the current phase ends, if that is known yet
    pub fn next_due(&self) -> Option<f64> {
        match self.phase {
            BootPhase::RenderCore | BootPhase::SecureLink => Some(self.entered_ms + STEP_MS),
            BootPhase::TacticalLogs => self.content_ready_ms.map(|t| t.max(self.entered_ms)),
            BootPhase::AllGreen => Some((self.entered_ms + STEP_MS).max(self.started_ms + MIN_DISPLAY_MS)),
            BootPhase::Fading => Some(self.entered_ms + FADE_MS),
            BootPhase::Removed => None,
        }
    }

    /// Move through every phase that has ended by `now_ms`. Returns true if
    /// the phase changed.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let mut changed = false;
        while let Some(due) = self.next_due() {
            if due > now_ms {
                break;
            }
            self.phase = self.phase.next();
            self.entered_ms = due;
            changed = true;
            log::info!("[boot] {}% {:?}", self.phase.progress(), self.phase);
        }
        changed
    }
}
