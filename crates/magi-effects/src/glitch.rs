//! Status line decoder: scrambled glyphs resolve left to right

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub const GLITCH_CHARS: &str = "!<>-_[]{}—=+*^?#________";
pub const GLITCH_STEP_MS: f64 = 30.0;

/// Each step reveals half a character more of the target text
pub struct GlitchText {
    target: Vec<char>,
    revealed: f32,
    finished: bool,
    current: String,
    charset: Vec<char>,
    rng: Xoshiro256PlusPlus,
}

impl GlitchText {
    pub fn new(seed: u64) -> Self {
        Self {
            target: Vec::new(),
            revealed: 0.0,
            finished: true,
            current: String::new(),
            charset: GLITCH_CHARS.chars().collect(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    /// Start decoding `text`, abandoning any decode in progress
    pub fn set_text(&mut self, text: &str) {
        self.target = text.chars().collect();
        self.revealed = 0.0;
        self.finished = false;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// What the status line shows right now
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Render one step. Returns true while more steps are needed.
    pub fn step(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let revealed = self.revealed;
        let charset = &self.charset;
        let rng = &mut self.rng;
        self.current = self
            .target
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                if (i as f32) < revealed {
                    c
                } else {
                    charset[rng.random_range(0..charset.len())]
                }
            })
            .collect();

        if revealed >= self.target.len() as f32 {
            self.finished = true;
        }
        self.revealed += 0.5;
        !self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_after_two_steps_per_char() {
        let mut glitch = GlitchText::new(4);
        glitch.set_text("ALL GREEN");

        let mut steps = 1;
        while glitch.step() {
            steps += 1;
            assert_eq!(glitch.current().chars().count(), 9);
        }
        assert_eq!(steps, 9 * 2 + 1);
        assert_eq!(glitch.current(), "ALL GREEN");
        assert!(!glitch.step());
    }

    #[test]
    fn unrevealed_positions_use_glitch_glyphs() {
        let mut glitch = GlitchText::new(4);
        glitch.set_text("SYNC");
        glitch.step();
        assert!(glitch.current().chars().all(|c| GLITCH_CHARS.contains(c)));

        glitch.step();
        glitch.step();
        // revealed = 1.0 on the third step
        assert!(glitch.current().starts_with('S'));
    }

    #[test]
    fn set_text_restarts() {
        let mut glitch = GlitchText::new(4);
        glitch.set_text("ONE");
        glitch.step();
        glitch.set_text("二");
        assert!(!glitch.is_finished());
        assert!(glitch.step());
        assert!(glitch.step());
        assert!(!glitch.step());
        assert_eq!(glitch.current(), "二");
    }
}
