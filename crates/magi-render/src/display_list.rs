//! Recording canvas used by headless hosts and tests

use crate::canvas::Canvas2d;
use crate::command::DrawCommand;
use std::collections::VecDeque;

/// A [`Canvas2d`] that records the commands it receives.
///
/// A full-canvas clear drops everything recorded before it, since nothing
/// earlier can still be visible. Beyond that, only the newest `retention`
/// commands are kept so long-running effects without clears (the rain only
/// fades) stay bounded.
pub struct DisplayList {
    width: u32,
    height: u32,
    commands: VecDeque<DrawCommand>,
    retention: usize,
    submitted: u64,
    clears: u64,
}

impl DisplayList {
    pub const DEFAULT_RETENTION: usize = 16_384;

    pub fn new(width: u32, height: u32) -> Self {
        Self::with_retention(width, height, Self::DEFAULT_RETENTION)
    }

    pub fn with_retention(width: u32, height: u32, retention: usize) -> Self {
        Self {
            width,
            height,
            commands: VecDeque::new(),
            retention: retention.max(1),
            submitted: 0,
            clears: 0,
        }
    }

    /// Commands currently retained, oldest first
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Total commands ever submitted, including dropped ones
    pub fn submitted(&self) -> u64 {
        self.submitted
    }

    /// Number of full-canvas clears seen
    pub fn clears(&self) -> u64 {
        self.clears
    }

    /// Take all retained commands, leaving the list empty
    pub fn drain(&mut self) -> Vec<DrawCommand> {
        self.commands.drain(..).collect()
    }

    /// Rasterize retained glyphs onto a character grid with `cell`-pixel cells.
    ///
    /// Glyph `y` is a text baseline, so a glyph at `y` occupies the row above it.
    /// Later glyphs overwrite earlier ones.
    pub fn text_grid(&self, cell: f32) -> Vec<String> {
        if cell <= 0.0 {
            return Vec::new();
        }
        let cols = (self.width as f32 / cell).ceil() as usize;
        let rows = (self.height as f32 / cell).ceil() as usize;
        let mut grid = vec![vec![' '; cols]; rows];

        for command in &self.commands {
            if let DrawCommand::Glyph { x, y, glyph, .. } = command {
                let col = (x / cell).floor();
                let row = (y / cell).ceil() - 1.0;
                if col < 0.0 || row < 0.0 {
                    continue;
                }
                let (col, row) = (col as usize, row as usize);
                if row < rows && col < cols {
                    grid[row][col] = *glyph;
                }
            }
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

impl Canvas2d for DisplayList {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn submit(&mut self, command: DrawCommand) {
        self.submitted += 1;
        if command.clears(self.width, self.height) {
            self.clears += 1;
            self.commands.clear();
        }
        self.commands.push_back(command);
        while self.commands.len() > self.retention {
            self.commands.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Glow;
    use magi_core::{Color, Point};

    #[test]
    fn records_in_order() {
        let mut list = DisplayList::new(100, 50);
        list.fill(Color::BLACK);
        list.fill_circle(Point::new(10.0, 10.0), 4.0, Color::WHITE);

        let commands: Vec<_> = list.commands().collect();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::FillRect { w, h, .. } if *w == 100.0 && *h == 50.0));
        assert!(matches!(commands[1], DrawCommand::FillCircle { .. }));
    }

    #[test]
    fn full_clear_drops_history() {
        let mut list = DisplayList::new(100, 50);
        list.fill(Color::BLACK);
        list.fill(Color::WHITE);
        list.clear();
        list.fill(Color::WHITE);

        assert_eq!(list.len(), 2);
        assert_eq!(list.clears(), 1);
        assert_eq!(list.submitted(), 4);
    }

    #[test]
    fn partial_clear_keeps_history() {
        let mut list = DisplayList::new(100, 50);
        list.fill(Color::BLACK);
        list.submit(DrawCommand::ClearRect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 });
        assert_eq!(list.len(), 2);
        assert_eq!(list.clears(), 0);
    }

    #[test]
    fn retention_bounds_memory() {
        let mut list = DisplayList::with_retention(10, 10, 3);
        for _ in 0..10 {
            list.fill(Color::BLACK);
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.submitted(), 10);
    }

    #[test]
    fn degenerate_paths_are_ignored() {
        let mut list = DisplayList::new(10, 10);
        list.stroke_path(vec![Point::ZERO], Color::WHITE, 1.0, 1.0);
        list.fill_path(vec![Point::ZERO, Point::new(1.0, 1.0)], Color::WHITE, 1.0);
        assert!(list.is_empty());
    }

    #[test]
    fn text_grid_places_glyphs_above_baseline() {
        let mut list = DisplayList::new(48, 32);
        list.fill_glyph('ア', 0.0, 16.0, 16.0, Color::MAGI_GREEN, Glow::NONE);
        list.fill_glyph('Z', 32.0, 32.0, 16.0, Color::MAGI_GREEN, Glow::NONE);
        list.fill_glyph('X', 16.0, 0.0, 16.0, Color::MAGI_GREEN, Glow::NONE);

        let grid = list.text_grid(16.0);
        assert_eq!(grid, vec!["ア  ".to_string(), "  Z".to_string()]);
    }

    #[test]
    fn resize_wipes() {
        let mut list = DisplayList::new(10, 10);
        list.fill(Color::BLACK);
        list.set_size(20, 30);
        assert!(list.is_empty());
        assert_eq!((list.width(), list.height()), (20, 30));
    }
}
