//! Page-level notifications consumed by the effects runtime

use magi_core::Color;

/// Whether the page is currently shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(self) -> bool {
        self == Visibility::Visible
    }
}

/// Events raised by the page host
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    VisibilityChanged(Visibility),
    /// Viewport resized, CSS pixels
    Resized { width: u32, height: u32 },
    /// The theme's secondary color changed
    ThemeChanged { color: Color },
    LightModeChanged(bool),
    /// Full-screen LCL background toggled
    LclModeChanged(bool),
}
