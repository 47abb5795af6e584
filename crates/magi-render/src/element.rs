//! Canvas ownership: a main-thread element whose control can be handed
//! to exactly one other owner

use crate::canvas::Canvas2d;
use crate::command::DrawCommand;
use magi_core::{MagiError, Result};

/// A canvas that may be moved to a worker thread
pub type BoxedCanvas = Box<dyn Canvas2d + Send>;

/// A page canvas element.
///
/// Drawing goes through [`CanvasElement::context_2d`] until control is
/// transferred; after [`CanvasElement::transfer_control_to_offscreen`] the
/// element keeps only its identity and visibility.
pub struct CanvasElement {
    id: String,
    canvas: Option<BoxedCanvas>,
    offscreen_capable: bool,
    hidden: bool,
}

impl CanvasElement {
    pub fn new(id: impl Into<String>, canvas: BoxedCanvas) -> Self {
        Self {
            id: id.into(),
            canvas: Some(canvas),
            offscreen_capable: true,
            hidden: false,
        }
    }

    /// Mark whether the host supports offscreen transfer for this element
    pub fn with_offscreen_support(mut self, supported: bool) -> Self {
        self.offscreen_capable = supported;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when control can still be transferred
    pub fn supports_offscreen(&self) -> bool {
        self.offscreen_capable && self.canvas.is_some()
    }

    pub fn is_transferred(&self) -> bool {
        self.canvas.is_none()
    }

    /// The drawing context, or `None` once control was transferred
    pub fn context_2d(&mut self) -> Option<&mut BoxedCanvas> {
        self.canvas.as_mut()
    }

    /// Hand the backing canvas to a new exclusive owner. Can only succeed once.
    pub fn transfer_control_to_offscreen(&mut self) -> Result<OffscreenSurface> {
        if !self.offscreen_capable {
            return Err(MagiError::SurfaceTransfer(format!(
                "canvas '{}' does not support offscreen transfer",
                self.id
            )));
        }
        let canvas = self.canvas.take().ok_or_else(|| {
            MagiError::SurfaceTransfer(format!("canvas '{}' was already transferred", self.id))
        })?;
        log::debug!("canvas '{}' transferred offscreen", self.id);
        Ok(OffscreenSurface {
            origin: self.id.clone(),
            canvas,
        })
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

/// A canvas detached from its element, owned by whoever received it
pub struct OffscreenSurface {
    origin: String,
    canvas: BoxedCanvas,
}

impl OffscreenSurface {
    /// Id of the element this surface was transferred from
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn into_inner(self) -> BoxedCanvas {
        self.canvas
    }
}

impl Canvas2d for OffscreenSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas.set_size(width, height);
    }

    fn submit(&mut self, command: DrawCommand) {
        self.canvas.submit(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DisplayList;
    use magi_core::Color;

    fn element() -> CanvasElement {
        CanvasElement::new("matrix-bg", Box::new(DisplayList::new(64, 32)))
    }

    #[test]
    fn transfer_happens_once() {
        let mut el = element();
        assert!(el.supports_offscreen());

        let mut surface = el.transfer_control_to_offscreen().unwrap();
        assert_eq!(surface.origin(), "matrix-bg");
        assert!(el.is_transferred());
        assert!(el.context_2d().is_none());
        assert!(!el.supports_offscreen());

        surface.fill(Color::BLACK);
        assert_eq!(surface.width(), 64);

        let err = el.transfer_control_to_offscreen().err().unwrap();
        assert!(matches!(err, MagiError::SurfaceTransfer(_)));
    }

    #[test]
    fn unsupported_element_keeps_its_canvas() {
        let mut el = element().with_offscreen_support(false);
        assert!(!el.supports_offscreen());
        assert!(el.transfer_control_to_offscreen().is_err());
        assert!(el.context_2d().is_some());
    }

    #[test]
    fn hidden_flag() {
        let mut el = element();
        assert!(!el.is_hidden());
        el.set_hidden(true);
        assert!(el.is_hidden());
    }
}
