//! Embedded overlay content
//!
//! The content shown inside an overlay is opaque to the engine. It only needs
//! a preferred size and a way to receive a click.

use crate::host::WindowDimension;

/// Application surface embedded in an overlay
pub trait OverlayContent: Send {
    /// Size the content would like when the overlay wraps it
    fn preferred_size(&self) -> (u32, u32);

    /// A tap that never became a drag
    fn perform_click(&mut self);
}

/// Sized container wrapping caller-supplied content
pub struct ContentContainer {
    content: Box<dyn OverlayContent>,
    width: WindowDimension,
    height: WindowDimension,
}

impl ContentContainer {
    pub fn new(content: Box<dyn OverlayContent>, width: WindowDimension, height: WindowDimension) -> Self {
        Self {
            content,
            width,
            height,
        }
    }

    /// Measured size in pixels
    pub fn measure(&self) -> (u32, u32) {
        let (content_width, content_height) = self.content.preferred_size();
        (self.width.resolve(content_width), self.height.resolve(content_height))
    }

    pub fn dimensions(&self) -> (WindowDimension, WindowDimension) {
        (self.width, self.height)
    }

    pub fn perform_click(&mut self) {
        self.content.perform_click();
    }
}

impl std::fmt::Debug for ContentContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentContainer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
