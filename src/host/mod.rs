//! Host window-management interface
//!
//! The host composites overlay windows on screen. Overlays only ever hand it
//! absolute coordinates and a fixed set of layering flags; nothing here
//! inspects the host any further.

mod recording;

pub use recording::{HostCall, RecordingHost};

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{ScreenMetrics, SystemBarDimensions};

/// Identifies one overlay window for its whole lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OverlayId(pub u64);

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay-{}", self.0)
    }
}

/// Errors reported by the host window-management facility
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Overlay permission denied: {0}")]
    PermissionDenied(String),

    #[error("Unknown window: {0}")]
    UnknownWindow(OverlayId),

    #[error("Window already added: {0}")]
    AlreadyAdded(OverlayId),
}

pub type HostResult<T> = Result<T, HostError>;

bitflags! {
    /// Window behavior flags pushed with every placement
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct WindowFlags: u8 {
        /// Layered above all other on-screen content
        const ALWAYS_ON_TOP = 1 << 0;
        /// Never takes input focus
        const NOT_FOCUSABLE = 1 << 1;
        /// May be positioned partially beyond the screen bounds
        const LAYOUT_NO_LIMITS = 1 << 2;
        /// Touches outside the window go to the windows behind it
        const NOT_TOUCH_MODAL = 1 << 3;
    }
}

impl WindowFlags {
    /// Flags every overlay window carries
    pub fn overlay() -> Self {
        Self::ALWAYS_ON_TOP | Self::NOT_FOCUSABLE | Self::LAYOUT_NO_LIMITS | Self::NOT_TOUCH_MODAL
    }
}

/// Window size along one axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowDimension {
    /// Size to the embedded content
    #[default]
    WrapContent,
    /// Fixed size in pixels
    Px(u32),
}

impl WindowDimension {
    /// Fixed size from a possibly negative pixel count; negatives clamp to zero
    pub fn from_px(px: i32) -> Self {
        WindowDimension::Px(px.max(0) as u32)
    }

    /// Resolve against the content's preferred size
    pub fn resolve(&self, content: u32) -> u32 {
        match self {
            WindowDimension::WrapContent => content,
            WindowDimension::Px(px) => *px,
        }
    }
}

/// Pixel format of the window surface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelFormat {
    #[default]
    Translucent,
}

/// Corner the window coordinates are measured from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    TopLeft,
}

/// Layout parameters pushed to the host for one overlay window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowParams {
    /// Absolute X of the top-left corner in pixels
    pub x: i32,
    /// Absolute Y of the top-left corner in pixels
    pub y: i32,
    pub width: WindowDimension,
    pub height: WindowDimension,
    pub flags: WindowFlags,
    pub format: PixelFormat,
    pub anchor: Anchor,
}

impl Default for WindowParams {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: WindowDimension::WrapContent,
            height: WindowDimension::WrapContent,
            flags: WindowFlags::overlay(),
            format: PixelFormat::Translucent,
            anchor: Anchor::TopLeft,
        }
    }
}

/// The host window-management facility
///
/// All calls are fire-and-forget from the overlay's point of view: the
/// returned error is reported, never retried.
pub trait WindowHost: Send {
    /// Display a new window
    fn add_window(&mut self, id: OverlayId, params: &WindowParams) -> HostResult<()>;

    /// Move or resize an existing window
    fn update_window_layout(&mut self, id: OverlayId, params: &WindowParams) -> HostResult<()>;

    /// Remove a window without waiting for the next frame
    fn remove_window_immediate(&mut self, id: OverlayId) -> HostResult<()>;

    /// Current screen size and density
    fn screen_metrics(&self) -> ScreenMetrics;

    /// Raw system bar dimensions
    fn system_bars(&self) -> SystemBarDimensions;
}
