//! floatwin - draggable always-on-top overlays that snap to screen edges
//!
//! A platform-independent positioning engine: it tracks drags, computes the
//! limits an overlay may occupy, animates the snap to the nearest edge and
//! pushes coordinates to a `WindowHost` implemented by the embedding platform.

pub mod config;
pub mod geometry;
pub mod host;
pub mod input;
pub mod manager;
pub mod overlay;
pub mod runtime;

pub use config::Config;
pub use geometry::{Point, Rect};
pub use host::{OverlayId, WindowHost};
pub use input::{PointerAction, PointerEvent};
pub use manager::{OverlayConfig, OverlayManager};
pub use overlay::{MoveDirection, OverlayContent, OverlayEngine};
pub use runtime::{OverlayRuntime, RuntimeHandle};
