//! Input module - Pointer events delivered to overlays
//!
//! This module provides abstractions for:
//! - Single-pointer touch events in screen and overlay-local coordinates
//! - Observers that see every event an overlay receives

mod events;
mod traits;

// Re-export common types
pub use events::*;
pub use traits::*;
