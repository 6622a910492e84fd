//! Pointer event types
//!
//! Platform-independent representation of single-pointer touch input.

use serde::{Deserialize, Serialize};

/// Phase of a pointer gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Down,
    Move,
    Up,
    Cancel,
}

/// A single pointer event delivered to an overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub action: PointerAction,
    /// Pointer position in screen coordinates
    pub raw_x: f32,
    pub raw_y: f32,
    /// Pointer position relative to the overlay's top-left corner
    pub local_x: f32,
    pub local_y: f32,
}

impl PointerEvent {
    pub fn new(action: PointerAction, raw_x: f32, raw_y: f32, local_x: f32, local_y: f32) -> Self {
        Self {
            action,
            raw_x,
            raw_y,
            local_x,
            local_y,
        }
    }

    pub fn down(raw_x: f32, raw_y: f32, local_x: f32, local_y: f32) -> Self {
        Self::new(PointerAction::Down, raw_x, raw_y, local_x, local_y)
    }

    /// Move event; the local position is not used once a gesture is armed
    pub fn moved(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Move, raw_x, raw_y, 0.0, 0.0)
    }

    pub fn up(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Up, raw_x, raw_y, 0.0, 0.0)
    }

    pub fn cancel(raw_x: f32, raw_y: f32) -> Self {
        Self::new(PointerAction::Cancel, raw_x, raw_y, 0.0, 0.0)
    }
}
