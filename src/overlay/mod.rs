//! Overlay module - the single-overlay positioning engine
//!
//! Provides:
//! - Drag tracking from raw pointer events
//! - Edge-snap goal selection and the overshoot animation toward it
//! - `OverlayEngine`, which owns both plus the overlay's bounds and is the
//!   only thing that pushes coordinates to the host

mod animator;
mod content;
mod drag;
mod engine;

pub use animator::{snap_goal, AnimationFrame, EdgeSnapAnimation, Overshoot};
pub use content::{ContentContainer, OverlayContent};
pub use drag::{DragOutcome, DragPhase, DragTracker};
pub use engine::OverlayEngine;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pointer travel, in density-independent units, before a press becomes a drag
pub const MOVE_THRESHOLD_DP: f32 = 8.0;

/// Duration of the edge-snap animation
pub const MOVE_TO_EDGE_DURATION: Duration = Duration::from_millis(450);

/// Overshoot tension of the edge-snap easing curve
pub const MOVE_TO_EDGE_OVERSHOOT_TENSION: f32 = 1.25;

/// Where an overlay comes to rest after a drag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    /// Snap to the nearest horizontal edge
    #[default]
    Default,
    /// Always snap to the left edge
    Left,
    /// Always snap to the right edge
    Right,
    /// Stay where released, clamped to the resting rectangle
    None,
}

impl std::str::FromStr for MoveDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" | "nearest" => Ok(MoveDirection::Default),
            "left" => Ok(MoveDirection::Left),
            "right" => Ok(MoveDirection::Right),
            "none" => Ok(MoveDirection::None),
            other => Err(format!("unknown move direction: {}", other)),
        }
    }
}

/// Timing and threshold knobs for an engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTuning {
    pub move_threshold_dp: f32,
    pub snap_duration: Duration,
    pub overshoot_tension: f32,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            move_threshold_dp: MOVE_THRESHOLD_DP,
            snap_duration: MOVE_TO_EDGE_DURATION,
            overshoot_tension: MOVE_TO_EDGE_OVERSHOOT_TENSION,
        }
    }
}
