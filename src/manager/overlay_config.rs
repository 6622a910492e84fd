//! Per-overlay configuration accepted by `OverlayManager::add_overlay`

use serde::{Deserialize, Serialize};

use crate::host::WindowDimension;
use crate::overlay::MoveDirection;

/// How a new overlay is sized, placed and snapped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Initial X; unset places the overlay at the left edge
    pub x: Option<i32>,
    /// Initial Y; unset places the overlay at the bottom of the screen
    pub y: Option<i32>,
    /// Width in pixels; unset sizes to the content
    pub width: Option<i32>,
    /// Height in pixels; unset sizes to the content
    pub height: Option<i32>,
    /// Signed distance the overlay may rest beyond the left and right edges
    pub over_margin: i32,
    pub move_direction: MoveDirection,
    /// Animate the snap of the initial placement
    pub animate_initial_move: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            x: None,
            y: None,
            width: None,
            height: None,
            over_margin: 0,
            move_direction: MoveDirection::Default,
            animate_initial_move: true,
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_over_margin(mut self, margin: i32) -> Self {
        self.over_margin = margin;
        self
    }

    pub fn with_move_direction(mut self, direction: MoveDirection) -> Self {
        self.move_direction = direction;
        self
    }

    pub fn with_animate_initial_move(mut self, animate: bool) -> Self {
        self.animate_initial_move = animate;
        self
    }

    pub fn width_dimension(&self) -> WindowDimension {
        self.width.map_or(WindowDimension::WrapContent, WindowDimension::from_px)
    }

    pub fn height_dimension(&self) -> WindowDimension {
        self.height.map_or(WindowDimension::WrapContent, WindowDimension::from_px)
    }
}
