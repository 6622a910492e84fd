//! Geometry module
//!
//! Handles:
//! - Screen metrics and system bar insets
//! - The legal movement and resting rectangles for an overlay
//! - Proportional repositioning across screen changes

mod bounds;
mod metrics;

pub use bounds::{rescale_coordinate, LayoutBounds};
pub use metrics::{EdgeInsets, ScreenMetrics, SystemBarDimensions};

use serde::{Deserialize, Serialize};

/// A point in screen pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in screen pixels, all four edges inclusive
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    /// Check if a point lies within the rectangle, edges included
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Clamp a horizontal coordinate into `[left, right]`
    pub fn clamp_x(&self, x: i32) -> i32 {
        x.max(self.left).min(self.right)
    }

    /// Clamp a vertical coordinate into `[top, bottom]`
    pub fn clamp_y(&self, y: i32) -> i32 {
        y.max(self.top).min(self.bottom)
    }

    /// Clamp a point into the rectangle
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(self.clamp_x(point.x), self.clamp_y(point.y))
    }

    /// Collapse inverted edges onto their midpoint so that `left <= right` and
    /// `top <= bottom` always hold.
    pub fn normalized(self) -> Self {
        let mut rect = self;
        if rect.left > rect.right {
            let mid = midpoint(rect.left, rect.right);
            rect.left = mid;
            rect.right = mid;
        }
        if rect.top > rect.bottom {
            let mid = midpoint(rect.top, rect.bottom);
            rect.top = mid;
            rect.bottom = mid;
        }
        rect
    }
}

fn midpoint(a: i32, b: i32) -> i32 {
    saturate((a as i64 + b as i64).div_euclid(2))
}

/// Clamp a wide pixel value into the `i32` coordinate space
pub(crate) fn saturate(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
