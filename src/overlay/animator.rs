//! Edge-snap animation
//!
//! Picks the resting position for a released overlay and interpolates its
//! horizontal coordinate toward it. The vertical coordinate is never
//! animated.

use std::time::{Duration, Instant};

use super::MoveDirection;
use crate::geometry::{LayoutBounds, Point, ScreenMetrics};

/// Easing curve that runs past the target and settles back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overshoot {
    tension: f32,
}

impl Overshoot {
    pub fn new(tension: f32) -> Self {
        Self { tension }
    }

    /// Map linear progress `t` in `[0, 1]` onto the eased fraction
    pub fn interpolate(&self, t: f32) -> f32 {
        let t = t - 1.0;
        t * t * ((self.tension + 1.0) * t + self.tension) + 1.0
    }
}

/// Goal position for a snap starting at `start`, clamped into the resting
/// rectangle.
pub fn snap_goal(
    direction: MoveDirection,
    start: Point,
    bounds: &LayoutBounds,
    metrics: &ScreenMetrics,
    overlay_width: u32,
) -> Point {
    let limit = bounds.position_limit;
    let x = match direction {
        MoveDirection::Default => bounds.nearest_edge_x(start.x, metrics, overlay_width),
        MoveDirection::Left => limit.left,
        MoveDirection::Right => limit.right,
        MoveDirection::None => start.x,
    };
    limit.clamp(Point::new(x, start.y))
}

/// One sampled step of an animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    pub x: i32,
    pub finished: bool,
}

/// Horizontal move toward a snap goal
///
/// The clock starts on the first sampled frame, so an animation created
/// between frames loses no time.
#[derive(Debug, Clone)]
pub struct EdgeSnapAnimation {
    from: i32,
    to: i32,
    duration: Duration,
    easing: Overshoot,
    started_at: Option<Instant>,
}

impl EdgeSnapAnimation {
    pub fn new(from: i32, to: i32, duration: Duration, easing: Overshoot) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
            started_at: None,
        }
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn goal(&self) -> i32 {
        self.to
    }

    /// Interpolated X at `now`
    pub fn sample(&mut self, now: Instant) -> AnimationFrame {
        let started_at = *self.started_at.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started_at);

        if self.duration.is_zero() || elapsed >= self.duration {
            return AnimationFrame {
                x: self.to,
                finished: true,
            };
        }

        let progress = elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let fraction = self.easing.interpolate(progress);
        let span = self.to as f64 - self.from as f64;
        let x = (self.from as f64 + fraction as f64 * span) as i32;
        AnimationFrame { x, finished: false }
    }
}
