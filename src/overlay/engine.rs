//! Overlay positioning engine
//!
//! One `OverlayEngine` per overlay window. It owns the drag tracker, the
//! in-flight snap animation and the bounds, reacts to layout changes, and is
//! the sole component that pushes coordinates to the host.

use std::time::Instant;

use tracing::{debug, trace, warn};

use super::animator::{snap_goal, EdgeSnapAnimation, Overshoot};
use super::content::ContentContainer;
use super::drag::{DragOutcome, DragPhase, DragTracker};
use super::{EngineTuning, MoveDirection};
use crate::geometry::{
    rescale_coordinate, saturate, EdgeInsets, LayoutBounds, Point, ScreenMetrics, SystemBarDimensions,
};
use crate::host::{HostError, OverlayId, WindowHost, WindowParams};
use crate::input::{ObserverChain, PointerAction, PointerEvent, PointerObserver};

pub struct OverlayEngine {
    id: OverlayId,
    params: WindowParams,
    metrics: ScreenMetrics,
    bars: SystemBarDimensions,
    insets: EdgeInsets,
    bounds: LayoutBounds,
    /// Measured overlay size in pixels
    size: (u32, u32),
    /// Requested initial position; `None` falls back to bottom-left
    initial: (Option<i32>, Option<i32>),
    move_direction: MoveDirection,
    over_margin: i32,
    animate_initial_move: bool,
    tuning: EngineTuning,
    drag: DragTracker,
    animation: Option<EdgeSnapAnimation>,
    observers: ObserverChain,
    content: Option<ContentContainer>,
    laid_out: bool,
    destroyed: bool,
    /// First host failure not yet collected by the owner
    host_failure: Option<HostError>,
}

impl OverlayEngine {
    /// Create an engine for a new overlay, capturing the current screen
    pub fn new(
        id: OverlayId,
        host: &dyn WindowHost,
        initial_x: Option<i32>,
        initial_y: Option<i32>,
        tuning: EngineTuning,
    ) -> Self {
        let bars = host.system_bars();
        Self {
            id,
            params: WindowParams::default(),
            metrics: host.screen_metrics(),
            bars,
            insets: EdgeInsets::new(&bars),
            bounds: LayoutBounds::default(),
            size: (0, 0),
            initial: (initial_x, initial_y),
            move_direction: MoveDirection::Default,
            over_margin: 0,
            animate_initial_move: true,
            tuning,
            drag: DragTracker::new(),
            animation: None,
            observers: ObserverChain::new(),
            content: None,
            laid_out: false,
            destroyed: false,
            host_failure: None,
        }
    }

    pub fn set_over_margin(&mut self, margin: i32) {
        self.over_margin = margin;
    }

    pub fn set_move_direction(&mut self, direction: MoveDirection) {
        self.move_direction = direction;
    }

    pub fn set_animate_initial_move(&mut self, animate: bool) {
        self.animate_initial_move = animate;
    }

    /// Embed content; the window takes the container's declared dimensions
    pub fn set_content(&mut self, content: ContentContainer) {
        let (width, height) = content.dimensions();
        self.params.width = width;
        self.params.height = height;
        self.content = Some(content);
    }

    /// Measured size of the embedded content, if any
    pub fn measure_content(&self) -> Option<(u32, u32)> {
        self.content.as_ref().map(ContentContainer::measure)
    }

    pub fn add_observer(&mut self, observer: Box<dyn PointerObserver>) {
        self.observers.push(observer);
    }

    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn window_params(&self) -> &WindowParams {
        &self.params
    }

    pub fn position(&self) -> Point {
        Point::new(self.params.x, self.params.y)
    }

    pub fn bounds(&self) -> &LayoutBounds {
        &self.bounds
    }

    pub fn insets(&self) -> &EdgeInsets {
        &self.insets
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn move_direction(&self) -> MoveDirection {
        self.move_direction
    }

    pub fn phase(&self) -> DragPhase {
        self.drag.phase()
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn is_laid_out(&self) -> bool {
        self.laid_out
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Collect the first host failure since the last call
    pub fn take_host_failure(&mut self) -> Option<HostError> {
        self.host_failure.take()
    }

    /// The overlay was measured at a new size
    pub fn on_measured_size_changed(&mut self, width: u32, height: u32, host: &mut dyn WindowHost) {
        let size_changed = self.size != (width, height);
        self.size = (width, height);
        self.update_layout(size_changed, host);
    }

    /// Screen rotated or the multi-window area was resized
    pub fn on_screen_configuration_changed(&mut self, host: &mut dyn WindowHost) {
        self.update_layout(false, host);
    }

    /// System bars were shown or hidden, or the orientation changed
    pub fn on_system_bar_visibility_changed(
        &mut self,
        hide_status_bar: bool,
        hide_navigation_bar: bool,
        portrait: bool,
        host: &mut dyn WindowHost,
    ) {
        self.insets = EdgeInsets::derive(&self.bars, hide_status_bar, hide_navigation_bar, portrait);
        self.update_layout(true, host);
    }

    /// Initial placement. Runs once; later calls return `false`.
    pub fn on_first_layout(&mut self, host: &mut dyn WindowHost) -> bool {
        if self.laid_out || self.destroyed {
            return false;
        }
        self.laid_out = true;

        let x = self.initial.0.unwrap_or(0);
        let y = self.initial.1.unwrap_or_else(|| {
            saturate(self.metrics.height as i64 - self.insets.status_bar_height as i64 - self.size.1 as i64)
        });
        self.initial = (Some(x), Some(y));
        self.params.x = x;
        self.params.y = y;

        let start = Point::new(x, y);
        if self.move_direction == MoveDirection::None {
            self.move_to(start, start, false, host);
        } else {
            self.move_to_edge(start, self.animate_initial_move, host);
        }

        debug!(overlay = %self.id, x = self.params.x, y = self.params.y, "initial placement");
        self.push_layout(host);
        true
    }

    /// Feed one pointer event through the drag state machine. Always consumed.
    pub fn dispatch_pointer_event(&mut self, event: &PointerEvent, host: &mut dyn WindowHost) -> bool {
        if self.destroyed {
            return true;
        }
        if event.action == PointerAction::Down {
            self.cancel_animation();
        }

        let threshold = self.metrics.dp_to_px(self.tuning.move_threshold_dp);
        match self.drag.handle(event, threshold) {
            DragOutcome::Moved(position) => {
                self.params.x = position.x;
                self.params.y = position.y;
                trace!(overlay = %self.id, x = position.x, y = position.y, "drag");
                self.push_layout(host);
            }
            DragOutcome::Released(start) => {
                self.move_to_edge(start, true, host);
            }
            DragOutcome::Tap => {
                debug!(overlay = %self.id, "tap");
                if let Some(content) = self.content.as_mut() {
                    content.perform_click();
                }
            }
            DragOutcome::Absorbed | DragOutcome::Ignored => {}
        }

        self.observers.notify(self.id, event);
        true
    }

    /// Advance the snap animation. Returns whether it is still running.
    pub fn on_animation_frame(&mut self, now: Instant, host: &mut dyn WindowHost) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let frame = animation.sample(now);
        self.params.x = frame.x;
        trace!(overlay = %self.id, x = frame.x, "snap frame");
        self.push_layout(host);

        if frame.finished {
            self.animation = None;
            self.drag.finish_settling();
            debug!(overlay = %self.id, x = self.params.x, y = self.params.y, "settled");
            return false;
        }
        true
    }

    /// Stop animating and detach from further callbacks. Idempotent.
    pub fn destroy(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        self.cancel_animation();
        self.observers.clear();
        self.destroyed = true;
        debug!(overlay = %self.id, "destroyed");
        true
    }

    fn update_layout(&mut self, size_changed: bool, host: &mut dyn WindowHost) {
        if self.destroyed {
            return;
        }
        self.cancel_animation();

        let old_metrics = self.metrics;
        let old_limit = self.bounds.position_limit;

        self.metrics = host.screen_metrics();
        let (width, height) = self.size;
        self.bounds = LayoutBounds::compute(&self.metrics, width, height, &self.insets, self.over_margin);
        let limit = self.bounds.position_limit;
        debug!(overlay = %self.id, ?limit, size_changed, "layout recomputed");

        // Nothing is placed until the first layout pass
        if !self.laid_out {
            return;
        }

        let screen_changed =
            old_metrics.width != self.metrics.width || old_metrics.height != self.metrics.height;
        if !size_changed && !screen_changed {
            return;
        }

        self.params.x = match self.move_direction {
            MoveDirection::Default => self.bounds.nearest_edge_x(self.params.x, &self.metrics, width),
            MoveDirection::Left => limit.left,
            MoveDirection::Right => limit.right,
            MoveDirection::None => {
                limit.clamp_x(rescale_coordinate(self.params.x, old_limit.width(), limit.width()))
            }
        };
        self.params.y = limit.clamp_y(rescale_coordinate(self.params.y, old_limit.height(), limit.height()));
        self.push_layout(host);
    }

    fn move_to_edge(&mut self, start: Point, with_animation: bool, host: &mut dyn WindowHost) {
        let goal = snap_goal(self.move_direction, start, &self.bounds, &self.metrics, self.size.0);
        self.move_to(start, goal, with_animation, host);
    }

    fn move_to(&mut self, current: Point, goal: Point, with_animation: bool, host: &mut dyn WindowHost) {
        let goal = self.bounds.position_limit.clamp(goal);
        debug!(overlay = %self.id, ?current, ?goal, with_animation, "move to");

        if with_animation && current.x != goal.x {
            self.params.y = goal.y;
            self.animation = Some(EdgeSnapAnimation::new(
                current.x,
                goal.x,
                self.tuning.snap_duration,
                Overshoot::new(self.tuning.overshoot_tension),
            ));
            self.drag.begin_settling();
        } else if self.params.x != goal.x || self.params.y != goal.y {
            self.params.x = goal.x;
            self.params.y = goal.y;
            self.push_layout(host);
        }
        self.drag.reset_touch();
    }

    fn cancel_animation(&mut self) {
        if let Some(animation) = self.animation.take() {
            debug!(overlay = %self.id, from = animation.from(), goal = animation.goal(), "snap cancelled");
            self.drag.finish_settling();
        }
    }

    fn push_layout(&mut self, host: &mut dyn WindowHost) {
        if let Err(e) = host.update_window_layout(self.id, &self.params) {
            warn!(overlay = %self.id, "window update failed: {}", e);
            if self.host_failure.is_none() {
                self.host_failure = Some(e);
            }
        }
    }
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("id", &self.id)
            .field("position", &self.position())
            .field("size", &self.size)
            .field("phase", &self.drag.phase())
            .field("animating", &self.animation.is_some())
            .finish()
    }
}
