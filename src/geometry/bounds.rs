//! Overlay bounds calculation
//!
//! Derives where an overlay may move and where it may come to rest from the
//! current screen, the overlay's own size, the system bar insets and the
//! configured over-margin.

use super::{saturate, EdgeInsets, Rect, ScreenMetrics};

/// Movement and resting limits for one overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutBounds {
    /// Transient limit for the overlay's reference point; one overlay size
    /// beyond every screen edge.
    pub move_limit: Rect,
    /// Legal resting rectangle for the overlay's top-left corner
    pub position_limit: Rect,
}

impl LayoutBounds {
    /// Compute the limits for an overlay of `width` x `height` pixels
    pub fn compute(
        metrics: &ScreenMetrics,
        width: u32,
        height: u32,
        insets: &EdgeInsets,
        over_margin: i32,
    ) -> Self {
        let screen_width = metrics.width as i64;
        let screen_height = metrics.height as i64;
        let width = width as i64;
        let height = height as i64;
        let nav_horizontal = insets.navigation_bar_horizontal_offset as i64;
        let nav_vertical = insets.navigation_bar_vertical_offset as i64;
        let status_bar = insets.status_bar_height as i64;
        let over_margin = over_margin as i64;

        let move_limit = Rect::new(
            saturate(-width),
            saturate(-height * 2),
            saturate(screen_width + width + nav_horizontal),
            saturate(screen_height + height + nav_vertical),
        );

        let position_limit = Rect::new(
            saturate(-over_margin),
            0,
            saturate(screen_width - width + over_margin + nav_horizontal),
            saturate(screen_height - status_bar - height + nav_vertical),
        )
        .normalized();

        Self {
            move_limit,
            position_limit,
        }
    }

    /// Left edge if `x` is in the left half of the travel range, else right
    pub fn nearest_edge_x(&self, x: i32, metrics: &ScreenMetrics, width: u32) -> i32 {
        let half = (metrics.width as i64 - width as i64) / 2;
        if x as i64 > half {
            self.position_limit.right
        } else {
            self.position_limit.left
        }
    }
}

/// Scale a coordinate from an old limit dimension to a new one, keeping its
/// relative position. An empty old dimension leaves the coordinate unchanged.
pub fn rescale_coordinate(value: i32, old_dimension: i32, new_dimension: i32) -> i32 {
    if old_dimension == 0 {
        return value;
    }
    (value as f64 * new_dimension as f64 / old_dimension as f64).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, SystemBarDimensions};

    fn bars() -> SystemBarDimensions {
        SystemBarDimensions {
            status_bar_height: 72,
            navigation_bar_height: 144,
            navigation_bar_rotated_height: 120,
            tablet: false,
            hardware_navigation_keys: false,
        }
    }

    #[test]
    fn test_position_limit_reference_screen() {
        let metrics = ScreenMetrics::new(1080, 1920, 3.0);
        let insets = EdgeInsets::default();
        let bounds = LayoutBounds::compute(&metrics, 200, 200, &insets, 0);

        assert_eq!(bounds.position_limit, Rect::new(0, 0, 880, 1720));
        assert_eq!(bounds.move_limit, Rect::new(-200, -400, 1280, 2120));
    }

    #[test]
    fn test_position_limit_with_insets_and_margin() {
        let metrics = ScreenMetrics::new(1920, 1080, 3.0);
        let insets = EdgeInsets::derive(&bars(), false, true, false);
        let bounds = LayoutBounds::compute(&metrics, 200, 100, &insets, 16);

        assert_eq!(bounds.position_limit.left, -16);
        assert_eq!(bounds.position_limit.top, 0);
        assert_eq!(bounds.position_limit.right, 1920 - 200 + 16 + 120);
        assert_eq!(bounds.position_limit.bottom, 1080 - 72 - 100);
    }

    #[test]
    fn test_limits_never_invert() {
        let screens = [(0, 0), (100, 100), (1080, 1920), (1920, 1080), (320, 480)];
        let sizes = [0, 1, 50, 200, 500, 4000];
        let margins = [-300, 0, 24, 500];
        let bar_states = [(false, false, true), (true, true, false), (false, true, true)];

        for &(sw, sh) in &screens {
            let metrics = ScreenMetrics::new(sw, sh, 2.0);
            for &w in &sizes {
                for &h in &sizes {
                    for &margin in &margins {
                        for &(hide_status, hide_nav, portrait) in &bar_states {
                            let insets = EdgeInsets::derive(&bars(), hide_status, hide_nav, portrait);
                            let limit = LayoutBounds::compute(&metrics, w, h, &insets, margin)
                                .position_limit;
                            assert!(limit.left <= limit.right, "{:?}", limit);
                            assert!(limit.top <= limit.bottom, "{:?}", limit);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_oversized_overlay_collapses_to_point() {
        let metrics = ScreenMetrics::new(300, 400, 1.0);
        let bounds = LayoutBounds::compute(&metrics, 500, 600, &EdgeInsets::default(), 0);
        let limit = bounds.position_limit;
        assert_eq!(limit.width(), 0);
        assert_eq!(limit.height(), 0);
        assert_eq!(limit.clamp(Point::new(-1000, 1000)), Point::new(limit.left, limit.top));
    }

    #[test]
    fn test_extreme_sizes_and_margins_saturate() {
        let metrics = ScreenMetrics::new(1080, 1920, 3.0);
        let insets = EdgeInsets::derive(&bars(), true, true, true);
        for &size in &[i32::MAX as u32, u32::MAX] {
            for &margin in &[i32::MIN, i32::MAX] {
                let bounds = LayoutBounds::compute(&metrics, size, size, &insets, margin);
                let limit = bounds.position_limit;
                assert!(limit.left <= limit.right, "{:?}", limit);
                assert!(limit.top <= limit.bottom, "{:?}", limit);
                assert_eq!(bounds.move_limit.top, i32::MIN);
                assert_eq!(bounds.move_limit.right, i32::MAX);
            }
        }
    }

    #[test]
    fn test_nearest_edge() {
        let metrics = ScreenMetrics::new(1080, 1920, 3.0);
        let bounds = LayoutBounds::compute(&metrics, 200, 200, &EdgeInsets::default(), 0);
        assert_eq!(bounds.nearest_edge_x(900, &metrics, 200), 880);
        assert_eq!(bounds.nearest_edge_x(100, &metrics, 200), 0);
        assert_eq!(bounds.nearest_edge_x(440, &metrics, 200), 0);
        assert_eq!(bounds.nearest_edge_x(441, &metrics, 200), 880);
    }

    #[test]
    fn test_rescale_coordinate() {
        assert_eq!(rescale_coordinate(704, 880, 1720), 1376);
        assert_eq!(rescale_coordinate(0, 880, 1720), 0);
        assert_eq!(rescale_coordinate(123, 0, 1720), 123);
    }
}
