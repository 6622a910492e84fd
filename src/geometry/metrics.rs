//! Screen metrics and system bar insets
//!
//! Platform-independent description of the display an overlay lives on.

use serde::{Deserialize, Serialize};

/// Size and density of the display, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenMetrics {
    /// Screen width in pixels
    pub width: u32,
    /// Screen height in pixels
    pub height: u32,
    /// Scale factor from density-independent units to pixels
    pub density: f32,
}

impl ScreenMetrics {
    pub fn new(width: u32, height: u32, density: f32) -> Self {
        Self {
            width,
            height,
            density,
        }
    }

    /// Convert density-independent units to device pixels
    pub fn dp_to_px(&self, dp: f32) -> f32 {
        dp * self.density
    }

    /// Same screen with width and height swapped
    pub fn rotated(&self) -> Self {
        Self::new(self.height, self.width, self.density)
    }

    pub fn is_portrait(&self) -> bool {
        self.height >= self.width
    }
}

impl Default for ScreenMetrics {
    fn default() -> Self {
        Self::new(1080, 1920, 3.0)
    }
}

/// Raw system bar sizes as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemBarDimensions {
    pub status_bar_height: u32,
    /// Navigation bar height when docked at the bottom
    pub navigation_bar_height: u32,
    /// Navigation bar size in the alternate orientation
    /// (bottom on a tablet, side on a phone)
    pub navigation_bar_rotated_height: u32,
    /// Large-screen device: the navigation bar stays at the bottom in landscape
    pub tablet: bool,
    /// Device has physical navigation keys and therefore no navigation bar
    pub hardware_navigation_keys: bool,
}

/// Insets derived from the system bars and their current visibility
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeInsets {
    pub status_bar_height: u32,
    pub navigation_bar_height: u32,
    pub navigation_bar_rotated_height: u32,
    pub navigation_bar_vertical_offset: u32,
    pub navigation_bar_horizontal_offset: u32,
}

impl EdgeInsets {
    /// Insets with every system bar visible
    pub fn new(bars: &SystemBarDimensions) -> Self {
        Self::derive(bars, false, false, true)
    }

    /// Derive insets for the given bar visibility and orientation.
    ///
    /// A hidden navigation bar frees space the overlay may rest in: at the
    /// bottom in portrait and on tablets, on the side for landscape phones.
    pub fn derive(
        bars: &SystemBarDimensions,
        hide_status_bar: bool,
        hide_navigation_bar: bool,
        portrait: bool,
    ) -> Self {
        let (navigation_bar_height, navigation_bar_rotated_height) = if bars.hardware_navigation_keys {
            (0, 0)
        } else {
            (bars.navigation_bar_height, bars.navigation_bar_rotated_height)
        };

        let (vertical, horizontal) = match (hide_navigation_bar, portrait, bars.tablet) {
            (false, _, _) => (0, 0),
            (true, true, _) => (navigation_bar_height, 0),
            (true, false, true) => (navigation_bar_rotated_height, 0),
            (true, false, false) => (0, navigation_bar_rotated_height),
        };

        Self {
            status_bar_height: if hide_status_bar { 0 } else { bars.status_bar_height },
            navigation_bar_height,
            navigation_bar_rotated_height,
            navigation_bar_vertical_offset: vertical,
            navigation_bar_horizontal_offset: horizontal,
        }
    }
}
