//! Configuration module
//!
//! Handles loading and saving floatwin configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::geometry::{ScreenMetrics, SystemBarDimensions};
use crate::manager::OverlayConfig;
use crate::overlay::{EngineTuning, MOVE_THRESHOLD_DP, MOVE_TO_EDGE_DURATION, MOVE_TO_EDGE_OVERSHOOT_TENSION};
use crate::runtime::DEFAULT_FRAME_INTERVAL;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Defaults applied to every new overlay
    #[serde(default)]
    pub overlay: OverlayConfig,

    /// Snap animation settings
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Drag recognition settings
    #[serde(default)]
    pub drag: DragConfig,

    /// Simulated screen used by the CLI
    #[serde(default)]
    pub screen: ScreenConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Animation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Edge-snap duration in ms
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
    /// Tension of the overshoot curve
    #[serde(default = "default_overshoot_tension")]
    pub overshoot_tension: f32,
    /// Period between animation frames in ms
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
}

fn default_duration_ms() -> u64 {
    MOVE_TO_EDGE_DURATION.as_millis() as u64
}

fn default_overshoot_tension() -> f32 {
    MOVE_TO_EDGE_OVERSHOOT_TENSION
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL.as_millis() as u64
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            overshoot_tension: default_overshoot_tension(),
            frame_interval_ms: default_frame_interval_ms(),
        }
    }
}

/// Drag configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    /// Travel before a press becomes a drag, in density-independent units
    #[serde(default = "default_move_threshold_dp")]
    pub move_threshold_dp: f32,
}

fn default_move_threshold_dp() -> f32 {
    MOVE_THRESHOLD_DP
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            move_threshold_dp: default_move_threshold_dp(),
        }
    }
}

/// Screen configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u32,
    #[serde(default = "default_screen_height")]
    pub height: u32,
    #[serde(default = "default_density")]
    pub density: f32,
    #[serde(default)]
    pub status_bar_height: u32,
    #[serde(default)]
    pub navigation_bar_height: u32,
    #[serde(default)]
    pub navigation_bar_rotated_height: u32,
    #[serde(default)]
    pub tablet: bool,
    #[serde(default)]
    pub hardware_navigation_keys: bool,
}

fn default_screen_width() -> u32 {
    ScreenMetrics::default().width
}

fn default_screen_height() -> u32 {
    ScreenMetrics::default().height
}

fn default_density() -> f32 {
    ScreenMetrics::default().density
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
            density: default_density(),
            status_bar_height: 0,
            navigation_bar_height: 0,
            navigation_bar_rotated_height: 0,
            tablet: false,
            hardware_navigation_keys: false,
        }
    }
}

impl ScreenConfig {
    pub fn metrics(&self) -> ScreenMetrics {
        ScreenMetrics::new(self.width, self.height, self.density)
    }

    pub fn system_bars(&self) -> SystemBarDimensions {
        SystemBarDimensions {
            status_bar_height: self.status_bar_height,
            navigation_bar_height: self.navigation_bar_height,
            navigation_bar_rotated_height: self.navigation_bar_rotated_height,
            tablet: self.tablet,
            hardware_navigation_keys: self.hardware_navigation_keys,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location
    pub fn load_default() -> ConfigResult<Self> {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("floatwin/config.toml")),
            Some(PathBuf::from("./floatwin.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                return Self::load(path);
            }
        }

        // Return default config if no file found
        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        if self.animation.frame_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "animation.frame_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.animation.overshoot_tension.is_finite() {
            return Err(ConfigError::Invalid {
                field: "animation.overshoot_tension",
                reason: "must be a finite number".to_string(),
            });
        }
        let threshold = self.drag.move_threshold_dp;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(ConfigError::Invalid {
                field: "drag.move_threshold_dp",
                reason: "must be zero or positive".to_string(),
            });
        }
        let density = self.screen.density;
        if !density.is_finite() || density <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "screen.density",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Engine tuning derived from the animation and drag sections
    pub fn tuning(&self) -> EngineTuning {
        EngineTuning {
            move_threshold_dp: self.drag.move_threshold_dp,
            snap_duration: Duration::from_millis(self.animation.duration_ms),
            overshoot_tension: self.animation.overshoot_tension,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.animation.frame_interval_ms)
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> ConfigResult<String> {
    let config = Config {
        overlay: OverlayConfig::new().with_over_margin(-24),
        screen: ScreenConfig {
            status_bar_height: 72,
            navigation_bar_height: 126,
            navigation_bar_rotated_height: 126,
            ..Default::default()
        },
        ..Default::default()
    };

    Ok(toml::to_string_pretty(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::MoveDirection;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.animation.duration_ms, 450);
        assert_eq!(config.animation.frame_interval_ms, 16);
        assert_eq!(config.tuning(), EngineTuning::default());
        assert_eq!(config.screen.metrics(), ScreenMetrics::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut config = Config::default();
        config.overlay.move_direction = MoveDirection::Left;
        config.screen.tablet = true;
        let file = NamedTempFile::new().unwrap();

        config.save(file.path()).unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nduration_ms = 300\n\n[screen]\nwidth = 720").unwrap();

        let loaded = Config::load(file.path()).unwrap();
        assert_eq!(loaded.tuning().snap_duration, Duration::from_millis(300));
        assert_eq!(loaded.animation.overshoot_tension, MOVE_TO_EDGE_OVERSHOOT_TENSION);
        assert_eq!(loaded.screen.width, 720);
        assert_eq!(loaded.screen.height, 1920);
        assert!(loaded.overlay.animate_initial_move);
    }

    #[test]
    fn test_zero_frame_interval_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[animation]\nframe_interval_ms = 0").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "animation.frame_interval_ms", .. }));
    }

    #[test]
    fn test_nan_density_rejected() {
        let mut config = Config::default();
        config.screen.density = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "screen.density", .. }));

        config.screen.density = f32::INFINITY;
        assert!(config.validate().is_err());
        config.screen.density = 2.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/floatwin.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_sample_config() {
        let sample = generate_sample_config().unwrap();
        let parsed: Config = toml::from_str(&sample).unwrap();
        assert_eq!(parsed.overlay.over_margin, -24);
        assert_eq!(parsed.screen.system_bars().navigation_bar_height, 126);
    }
}
