//! Shared configuration types for edgeline
//!
//! This crate contains serializable types that are shared between the
//! indicator engine (edgeline-core), the overlay surface (edgeline-overlay)
//! and the settings front-end (edgeline-cli).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ─────────────────────────────────────────────────────────────────────────────
// Screen Edges
// ─────────────────────────────────────────────────────────────────────────────

/// Screen edge a back-gesture indicator is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
}

impl Edge {
    /// Both edges, in rendering order
    pub const ALL: [Edge; 2] = [Edge::Left, Edge::Right];

    /// Whether the indicator grows from the opposite screen edge
    /// (its rectangle is offset by `surface_width - width`).
    pub fn is_mirrored(self) -> bool {
        matches!(self, Edge::Right)
    }

    /// Stable slot index for per-edge arrays
    pub fn index(self) -> usize {
        match self {
            Edge::Left => 0,
            Edge::Right => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Left => "left",
            Edge::Right => "right",
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Indicator Configuration
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 200;
pub const DEFAULT_HIDE_DELAY_MS: u64 = 700;
pub const DEFAULT_INDICATOR_ALPHA: u8 = 64;
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;
pub const DEFAULT_IDLE_POLL_MS: u64 = 100;

/// Timing and appearance of the edge indicator overlay.
///
/// Values are read once when the overlay attaches; they are constants for the
/// lifetime of an attached overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorConfig {
    /// Time every width animation takes, regardless of distance
    #[serde(default = "default_animation_duration_ms")]
    pub animation_duration_ms: u64,
    /// Quiet period after the last width change before the indicator hides
    #[serde(default = "default_hide_delay_ms")]
    pub hide_delay_ms: u64,
    /// Fill alpha (0-255) of both indicator rectangles
    #[serde(default = "default_alpha")]
    pub alpha: u8,
    /// Fill color as RGB
    #[serde(default = "default_color")]
    pub color: [u8; 3],
    /// Frame pacing while an animation is running
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Upper bound on the dispatcher sleep while nothing animates
    #[serde(default = "default_idle_poll_ms")]
    pub idle_poll_ms: u64,
    /// Display density used to turn dp insets into pixels
    #[serde(default = "default_density")]
    pub density: f32,
    /// Surface identifier (window class / layer namespace)
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Monitor to cover; falls back to the primary monitor
    #[serde(default)]
    pub target_monitor_id: Option<String>,
}

fn default_animation_duration_ms() -> u64 {
    DEFAULT_ANIMATION_DURATION_MS
}

fn default_hide_delay_ms() -> u64 {
    DEFAULT_HIDE_DELAY_MS
}

fn default_alpha() -> u8 {
    DEFAULT_INDICATOR_ALPHA
}

fn default_color() -> [u8; 3] {
    [255, 255, 255]
}

fn default_frame_interval_ms() -> u64 {
    DEFAULT_FRAME_INTERVAL_MS
}

fn default_idle_poll_ms() -> u64 {
    DEFAULT_IDLE_POLL_MS
}

fn default_density() -> f32 {
    1.0
}

fn default_namespace() -> String {
    "edgeline-indicator".to_string()
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: default_animation_duration_ms(),
            hide_delay_ms: default_hide_delay_ms(),
            alpha: default_alpha(),
            color: default_color(),
            frame_interval_ms: default_frame_interval_ms(),
            idle_poll_ms: default_idle_poll_ms(),
            density: default_density(),
            namespace: default_namespace(),
            target_monitor_id: None,
        }
    }
}

impl IndicatorConfig {
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn idle_poll(&self) -> Duration {
        Duration::from_millis(self.idle_poll_ms.max(1))
    }

    /// Fill color with the configured alpha, as RGBA
    pub fn rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.color;
        [r, g, b, self.alpha]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App Config
// ─────────────────────────────────────────────────────────────────────────────

/// Top-level persisted configuration (engine settings only; gesture
/// sensitivity values belong to the settings layer and are never stored here).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub indicator: IndicatorConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: IndicatorConfig = toml::from_str("").unwrap();
        assert_eq!(config, IndicatorConfig::default());
        assert_eq!(config.animation_duration(), Duration::from_millis(200));
        assert_eq!(config.hide_delay(), Duration::from_millis(700));
        assert_eq!(config.rgba(), [255, 255, 255, 64]);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: IndicatorConfig = toml::from_str("alpha = 128\ncolor = [10, 20, 30]").unwrap();
        assert_eq!(config.rgba(), [10, 20, 30, 128]);
        assert_eq!(config.hide_delay_ms, DEFAULT_HIDE_DELAY_MS);
    }

    #[test]
    fn app_config_fills_missing_indicator_table() {
        let config: AppConfig = toml::from_str("[indicator]\nhide_delay_ms = 1000").unwrap();
        assert_eq!(config.indicator.hide_delay(), Duration::from_secs(1));
        assert_eq!(config.indicator.alpha, DEFAULT_INDICATOR_ALPHA);

        let empty: AppConfig = toml::from_str("").unwrap();
        assert_eq!(empty, AppConfig::default());
    }

    #[test]
    fn zero_intervals_are_floored() {
        let config = IndicatorConfig {
            frame_interval_ms: 0,
            idle_poll_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_interval(), Duration::from_millis(1));
        assert_eq!(config.idle_poll(), Duration::from_millis(1));
    }

    #[test]
    fn only_right_edge_is_mirrored() {
        assert!(!Edge::Left.is_mirrored());
        assert!(Edge::Right.is_mirrored());
        assert_eq!(Edge::ALL.map(Edge::index), [0, 1]);
        assert_eq!(Edge::Right.to_string(), "right");
    }
}
