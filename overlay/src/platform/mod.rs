//! Platform abstraction for overlay surfaces
//!
//! This module defines the trait that all surface backends implement, so the
//! edge renderer and lifecycle code stay platform-agnostic.

use edgeline_types::IndicatorConfig;
use thiserror::Error;

pub mod headless;

#[cfg(all(unix, not(target_os = "macos")))]
pub mod x11;

#[cfg(not(all(unix, not(target_os = "macos"))))]
mod unsupported;

pub use headless::{HeadlessOverlay, SurfaceProbe};

/// Information about a connected monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Unique identifier for this monitor (platform-specific)
    pub id: String,
    /// Human-readable name/description
    pub name: String,
    /// X position of the monitor in virtual screen space
    pub x: i32,
    /// Y position of the monitor in virtual screen space
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_primary: bool,
}

/// Find a monitor by ID, or fall back to the primary monitor
pub fn find_monitor_by_id<'a>(
    monitors: &'a [MonitorInfo],
    id: Option<&str>,
) -> Option<&'a MonitorInfo> {
    if let Some(id) = id {
        if let Some(monitor) = monitors.iter().find(|m| m.id == id) {
            return Some(monitor);
        }
        tracing::debug!(monitor = id, "Target monitor not found, using primary");
    }
    monitors.iter().find(|m| m.is_primary).or(monitors.first())
}

/// Configuration for creating an overlay surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Unique identifier for this overlay (window class / thread name)
    pub namespace: String,
    /// Monitor to cover. If None or not found, the primary monitor is used.
    pub target_monitor_id: Option<String>,
    /// Explicit surface size; None covers the whole target monitor
    pub size: Option<(u32, u32)>,
}

impl OverlayConfig {
    pub fn from_indicator(config: &IndicatorConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            target_monitor_id: config.target_monitor_id.clone(),
            size: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some((width, height));
        self
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self::from_indicator(&IndicatorConfig::default())
    }
}

/// Errors that can occur in platform operations
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Failed to connect to display server
    #[error("connection failed: {0}")]
    ConnectionFailed(String),
    /// Required protocol/feature not available
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),
    /// Buffer/memory allocation failed
    #[error("buffer error: {0}")]
    BufferError(String),
    /// Generic platform error
    #[error("platform error: {0}")]
    Other(String),
}

/// Trait that all surface backends must implement.
///
/// Surfaces are always input-transparent, never take focus and stack above
/// normal content. Dropping a surface tears it down.
pub trait OverlayPlatform: Sized {
    /// Create and map a new surface with the given configuration
    fn new(config: OverlayConfig) -> Result<Self, PlatformError>;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Get mutable access to the pixel buffer (premultiplied RGBA).
    /// Returns None if buffer is not ready
    fn pixel_buffer(&mut self) -> Option<&mut [u8]>;

    /// Commit the current pixel buffer to the screen
    fn commit(&mut self);

    /// Process pending platform events (non-blocking).
    /// Returns false if the surface was destroyed externally
    fn poll_events(&mut self) -> bool;

    /// True once after the surface was exposed or resized and its content
    /// must be redrawn even if nothing animated.
    fn take_damage(&mut self) -> bool {
        false
    }

    /// Get information about all connected monitors
    fn get_monitors(&self) -> Vec<MonitorInfo>;
}

/// Re-export the appropriate platform for the current target
#[cfg(all(unix, not(target_os = "macos")))]
pub use x11::X11Overlay as NativeOverlay;

#[cfg(not(all(unix, not(target_os = "macos"))))]
pub use unsupported::UnsupportedOverlay as NativeOverlay;

/// Get all connected monitors without requiring an existing surface.
#[cfg(all(unix, not(target_os = "macos")))]
pub fn get_all_monitors() -> Vec<MonitorInfo> {
    x11::get_all_monitors()
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
pub fn get_all_monitors() -> Vec<MonitorInfo> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(id: &str, is_primary: bool) -> MonitorInfo {
        MonitorInfo {
            id: id.to_string(),
            name: id.to_string(),
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            is_primary,
        }
    }

    #[test]
    fn find_monitor_prefers_exact_id() {
        let monitors = [monitor("DP-1", false), monitor("HDMI-1", true)];
        let found = find_monitor_by_id(&monitors, Some("DP-1")).unwrap();
        assert_eq!(found.id, "DP-1");
    }

    #[test]
    fn find_monitor_falls_back_to_primary_then_first() {
        let monitors = [monitor("DP-1", false), monitor("HDMI-1", true)];
        assert_eq!(
            find_monitor_by_id(&monitors, Some("eDP-9")).unwrap().id,
            "HDMI-1"
        );
        assert_eq!(find_monitor_by_id(&monitors, None).unwrap().id, "HDMI-1");

        let no_primary = [monitor("DP-1", false), monitor("DP-2", false)];
        assert_eq!(find_monitor_by_id(&no_primary, None).unwrap().id, "DP-1");
        assert!(find_monitor_by_id(&[], Some("DP-1")).is_none());
    }

    #[test]
    fn overlay_config_follows_indicator_config() {
        let indicator = IndicatorConfig {
            namespace: "gesture-preview".to_string(),
            target_monitor_id: Some("DP-2".to_string()),
            ..Default::default()
        };
        let config = OverlayConfig::from_indicator(&indicator).with_size(320, 200);
        assert_eq!(config.namespace, "gesture-preview");
        assert_eq!(config.target_monitor_id.as_deref(), Some("DP-2"));
        assert_eq!(config.size, Some((320, 200)));
    }
}
