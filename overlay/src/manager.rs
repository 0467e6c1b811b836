//! Surface plus renderer
//!
//! [`OverlayWindow`] pairs a platform surface with the software renderer so
//! overlay content can draw without touching raw buffers.

use tiny_skia::Color;

use crate::platform::{MonitorInfo, NativeOverlay, OverlayConfig, OverlayPlatform, PlatformError};
use crate::renderer::Renderer;

/// A managed overlay surface with its own renderer
pub struct OverlayWindow<P: OverlayPlatform = NativeOverlay> {
    platform: P,
    renderer: Renderer,
}

impl<P: OverlayPlatform> OverlayWindow<P> {
    /// Create a new surface
    pub fn new(config: OverlayConfig) -> Result<Self, PlatformError> {
        P::new(config).map(Self::from_platform)
    }

    /// Wrap an already created surface
    pub fn from_platform(platform: P) -> Self {
        Self {
            platform,
            renderer: Renderer::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.platform.width()
    }

    pub fn height(&self) -> u32 {
        self.platform.height()
    }

    /// Clear the surface with a color
    pub fn clear(&mut self, color: Color) {
        let width = self.platform.width();
        let height = self.platform.height();
        if let Some(buffer) = self.platform.pixel_buffer() {
            self.renderer.clear(buffer, width, height, color);
        }
    }

    /// Draw a filled rectangle
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let width = self.platform.width();
        let height = self.platform.height();
        if let Some(buffer) = self.platform.pixel_buffer() {
            self.renderer
                .fill_rect(buffer, width, height, x, y, w, h, color);
        }
    }

    /// Commit the current frame to the screen
    pub fn commit(&mut self) {
        self.platform.commit();
    }

    /// Poll for events (non-blocking).
    /// Returns false if the surface is gone
    pub fn poll_events(&mut self) -> bool {
        self.platform.poll_events()
    }

    pub fn take_damage(&mut self) -> bool {
        self.platform.take_damage()
    }

    pub fn monitors(&self) -> Vec<MonitorInfo> {
        self.platform.get_monitors()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
