//! Placeholder backend for targets without a native surface implementation
//!
//! Creation always fails, so the lifecycle stays detached and logs why.

use std::convert::Infallible;

use super::{MonitorInfo, OverlayConfig, OverlayPlatform, PlatformError};

pub struct UnsupportedOverlay {
    never: Infallible,
}

impl OverlayPlatform for UnsupportedOverlay {
    fn new(_config: OverlayConfig) -> Result<Self, PlatformError> {
        Err(PlatformError::UnsupportedFeature(format!(
            "no overlay backend for {}",
            std::env::consts::OS
        )))
    }

    fn width(&self) -> u32 {
        match self.never {}
    }

    fn height(&self) -> u32 {
        match self.never {}
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        match self.never {}
    }

    fn commit(&mut self) {
        match self.never {}
    }

    fn poll_events(&mut self) -> bool {
        match self.never {}
    }

    fn get_monitors(&self) -> Vec<MonitorInfo> {
        match self.never {}
    }
}
