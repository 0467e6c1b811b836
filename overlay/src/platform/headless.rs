//! In-memory surface with no display server
//!
//! Used by tests and by hosts without a compositor. Every surface created
//! from one [`SurfaceProbe`] reports creations, teardowns and commits to it,
//! so lifecycle behaviour can be observed from outside the dispatcher thread.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{find_monitor_by_id, MonitorInfo, OverlayConfig, OverlayPlatform, PlatformError};

/// Size of the single virtual monitor a headless surface reports
pub const HEADLESS_MONITOR_SIZE: (u32, u32) = (640, 480);

#[derive(Debug, Default)]
struct ProbeState {
    created: AtomicUsize,
    destroyed: AtomicUsize,
    commits: AtomicUsize,
    last_frame: Mutex<Option<Vec<u8>>>,
}

/// Shared counters for headless surfaces. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SurfaceProbe {
    state: Arc<ProbeState>,
}

impl SurfaceProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub fn destroyed(&self) -> usize {
        self.state.destroyed.load(Ordering::SeqCst)
    }

    /// Surfaces created and not yet torn down
    pub fn live(&self) -> usize {
        self.created().saturating_sub(self.destroyed())
    }

    pub fn commits(&self) -> usize {
        self.state.commits.load(Ordering::SeqCst)
    }

    /// Copy of the most recently committed buffer
    pub fn last_frame(&self) -> Option<Vec<u8>> {
        self.state.last_frame.lock().ok().and_then(|frame| frame.clone())
    }
}

pub struct HeadlessOverlay {
    width: u32,
    height: u32,
    pixel_data: Vec<u8>,
    monitors: Vec<MonitorInfo>,
    probe: SurfaceProbe,
    damaged: bool,
}

impl HeadlessOverlay {
    /// Create a surface that reports to `probe`
    pub fn with_probe(config: OverlayConfig, probe: SurfaceProbe) -> Self {
        let monitors = vec![MonitorInfo {
            id: "headless".to_string(),
            name: "Headless".to_string(),
            x: 0,
            y: 0,
            width: HEADLESS_MONITOR_SIZE.0,
            height: HEADLESS_MONITOR_SIZE.1,
            is_primary: true,
        }];

        let (width, height) = config.size.unwrap_or_else(|| {
            find_monitor_by_id(&monitors, config.target_monitor_id.as_deref())
                .map(|m| (m.width, m.height))
                .unwrap_or(HEADLESS_MONITOR_SIZE)
        });

        probe.state.created.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(namespace = %config.namespace, width, height, "Headless surface created");

        Self {
            width,
            height,
            pixel_data: vec![0u8; (width * height * 4) as usize],
            monitors,
            probe,
            damaged: false,
        }
    }

    pub fn probe(&self) -> &SurfaceProbe {
        &self.probe
    }

    /// Simulate the compositor resizing the surface
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixel_data = vec![0u8; (width * height * 4) as usize];
        self.damaged = true;
    }

    /// Premultiplied RGBA of one pixel in the working buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let px = self.pixel_data.get(offset..offset + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

impl OverlayPlatform for HeadlessOverlay {
    fn new(config: OverlayConfig) -> Result<Self, PlatformError> {
        Ok(Self::with_probe(config, SurfaceProbe::new()))
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_buffer(&mut self) -> Option<&mut [u8]> {
        Some(&mut self.pixel_data)
    }

    fn commit(&mut self) {
        self.probe.state.commits.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut frame) = self.probe.state.last_frame.lock() {
            *frame = Some(self.pixel_data.clone());
        }
    }

    fn poll_events(&mut self) -> bool {
        true
    }

    fn take_damage(&mut self) -> bool {
        std::mem::take(&mut self.damaged)
    }

    fn get_monitors(&self) -> Vec<MonitorInfo> {
        self.monitors.clone()
    }
}

impl Drop for HeadlessOverlay {
    fn drop(&mut self) {
        self.probe.state.destroyed.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_counts_lifecycle() {
        let probe = SurfaceProbe::new();
        let mut surface = HeadlessOverlay::with_probe(OverlayConfig::default(), probe.clone());
        assert_eq!((probe.created(), probe.live()), (1, 1));

        surface.commit();
        surface.commit();
        assert_eq!(probe.commits(), 2);
        assert_eq!(
            probe.last_frame().map(|f| f.len()),
            Some((640 * 480 * 4) as usize)
        );

        drop(surface);
        assert_eq!((probe.destroyed(), probe.live()), (1, 0));
    }

    #[test]
    fn size_defaults_to_monitor() {
        let surface = HeadlessOverlay::new(OverlayConfig::default()).unwrap();
        assert_eq!((surface.width(), surface.height()), HEADLESS_MONITOR_SIZE);

        let sized = HeadlessOverlay::new(OverlayConfig::default().with_size(32, 16)).unwrap();
        assert_eq!((sized.width(), sized.height()), (32, 16));
        assert_eq!(sized.pixel(31, 15), Some([0, 0, 0, 0]));
        assert_eq!(sized.pixel(32, 0), None);
    }

    #[test]
    fn resize_reports_damage_once() {
        let mut surface = HeadlessOverlay::new(OverlayConfig::default().with_size(32, 16)).unwrap();
        assert!(!surface.take_damage());

        surface.resize(32, 16);
        assert!(!surface.take_damage());

        surface.resize(10, 16);
        assert!(surface.take_damage());
        assert!(!surface.take_damage());
        assert_eq!(surface.pixel_buffer().map(|b| b.len()), Some(10 * 16 * 4));
    }
}
