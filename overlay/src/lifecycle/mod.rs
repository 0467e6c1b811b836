//! Overlay window lifecycle
//!
//! [`OverlayController`] is the only thing callers touch. It attaches and
//! detaches the surface in step with the hosting screen and turns
//! `set_width` / `hide` calls into queue posts for the dispatcher thread.
//!
//! ```text
//!   Detached ──attach()──► Attached ──detach()──► Detached
//!      ▲                      │
//!      └── surface rejected ──┘ (logged, stays Detached)
//! ```

mod spawn;
mod state;


use std::sync::Arc;

use edgeline_core::{MonotonicClock, PendingCommand, SharedClock};
use edgeline_types::{Edge, IndicatorConfig};
use tokio::sync::oneshot;

pub use spawn::spawn_edge_overlay;
pub use state::{AttachError, LifecycleState, OverlayControl, OverlayHandle, OverlaySender};

use crate::edges::OverlaySnapshot;
use crate::platform::{NativeOverlay, OverlayConfig, OverlayPlatform, PlatformError};

/// Creates a surface on the dispatcher thread
pub type SurfaceFactory<P> = Arc<dyn Fn(OverlayConfig) -> Result<P, PlatformError> + Send + Sync>;

pub struct OverlayController<P: OverlayPlatform + 'static = NativeOverlay> {
    config: IndicatorConfig,
    surface: OverlayConfig,
    factory: SurfaceFactory<P>,
    clock: SharedClock,
    running: Option<OverlayHandle>,
}

impl OverlayController<NativeOverlay> {
    /// Controller for the platform's native surface
    pub fn native(config: IndicatorConfig) -> Self {
        Self::with_factory(config, Arc::new(|surface| NativeOverlay::new(surface)))
    }
}

impl<P: OverlayPlatform + 'static> OverlayController<P> {
    pub fn with_factory(config: IndicatorConfig, factory: SurfaceFactory<P>) -> Self {
        Self {
            surface: OverlayConfig::from_indicator(&config),
            config,
            factory,
            clock: MonotonicClock::shared(),
            running: None,
        }
    }

    /// Use `clock` for command timestamps and animation timing
    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = clock;
        self
    }

    /// Override the surface settings derived from the indicator config
    pub fn with_surface(mut self, surface: OverlayConfig) -> Self {
        self.surface = surface;
        self
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Replace the indicator config. Takes effect on the next attach.
    pub fn set_config(&mut self, config: IndicatorConfig) {
        self.surface = OverlayConfig {
            size: self.surface.size,
            ..OverlayConfig::from_indicator(&config)
        };
        self.config = config;
    }

    pub fn state(&self) -> LifecycleState {
        match &self.running {
            Some(running) if !running.is_finished() => LifecycleState::Attached,
            _ => LifecycleState::Detached,
        }
    }

    /// Create the surface and start the dispatcher thread.
    ///
    /// Idempotent while attached. A rejected surface is logged and the
    /// controller stays detached.
    pub fn attach(&mut self) -> LifecycleState {
        if let Some(running) = &self.running {
            if !running.is_finished() {
                tracing::info!(namespace = %self.surface.namespace, "Overlay already attached");
                return LifecycleState::Attached;
            }
            // the surface went away on its own; reap the thread before reattaching
            self.reap();
        }

        let factory = Arc::clone(&self.factory);
        let surface = self.surface.clone();
        match spawn_edge_overlay(
            move || factory(surface),
            self.config.clone(),
            Arc::clone(&self.clock),
        ) {
            Ok(handle) => {
                tracing::info!(namespace = %self.surface.namespace, "Overlay attached");
                self.running = Some(handle);
                LifecycleState::Attached
            }
            Err(e) => {
                tracing::error!(
                    namespace = %self.surface.namespace,
                    error = %e,
                    "Failed to attach overlay"
                );
                LifecycleState::Detached
            }
        }
    }

    /// Stop the dispatcher thread, which releases the surface. Safe to call
    /// when never attached.
    pub fn detach(&mut self) {
        if self.running.is_none() {
            tracing::debug!("Detach requested while detached");
            return;
        }
        self.reap();
        tracing::info!(namespace = %self.surface.namespace, "Overlay detached");
    }

    fn reap(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let _ = running.tx.control(OverlayControl::Shutdown);
        if running.handle.join().is_err() {
            tracing::error!("Overlay thread panicked");
        }
    }

    /// Animate `edge` toward `width_px`; 0 hides it, negatives clamp to 0.
    /// Returns whether the command was queued.
    pub fn set_width(&self, edge: Edge, width_px: i32) -> bool {
        self.post(PendingCommand::set_width(edge, width_px), None)
    }

    /// Debounced hide: `edge` animates to 0 after the hide delay unless a new
    /// width arrives first.
    pub fn hide(&self, edge: Edge) -> bool {
        self.post(PendingCommand::hide(edge), Some(self.config.hide_delay()))
    }

    fn post(&self, command: PendingCommand, delay: Option<std::time::Duration>) -> bool {
        let Some(running) = &self.running else {
            tracing::debug!(?command, "Overlay detached, dropping command");
            return false;
        };
        let queued = match delay {
            Some(delay) => running.tx.post_delayed(command, delay),
            None => running.tx.post(command),
        };
        if !queued {
            tracing::debug!(?command, "Overlay thread gone, dropping command");
        }
        queued
    }

    /// Producer handle for posting from other threads while attached
    pub fn sender(&self) -> Option<OverlaySender> {
        self.running.as_ref().map(|running| running.tx.clone())
    }

    /// Current widths and render statistics. None while detached.
    pub async fn snapshot(&self) -> Option<OverlaySnapshot> {
        let reply = self.request_snapshot()?;
        reply.await.ok()
    }

    /// Blocking variant of [`snapshot`](Self::snapshot). Must not be called
    /// from inside an async runtime.
    pub fn snapshot_blocking(&self) -> Option<OverlaySnapshot> {
        let reply = self.request_snapshot()?;
        reply.blocking_recv().ok()
    }

    fn request_snapshot(&self) -> Option<oneshot::Receiver<OverlaySnapshot>> {
        let running = self.running.as_ref()?;
        let (reply_tx, reply_rx) = oneshot::channel();
        running
            .tx
            .control(OverlayControl::Snapshot(reply_tx))
            .then_some(reply_rx)
    }
}

impl<P: OverlayPlatform + 'static> Drop for OverlayController<P> {
    fn drop(&mut self) {
        self.detach();
    }
}
