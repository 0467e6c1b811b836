//! Dual-edge indicator overlay
//!
//! Draws one translucent full-height rectangle per screen edge. The left
//! rectangle is anchored at `x = 0`, the right one is mirrored against the
//! surface's right border. Widths come from the [`Dispatcher`], which this
//! overlay owns for the lifetime of the surface.

use std::time::Duration;

use edgeline_core::{Dispatcher, Envelope, IndicatorSnapshot};
use edgeline_types::{Edge, IndicatorConfig};
use tiny_skia::Color;

use crate::manager::OverlayWindow;
use crate::platform::{NativeOverlay, OverlayPlatform};
use crate::renderer::colors;

/// Render statistics plus both edge states
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlaySnapshot {
    pub indicators: IndicatorSnapshot,
    pub frames_rendered: u64,
    pub surface_size: (u32, u32),
}

/// Horizontal `(x, width)` of an edge's rectangle, or None when nothing is
/// visible. Widths are clamped to the surface.
pub fn edge_span(edge: Edge, width: f32, surface_width: u32) -> Option<(f32, f32)> {
    if width.is_nan() || width <= 0.0 || surface_width == 0 {
        return None;
    }
    let surface_width = surface_width as f32;
    let width = width.min(surface_width);
    let x = if edge.is_mirrored() {
        surface_width - width
    } else {
        0.0
    };
    Some((x, width))
}

pub struct EdgeOverlay<P: OverlayPlatform = NativeOverlay> {
    window: OverlayWindow<P>,
    dispatcher: Dispatcher,
    color: Color,
    frames_rendered: u64,
}

impl<P: OverlayPlatform> EdgeOverlay<P> {
    pub fn new(window: OverlayWindow<P>, config: &IndicatorConfig) -> Self {
        Self {
            window,
            dispatcher: Dispatcher::new(config),
            color: colors::indicator(config.rgba()),
            frames_rendered: 0,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn window(&self) -> &OverlayWindow<P> {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut OverlayWindow<P> {
        &mut self.window
    }

    /// Hand a command from the queue to the dispatcher
    pub fn accept(&mut self, envelope: Envelope) {
        self.dispatcher.accept(envelope);
    }

    /// Fire due hides and advance both edges to `now`.
    /// Returns whether the overlay needs a redraw.
    pub fn on_frame(&mut self, now: Duration) -> bool {
        self.dispatcher.run_due(now);
        let mut changed = self.dispatcher.on_frame(now);

        if self.window.take_damage() {
            // damaged surfaces always need a full redraw
            self.dispatcher.clamp_widths(self.window.width() as f32);
            changed = true;
        }
        changed
    }

    /// Redraw both edges and commit the frame.
    pub fn render(&mut self) {
        let (width, height) = (self.window.width(), self.window.height());

        self.window.clear(colors::transparent());
        for indicator in self.dispatcher.indicators() {
            if let Some((x, w)) = edge_span(indicator.edge(), indicator.current_width(), width) {
                self.window.fill_rect(x, 0.0, w, height as f32, self.color);
            }
        }
        self.window.commit();
        self.frames_rendered += 1;
    }

    /// Process surface events. Returns false once the surface is gone.
    pub fn poll_events(&mut self) -> bool {
        self.window.poll_events()
    }

    pub fn is_animating(&self) -> bool {
        self.dispatcher.is_animating()
    }

    pub fn next_wakeup(&self) -> Option<Duration> {
        self.dispatcher.next_wakeup()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            indicators: self.dispatcher.snapshot(),
            frames_rendered: self.frames_rendered,
            surface_size: (self.window.width(), self.window.height()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessOverlay, OverlayConfig};
    use edgeline_core::PendingCommand;

    const TINT: [u8; 4] = [64, 64, 64, 64];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn overlay(width: u32, height: u32) -> EdgeOverlay<HeadlessOverlay> {
        let window = OverlayWindow::new(OverlayConfig::default().with_size(width, height))
            .expect("headless surface");
        EdgeOverlay::new(window, &IndicatorConfig::default())
    }

    fn set_width(overlay: &mut EdgeOverlay<HeadlessOverlay>, at: u64, edge: Edge, px: i32) {
        overlay.accept(Envelope::immediate(PendingCommand::set_width(edge, px), ms(at)));
    }

    fn pixel(overlay: &EdgeOverlay<HeadlessOverlay>, x: u32, y: u32) -> [u8; 4] {
        overlay.window().platform().pixel(x, y).expect("in bounds")
    }

    #[test]
    fn edge_span_anchors_and_mirrors() {
        assert_eq!(edge_span(Edge::Left, 40.0, 100), Some((0.0, 40.0)));
        assert_eq!(edge_span(Edge::Right, 40.0, 100), Some((60.0, 40.0)));
        assert_eq!(edge_span(Edge::Right, 250.0, 100), Some((0.0, 100.0)));
        assert_eq!(edge_span(Edge::Left, 0.0, 100), None);
        assert_eq!(edge_span(Edge::Left, f32::NAN, 100), None);
    }

    #[test]
    fn left_edge_renders_translucent_strip() {
        let mut overlay = overlay(100, 10);
        set_width(&mut overlay, 0, Edge::Left, 40);
        overlay.on_frame(ms(0));
        assert!(overlay.on_frame(ms(200)));
        overlay.render();

        assert_eq!(pixel(&overlay, 0, 0), TINT);
        assert_eq!(pixel(&overlay, 39, 9), TINT);
        assert_eq!(pixel(&overlay, 40, 5), CLEAR);
        assert_eq!(pixel(&overlay, 99, 5), CLEAR);
    }

    #[test]
    fn right_edge_is_mirrored() {
        let mut overlay = overlay(100, 10);
        set_width(&mut overlay, 0, Edge::Right, 30);
        overlay.on_frame(ms(0));
        overlay.on_frame(ms(200));
        overlay.render();

        assert_eq!(pixel(&overlay, 70, 5), TINT);
        assert_eq!(pixel(&overlay, 99, 0), TINT);
        assert_eq!(pixel(&overlay, 69, 5), CLEAR);
        assert_eq!(pixel(&overlay, 0, 5), CLEAR);
    }

    #[test]
    fn blank_frame_still_commits() {
        let mut overlay = overlay(20, 4);
        assert!(!overlay.on_frame(ms(16)));
        overlay.render();

        let probe = overlay.window().platform().probe().clone();
        assert_eq!(probe.commits(), 1);
        assert_eq!(probe.live(), 1);
        assert!(probe.last_frame().unwrap().iter().all(|&b| b == 0));
        assert_eq!(overlay.frames_rendered(), 1);
    }

    #[test]
    fn oversized_width_is_clamped_to_surface() {
        let mut overlay = overlay(50, 4);
        set_width(&mut overlay, 0, Edge::Left, 500);
        overlay.on_frame(ms(0));
        overlay.on_frame(ms(200));
        overlay.render();

        assert_eq!(pixel(&overlay, 0, 1), TINT);
        assert_eq!(pixel(&overlay, 49, 1), TINT);
        assert_eq!(overlay.dispatcher().indicator(Edge::Left).current_width(), 500.0);
    }

    #[test]
    fn surface_shrink_clamps_widths() {
        let mut overlay = overlay(100, 10);
        set_width(&mut overlay, 0, Edge::Right, 80);
        overlay.on_frame(ms(0));
        overlay.on_frame(ms(200));

        overlay.window_mut().platform_mut().resize(60, 10);
        assert!(overlay.on_frame(ms(216)));
        assert_eq!(overlay.dispatcher().indicator(Edge::Right).current_width(), 60.0);

        overlay.render();
        assert_eq!(pixel(&overlay, 0, 5), TINT);

        // the clamped edge still hides on schedule
        overlay.on_frame(ms(700));
        overlay.on_frame(ms(900));
        overlay.render();
        assert_eq!(overlay.dispatcher().indicator(Edge::Right).current_width(), 0.0);
        assert_eq!(pixel(&overlay, 59, 5), CLEAR);
    }

    #[test]
    fn snapshot_reports_frames_and_size() {
        let mut overlay = overlay(100, 10);
        set_width(&mut overlay, 0, Edge::Left, 40);
        overlay.on_frame(ms(100));
        overlay.render();
        overlay.render();

        let snapshot = overlay.snapshot();
        assert_eq!(snapshot.frames_rendered, 2);
        assert_eq!(snapshot.surface_size, (100, 10));
        assert_eq!(snapshot.indicators.left.target_width, 40.0);
        assert!((snapshot.indicators.left.current_width - 20.0).abs() < 1e-3);
        assert_eq!(overlay.next_wakeup(), Some(ms(700)));
        assert!(overlay.is_animating());
    }
}
