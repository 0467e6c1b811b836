//! Edgeline Overlay Library
//!
//! Draws the live width of the back-gesture zones as translucent strips on
//! both screen edges.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    lifecycle/                       │
//! │     OverlayController, dispatcher thread loop       │
//! │        (attach/detach, caller entry points)         │
//! ├─────────────────────────────────────────────────────┤
//! │                      edges                          │
//! │                   EdgeOverlay                       │
//! │       (Dispatcher + dual-edge rasterization)        │
//! ├─────────────────────────────────────────────────────┤
//! │                     manager                         │
//! │                  OverlayWindow                      │
//! │            (surface + renderer wrapper)             │
//! ├─────────────────────────────────────────────────────┤
//! │                     renderer                        │
//! │                    tiny-skia                        │
//! ├─────────────────────────────────────────────────────┤
//! │                    platform/                        │
//! │                 x11, headless                       │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod edges;
pub mod lifecycle;
pub mod manager;
pub mod platform;
pub mod renderer;

// Re-export commonly used types
pub use edges::{EdgeOverlay, OverlaySnapshot};
pub use lifecycle::{AttachError, LifecycleState, OverlayController, SurfaceFactory};
pub use manager::OverlayWindow;
pub use platform::{
    HeadlessOverlay, NativeOverlay, OverlayConfig, OverlayPlatform, PlatformError, SurfaceProbe,
};
pub use renderer::{colors, Renderer};

// Re-export tiny_skia Color for external use
pub use tiny_skia::Color;
