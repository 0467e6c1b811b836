//! Lifecycle state, control messages and thread handle

use std::thread::JoinHandle;

use edgeline_core::CommandSender;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::edges::OverlaySnapshot;
use crate::platform::PlatformError;

// ─────────────────────────────────────────────────────────────────────────────
// Commands and Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Host requests sent to the dispatcher thread alongside indicator commands
#[derive(Debug)]
pub enum OverlayControl {
    /// Reply with the current widths and render statistics
    Snapshot(oneshot::Sender<OverlaySnapshot>),
    /// Stop the loop and tear the surface down
    Shutdown,
}

/// Producer handle for a running overlay
pub type OverlaySender = CommandSender<OverlayControl>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Detached,
    Attached,
}

impl LifecycleState {
    pub fn is_attached(self) -> bool {
        self == LifecycleState::Attached
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Detached => "detached",
            LifecycleState::Attached => "attached",
        }
    }
}

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("failed to spawn overlay thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to start overlay runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("surface rejected: {0}")]
    Surface(#[source] PlatformError),

    #[error("overlay thread exited before confirming creation")]
    ThreadExited,
}

// ─────────────────────────────────────────────────────────────────────────────
// Overlay Handle
// ─────────────────────────────────────────────────────────────────────────────

/// Handle to a running dispatcher thread
pub struct OverlayHandle {
    pub tx: OverlaySender,
    pub handle: JoinHandle<()>,
}

impl OverlayHandle {
    /// The thread is gone (shut down or the surface was destroyed)
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
