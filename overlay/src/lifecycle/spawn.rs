//! Dispatcher thread
//!
//! # Threading Model
//!
//! Platform surfaces are thread-affine, so the surface is created INSIDE the
//! spawned thread by a factory closure rather than passed in. Creation
//! success is confirmed back to the caller over a std channel before
//! [`spawn_edge_overlay`] returns. From then on this thread is the only one
//! that touches the surface or the indicators; everyone else posts commands.
//!
//! Between frames the thread blocks on the command channel with a timeout
//! (a current-thread tokio runtime drives the wait), so a post made while
//! idle is picked up immediately instead of after the idle poll.

use std::thread;
use std::time::Duration;

use edgeline_core::dispatch::{self, CommandReceiver, Message, Received};
use edgeline_core::SharedClock;
use edgeline_types::IndicatorConfig;
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};

use super::state::{AttachError, OverlayControl, OverlayHandle};
use crate::edges::EdgeOverlay;
use crate::manager::OverlayWindow;
use crate::platform::{OverlayPlatform, PlatformError};

/// Used when the namespace cannot name a thread
const FALLBACK_THREAD_NAME: &str = "edgeline-overlay";

/// Spawn the dispatcher thread for one overlay.
///
/// Returns `Err` if the surface could not be created (confirmed via channel
/// from the spawned thread). The surface is dropped, and so torn down, when
/// the loop ends.
pub fn spawn_edge_overlay<P, F>(
    create_surface: F,
    config: IndicatorConfig,
    clock: SharedClock,
) -> Result<OverlayHandle, AttachError>
where
    P: OverlayPlatform + 'static,
    F: FnOnce() -> Result<P, PlatformError> + Send + 'static,
{
    let (tx, mut rx) = dispatch::channel::<OverlayControl>(clock.clone());
    let (confirm_tx, confirm_rx) = std::sync::mpsc::channel::<Result<(), AttachError>>();

    let handle = thread::Builder::new()
        .name(thread_name(&config.namespace))
        .spawn(move || {
            let runtime = match RuntimeBuilder::new_current_thread().enable_time().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    let _ = confirm_tx.send(Err(AttachError::Runtime(e)));
                    return;
                }
            };

            let window = match create_surface() {
                Ok(surface) => {
                    let _ = confirm_tx.send(Ok(()));
                    OverlayWindow::from_platform(surface)
                }
                Err(e) => {
                    let _ = confirm_tx.send(Err(AttachError::Surface(e)));
                    return;
                }
            };

            let mut overlay = EdgeOverlay::new(window, &config);
            run_loop(&mut overlay, &mut rx, &runtime, &clock, &config);
            tracing::debug!(
                frames = overlay.frames_rendered(),
                "Overlay loop finished, releasing surface"
            );
        })
        .map_err(AttachError::Spawn)?;

    match confirm_rx.recv() {
        Ok(Ok(())) => Ok(OverlayHandle { tx, handle }),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => {
            let _ = handle.join();
            Err(AttachError::ThreadExited)
        }
    }
}

/// Thread name for `namespace`. std panics on interior NUL bytes.
pub(crate) fn thread_name(namespace: &str) -> String {
    if namespace.trim().is_empty() || namespace.contains('\0') {
        FALLBACK_THREAD_NAME.to_string()
    } else {
        namespace.to_string()
    }
}

/// Outcome of handling one channel message
enum Flow {
    Continue,
    Stop,
}

fn handle_message<P: OverlayPlatform>(
    overlay: &mut EdgeOverlay<P>,
    message: Message<OverlayControl>,
    clock: &SharedClock,
    needs_render: &mut bool,
) -> Flow {
    match message {
        Message::Post(envelope) => overlay.accept(envelope),
        Message::Control(OverlayControl::Snapshot(reply)) => {
            // answer with widths as of now, not as of the last frame
            *needs_render |= overlay.on_frame(clock.now());
            let _ = reply.send(overlay.snapshot());
        }
        Message::Control(OverlayControl::Shutdown) => return Flow::Stop,
    }
    Flow::Continue
}

fn run_loop<P: OverlayPlatform>(
    overlay: &mut EdgeOverlay<P>,
    rx: &mut CommandReceiver<OverlayControl>,
    runtime: &Runtime,
    clock: &SharedClock,
    config: &IndicatorConfig,
) {
    let frame_interval = config.frame_interval();
    let idle_poll = config.idle_poll();
    let mut needs_render = true;
    // message that ended the previous wait
    let mut woken_by: Option<Message<OverlayControl>> = None;

    loop {
        if let Some(message) = woken_by.take() {
            if let Flow::Stop = handle_message(overlay, message, clock, &mut needs_render) {
                return;
            }
        }

        // Process all pending commands
        loop {
            match rx.try_recv() {
                Received::Message(message) => {
                    if let Flow::Stop = handle_message(overlay, message, clock, &mut needs_render) {
                        return;
                    }
                }
                Received::Empty => break,
                Received::Closed => {
                    tracing::debug!("All overlay senders dropped");
                    return;
                }
            }
        }

        // Poll surface events (returns false if the surface is gone)
        if !overlay.poll_events() {
            tracing::warn!("Overlay surface closed, leaving dispatcher loop");
            return;
        }

        let now = clock.now();
        if overlay.on_frame(now) {
            needs_render = true;
        }

        if needs_render {
            overlay.render();
            needs_render = false;
        }

        let sleep = next_sleep(
            overlay.is_animating(),
            overlay.next_wakeup(),
            clock.now(),
            frame_interval,
            idle_poll,
        );

        if overlay.is_animating() {
            // keep frame pacing steady; commands are drained next frame
            thread::sleep(sleep);
            continue;
        }

        match runtime.block_on(async { tokio::time::timeout(sleep, rx.recv()).await }) {
            Ok(Some(message)) => woken_by = Some(message),
            Ok(None) => {
                tracing::debug!("All overlay senders dropped");
                return;
            }
            Err(_elapsed) => {}
        }
    }
}

/// Frame interval while animating; otherwise the idle poll, cut short when a
/// hide is due sooner.
pub(crate) fn next_sleep(
    animating: bool,
    next_wakeup: Option<Duration>,
    now: Duration,
    frame_interval: Duration,
    idle_poll: Duration,
) -> Duration {
    if animating {
        return frame_interval;
    }
    match next_wakeup {
        Some(deadline) => deadline.saturating_sub(now).min(idle_poll),
        None => idle_poll,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);
    const IDLE: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn sleeps_one_frame_while_animating() {
        assert_eq!(next_sleep(true, Some(ms(50)), ms(40), FRAME, IDLE), FRAME);
    }

    #[test]
    fn idle_sleep_is_cut_short_by_pending_hide() {
        assert_eq!(next_sleep(false, None, ms(0), FRAME, IDLE), IDLE);
        assert_eq!(next_sleep(false, Some(ms(730)), ms(700), FRAME, IDLE), ms(30));
        assert_eq!(next_sleep(false, Some(ms(2_000)), ms(700), FRAME, IDLE), IDLE);
        assert_eq!(next_sleep(false, Some(ms(690)), ms(700), FRAME, IDLE), Duration::ZERO);
    }

    #[test]
    fn thread_name_rejects_nul_and_blank() {
        assert_eq!(thread_name("edgeline-indicator"), "edgeline-indicator");
        assert_eq!(thread_name("edge\0line"), FALLBACK_THREAD_NAME);
        assert_eq!(thread_name("   "), FALLBACK_THREAD_NAME);
    }
}
