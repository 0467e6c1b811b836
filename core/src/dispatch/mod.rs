//! Command queue and single-threaded dispatcher
//!
//! ```text
//!  settings thread(s)                     dispatcher thread
//!  ──────────────────                     ─────────────────
//!  CommandSender::post ──┐
//!  CommandSender::post ──┼── unbounded ──► CommandReceiver::try_recv
//!  post_delayed        ──┘    channel            │
//!                                                ▼
//!                                    Dispatcher::accept ──► TimerQueue
//!                                                │              │ run_due
//!                                                ▼              ▼
//!                                         EdgeIndicator × 2 (single writer)
//!                                                │ on_frame
//!                                                ▼
//!                                             renderer
//! ```
//!
//! Executing `SetWidth(edge)` cancels that edge's pending hide and schedules
//! a new one `hide_delay` later, so the indicator hides only after a quiet
//! period.

mod command;
mod dispatcher;
mod queue;
mod timers;


pub use command::{Envelope, PendingCommand};
pub use dispatcher::{Dispatcher, EdgePhase, EdgeSnapshot, IndicatorSnapshot};
pub use queue::{channel, CommandReceiver, CommandSender, Message, Received};
pub use timers::TimerQueue;
