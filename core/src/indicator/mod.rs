//! Width interpolation for the two edge indicators
//!
//! ```text
//!   set_target(40) at t=0            set_target(0) at t=50
//!         │                                 │
//!   0 ────┴──── 10 ─────── 20 ──────────────┴── 10 ───── 5 ───── 0
//!         rate = 40/200 px/ms               rate = 10/200 px/ms
//! ```
//!
//! Every run lasts the configured duration; the rate is whatever covers the
//! remaining distance in that time.

mod edge;
mod session;

#[cfg(test)]
mod engine_tests;

pub use edge::EdgeIndicator;
pub use session::AnimationSession;
