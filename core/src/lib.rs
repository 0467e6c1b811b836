pub mod clock;
pub mod context;
pub mod dispatch;
pub mod indicator;
pub mod sensitivity;

// Re-exports for convenience
pub use clock::{Clock, ManualClock, MonotonicClock, SharedClock};
pub use context::{AppConfig, AppConfigExt, ConfigError, IndicatorConfig};
pub use dispatch::{
    CommandReceiver, CommandSender, Dispatcher, EdgePhase, EdgeSnapshot, Envelope,
    IndicatorSnapshot, Message, PendingCommand, Received,
};
pub use edgeline_types::Edge;
pub use indicator::{AnimationSession, EdgeIndicator};
