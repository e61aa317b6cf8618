//! Broadcasting modules for real-time progress streaming.
//!
//! The [`ProgressHub`] holds the current step snapshot and fans events out to
//! listeners. Transports plug in through [`ProgressListener`]; the
//! channel-backed listener covers SSE responses and in-process consumers.

pub mod channel_listener;
pub mod progress_hub;
pub mod step_tracker;

pub use channel_listener::{ChannelListener, SubscriptionGuard};
pub use progress_hub::{
    DeliveryError, HubEvent, ParseStatusError, ProgressEntry, ProgressHub, ProgressListener,
    ProgressSnapshot, ProgressStatus, Subscription,
};
pub use step_tracker::StepTracker;
