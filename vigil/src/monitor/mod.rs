//! Polling scheduler and live-state tracking.

mod scheduler;
mod tracker;

pub use scheduler::{PollingScheduler, SchedulerConfig, SchedulerState};
pub use tracker::{LiveStatusTracker, Transition};
