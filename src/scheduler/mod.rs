//! Scheduler module: one tick loop for every timed update.
//!
//! This module contains:
//! - [`Heartbeat`]: due-ordered task execution and the per-tick flush pass
//! - [`ScheduledTask`]: the four task kinds
//! - [`TickSource`]: optional fixed-rate timer that drives a heartbeat

mod heartbeat;
mod queue;
pub mod task;
mod ticker;

pub use heartbeat::{Heartbeat, SchedulerHandle, TickReport};
pub use queue::TaskQueue;
pub use task::{ScheduledTask, TaskKey, TaskKind};
pub use ticker::TickSource;
