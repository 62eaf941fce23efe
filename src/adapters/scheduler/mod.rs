//! Scheduler adapters - Background services driven by a timer.

mod auto_complete_scheduler;

pub use auto_complete_scheduler::{
    AutoCompleteScheduler, AutoCompleteSchedulerConfig, SchedulerStatus,
};
