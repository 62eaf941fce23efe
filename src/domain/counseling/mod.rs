//! Counseling session domain module.
//!
//! Tracks counseling encounters from entry to exit and decides when an open
//! session has run long enough to be completed automatically.

mod auto_complete;
mod entry_time;
mod errors;
mod session;

pub use auto_complete::{AutoCompleteDecision, AutoCompletePolicy};
pub use entry_time::{EntryClock, MAX_UTC_OFFSET_MINUTES, MIN_UTC_OFFSET_MINUTES};
pub use errors::CounselingSessionError;
pub use session::{CounselingSession, ParticipantType, MAX_TOPIC_LENGTH};
