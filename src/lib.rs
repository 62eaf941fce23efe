//! Counseling Desk - School counseling session tracking.
//!
//! Records counseling sessions from entry to exit and runs a background
//! scheduler that completes sessions left open past their time threshold.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
