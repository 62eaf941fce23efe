//! Domain layer - Pure business logic with no external dependencies.
//!
//! Contains value objects, aggregates and the auto-complete rule.

pub mod counseling;
pub mod foundation;
