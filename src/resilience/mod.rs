//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Attempt against an endpoint:
//!     → outcome observed by the coordinator
//!     → budget.rs (retry the same endpoint while attempts remain)
//!     → exhausted: coordinator moves to the next endpoint
//! ```
//!
//! # Design Decisions
//! - One budget per endpoint-retry-sequence, never shared
//! - Retries are immediate; the transport's own timeouts pace them
//! - No circuit breaking beyond the counter

pub mod budget;

pub use budget::AttemptBudget;
