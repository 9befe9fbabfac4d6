//! Failover subsystem.
//!
//! # Data Flow
//! ```text
//! submit(factory, on_complete)
//!     → current endpoint (pool)
//!     → attempt → Timeout? retry while AttemptBudget lasts
//!     → exhausted on primary: RecoveryProbe::start
//!     → sweep backups in order (skip the exhausted endpoint)
//!         → tentative current = candidate
//!         → attempts bounded by sweep deadline
//!         → non-timeout final outcome stops the sweep
//!     → on_complete(result, status), once
//! ```
//!
//! # State Machine (per logical operation)
//! ```text
//! Pending(endpoint) → Retrying(endpoint) → FailoverSweeping(candidate) → Terminal
//!                  ↘───────────────────────────────────────────────────↗
//! ```
//!
//! # Design Decisions
//! - Sweep is a chain of suspensions, no worker is blocked while waiting
//! - No lock across operations: concurrent sweeps may race on the current
//!   pointer and settle on the next timeout
//! - A cancelled candidate's future is dropped, so late completions cannot
//!   overwrite the recorded outcome

pub mod coordinator;

pub use coordinator::FailoverManager;
