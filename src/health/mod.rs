//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Failover away from primary (coordinator)
//!     → probe.rs start (replaces any running probe)
//!     → Periodic timer, first tick immediate
//!     → Endpoint::health_check on primary
//!     → healthy: pool.restore_primary(), probe exits
//!     → unhealthy/timeout: wait for next tick
//! ```
//!
//! # Design Decisions
//! - Only the primary is probed; backups are judged by live traffic
//! - One healthy answer is enough to restore, no hysteresis
//! - Probe lifecycle is serialized by a mutex, never two timers at once

pub mod probe;

pub use probe::RecoveryProbe;
