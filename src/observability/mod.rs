//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Coordinator, pool and probe produce:
//!     → tracing events (one span per logical operation, keyed by operation_id)
//!     → metrics.rs (attempts, switches, sweeps, probes)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Library code only emits; the binary decides what to install
//! - Region names are the metric labels; cardinality is bounded by config

pub mod logging;
pub mod metrics;
