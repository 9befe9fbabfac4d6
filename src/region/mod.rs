//! Region (endpoint) subsystem.
//!
//! # Data Flow
//! ```text
//! RegionConfig (primary + ordered backups)
//!     → Connector::connect (endpoint.rs)
//!     → pool.rs (fixed order, shared current pointer)
//!     → coordinator reads current(), sweeps backups() in order
//!     → recovery probe restores primary
//! ```
//!
//! # Design Decisions
//! - Pool membership and order never change after construction
//! - Endpoint identity is handle identity (`Arc::ptr_eq`), not name equality
//! - Current pointer is an atomic cell: load/store only, last writer wins
//! - Transport details stay behind the `Endpoint`/`Operation` traits

pub mod endpoint;
pub mod pool;

pub use endpoint::{Connector, Endpoint, Operation};
pub use pool::EndpointPool;
