//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! FailoverManager::shutdown()
//!     → shutdown.rs broadcast
//!     → recovery probe loop exits
//!     → no new probe is started afterwards
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
