//! Client-side regional failover for a replicated multi-region messaging backend.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller: submit(factory, on_complete)
//!          │
//!          ▼
//!   ┌──────────────────┐   current()/switch_to()   ┌──────────────┐
//!   │ FailoverManager  │──────────────────────────▶│ EndpointPool │◀──────┐
//!   │  (failover)      │                           │  (region)    │       │ restore_primary()
//!   └──┬─────────┬─────┘                           └──────────────┘       │
//!      │         │ start() on failover from primary                ┌──────┴────────┐
//!      │         └────────────────────────────────────────────────▶│ RecoveryProbe │
//!      │ AttemptBudget (resilience)                                │   (health)    │
//!      ▼                                                           └───────────────┘
//!   Operation::execute ──▶ Endpoint (transport: RestRegion) ──▶ Outcome { result, Status }
//! ```
//!
//! The core (`failover`, `region`, `health`, `resilience`) only knows the
//! [`Endpoint`](region::Endpoint) and [`Operation`](region::Operation) traits.
//! `transport` is one collaborator speaking a REST publish/time API.

pub mod config;
pub mod error;
pub mod failover;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod outcome;
pub mod region;
pub mod resilience;
pub mod transport;

pub use config::FailoverSettings;
pub use error::{FailoverError, FailoverResult};
pub use failover::FailoverManager;
pub use outcome::{Outcome, Status, StatusCategory};
pub use region::{Connector, Endpoint, EndpointPool, Operation};
