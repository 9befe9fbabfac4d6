//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent one configured connection to a backend region
//! - Expose a lightweight health operation for recovery probing
//! - Turn a logical operation into a replayable attempt against one region
//!
//! Retrying an attempt is calling [`Operation::execute`] again. Cancelling an
//! attempt is dropping the returned future.

use futures_util::future::BoxFuture;

use crate::config::RegionConfig;
use crate::error::FailoverResult;
use crate::outcome::{Outcome, Status};

/// Handle to one region of the messaging backend.
pub trait Endpoint: Send + Sync + 'static {
    /// Region name used in logs and metrics.
    fn name(&self) -> &str;

    /// Cheap liveness check used by the recovery probe.
    fn health_check(&self) -> BoxFuture<'_, Status>;
}

/// A logical operation bound to one endpoint.
pub trait Operation: Send + Sync {
    type Output: Send + 'static;

    /// Submit one attempt and resolve with its outcome.
    fn execute(&self) -> BoxFuture<'_, Outcome<Self::Output>>;
}

/// Builds endpoint handles from region configuration.
pub trait Connector {
    type Endpoint: Endpoint;

    fn connect(&self, config: &RegionConfig) -> FailoverResult<Self::Endpoint>;
}
