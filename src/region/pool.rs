//! Endpoint pool management.
//!
//! # Responsibilities
//! - Own the primary and the ordered backup endpoints
//! - Hold the shared "current endpoint" pointer
//! - Answer identity questions (is this the primary, is this a member)

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::RegionConfig;
use crate::error::{FailoverError, FailoverResult};
use crate::observability::metrics;
use crate::region::endpoint::{Connector, Endpoint};

/// Ordered set of regions plus the endpoint currently believed healthy.
///
/// Membership and order are fixed at construction. The current pointer is
/// only ever loaded or stored, so concurrent operations never serialize on it.
pub struct EndpointPool<E> {
    primary: Arc<E>,
    backups: Vec<Arc<E>>,
    current: ArcSwap<E>,
}

impl<E: Endpoint> EndpointPool<E> {
    /// Create a pool that takes ownership of the endpoints.
    pub fn new(primary: E, backups: Vec<E>) -> Self {
        Self::from_handles(Arc::new(primary), backups.into_iter().map(Arc::new).collect())
    }

    /// Create a pool from shared handles. The same handle may appear more
    /// than once; identity is pointer identity.
    pub fn from_handles(primary: Arc<E>, backups: Vec<Arc<E>>) -> Self {
        Self {
            current: ArcSwap::new(primary.clone()),
            primary,
            backups,
        }
    }

    /// Build every endpoint through `connector`, primary first.
    pub fn connect<C>(connector: &C, primary: &RegionConfig, backups: &[RegionConfig]) -> FailoverResult<Self>
    where
        C: Connector<Endpoint = E>,
    {
        let primary = connector.connect(primary)?;
        let backups = backups
            .iter()
            .map(|config| connector.connect(config))
            .collect::<FailoverResult<Vec<_>>>()?;

        tracing::info!(
            primary = %primary.name(),
            backups = ?backups.iter().map(|b| b.name()).collect::<Vec<_>>(),
            "Endpoint pool initialized"
        );

        Ok(Self::new(primary, backups))
    }

    pub fn primary(&self) -> &Arc<E> {
        &self.primary
    }

    /// Backups in priority order.
    pub fn backups(&self) -> &[Arc<E>] {
        &self.backups
    }

    pub fn has_backups(&self) -> bool {
        !self.backups.is_empty()
    }

    /// The endpoint believed to be healthy right now.
    pub fn current(&self) -> Arc<E> {
        self.current.load_full()
    }

    pub fn is_primary(&self, endpoint: &Arc<E>) -> bool {
        Arc::ptr_eq(&self.primary, endpoint)
    }

    pub fn contains(&self, endpoint: &Arc<E>) -> bool {
        self.is_primary(endpoint) || self.backups.iter().any(|b| Arc::ptr_eq(b, endpoint))
    }

    /// Pin the current endpoint explicitly.
    pub fn set_current(&self, endpoint: &Arc<E>) -> FailoverResult<()> {
        if !self.contains(endpoint) {
            return Err(FailoverError::UnknownEndpoint(endpoint.name().to_string()));
        }
        self.switch_to(endpoint);
        Ok(())
    }

    /// Point the pool back at the primary.
    pub fn restore_primary(&self) {
        self.switch_to(&self.primary);
    }

    /// Primary followed by the backups, in priority order.
    pub fn all_endpoints(&self) -> Vec<Arc<E>> {
        std::iter::once(&self.primary)
            .chain(self.backups.iter())
            .cloned()
            .collect()
    }

    /// Unchecked store, callers pass pool members only.
    pub(crate) fn switch_to(&self, endpoint: &Arc<E>) {
        debug_assert!(self.contains(endpoint));
        let previous = self.current.swap(endpoint.clone());
        if !Arc::ptr_eq(&previous, endpoint) {
            tracing::info!(
                from = %previous.name(),
                to = %endpoint.name(),
                "Current endpoint switched"
            );
            metrics::record_switch(previous.name(), endpoint.name());
        }
    }
}

impl<E: Endpoint> std::fmt::Debug for EndpointPool<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointPool")
            .field("primary", &self.primary.name())
            .field("backups", &self.backups.iter().map(|b| b.name()).collect::<Vec<_>>())
            .field("current", &self.current.load().name())
            .finish()
    }
}
