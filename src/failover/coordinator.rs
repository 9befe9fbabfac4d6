//! Failover coordination.
//!
//! # Responsibilities
//! - Send each logical operation to the current endpoint
//! - Retry timeouts on the same endpoint while its budget lasts
//! - Sweep the backups in priority order once the budget is exhausted
//! - Start the recovery probe when traffic leaves the primary
//! - Hand exactly one outcome back to the caller

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{FailoverConfig, FailoverSettings};
use crate::error::FailoverResult;
use crate::health::RecoveryProbe;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::outcome::{Outcome, Status, StatusCategory};
use crate::resilience::AttemptBudget;
use crate::region::{Connector, Endpoint, EndpointPool, Operation};

/// Client-side regional failover for operations against a replicated backend.
///
/// Cloning is cheap; clones share the pool, the current-endpoint pointer and
/// the recovery probe.
pub struct FailoverManager<E> {
    pool: Arc<EndpointPool<E>>,
    probe: Arc<RecoveryProbe<E>>,
    shutdown: Arc<Shutdown>,
    config: FailoverConfig,
}

impl<E> Clone for FailoverManager<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            probe: self.probe.clone(),
            shutdown: self.shutdown.clone(),
            config: self.config.clone(),
        }
    }
}

impl<E: Endpoint> FailoverManager<E> {
    pub fn new(pool: EndpointPool<E>, config: FailoverConfig) -> Self {
        let pool = Arc::new(pool);
        let shutdown = Arc::new(Shutdown::new());
        let probe = Arc::new(RecoveryProbe::new(
            pool.clone(),
            Duration::from_secs(config.probe_interval_secs),
            shutdown.clone(),
        ));

        Self {
            pool,
            probe,
            shutdown,
            config,
        }
    }

    /// Build the pool through `connector` and wrap it in a manager.
    pub fn connect<C>(connector: &C, settings: &FailoverSettings) -> FailoverResult<Self>
    where
        C: Connector<Endpoint = E>,
    {
        let pool = EndpointPool::connect(connector, &settings.primary, &settings.backups)?;
        Ok(Self::new(pool, settings.failover.clone()))
    }

    pub fn pool(&self) -> &EndpointPool<E> {
        &self.pool
    }

    pub fn current_endpoint(&self) -> Arc<E> {
        self.pool.current()
    }

    /// True while the primary is being probed for recovery.
    pub fn is_recovering(&self) -> bool {
        self.probe.is_running()
    }

    /// Stop background probing. Operations already in flight still complete.
    pub fn shutdown(&self) {
        tracing::debug!(subscribers = self.shutdown.receiver_count(), "Shutting down failover manager");
        self.shutdown.trigger();
        self.probe.stop();
    }

    /// Run an operation with failover and report its final outcome to
    /// `on_complete`, exactly once.
    ///
    /// `factory` rebuilds the operation for whichever endpoint is tried.
    /// A panic in the operation or the factory is reported as an `Unknown`
    /// status. Must be called from within a Tokio runtime.
    pub fn submit<F, O, C>(&self, factory: F, on_complete: C) -> JoinHandle<()>
    where
        F: Fn(&Arc<E>) -> O + Send + Sync + 'static,
        O: Operation + 'static,
        C: FnOnce(Option<O::Output>, Status) + Send + 'static,
    {
        let manager = self.clone();
        tokio::spawn(async move {
            let (result, status) = match AssertUnwindSafe(manager.execute(factory)).catch_unwind().await {
                Ok(outcome) => outcome.into_parts(),
                Err(_) => {
                    tracing::error!("Operation panicked before producing an outcome");
                    let status = Status::error(StatusCategory::Unknown).with_message("operation panicked");
                    (None, status)
                }
            };
            on_complete(result, status);
        })
    }

    /// Run an operation with failover and return its final outcome.
    pub async fn execute<F, O>(&self, factory: F) -> Outcome<O::Output>
    where
        F: Fn(&Arc<E>) -> O,
        O: Operation,
    {
        let span = tracing::info_span!("failover", operation_id = %Uuid::new_v4());
        self.run(&factory).instrument(span).await
    }

    async fn run<F, O>(&self, factory: &F) -> Outcome<O::Output>
    where
        F: Fn(&Arc<E>) -> O,
        O: Operation,
    {
        let endpoint = self.pool.current();
        let operation = factory(&endpoint);

        if !self.pool.has_backups() {
            return attempt(endpoint.as_ref(), &operation).await;
        }

        let budget = AttemptBudget::new(self.config.max_attempts_per_endpoint);
        let mut outcome = attempt(endpoint.as_ref(), &operation).await;

        while outcome.status.is_timeout() {
            if budget.should_switch() {
                return self.fail_over(factory, &endpoint, outcome).await;
            }
            budget.decrease();
            tracing::debug!(
                endpoint = %endpoint.name(),
                remaining = budget.remaining(),
                "Attempt timed out, retrying"
            );
            outcome = attempt(endpoint.as_ref(), &operation).await;
        }

        outcome
    }

    async fn fail_over<F, O>(
        &self,
        factory: &F,
        exhausted: &Arc<E>,
        timed_out: Outcome<O::Output>,
    ) -> Outcome<O::Output>
    where
        F: Fn(&Arc<E>) -> O,
        O: Operation,
    {
        tracing::warn!(endpoint = %exhausted.name(), "Endpoint exhausted its attempts, failing over");

        if self.config.probe_enabled && self.pool.is_primary(exhausted) {
            self.probe.start();
        }

        let start_time = Instant::now();
        let outcome = match self.sweep(factory, exhausted).await {
            Some(outcome) => outcome,
            None => {
                tracing::warn!(
                    endpoint = %exhausted.name(),
                    "No backup produced an outcome, returning the original timeout"
                );
                timed_out
            }
        };

        tracing::info!(
            category = %outcome.status.category(),
            endpoint = %self.pool.current().name(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Failover sweep finished"
        );
        metrics::record_sweep(outcome.status.category(), start_time);

        outcome
    }

    /// Try each backup in order until one finishes with a non-timeout outcome.
    ///
    /// Returns the last outcome any candidate produced, if any.
    async fn sweep<F, O>(&self, factory: &F, exhausted: &Arc<E>) -> Option<Outcome<O::Output>>
    where
        F: Fn(&Arc<E>) -> O,
        O: Operation,
    {
        let deadline = Duration::from_secs(self.config.sweep_deadline_secs);
        let mut last_seen = None;

        for candidate in self.pool.backups() {
            if Arc::ptr_eq(candidate, exhausted) {
                continue;
            }

            // Tentative until proven wrong; visible to concurrent operations.
            self.pool.switch_to(candidate);

            let operation = factory(candidate);
            let attempts = AssertUnwindSafe(self.drive_candidate(candidate.as_ref(), &operation, &mut last_seen))
                .catch_unwind();

            match time::timeout(deadline, attempts).await {
                Ok(Ok(StatusCategory::Timeout)) => {
                    tracing::warn!(candidate = %candidate.name(), "Backup timed out, trying next");
                }
                Ok(Ok(category)) => {
                    tracing::debug!(candidate = %candidate.name(), category = %category, "Backup answered");
                    break;
                }
                Ok(Err(_)) => {
                    tracing::error!(candidate = %candidate.name(), "Backup attempt panicked, trying next");
                }
                Err(_) => {
                    tracing::warn!(
                        candidate = %candidate.name(),
                        deadline_secs = deadline.as_secs(),
                        "Backup exceeded sweep deadline, attempt cancelled"
                    );
                }
            }
        }

        last_seen
    }

    /// Attempt one candidate until it answers without error or runs out of
    /// budget. Every outcome is recorded in `last_seen`.
    async fn drive_candidate<O: Operation>(
        &self,
        candidate: &E,
        operation: &O,
        last_seen: &mut Option<Outcome<O::Output>>,
    ) -> StatusCategory {
        let budget = AttemptBudget::new(self.config.max_attempts_per_endpoint);

        loop {
            let outcome = attempt(candidate, operation).await;
            let category = outcome.status.category();
            let finished = !outcome.status.is_error() || budget.should_switch();
            *last_seen = Some(outcome);

            if finished {
                return category;
            }

            budget.decrease();
            tracing::debug!(
                candidate = %candidate.name(),
                category = %category,
                remaining = budget.remaining(),
                "Backup attempt failed, retrying"
            );
        }
    }
}

async fn attempt<E: Endpoint, O: Operation>(endpoint: &E, operation: &O) -> Outcome<O::Output> {
    let outcome = operation.execute().await;
    let category = outcome.status.category();

    metrics::record_attempt(endpoint.name(), category);
    tracing::debug!(endpoint = %endpoint.name(), category = %category, "Attempt completed");

    outcome
}

impl<E: Endpoint> std::fmt::Debug for FailoverManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverManager")
            .field("pool", &self.pool)
            .field("recovering", &self.probe.is_running())
            .field("config", &self.config)
            .finish()
    }
}
