//! Primary recovery probing.
//!
//! # Responsibilities
//! - Periodically check the primary after traffic failed over away from it
//! - Restore the current-endpoint pointer once the primary answers
//! - Stop itself after the first healthy answer

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::lifecycle::Shutdown;
use crate::observability::metrics;
use crate::region::{Endpoint, EndpointPool};

/// Background task that brings traffic back to the primary.
///
/// At most one probe task is alive per instance. Starting while a probe is
/// already running replaces it, which restarts the interval clock.
pub struct RecoveryProbe<E> {
    pool: Arc<EndpointPool<E>>,
    interval: Duration,
    shutdown: Arc<Shutdown>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<E: Endpoint> RecoveryProbe<E> {
    pub fn new(pool: Arc<EndpointPool<E>>, interval: Duration, shutdown: Arc<Shutdown>) -> Self {
        Self {
            pool,
            interval,
            shutdown,
            task: Mutex::new(None),
        }
    }

    /// Start probing the primary, replacing any probe already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);

        if self.shutdown.is_triggered() {
            tracing::debug!("Shutdown in progress, recovery probe not started");
            return;
        }

        if let Some(previous) = task.take() {
            if !previous.is_finished() {
                tracing::debug!(primary = %self.pool.primary().name(), "Restarting recovery probe");
            }
            previous.abort();
        }

        let pool = self.pool.clone();
        let interval = self.interval;
        let shutdown = self.shutdown.subscribe();
        *task = Some(tokio::spawn(run(pool, interval, shutdown)));
    }

    /// True while a probe task is alive.
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Abort the probe, if any.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().unwrap_or_else(PoisonError::into_inner).take() {
            handle.abort();
        }
    }
}

impl<E> Drop for RecoveryProbe<E> {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

async fn run<E: Endpoint>(pool: Arc<EndpointPool<E>>, interval: Duration, mut shutdown: broadcast::Receiver<()>) {
    let primary = pool.primary().clone();

    tracing::info!(
        primary = %primary.name(),
        interval_secs = interval.as_secs_f64(),
        "Recovery probe starting"
    );

    // First tick completes immediately.
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if check(primary.as_ref(), interval).await {
                    pool.restore_primary();
                    metrics::record_primary_restored();
                    tracing::info!(primary = %primary.name(), "Primary healthy again, recovery probe stopping");
                    break;
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Recovery probe received shutdown signal, exiting loop");
                break;
            }
        }
    }
}

async fn check<E: Endpoint>(primary: &E, timeout: Duration) -> bool {
    let healthy = match time::timeout(timeout, primary.health_check()).await {
        Ok(status) if !status.is_error() => true,
        Ok(status) => {
            tracing::warn!(
                primary = %primary.name(),
                category = %status.category(),
                "Recovery probe failed"
            );
            false
        }
        Err(_) => {
            tracing::warn!(primary = %primary.name(), "Recovery probe failed: timeout");
            false
        }
    };

    metrics::record_probe(healthy);
    healthy
}
