//! End-to-end failover over HTTP against local mock regions.

mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;

use common::{region_config, start_programmable_backend};
use region_failover::config::{FailoverConfig, FailoverSettings, ObservabilityConfig};
use region_failover::transport::{PublishResponse, RestConnector, RestRegion};
use region_failover::{Endpoint, FailoverManager, StatusCategory};

const ACK: &str = r#"[1,"Sent","15000000000000000"]"#;
const TIME: &str = "[15000000000000001]";

/// Backend that answers every request after `delay`, counting publishes and
/// keeping the last path it saw.
async fn region_backend(
    status: u16,
    delay: Duration,
) -> (std::net::SocketAddr, Arc<AtomicUsize>, Arc<Mutex<String>>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let last_path = Arc::new(Mutex::new(String::new()));

    let counter = hits.clone();
    let seen = last_path.clone();
    let addr = start_programmable_backend(move |path: String| {
        let counter = counter.clone();
        let seen = seen.clone();
        async move {
            if path.starts_with("/publish") {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            let body = if path.starts_with("/time") { TIME } else { ACK };
            *seen.lock().unwrap() = path;
            (status, body.to_string(), delay)
        }
    })
    .await;

    (addr, hits, last_path)
}

fn settings(
    primary: std::net::SocketAddr,
    backups: &[std::net::SocketAddr],
    failover: FailoverConfig,
) -> FailoverSettings {
    FailoverSettings {
        primary: region_config("primary", primary),
        backups: backups
            .iter()
            .enumerate()
            .map(|(i, addr)| region_config(&format!("backup-{}", i + 1), *addr))
            .collect(),
        failover,
        observability: ObservabilityConfig::default(),
    }
}

fn publish(region: &Arc<RestRegion>) -> region_failover::transport::Publish {
    region.publish("ch", json!("msg"))
}

#[tokio::test]
async fn test_publish_fails_over_to_responsive_region() {
    let (primary, primary_hits, _) = region_backend(200, Duration::from_secs(3)).await;
    let (slow, slow_hits, _) = region_backend(200, Duration::from_secs(3)).await;
    let (healthy, healthy_hits, healthy_path) = region_backend(200, Duration::ZERO).await;

    let failover = FailoverConfig {
        max_attempts_per_endpoint: 1,
        ..FailoverConfig::default()
    };
    let manager = FailoverManager::connect(&RestConnector, &settings(primary, &[slow, healthy], failover)).unwrap();

    let outcome = manager.execute(publish).await;

    assert!(!outcome.status.is_error(), "unexpected status: {:?}", outcome.status);
    assert_eq!(outcome.result, Some(PublishResponse { timetoken: 15000000000000000 }));
    assert_eq!(manager.current_endpoint().name(), "backup-2");
    assert!(manager.is_recovering());

    assert_eq!(primary_hits.load(Ordering::SeqCst), 2);
    assert_eq!(slow_hits.load(Ordering::SeqCst), 2);
    assert_eq!(healthy_hits.load(Ordering::SeqCst), 1);

    let path = healthy_path.lock().unwrap().clone();
    assert!(path.starts_with("/publish/pub-key/sub-key/0/ch/0/%22msg%22"), "path: {}", path);
    assert!(path.contains("uuid=tester"), "path: {}", path);

    manager.shutdown();
}

#[tokio::test]
async fn test_access_denied_is_not_failed_over() {
    let (primary, _, _) = region_backend(403, Duration::ZERO).await;
    let (backup, backup_hits, _) = region_backend(200, Duration::ZERO).await;

    let manager =
        FailoverManager::connect(&RestConnector, &settings(primary, &[backup], FailoverConfig::default())).unwrap();

    let outcome = manager.execute(publish).await;

    assert_eq!(outcome.status.category(), StatusCategory::AccessDenied);
    assert_eq!(outcome.status.status_code(), Some(403));
    assert_eq!(backup_hits.load(Ordering::SeqCst), 0);
    assert!(!manager.is_recovering());
}

#[tokio::test]
async fn test_time_operation() {
    let (primary, _, path) = region_backend(200, Duration::ZERO).await;

    let manager = FailoverManager::connect(&RestConnector, &settings(primary, &[], FailoverConfig::default())).unwrap();

    let outcome = manager.execute(|region: &Arc<RestRegion>| region.time()).await;

    assert_eq!(outcome.result.map(|t| t.timetoken), Some(15000000000000001));
    assert!(path.lock().unwrap().starts_with("/time/0"));
}

#[tokio::test]
async fn test_probe_returns_traffic_to_primary() {
    let healthy = Arc::new(AtomicBool::new(false));
    let primary_hits = Arc::new(AtomicUsize::new(0));

    let flag = healthy.clone();
    let counter = primary_hits.clone();
    let primary = start_programmable_backend(move |path: String| {
        let up = flag.load(Ordering::SeqCst);
        let counter = counter.clone();
        async move {
            if path.starts_with("/publish") {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            let body = if path.starts_with("/time") { TIME } else { ACK };
            let delay = if up { Duration::ZERO } else { Duration::from_secs(3) };
            (200, body.to_string(), delay)
        }
    })
    .await;
    let (backup, _, _) = region_backend(200, Duration::ZERO).await;

    let failover = FailoverConfig {
        max_attempts_per_endpoint: 0,
        probe_interval_secs: 1,
        ..FailoverConfig::default()
    };
    let manager = FailoverManager::connect(&RestConnector, &settings(primary, &[backup], failover)).unwrap();

    let outcome = manager.execute(publish).await;
    assert!(!outcome.status.is_error(), "unexpected status: {:?}", outcome.status);
    assert_eq!(manager.current_endpoint().name(), "backup-1");
    assert_eq!(primary_hits.load(Ordering::SeqCst), 1);

    healthy.store(true, Ordering::SeqCst);

    let mut restored = false;
    for _ in 0..50 {
        if manager.pool().is_primary(&manager.current_endpoint()) {
            restored = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(restored, "primary was not restored");

    let outcome = manager.execute(publish).await;
    assert!(!outcome.status.is_error());
    assert_eq!(primary_hits.load(Ordering::SeqCst), 2);
    assert!(!manager.is_recovering());
}
