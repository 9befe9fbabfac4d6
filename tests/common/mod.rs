//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use region_failover::config::RegionConfig;
use region_failover::{Endpoint, Operation, Outcome, Status, StatusCategory};

/// What a scripted region does with one attempt.
#[derive(Debug, Clone)]
pub enum Step {
    Reply(StatusCategory),
    Hang,
    Panic,
}

/// In-memory region that replays a script of attempt results.
///
/// Once the script is used up every attempt gets `fallback`.
pub struct ScriptedRegion {
    name: &'static str,
    script: Mutex<VecDeque<Step>>,
    fallback: Step,
    health: Mutex<VecDeque<StatusCategory>>,
    health_fallback: StatusCategory,
    attempts: AtomicUsize,
    health_checks: AtomicUsize,
}

impl ScriptedRegion {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            script: Mutex::new(VecDeque::new()),
            fallback: Step::Reply(StatusCategory::Success),
            health: Mutex::new(VecDeque::new()),
            health_fallback: StatusCategory::Success,
            attempts: AtomicUsize::new(0),
            health_checks: AtomicUsize::new(0),
        }
    }

    pub fn then(mut self, step: Step) -> Self {
        self.script.get_mut().unwrap().push_back(step);
        self
    }

    pub fn always(mut self, step: Step) -> Self {
        self.fallback = step;
        self
    }

    pub fn health_then(mut self, category: StatusCategory) -> Self {
        self.health.get_mut().unwrap().push_back(category);
        self
    }

    pub fn health_always(mut self, category: StatusCategory) -> Self {
        self.health_fallback = category;
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn health_checks(&self) -> usize {
        self.health_checks.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> Step {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }

    fn status_for(&self, category: StatusCategory) -> Status {
        match category {
            StatusCategory::Success => Status::success(),
            other => Status::error(other).with_message(self.name),
        }
    }
}

impl Endpoint for ScriptedRegion {
    fn name(&self) -> &str {
        self.name
    }

    fn health_check(&self) -> BoxFuture<'_, Status> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        let category = self
            .health
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.health_fallback);
        let status = self.status_for(category);
        async move { status }.boxed()
    }
}

/// Operation against a [`ScriptedRegion`]; succeeds with the region's name.
pub struct Call {
    region: Arc<ScriptedRegion>,
}

impl Operation for Call {
    type Output = String;

    fn execute(&self) -> BoxFuture<'_, Outcome<String>> {
        async move {
            self.region.attempts.fetch_add(1, Ordering::SeqCst);
            match self.region.next_step() {
                Step::Reply(StatusCategory::Success) => Outcome::success(self.region.name.to_string()),
                Step::Reply(category) => Outcome::failure(self.region.status_for(category)),
                Step::Hang => std::future::pending().await,
                Step::Panic => panic!("scripted panic in {}", self.region.name),
            }
        }
        .boxed()
    }
}

/// Operation factory for scripted regions.
pub fn call(region: &Arc<ScriptedRegion>) -> Call {
    Call { region: region.clone() }
}

/// Region config pointing at a local mock backend.
pub fn region_config(name: &str, addr: SocketAddr) -> RegionConfig {
    RegionConfig {
        name: name.to_string(),
        origin: format!("http://{}", addr),
        publish_key: "pub-key".to_string(),
        subscribe_key: "sub-key".to_string(),
        user_id: "tester".to_string(),
        connect_timeout_secs: 1,
        request_timeout_secs: 1,
        use_env_proxy: false,
    }
}

/// Start a programmable mock backend on an ephemeral port.
///
/// `f` receives the request path and answers with status, body and a delay
/// applied before responding.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String, Duration)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 8192];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]).into_owned();
                        let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

                        let (status, body, delay) = f(path).await;
                        tokio::time::sleep(delay).await;

                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            403 => "403 Forbidden",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };
                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
