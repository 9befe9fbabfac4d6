//! region-failover CLI.
//!
//! Runs one operation against a multi-region messaging backend through the
//! failover manager and prints the outcome as JSON.

use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use clap::{Parser, Subcommand};
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Serialize;
use tokio::sync::oneshot;

use region_failover::config::{load_config, FailoverSettings};
use region_failover::observability::{logging, metrics};
use region_failover::transport::{RestConnector, RestRegion};
use region_failover::{Endpoint, FailoverManager, Operation, Outcome, Status};

#[derive(Parser)]
#[command(name = "region-failover")]
#[command(about = "Talk to a multi-region messaging backend with automatic failover", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish a message to a channel
    Publish {
        #[arg(long)]
        channel: String,
        /// JSON message; anything that is not valid JSON is sent as a string
        #[arg(long)]
        message: String,
    },
    /// Fetch the server time
    Time,
    /// Validate the configuration and exit
    Validate,
}

#[derive(Serialize)]
struct Report<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    region: Option<String>,
    status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<T>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => load_config(path)?,
        None => FailoverSettings::default(),
    };

    logging::init_logging(&settings.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        primary = %settings.primary.name,
        backups = settings.backups.len(),
        "region-failover starting"
    );

    if let Commands::Validate = cli.command {
        println!(
            "Configuration OK: primary '{}', {} backup(s)",
            settings.primary.name,
            settings.backups.len()
        );
        return Ok(());
    }

    if settings.observability.metrics_enabled {
        if let Ok(addr) = settings.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %settings.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let manager = FailoverManager::connect(&RestConnector, &settings)?;

    let failed = match cli.command {
        Commands::Publish { channel, message } => {
            let message = serde_json::from_str(&message).unwrap_or(serde_json::Value::String(message));
            let report = run(&manager, move |region: &Arc<RestRegion>| {
                region.publish(channel.clone(), message.clone())
            })
            .await?;
            print_report(&report)?
        }
        Commands::Time => {
            let report = run(&manager, |region: &Arc<RestRegion>| region.time()).await?;
            print_report(&report)?
        }
        Commands::Validate => false,
    };

    manager.shutdown();

    if failed {
        return Err("operation failed on every available region".into());
    }
    Ok(())
}

async fn run<F, O>(manager: &FailoverManager<RestRegion>, factory: F) -> Result<Report<O::Output>, Box<dyn Error>>
where
    F: Fn(&Arc<RestRegion>) -> O + Send + Sync + 'static,
    O: Operation + 'static,
{
    let served_by = Arc::new(Mutex::new(None));
    let slot = served_by.clone();
    let tracked = move |region: &Arc<RestRegion>| Tracked {
        region: region.name().to_string(),
        served_by: slot.clone(),
        inner: factory(region),
    };

    let (tx, rx) = oneshot::channel();
    manager.submit(tracked, move |result, status| {
        let _ = tx.send((result, status));
    });
    let (result, status) = rx.await?;
    let region = served_by.lock().unwrap_or_else(PoisonError::into_inner).take();

    Ok(Report { region, status, result })
}

/// Records the region of the last attempt that completed. Abandoned attempts
/// never complete, so this is the region behind the delivered outcome.
struct Tracked<O> {
    region: String,
    served_by: Arc<Mutex<Option<String>>>,
    inner: O,
}

impl<O: Operation> Operation for Tracked<O> {
    type Output = O::Output;

    fn execute(&self) -> BoxFuture<'_, Outcome<O::Output>> {
        async move {
            let outcome = self.inner.execute().await;
            *self.served_by.lock().unwrap_or_else(PoisonError::into_inner) = Some(self.region.clone());
            outcome
        }
        .boxed()
    }
}

fn print_report<T: Serialize>(report: &Report<T>) -> Result<bool, Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(report.status.is_error())
}
