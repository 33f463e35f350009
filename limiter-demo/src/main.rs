// ABOUTME: Demo that fires several requests through a dispatcher limited to two slots.
// ABOUTME: Logs when each request starts and finishes to show the gate at work.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::Result;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use async_requests::prelude::*;

const DEFAULT_URL: &str = "https://www.scrapethissite.com/pages/simple/";
const REQUESTS: usize = 4;

/// Parser that holds its slot for a while before reading the body.
async fn slow_text(response: reqwest::Response) -> Result<String> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Ok(response.text().await?)
}

async fn make_request(
    dispatcher: Arc<Dispatcher<reqwest::Client>>,
    counter: Arc<AtomicUsize>,
    url: String,
) -> Result<()> {
    let id = counter.fetch_add(1, Ordering::SeqCst) + 1;
    info!(request = id, "Starting");
    let body = dispatcher.get(&url, slow_text).await?;
    info!(request = id, bytes = body.len(), "Finished");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = GateConfig::from_env()?;
    if std::env::var(async_requests::config::MAX_CONCURRENCY_ENV).is_err() {
        config.max_concurrency = 2;
    }
    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());

    info!(
        capacity = config.max_concurrency,
        requests = REQUESTS,
        %url,
        "Dispatching"
    );

    let dispatcher = Arc::new(Dispatcher::with_default_client(&config)?);
    let counter = Arc::new(AtomicUsize::new(0));

    let mut tasks = JoinSet::new();
    for _ in 0..REQUESTS {
        tasks.spawn(make_request(dispatcher.clone(), counter.clone(), url.clone()));
    }

    let mut failures = 0;
    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined? {
            failures += 1;
            warn!(error = %e, "Request failed");
        }
    }

    let stats = dispatcher.gate().stats();
    info!(
        admitted = stats.total_admitted,
        peak = stats.peak_live,
        failures,
        "Done"
    );
    Ok(())
}
