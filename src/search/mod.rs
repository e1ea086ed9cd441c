pub mod client;
pub mod runner;

pub use client::{HttpSearchClient, SearchBackend};
pub use runner::{RetryPolicy, SearchRunner};

use crate::error::TailError;
use crate::formatters::HitFormatter;
use crate::settings::TailConfig;
use crate::window::WindowTracker;
use std::time::Duration;

/// Tail `query` against the configured backend, printing to stdout.
pub fn tail(config: &TailConfig, query: &str) -> Result<(), TailError> {
    let formatter = HitFormatter::new(config.render_options(), query)?;
    let client = HttpSearchClient::new(
        config.search_url(),
        Duration::from_secs(config.request_timeout),
    )?;
    let tracker = WindowTracker::new(
        chrono::Utc::now(),
        config.start_time,
        config.sync_depth,
        config.sync_interval,
    )?;

    SearchRunner::new(
        client,
        formatter,
        tracker,
        std::io::stdout().lock(),
        query,
        config.count,
    )
    .with_retry(config.retry_policy())
    .with_max_polls(config.max_polls)
    .run()
}
