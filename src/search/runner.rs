use super::client::SearchBackend;
use crate::error::TailError;
use crate::formatters::HitFormatter;
use crate::query::SearchRequest;
use crate::schemas::SearchResponse;
use crate::window::WindowTracker;
use std::io::Write;
use std::time::Duration;

/// How transport failures are handled. The default gives up on the first one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry, doubled on each further retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(retry.saturating_sub(1)))
    }
}

/// Drives the poll loop: window, request, search, format, write, sleep.
pub struct SearchRunner<B, W> {
    backend: B,
    formatter: HitFormatter,
    tracker: WindowTracker,
    out: W,
    query: String,
    count: usize,
    retry: RetryPolicy,
    max_polls: Option<u64>,
    sleep: fn(Duration),
}

impl<B: SearchBackend, W: Write> SearchRunner<B, W> {
    pub fn new(
        backend: B,
        formatter: HitFormatter,
        tracker: WindowTracker,
        out: W,
        query: impl Into<String>,
        count: usize,
    ) -> Self {
        Self {
            backend,
            formatter,
            tracker,
            out,
            query: query.into(),
            count,
            retry: RetryPolicy::default(),
            max_polls: None,
            sleep: std::thread::sleep,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Stop after this many polls instead of running until killed.
    pub fn with_max_polls(mut self, max_polls: Option<u64>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn polls(&self) -> u64 {
        self.tracker.polls()
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run one poll and return the number of lines written.
    pub fn run_once(&mut self) -> Result<usize, TailError> {
        let window = self.tracker.next_window();
        let request = SearchRequest::new(&self.query, self.count, window);
        tracing::debug!(
            "Poll {} window {} .. {}",
            self.tracker.polls(),
            window.gte,
            window.lte
        );

        let response = self.search_with_retry(&request)?;
        let lines = self.formatter.format_response(response)?;

        for line in &lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()?;

        Ok(lines.len())
    }

    /// Poll until an error occurs or `max_polls` is reached.
    pub fn run(&mut self) -> Result<(), TailError> {
        loop {
            if self.poll_limit_reached() {
                return Ok(());
            }
            self.run_once()?;

            if self.poll_limit_reached() {
                tracing::debug!("Reached {} polls, stopping", self.tracker.polls());
                return Ok(());
            }

            let pause = self.tracker.sleep_duration();
            tracing::debug!("Sync {:?}", pause);
            (self.sleep)(pause);
        }
    }

    fn poll_limit_reached(&self) -> bool {
        self.max_polls.is_some_and(|max| self.tracker.polls() >= max)
    }

    fn search_with_retry(&self, request: &SearchRequest) -> Result<SearchResponse, TailError> {
        let mut retry = 0;
        loop {
            match self.backend.search(request) {
                Err(err) if err.is_transport() && retry < self.retry.max_retries => {
                    retry += 1;
                    let delay = self.retry.delay_for(retry);
                    tracing::warn!(
                        "Search failed ({err}), retry {}/{} in {:?}",
                        retry,
                        self.retry.max_retries,
                        delay
                    );
                    (self.sleep)(delay);
                }
                result => return result,
            }
        }
    }
}
