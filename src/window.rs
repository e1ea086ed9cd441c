use crate::error::TailError;
use chrono::{DateTime, Duration, Utc};

/// Time range scoping a single search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollWindow {
    pub gte: DateTime<Utc>,
    pub lte: DateTime<Utc>,
}

/// Produces the poll window for each iteration of the tail loop.
///
/// The upper bound is fixed once at construction (`now - start_time`) and
/// never moves. The first poll looks back `sync_depth` minutes from it, and
/// every later poll looks back `sync_interval` seconds from the same bound.
#[derive(Debug, Clone)]
pub struct WindowTracker {
    lte: DateTime<Utc>,
    first_gte: DateTime<Utc>,
    later_gte: DateTime<Utc>,
    sleep: std::time::Duration,
    polls: u64,
}

impl WindowTracker {
    /// Fails when an offset does not fit in a timestamp.
    pub fn new(
        now: DateTime<Utc>,
        start_time_min: i64,
        sync_depth_min: i64,
        sync_interval_sec: u64,
    ) -> Result<Self, TailError> {
        let start_time = Duration::try_minutes(start_time_min)
            .ok_or_else(|| out_of_range("start_time", start_time_min))?;
        let sync_depth = Duration::try_minutes(sync_depth_min)
            .ok_or_else(|| out_of_range("sync_depth", sync_depth_min))?;
        let sync_interval = i64::try_from(sync_interval_sec)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| out_of_range("sync_interval", sync_interval_sec))?;

        let lte = now
            .checked_sub_signed(start_time)
            .ok_or_else(|| out_of_range("start_time", start_time_min))?;
        let first_gte = lte
            .checked_sub_signed(sync_depth)
            .ok_or_else(|| out_of_range("sync_depth", sync_depth_min))?;
        let later_gte = lte
            .checked_sub_signed(sync_interval)
            .ok_or_else(|| out_of_range("sync_interval", sync_interval_sec))?;

        Ok(Self {
            lte,
            first_gte,
            later_gte,
            sleep: std::time::Duration::from_secs(sync_interval_sec),
            polls: 0,
        })
    }

    /// Window for the next poll.
    pub fn next_window(&mut self) -> PollWindow {
        let gte = if self.polls == 0 {
            self.first_gte
        } else {
            self.later_gte
        };
        self.polls += 1;

        PollWindow { gte, lte: self.lte }
    }

    /// Number of windows handed out so far.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn upper_bound(&self) -> DateTime<Utc> {
        self.lte
    }

    /// Pause between two polls.
    pub fn sleep_duration(&self) -> std::time::Duration {
        self.sleep
    }
}

fn out_of_range(field: &'static str, value: impl ToString) -> TailError {
    TailError::WindowOutOfRange {
        field,
        value: value.to_string(),
    }
}
