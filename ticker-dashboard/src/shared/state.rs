//! Dashboard state container
//!
//! The only owner of the payload. Poll outcomes are applied here and views
//! receive immutable borrows.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::calc::PayloadSummary;
use super::error::FetchError;
use super::poller::PollOutcome;
use super::types::DashboardPayload;

/// Freshness of the displayed data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedStatus {
    /// Nothing fetched yet
    Loading,
    /// No payload yet and the last fetch failed
    Failed,
    /// Last fetch succeeded
    Fresh,
    /// A payload is shown but the last fetch failed
    Stale,
}

/// Most recent fetch failure
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub seq: u64,
    pub at: DateTime<Utc>,
    pub error: FetchError,
}

/// Everything the views need from a loaded payload
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    pub payload: &'a DashboardPayload,
    pub summary: &'a PayloadSummary,
    pub status: FeedStatus,
    pub last_error: Option<&'a FetchFailure>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    loaded: Option<(DashboardPayload, PayloadSummary)>,
    last_seq: u64,
    updated_at: Option<DateTime<Utc>>,
    last_error: Option<FetchFailure>,
    successes: u64,
    failures: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one poll outcome
    ///
    /// Success replaces the payload wholesale. Failure keeps whatever was
    /// shown before and records the error. Outcomes older than one already
    /// applied are ignored.
    pub fn apply(&mut self, outcome: PollOutcome) {
        if outcome.seq <= self.last_seq {
            debug!(
                "Ignoring outcome #{} older than #{}",
                outcome.seq, self.last_seq
            );
            return;
        }
        self.last_seq = outcome.seq;

        match outcome.result {
            Ok(payload) => {
                if self.loaded.is_none() {
                    info!("First payload loaded for {}", payload.ticker);
                }
                let summary = PayloadSummary::from_payload(&payload);
                self.loaded = Some((payload, summary));
                self.updated_at = Some(outcome.completed_at);
                self.last_error = None;
                self.successes += 1;
            }
            Err(error) => {
                self.last_error = Some(FetchFailure {
                    seq: outcome.seq,
                    at: outcome.completed_at,
                    error,
                });
                self.failures += 1;
            }
        }
    }

    pub fn status(&self) -> FeedStatus {
        match (&self.loaded, &self.last_error) {
            (None, None) => FeedStatus::Loading,
            (None, Some(_)) => FeedStatus::Failed,
            (Some(_), None) => FeedStatus::Fresh,
            (Some(_), Some(_)) => FeedStatus::Stale,
        }
    }

    /// Loaded data, `None` until the first successful fetch
    pub fn view(&self) -> Option<DashboardView<'_>> {
        self.loaded.as_ref().map(|(payload, summary)| DashboardView {
            payload,
            summary,
            status: self.status(),
            last_error: self.last_error.as_ref(),
            updated_at: self.updated_at,
        })
    }

    pub fn payload(&self) -> Option<&DashboardPayload> {
        self.loaded.as_ref().map(|(payload, _)| payload)
    }

    pub fn last_error(&self) -> Option<&FetchFailure> {
        self.last_error.as_ref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// (successful, failed) fetch counts
    pub fn counts(&self) -> (u64, u64) {
        (self.successes, self.failures)
    }
}
