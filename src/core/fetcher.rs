//! Fetcher seam between the polling controller and the network

use async_trait::async_trait;

use super::{Fid, StatsSnapshot};

/// A failed stats fetch attempt.
///
/// Either network call failing in any way fails the whole attempt; partial
/// results are never surfaced, so counts and profile always come from the
/// same point in time. Retrying is the poller's job, not the fetcher's.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport-level failure on either call
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from either call
    #[error("hub returned status {0}")]
    Status(u16),

    /// Response decoded but lacks required fields or has the wrong shape
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Source of stats snapshots, implemented by the hub client and mocked in
/// poller tests.
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    /// Fetch a complete snapshot for `fid`, or fail atomically.
    async fn fetch_stats(&self, fid: Fid) -> Result<StatsSnapshot, FetchError>;
}
