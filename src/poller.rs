//! Polling controller
//!
//! Owns the refresh cadence and the single current-stats slot. At most one
//! fetch per subject is in flight at a time; overlapping triggers are
//! coalesced into no-ops. Every issued fetch carries a monotonically
//! increasing generation tag and a result commits only while its generation
//! is still the latest issued one, so a slow response from an abandoned
//! attempt can never overwrite a newer result.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::core::{FetchError, Fid, StatsFetcher, StatsSnapshot};

/// Latest committed view of the polled stats
#[derive(Debug, Clone, Default)]
pub struct PolledStats {
    /// Most recent successful snapshot; kept in place across failures
    pub stats: Option<StatsSnapshot>,

    /// Failure text from the most recent settled fetch, if it failed
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No subject known
    Idle,
    /// A request is outstanding
    Fetching,
    /// A success-or-failure result is current
    Settled,
}

struct PollState {
    subject: Option<Fid>,
    phase: Phase,
    /// Latest issued fetch generation; commits require an exact match.
    /// Bumped on every issued fetch and on every subject change, which is
    /// what abandons an outstanding request.
    latest_generation: u64,
    /// Refresh timer handle; armed only while a subject is known
    timer: Option<JoinHandle<()>>,
}

/// Drives periodic stats fetches for the current subject and publishes the
/// committed view through a watch channel.
pub struct StatsPoller {
    inner: Arc<PollerInner>,
}

struct PollerInner {
    fetcher: Arc<dyn StatsFetcher>,
    interval: Duration,
    state: Mutex<PollState>,
    current: watch::Sender<PolledStats>,
}

impl StatsPoller {
    pub fn new(fetcher: Arc<dyn StatsFetcher>, interval: Duration) -> Self {
        let (current, _) = watch::channel(PolledStats::default());
        Self {
            inner: Arc::new(PollerInner {
                fetcher,
                interval,
                state: Mutex::new(PollState {
                    subject: None,
                    phase: Phase::Idle,
                    latest_generation: 0,
                    timer: None,
                }),
                current,
            }),
        }
    }

    /// Change (or clear) the subject the poller tracks.
    ///
    /// A change abandons any outstanding fetch for the previous subject,
    /// clears the committed view, and rearms or disarms the refresh timer.
    /// Setting the same subject again is a no-op.
    pub fn set_subject(&self, subject: Option<Fid>) {
        self.inner.set_subject(subject);
    }

    /// Manual refresh. A no-op while a fetch is already outstanding for the
    /// current subject (coalesced, not queued) or while no subject is known.
    pub fn refresh(&self) {
        self.inner.begin_fetch();
    }

    /// Subscribe to committed view changes.
    pub fn watch(&self) -> watch::Receiver<PolledStats> {
        self.inner.current.subscribe()
    }

    /// Latest committed view.
    pub fn current(&self) -> PolledStats {
        self.inner.current.borrow().clone()
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        if let Ok(mut state) = self.inner.state.lock() {
            state.latest_generation += 1;
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
        }
    }
}

impl PollerInner {
    fn set_subject(self: &Arc<Self>, subject: Option<Fid>) {
        {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return,
            };
            if state.subject == subject {
                return;
            }

            tracing::debug!(?subject, previous = ?state.subject, "subject changed");

            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            // Whatever is outstanding for the old subject is now abandoned
            state.latest_generation += 1;
            state.subject = subject;
            state.phase = Phase::Idle;
            self.current.send_replace(PolledStats::default());

            if subject.is_some() {
                state.timer = Some(self.spawn_timer());
            }
        }

        if subject.is_some() {
            self.begin_fetch();
        }
    }

    /// Issue a fetch for the current subject unless one is already in
    /// flight. Called on subject arrival, timer ticks, and manual refresh.
    fn begin_fetch(self: &Arc<Self>) {
        let (fid, generation) = {
            let mut state = match self.state.lock() {
                Ok(state) => state,
                Err(_) => return,
            };
            let Some(fid) = state.subject else {
                return;
            };
            if state.phase == Phase::Fetching {
                tracing::debug!(%fid, "fetch already outstanding, coalescing");
                return;
            }
            state.latest_generation += 1;
            state.phase = Phase::Fetching;
            (fid, state.latest_generation)
        };

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let result = inner.fetcher.fetch_stats(fid).await;
            inner.commit(fid, generation, result);
        });
    }

    /// Settle a completed fetch. The result is applied only if no newer
    /// fetch has been issued since; otherwise it is dropped on the floor.
    fn commit(&self, fid: Fid, generation: u64, result: Result<StatsSnapshot, FetchError>) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };
        if generation != state.latest_generation {
            tracing::debug!(%fid, generation, "discarding superseded fetch result");
            return;
        }
        state.phase = Phase::Settled;

        // The watch send stays under the state lock so a concurrent subject
        // change cannot interleave between the generation check and the
        // write.
        match result {
            Ok(snapshot) => {
                self.current.send_replace(PolledStats {
                    stats: Some(snapshot),
                    last_error: None,
                });
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!(%fid, error = error.as_str(), "stats fetch failed, keeping previous snapshot");
                self.current
                    .send_modify(|view| view.last_error = Some(error));
            }
        }
    }

    fn spawn_timer(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let interval = self.interval;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The interval fires immediately; the fetch issued on arming
            // already covers "now", so swallow the first tick.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.begin_fetch();
            }
        })
    }
}
