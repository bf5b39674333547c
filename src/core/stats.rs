//! Stats snapshot model - represents a point-in-time usage state for one user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque user identifier ("fid"). Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fid(u64);

impl Fid {
    /// Create a fid, rejecting zero.
    pub fn new(raw: u64) -> Option<Self> {
        if raw == 0 {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Fid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-only profile data attached to a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub pfp_url: String,
}

/// A snapshot of nut-reaction stats for a user at a point in time
///
/// The raw counters are cumulative as reported by the hub; the daily reset
/// is derived locally (see `core::allowance`). A snapshot is replaced
/// wholesale on each successful fetch and never patched field-by-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// User the stats belong to
    pub fid: Fid,

    /// Reactions sent, cumulative
    pub sent_count: u64,

    /// Reactions received, cumulative
    pub received_count: u64,

    /// Failed send attempts, cumulative
    pub failed_attempt_count: u64,

    /// Completion time of the fetch that produced this record
    pub captured_at: DateTime<Utc>,

    /// Profile data captured alongside the counts
    pub profile: Profile,
}
