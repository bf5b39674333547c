//! Display-ready mapping of stats snapshots
//!
//! Pure functions only: given a snapshot, the allowance settings, and a
//! clock reading, produce the strings the widget shows. No I/O, no state.

use chrono::{DateTime, Timelike, Utc};

use crate::core::{next_reset, remaining_allowance, StatsSnapshot};
use crate::settings::Settings;

/// Values ready to render for one stats card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub fid: u64,
    pub display_name: String,
    /// Handle with the leading `@`
    pub username: String,
    pub pfp_url: String,
    pub sent: String,
    pub received: String,
    pub failed: String,
    pub remaining_daily: u32,
    /// Next reset as a 24-hour UTC clock label, e.g. "11:00 UTC"
    pub next_reset_label: String,
}

impl StatsView {
    pub fn build(
        snapshot: &StatsSnapshot,
        allowance: u32,
        reset_hour: u32,
        now: DateTime<Utc>,
    ) -> Self {
        let reset_at = next_reset(now, reset_hour);
        Self {
            fid: snapshot.fid.get(),
            display_name: snapshot.profile.display_name.clone(),
            username: format!("@{}", snapshot.profile.username),
            pfp_url: snapshot.profile.pfp_url.clone(),
            sent: format_count(snapshot.sent_count),
            received: format_count(snapshot.received_count),
            failed: format_count(snapshot.failed_attempt_count),
            remaining_daily: remaining_allowance(snapshot.sent_count, allowance),
            next_reset_label: format!("{:02}:{:02} UTC", reset_at.hour(), reset_at.minute()),
        }
    }
}

/// Comma-grouped integer string, e.g. 1234567 -> "1,234,567"
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Footer line shown under the card
pub fn footer_label(settings: &Settings) -> String {
    format!(
        "Tracking since {} | Daily limit: {}",
        settings.tracking_since.format("%Y-%m-%d"),
        settings.daily_allowance
    )
}
