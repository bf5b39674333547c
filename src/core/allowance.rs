//! Daily allowance window math
//!
//! The hub reports cumulative counters; the daily quota and its fixed UTC
//! reset boundary are derived locally from those counters and the clock.
//! Both functions are pure so they test against fixed instants.

use chrono::{DateTime, Days, Timelike, Utc};

/// Remaining sends in the current allowance window.
///
/// Computed as `allowance - (sent_count % allowance)`, which lands in
/// `[1, allowance]`: a counter sitting exactly on a multiple of the
/// allowance reports a full window remaining until the next reset, not an
/// empty one for the window just closed.
pub fn remaining_allowance(sent_count: u64, allowance: u32) -> u32 {
    if allowance == 0 {
        return 0;
    }
    allowance - (sent_count % u64::from(allowance)) as u32
}

/// Next UTC instant at `reset_hour:00:00.000`.
///
/// Today's occurrence if the current UTC hour is strictly before
/// `reset_hour`, otherwise tomorrow's. `reset_hour` must be in `0..24`
/// (settings validation enforces this); out-of-range values wrap.
pub fn next_reset(now: DateTime<Utc>, reset_hour: u32) -> DateTime<Utc> {
    let hour = reset_hour % 24;
    let date = if now.hour() < hour {
        now.date_naive()
    } else {
        now.date_naive() + Days::new(1)
    };
    // hour is < 24 after the wrap, so this always produces a valid time
    date.and_hms_opt(hour, 0, 0)
        .map(|reset| reset.and_utc())
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_remaining_allowance_scenario() {
        // 120 sent against an allowance of 50 leaves 30 in the window
        assert_eq!(remaining_allowance(120, 50), 30);
    }

    #[test]
    fn test_remaining_allowance_full_on_multiples() {
        assert_eq!(remaining_allowance(0, 50), 50);
        assert_eq!(remaining_allowance(50, 50), 50);
        assert_eq!(remaining_allowance(150, 50), 50);
    }

    #[test]
    fn test_remaining_allowance_range() {
        for sent in 0..200u64 {
            let remaining = remaining_allowance(sent, 50);
            assert!(remaining >= 1 && remaining <= 50, "sent={sent} gave {remaining}");
        }
    }

    #[test]
    fn test_remaining_allowance_zero_allowance() {
        assert_eq!(remaining_allowance(10, 0), 0);
    }

    #[test]
    fn test_next_reset_before_boundary() {
        let now = utc(2025, 3, 10, 9, 30, 0);
        assert_eq!(next_reset(now, 11), utc(2025, 3, 10, 11, 0, 0));
    }

    #[test]
    fn test_next_reset_after_boundary() {
        let now = utc(2025, 3, 10, 13, 0, 0);
        assert_eq!(next_reset(now, 11), utc(2025, 3, 11, 11, 0, 0));
    }

    #[test]
    fn test_next_reset_exactly_at_boundary_rolls_forward() {
        let now = utc(2025, 3, 10, 11, 0, 0);
        assert_eq!(next_reset(now, 11), utc(2025, 3, 11, 11, 0, 0));
    }

    #[test]
    fn test_next_reset_crosses_month_end() {
        let now = utc(2025, 1, 31, 23, 59, 59);
        assert_eq!(next_reset(now, 11), utc(2025, 2, 1, 11, 0, 0));
    }

    #[test]
    fn test_next_reset_strictly_after_and_within_a_day() {
        for h in 0..24u32 {
            for reset in 0..24u32 {
                let now = utc(2025, 6, 15, h, 17, 42);
                let reset_at = next_reset(now, reset);
                assert!(reset_at > now, "h={h} reset={reset}");
                assert!(reset_at - now <= chrono::Duration::hours(24));
                assert_eq!(reset_at.hour(), reset);
                assert_eq!(reset_at.minute(), 0);
                assert_eq!(reset_at.second(), 0);
            }
        }
    }
}
