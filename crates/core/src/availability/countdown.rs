//! Countdown rendering.

use jiff::SignedDuration;

/// Text shown when a discount can be redeemed right away.
pub const AVAILABLE_NOW: &str = "Available now";

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Render a remaining duration given in milliseconds.
///
/// Zero or negative durations render as [`AVAILABLE_NOW`]. Otherwise exactly
/// one layout is picked from the largest non-zero unit:
///
/// - days: `"2d 3h 4m"`
/// - hours: `"3h 4m 5s"`
/// - minutes: `"4m 5s"`
/// - seconds: `"5s"`
pub fn format_countdown(duration_ms: i64) -> String {
    if duration_ms <= 0 {
        return AVAILABLE_NOW.to_owned();
    }

    let total_seconds = duration_ms / 1_000;
    let days = total_seconds / SECONDS_PER_DAY;
    let hours = (total_seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = total_seconds % SECONDS_PER_MINUTE;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

/// Where a discount stands relative to its next redeemable moment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Redeemable right now.
    AvailableNow,

    /// Redeemable once the duration has elapsed.
    Remaining(SignedDuration),

    /// Inactive, expired, or nothing redeemable within the search horizon.
    Unavailable,
}

impl Countdown {
    /// Whether a countdown timer has anything left to show.
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Remaining(_))
    }

    /// Display text for the countdown, if there is one.
    pub fn label(&self) -> Option<String> {
        match self {
            Self::AvailableNow => Some(AVAILABLE_NOW.to_owned()),
            // Saturates so far-off instants render as a large day count.
            Self::Remaining(remaining) => Some(format_countdown(
                remaining
                    .as_secs()
                    .saturating_mul(1_000)
                    .saturating_add(i64::from(remaining.subsec_millis())),
            )),
            Self::Unavailable => None,
        }
    }
}
