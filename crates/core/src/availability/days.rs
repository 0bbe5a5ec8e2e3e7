//! Day-indexed time windows.

use std::fmt;

use jiff::civil::{Time, Weekday};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// A day index is out of the `0..=6` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("day index {0} is out of range (expected 0..=6)")]
pub struct DayIndexError(pub u8);

/// Day of the week, counted from Monday.
///
/// Monday is `0` and Sunday is `6`. Every day index in this crate, including
/// excluded days, uses this convention. Sources that count from Sunday go
/// through [`DayIndex::from_sunday_zero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayIndex(u8);

impl DayIndex {
    /// Monday
    pub const MONDAY: Self = Self(0);
    /// Tuesday
    pub const TUESDAY: Self = Self(1);
    /// Wednesday
    pub const WEDNESDAY: Self = Self(2);
    /// Thursday
    pub const THURSDAY: Self = Self(3);
    /// Friday
    pub const FRIDAY: Self = Self(4);
    /// Saturday
    pub const SATURDAY: Self = Self(5);
    /// Sunday
    pub const SUNDAY: Self = Self(6);

    /// Build a Monday-zero day index.
    ///
    /// # Errors
    ///
    /// Returns [`DayIndexError`] when `index` is greater than 6.
    pub const fn new(index: u8) -> Result<Self, DayIndexError> {
        if index > 6 {
            Err(DayIndexError(index))
        } else {
            Ok(Self(index))
        }
    }

    /// Convert a Sunday-zero index (Sunday = 0, Saturday = 6).
    ///
    /// # Errors
    ///
    /// Returns [`DayIndexError`] when `index` is greater than 6.
    pub const fn from_sunday_zero(index: u8) -> Result<Self, DayIndexError> {
        if index > 6 {
            Err(DayIndexError(index))
        } else {
            Ok(Self((index + 6) % 7))
        }
    }

    /// Day index of a calendar weekday.
    pub const fn of(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Monday => Self::MONDAY,
            Weekday::Tuesday => Self::TUESDAY,
            Weekday::Wednesday => Self::WEDNESDAY,
            Weekday::Thursday => Self::THURSDAY,
            Weekday::Friday => Self::FRIDAY,
            Weekday::Saturday => Self::SATURDAY,
            Weekday::Sunday => Self::SUNDAY,
        }
    }

    /// Raw Monday-zero value.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// English day name.
    pub const fn label(self) -> &'static str {
        match self.0 {
            0 => "Monday",
            1 => "Tuesday",
            2 => "Wednesday",
            3 => "Thursday",
            4 => "Friday",
            5 => "Saturday",
            _ => "Sunday",
        }
    }
}

impl TryFrom<u8> for DayIndex {
    type Error = DayIndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayIndex> for u8 {
    fn from(value: DayIndex) -> Self {
        value.0
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minutes elapsed since midnight for a wall-clock time.
pub(crate) fn minute_of_day(time: Time) -> i32 {
    i32::from(time.hour()) * 60 + i32::from(time.minute())
}

/// Closed time-of-day range, compared at minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// First minute the range covers.
    pub start: Time,

    /// Last minute the range covers.
    pub end: Time,
}

impl TimeRange {
    /// Create a range from two wall-clock times.
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// Ranges whose end precedes their start never match anything.
    pub fn is_well_formed(&self) -> bool {
        minute_of_day(self.start) <= minute_of_day(self.end)
    }

    /// Whether `time` falls in `[start, end]`, ignoring seconds.
    pub fn contains(&self, time: Time) -> bool {
        let minute = minute_of_day(time);

        minute_of_day(self.start) <= minute && minute <= minute_of_day(self.end)
    }
}

/// The time ranges configured for a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayWindow {
    /// Day this window applies to.
    pub day: DayIndex,

    /// Ranges during which the discount is redeemable on `day`.
    #[serde(default)]
    pub time_ranges: SmallVec<[TimeRange; 2]>,
}

impl DayWindow {
    /// Create a window for `day` from a list of ranges.
    pub fn new(day: DayIndex, time_ranges: impl IntoIterator<Item = TimeRange>) -> Self {
        Self {
            day,
            time_ranges: time_ranges.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::time;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn sunday_zero_indices_are_remapped_to_monday_zero() -> TestResult {
        assert_eq!(DayIndex::from_sunday_zero(0)?, DayIndex::SUNDAY);
        assert_eq!(DayIndex::from_sunday_zero(1)?, DayIndex::MONDAY);
        assert_eq!(DayIndex::from_sunday_zero(6)?, DayIndex::SATURDAY);

        Ok(())
    }

    #[test]
    fn out_of_range_indices_are_rejected() {
        assert_eq!(DayIndex::new(7), Err(DayIndexError(7)));
        assert_eq!(DayIndex::from_sunday_zero(9), Err(DayIndexError(9)));
    }

    #[test]
    fn weekday_maps_to_its_index() {
        assert_eq!(DayIndex::of(Weekday::Monday).get(), 0);
        assert_eq!(DayIndex::of(Weekday::Sunday).get(), 6);
        assert_eq!(DayIndex::of(Weekday::Wednesday).label(), "Wednesday");
    }

    #[test]
    fn time_range_bounds_are_inclusive() {
        let range = TimeRange::new(time(9, 0, 0, 0), time(17, 0, 0, 0));

        assert!(range.contains(time(9, 0, 0, 0)));
        assert!(range.contains(time(17, 0, 59, 0)));
        assert!(!range.contains(time(8, 59, 59, 0)));
        assert!(!range.contains(time(17, 1, 0, 0)));
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let range = TimeRange::new(time(22, 0, 0, 0), time(2, 0, 0, 0));

        assert!(!range.is_well_formed());
        assert!(!range.contains(time(23, 0, 0, 0)));
        assert!(!range.contains(time(1, 0, 0, 0)));
    }

    #[test]
    fn day_window_deserializes_from_api_shape() -> TestResult {
        let window: DayWindow = serde_json::from_str(
            r#"{"day": 4, "timeRanges": [{"start": "09:00:00", "end": "17:30:00"}]}"#,
        )?;

        assert_eq!(window.day, DayIndex::FRIDAY);
        assert_eq!(
            window.time_ranges.first(),
            Some(&TimeRange::new(time(9, 0, 0, 0), time(17, 30, 0, 0)))
        );

        Ok(())
    }

    #[test]
    fn day_window_rejects_bad_day() {
        let result = serde_json::from_str::<DayWindow>(r#"{"day": 7, "timeRanges": []}"#);

        assert!(result.is_err(), "day 7 should not deserialize");
    }
}
