//! Discount availability
//!
//! Pure evaluation of whether a discount is redeemable at a given moment,
//! when it next becomes redeemable, and how long until then.

use jiff::{Timestamp, Zoned};
use serde::{Deserialize, Serialize};

mod countdown;
mod days;

pub use countdown::{AVAILABLE_NOW, Countdown, format_countdown};
pub use days::{DayIndex, DayIndexError, DayWindow, TimeRange};

/// Number of calendar days, today included, searched for the next window.
pub const SEARCH_HORIZON_DAYS: usize = 7;

/// A merchant-defined offer as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    /// Whether the merchant has the discount switched on.
    pub active: bool,

    /// First instant the discount may be redeemed.
    pub start_date: Timestamp,

    /// Last instant the discount may be redeemed.
    pub end_date: Timestamp,

    /// Day/time windows. `None` or empty means no restriction.
    #[serde(default)]
    pub available_days_and_times: Option<Vec<DayWindow>>,

    /// Days the merchant lists as excluded. Informational only.
    #[serde(default)]
    pub excluded_days_of_week: Option<Vec<DayIndex>>,

    /// Hours of the day the merchant lists as excluded. Informational only.
    #[serde(default)]
    pub excluded_hours: Option<Vec<u8>>,
}

impl Discount {
    /// An active discount between two instants with no further restriction.
    pub const fn new(start_date: Timestamp, end_date: Timestamp) -> Self {
        Self {
            active: true,
            start_date,
            end_date,
            available_days_and_times: None,
            excluded_days_of_week: None,
            excluded_hours: None,
        }
    }

    /// Restrict the discount to the given day windows.
    #[must_use]
    pub fn with_windows(mut self, windows: impl IntoIterator<Item = DayWindow>) -> Self {
        self.available_days_and_times = Some(windows.into_iter().collect());
        self
    }

    /// Configured day windows, if any restrict redemption.
    pub fn windows(&self) -> Option<&[DayWindow]> {
        self.available_days_and_times
            .as_deref()
            .filter(|windows| !windows.is_empty())
    }

    /// Whether the discount is restricted to day/time windows.
    pub fn is_restricted(&self) -> bool {
        self.windows().is_some()
    }

    /// Whether the discount is redeemable at `now`.
    pub fn is_valid_at(&self, now: &Zoned) -> bool {
        if !self.active {
            return false;
        }

        let instant = now.timestamp();

        if instant > self.end_date || instant < self.start_date {
            return false;
        }

        let Some(windows) = self.windows() else {
            return true;
        };

        let today = DayIndex::of(now.weekday());
        let time = now.time();

        ranges_on(windows, today).any(|range| range.contains(time))
    }

    /// The next instant, strictly after `now`, at which a window opens.
    ///
    /// Looks at later windows today first, then the following six days in
    /// order, anchoring each day at its earliest window. Returns `None` for
    /// inactive or unrestricted discounts and when nothing opens within
    /// [`SEARCH_HORIZON_DAYS`] or before `end_date`. Openings before
    /// `start_date` are skipped, so a returned instant is always valid.
    pub fn next_available_instant(&self, now: &Zoned) -> Option<Zoned> {
        if !self.active {
            return None;
        }

        let windows = self.windows()?;
        let now_time = now.time();
        let mut date = now.date();

        for offset in 0..SEARCH_HORIZON_DAYS {
            if offset > 0 {
                date = date.tomorrow().ok()?;
            }

            let day = DayIndex::of(date.weekday());
            let opening = ranges_on(windows, day)
                .filter(|range| range.is_well_formed())
                .map(|range| range.start)
                .filter(|start| offset > 0 || *start > now_time)
                .min();

            let Some(opening) = opening else {
                continue;
            };

            let Ok(candidate) = date.to_datetime(opening).to_zoned(now.time_zone().clone()) else {
                continue;
            };

            // A DST gap can push the wall time out of the window.
            if candidate.time() != opening {
                continue;
            }

            let instant = candidate.timestamp();

            if instant > self.end_date {
                return None;
            }

            if instant < self.start_date {
                continue;
            }

            return Some(candidate);
        }

        None
    }

    /// Countdown state at `now`.
    pub fn countdown_at(&self, now: &Zoned) -> Countdown {
        if !self.active || now.timestamp() > self.end_date {
            return Countdown::Unavailable;
        }

        if self.is_valid_at(now) {
            return Countdown::AvailableNow;
        }

        // Unrestricted and not yet valid means not started yet.
        if !self.is_restricted() {
            return Countdown::Remaining(self.start_date.duration_since(now.timestamp()));
        }

        self.next_available_instant(now)
            .map_or(Countdown::Unavailable, |next| {
                Countdown::Remaining(next.timestamp().duration_since(now.timestamp()))
            })
    }

    /// Names of the excluded days, in Monday-first order.
    pub fn excluded_day_labels(&self) -> Vec<&'static str> {
        let mut days = self.excluded_days_of_week.clone().unwrap_or_default();

        days.sort_unstable();
        days.dedup();

        days.into_iter().map(DayIndex::label).collect()
    }

    /// Excluded hours rendered as `"HH:00-HH:59"`, skipping values past 23.
    pub fn excluded_hour_labels(&self) -> Vec<String> {
        let mut hours = self.excluded_hours.clone().unwrap_or_default();

        hours.retain(|hour| *hour < 24);
        hours.sort_unstable();
        hours.dedup();

        hours
            .into_iter()
            .map(|hour| format!("{hour:02}:00-{hour:02}:59"))
            .collect()
    }
}

/// Whether `discount` is redeemable at `now`. Absent discounts never are.
pub fn is_valid(discount: Option<&Discount>, now: &Zoned) -> bool {
    discount.is_some_and(|discount| discount.is_valid_at(now))
}

/// Next instant `discount` becomes redeemable, if it is restricted to windows.
pub fn next_available_instant(discount: Option<&Discount>, now: &Zoned) -> Option<Zoned> {
    discount.and_then(|discount| discount.next_available_instant(now))
}

fn ranges_on(windows: &[DayWindow], day: DayIndex) -> impl Iterator<Item = &TimeRange> {
    windows
        .iter()
        .filter(move |window| window.day == day)
        .flat_map(|window| window.time_ranges.iter())
}

#[cfg(test)]
mod tests {
    use jiff::{
        SignedDuration,
        civil::{Time, time},
    };
    use testresult::TestResult;

    use super::*;

    const MIDNIGHT: Time = Time::midnight();

    // 2026-10-19 is a Monday.
    fn at(datetime: &str) -> Result<Zoned, jiff::Error> {
        format!("{datetime}[UTC]").parse()
    }

    fn ts(instant: &str) -> Result<Timestamp, jiff::Error> {
        instant.parse()
    }

    fn nine_to_five(day: DayIndex) -> DayWindow {
        DayWindow::new(day, [TimeRange::new(time(9, 0, 0, 0), time(17, 0, 0, 0))])
    }

    fn october() -> Result<Discount, jiff::Error> {
        Ok(Discount::new(
            ts("2026-10-01T00:00:00Z")?,
            ts("2026-10-31T23:59:59Z")?,
        ))
    }

    #[test]
    fn missing_discount_is_invalid() -> TestResult {
        assert!(!is_valid(None, &at("2026-10-19T10:00")?));
        assert!(next_available_instant(None, &at("2026-10-19T10:00")?).is_none());

        Ok(())
    }

    #[test]
    fn inactive_discount_is_invalid() -> TestResult {
        let mut discount = october()?;
        discount.active = false;

        assert!(!discount.is_valid_at(&at("2026-10-19T10:00")?));
        assert!(
            discount
                .next_available_instant(&at("2026-10-19T10:00")?)
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn outside_date_range_is_invalid() -> TestResult {
        let discount = october()?;

        assert!(!discount.is_valid_at(&at("2026-11-01T00:00")?));
        assert!(!discount.is_valid_at(&at("2026-09-30T23:59")?));
        assert!(discount.is_valid_at(&at("2026-10-01T00:00")?));
        assert!(discount.is_valid_at(&at("2026-10-31T23:59:59")?));

        Ok(())
    }

    #[test]
    fn window_bounds_are_inclusive() -> TestResult {
        let discount = october()?.with_windows([nine_to_five(DayIndex::MONDAY)]);

        assert!(discount.is_valid_at(&at("2026-10-19T10:00")?));
        assert!(discount.is_valid_at(&at("2026-10-19T09:00")?));
        assert!(discount.is_valid_at(&at("2026-10-19T17:00")?));
        assert!(!discount.is_valid_at(&at("2026-10-19T18:00")?));
        assert!(!discount.is_valid_at(&at("2026-10-19T08:59")?));

        Ok(())
    }

    #[test]
    fn day_without_window_is_invalid() -> TestResult {
        let discount = october()?.with_windows([nine_to_five(DayIndex::MONDAY)]);

        assert!(!discount.is_valid_at(&at("2026-10-20T10:00")?));

        Ok(())
    }

    #[test]
    fn any_matching_range_is_enough() -> TestResult {
        let discount = october()?.with_windows([DayWindow::new(
            DayIndex::SATURDAY,
            [
                TimeRange::new(time(8, 0, 0, 0), time(10, 0, 0, 0)),
                TimeRange::new(time(18, 0, 0, 0), time(22, 0, 0, 0)),
            ],
        )]);

        assert!(discount.is_valid_at(&at("2026-10-17T19:30")?));
        assert!(!discount.is_valid_at(&at("2026-10-17T12:00")?));

        Ok(())
    }

    #[test]
    fn empty_window_list_is_unrestricted() -> TestResult {
        let discount = october()?.with_windows([]);

        assert!(!discount.is_restricted());
        assert!(discount.is_valid_at(&at("2026-10-20T03:00")?));
        assert!(
            discount
                .next_available_instant(&at("2026-10-20T03:00")?)
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn next_instant_prefers_later_range_today() -> TestResult {
        let discount = october()?.with_windows([DayWindow::new(
            DayIndex::MONDAY,
            [
                TimeRange::new(time(8, 0, 0, 0), time(10, 0, 0, 0)),
                TimeRange::new(time(18, 0, 0, 0), time(22, 0, 0, 0)),
            ],
        )]);

        let next = discount.next_available_instant(&at("2026-10-19T12:00")?);

        assert_eq!(next, Some(at("2026-10-19T18:00")?));

        Ok(())
    }

    #[test]
    fn next_instant_rolls_to_following_day() -> TestResult {
        let discount = october()?.with_windows([
            nine_to_five(DayIndex::MONDAY),
            nine_to_five(DayIndex::WEDNESDAY),
        ]);

        let next = discount.next_available_instant(&at("2026-10-19T18:00")?);

        assert_eq!(next, Some(at("2026-10-21T09:00")?));

        Ok(())
    }

    #[test]
    fn next_instant_uses_earliest_range_of_the_day() -> TestResult {
        let discount = october()?.with_windows([DayWindow::new(
            DayIndex::TUESDAY,
            [
                TimeRange::new(time(14, 0, 0, 0), time(16, 0, 0, 0)),
                TimeRange::new(time(7, 30, 0, 0), time(9, 0, 0, 0)),
            ],
        )]);

        let next = discount.next_available_instant(&at("2026-10-19T18:00")?);

        assert_eq!(next, Some(at("2026-10-20T07:30")?));

        Ok(())
    }

    #[test]
    fn same_weekday_next_week_is_beyond_horizon() -> TestResult {
        let discount = october()?.with_windows([nine_to_five(DayIndex::MONDAY)]);

        assert!(
            discount
                .next_available_instant(&at("2026-10-19T18:00")?)
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn next_instant_stops_at_end_date() -> TestResult {
        let discount = Discount::new(ts("2026-10-01T00:00:00Z")?, ts("2026-10-20T00:00:00Z")?)
            .with_windows([nine_to_five(DayIndex::WEDNESDAY)]);

        assert!(
            discount
                .next_available_instant(&at("2026-10-19T18:00")?)
                .is_none()
        );

        Ok(())
    }

    #[test]
    fn next_instant_skips_openings_before_start_date() -> TestResult {
        let discount = Discount::new(ts("2026-10-20T12:00:00Z")?, ts("2026-10-31T00:00:00Z")?)
            .with_windows([
                nine_to_five(DayIndex::TUESDAY),
                nine_to_five(DayIndex::WEDNESDAY),
            ]);

        let next = discount.next_available_instant(&at("2026-10-19T18:00")?);

        assert_eq!(next, Some(at("2026-10-21T09:00")?));

        Ok(())
    }

    #[test]
    fn next_instant_is_always_valid() -> TestResult {
        let discount = october()?.with_windows([
            DayWindow::new(
                DayIndex::MONDAY,
                [
                    TimeRange::new(time(9, 0, 0, 0), time(11, 0, 0, 0)),
                    TimeRange::new(time(15, 0, 0, 0), time(15, 0, 0, 0)),
                ],
            ),
            nine_to_five(DayIndex::THURSDAY),
            DayWindow::new(DayIndex::SATURDAY, [TimeRange::new(MIDNIGHT, time(1, 0, 0, 0))]),
        ]);

        for probe in [
            "2026-10-19T08:00",
            "2026-10-19T12:00",
            "2026-10-19T15:01",
            "2026-10-20T23:59:30",
            "2026-10-22T17:01",
            "2026-10-24T02:00",
        ] {
            let now = at(probe)?;

            assert!(!discount.is_valid_at(&now), "{probe} should be outside windows");

            let next = discount
                .next_available_instant(&now)
                .ok_or(format!("no next instant after {probe}"))?;

            assert!(next > now, "next instant must be in the future");
            assert!(discount.is_valid_at(&next), "{next} should be valid");
        }

        Ok(())
    }

    #[test]
    fn countdown_reports_remaining_time() -> TestResult {
        let discount = october()?.with_windows([nine_to_five(DayIndex::TUESDAY)]);

        let countdown = discount.countdown_at(&at("2026-10-19T18:00")?);

        assert_eq!(countdown, Countdown::Remaining(SignedDuration::from_hours(15)));
        assert_eq!(countdown.label(), Some("15h 0m 0s".to_owned()));

        Ok(())
    }

    #[test]
    fn countdown_states() -> TestResult {
        let discount = october()?;

        assert_eq!(
            discount.countdown_at(&at("2026-10-19T10:00")?),
            Countdown::AvailableNow
        );
        assert_eq!(
            discount.countdown_at(&at("2026-11-02T10:00")?),
            Countdown::Unavailable
        );
        assert_eq!(
            discount.countdown_at(&at("2026-09-30T00:00")?),
            Countdown::Remaining(SignedDuration::from_hours(24))
        );

        let restricted = october()?.with_windows([nine_to_five(DayIndex::MONDAY)]);

        assert_eq!(
            restricted.countdown_at(&at("2026-10-19T18:00")?),
            Countdown::Unavailable
        );

        Ok(())
    }

    #[test]
    fn exclusion_labels_use_monday_first_convention() -> TestResult {
        let mut discount = october()?;
        discount.excluded_days_of_week = Some(vec![DayIndex::SUNDAY, DayIndex::MONDAY]);
        discount.excluded_hours = Some(vec![13, 9, 25, 9]);

        assert_eq!(discount.excluded_day_labels(), vec!["Monday", "Sunday"]);
        assert_eq!(
            discount.excluded_hour_labels(),
            vec!["09:00-09:59".to_owned(), "13:00-13:59".to_owned()]
        );

        Ok(())
    }

    #[test]
    fn exclusions_do_not_affect_validity() -> TestResult {
        let mut discount = october()?;
        discount.excluded_days_of_week = Some(vec![DayIndex::MONDAY]);
        discount.excluded_hours = Some(vec![10]);

        assert!(discount.is_valid_at(&at("2026-10-19T10:30")?));

        Ok(())
    }

    #[test]
    fn deserializes_api_discount() -> TestResult {
        let discount: Discount = serde_json::from_str(
            r#"{
                "active": true,
                "startDate": "2026-10-01T00:00:00Z",
                "endDate": "2026-10-31T23:59:59Z",
                "availableDaysAndTimes": [
                    {"day": 0, "timeRanges": [{"start": "09:00:00", "end": "17:00:00"}]}
                ],
                "excludedDaysOfWeek": [6]
            }"#,
        )?;

        assert!(discount.is_valid_at(&at("2026-10-19T09:30")?));
        assert_eq!(discount.excluded_day_labels(), vec!["Sunday"]);
        assert!(discount.excluded_hours.is_none());

        Ok(())
    }
}
