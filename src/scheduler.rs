//! Computes the next occurrence of an alarm time and sleeps until it.

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone, Utc};
use tracing::info;

use crate::alarm_time::AlarmTime;

/// The next instant, strictly after "now", whose wall-clock time matches an
/// [`AlarmTime`] in the clock's time zone.
#[derive(Debug, Clone)]
pub struct AlarmMoment<Tz: TimeZone> {
    time: AlarmTime,
    at: DateTime<Tz>,
}

impl<Tz: TimeZone> AlarmMoment<Tz> {
    /// Today at `time` if that is still ahead of `now`, otherwise tomorrow.
    ///
    /// Returns `None` only when no representable date follows `now`.
    pub fn next(time: AlarmTime, now: &DateTime<Tz>) -> Option<Self> {
        let tz = now.timezone();
        now.date_naive()
            .iter_days()
            .take(3)
            .filter_map(|date| date.and_hms_opt(time.hour().into(), time.minute().into(), 0))
            .filter_map(|naive| resolve_local(&tz, naive))
            .find(|at| at > now)
            .map(|at| Self { time, at })
    }

    pub fn time(&self) -> AlarmTime {
        self.time
    }

    pub fn at(&self) -> &DateTime<Tz> {
        &self.at
    }

    /// Time left until the alarm, zero once it has passed.
    pub fn wait_duration(&self, now: &DateTime<Tz>) -> Duration {
        self.at
            .clone()
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO)
    }
}

impl<Tz: TimeZone> AlarmMoment<Tz>
where
    Tz::Offset: Display,
{
    /// Block until the alarm moment. Not cancellable.
    pub async fn wait(&self) {
        let now = Utc::now().with_timezone(&self.at.timezone());
        let duration = self.wait_duration(&now);
        info!(
            "Sleeping for {} until {}",
            format_duration(duration),
            self.at.format("%Y-%m-%d %H:%M:%S %:z")
        );
        tokio::time::sleep(duration).await;
    }
}

/// Map a local wall-clock time to an instant. Times skipped by a DST jump
/// move forward an hour; repeated times take the earlier instant.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        naive
            .checked_add_signed(TimeDelta::hours(1))
            .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
    })
}

pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_secs();
    if total < 60 {
        format!("{total}s")
    } else if total < 3600 {
        format!("{}m {}s", total / 60, total % 60)
    } else {
        format!("{}h {}m", total / 3600, (total % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Timelike};
    use chrono_tz::Europe::Berlin;

    fn clock(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, mo, d, h, mi, s)
            .unwrap()
    }

    fn alarm(s: &str) -> AlarmTime {
        s.parse().unwrap()
    }

    #[test]
    fn one_minute_ahead_fires_today() {
        let now = clock(2026, 10, 16, 23, 58, 0);
        let moment = AlarmMoment::next(alarm("23:59"), &now).unwrap();

        assert_eq!(moment.at(), &clock(2026, 10, 16, 23, 59, 0));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(60));
    }

    #[test]
    fn past_time_rolls_to_next_day() {
        let now = clock(2026, 10, 16, 10, 0, 0);
        let moment = AlarmMoment::next(alarm("09:00"), &now).unwrap();

        assert_eq!(moment.at(), &clock(2026, 10, 17, 9, 0, 0));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(23 * 3600));
    }

    #[test]
    fn current_minute_rolls_to_next_day() {
        let now = clock(2026, 10, 16, 12, 0, 0);
        let moment = AlarmMoment::next(alarm("12:00"), &now).unwrap();

        assert_eq!(moment.at(), &clock(2026, 10, 17, 12, 0, 0));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn seconds_into_the_minute_count_against_the_wait() {
        let now = clock(2026, 10, 16, 12, 0, 30);
        let moment = AlarmMoment::next(alarm("12:01"), &now).unwrap();

        assert_eq!(moment.wait_duration(&now), Duration::from_secs(30));
    }

    #[test]
    fn rollover_crosses_year_boundary() {
        let now = clock(2026, 12, 31, 23, 30, 0);
        let moment = AlarmMoment::next(alarm("0:15"), &now).unwrap();

        let at = moment.at();
        assert_eq!((at.year(), at.month(), at.day()), (2027, 1, 1));
        assert_eq!((at.hour(), at.minute(), at.second()), (0, 15, 0));
    }

    #[test]
    fn moment_is_always_strictly_in_the_future() {
        let target = alarm("7:30");
        for minute_of_day in (0..24 * 60).step_by(7) {
            let now = clock(2026, 3, 29, minute_of_day / 60, minute_of_day % 60, 15);
            let moment = AlarmMoment::next(target, &now).unwrap();

            assert!(moment.at() > &now, "now {now}");
            assert!(moment.wait_duration(&now) <= Duration::from_secs(24 * 3600));
            assert_eq!((moment.at().hour(), moment.at().minute()), (7, 30));
        }
    }

    #[test]
    fn wait_duration_saturates_after_the_moment() {
        let now = clock(2026, 10, 16, 8, 0, 0);
        let moment = AlarmMoment::next(alarm("8:05"), &now).unwrap();
        let later = clock(2026, 10, 16, 9, 0, 0);

        assert_eq!(moment.wait_duration(&later), Duration::ZERO);
    }

    fn berlin_wall_clock(moment: &AlarmMoment<chrono_tz::Tz>) -> (NaiveDateTime, i32) {
        let at = moment.at();
        (at.naive_local(), at.offset().fix().local_minus_utc())
    }

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn skipped_local_time_moves_forward_an_hour() {
        // Clocks jump from 02:00 CET to 03:00 CEST.
        let now = Berlin.with_ymd_and_hms(2026, 3, 29, 1, 0, 0).unwrap();
        let moment = AlarmMoment::next(alarm("2:30"), &now).unwrap();

        assert_eq!(berlin_wall_clock(&moment), (naive(2026, 3, 29, 3, 30), 2 * 3600));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(90 * 60));
    }

    #[test]
    fn repeated_local_time_takes_the_earlier_instant() {
        // Clocks fall back from 03:00 CEST to 02:00 CET.
        let now = Berlin.with_ymd_and_hms(2026, 10, 25, 1, 0, 0).unwrap();
        let moment = AlarmMoment::next(alarm("2:30"), &now).unwrap();

        assert_eq!(berlin_wall_clock(&moment), (naive(2026, 10, 25, 2, 30), 2 * 3600));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(90 * 60));
    }

    #[test]
    fn next_day_keeps_wall_clock_across_dst_change() {
        let now = Berlin.with_ymd_and_hms(2026, 3, 28, 9, 0, 0).unwrap();
        let moment = AlarmMoment::next(alarm("9:00"), &now).unwrap();

        assert_eq!(berlin_wall_clock(&moment), (naive(2026, 3, 29, 9, 0), 2 * 3600));
        assert_eq!(moment.wait_duration(&now), Duration::from_secs(23 * 3600));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_sleeps_until_the_moment() {
        let moment = AlarmMoment {
            time: alarm("0:00"),
            at: Utc::now() + TimeDelta::seconds(90),
        };

        let start = tokio::time::Instant::now();
        moment.wait().await;
        let slept = start.elapsed();

        assert!(slept > Duration::from_secs(89), "slept {slept:?}");
        assert!(slept <= Duration::from_secs(90), "slept {slept:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn wait_returns_at_once_for_a_passed_moment() {
        let moment = AlarmMoment {
            time: alarm("0:00"),
            at: Utc::now() - TimeDelta::seconds(5),
        };

        let start = tokio::time::Instant::now();
        moment.wait().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn formats_durations_by_magnitude() {
        assert_eq!(format_duration(Duration::from_secs(42)), "42s");
        assert_eq!(format_duration(Duration::from_secs(60)), "1m 0s");
        assert_eq!(format_duration(Duration::from_secs(605)), "10m 5s");
        assert_eq!(format_duration(Duration::from_secs(23 * 3600 + 59 * 60 + 59)), "23h 59m");
    }
}
