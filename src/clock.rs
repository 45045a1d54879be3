//! The single source of "now".
//!
//! Every status computation takes an [`EasternTime`], built from a [`Clock`].
//! Nothing else in the crate reads the system clock.

use crate::data::time::{TimeOfDay, weekday_abbrev, weekday_full};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use chrono_tz::America::New_York;
use serde::Serialize;

/// A source of the current instant.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Wall-clock date and time in `America/New_York`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EasternTime {
    /// Local calendar date.
    pub date: NaiveDate,

    /// Local day of the week.
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,

    /// Local time of day, to the minute.
    pub time: TimeOfDay,
}

fn serialize_weekday<S>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(weekday_full(*day))
}

impl EasternTime {
    /// Convert an instant to Eastern wall-clock time, honoring daylight saving.
    pub fn from_utc(instant: DateTime<Utc>) -> Self {
        let local = instant.with_timezone(&New_York);
        let date = local.date_naive();
        Self {
            date,
            weekday: date.weekday(),
            time: TimeOfDay::from(local.time()),
        }
    }

    /// The current Eastern time according to `clock`.
    pub fn now(clock: &dyn Clock) -> Self {
        Self::from_utc(clock.now())
    }

    /// Eastern time at a local date and time of day.
    pub fn at(date: NaiveDate, time: TimeOfDay) -> Self {
        Self {
            date,
            weekday: date.weekday(),
            time,
        }
    }

    /// `YYYY-MM-DD`
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// `Mon`, `Tue`, ...
    pub fn weekday_abbrev(&self) -> &'static str {
        weekday_abbrev(self.weekday)
    }

    /// `Monday`, `Tuesday`, ...
    pub fn weekday_full(&self) -> &'static str {
        weekday_full(self.weekday)
    }

    /// Minutes since local midnight.
    pub fn minutes_since_midnight(&self) -> u16 {
        self.time.minutes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_summer_is_edt() {
        let now = EasternTime::now(&FixedClock(utc("2025-07-04T16:30:00Z")));
        assert_eq!(now.iso_date(), "2025-07-04");
        assert_eq!(now.weekday, Weekday::Fri);
        assert_eq!(now.time, time!(12:30 PM));
        assert_eq!(now.minutes_since_midnight(), 750);
    }

    #[test]
    fn test_winter_is_est() {
        let now = EasternTime::from_utc(utc("2025-01-15T17:00:00Z"));
        assert_eq!(now.time, time!(12:00 PM));
        assert_eq!(now.weekday_full(), "Wednesday");
    }

    #[test]
    fn test_date_rolls_back_across_utc_midnight() {
        // 02:00 UTC on a Saturday is still Friday evening in New York
        let now = EasternTime::from_utc(utc("2025-07-05T02:00:00Z"));
        assert_eq!(now.date, NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(now.weekday_abbrev(), "Fri");
        assert_eq!(now.time, time!(10:00 PM));
    }

    #[test]
    fn test_serialized_shape() {
        let now = EasternTime::from_utc(utc("2025-07-04T16:30:00Z"));
        let json = serde_json::to_value(now).unwrap();
        assert_eq!(json["date"], "2025-07-04");
        assert_eq!(json["weekday"], "Friday");
        assert_eq!(json["time"], "12:30PM");
    }
}
