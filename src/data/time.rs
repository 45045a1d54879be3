//! Wall-clock times of day and weekday helpers.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize, de::Visitor};
use std::sync::LazyLock;

/// Minutes in a day. [`TimeOfDay`] is always strictly less than this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{1,2}):?(\d{0,2})\s*(AM|PM)").unwrap_or_else(|e| {
        unreachable!("time pattern is a valid regex: {e}")
    })
});

/// A time of day, stored as minutes since midnight (`0..1440`).
///
/// Parsed from and displayed as 12-hour strings like `9:30AM`.
/// `12AM` is midnight (0 minutes) and `12PM` is noon (720 minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// `12:00AM`
    pub const MIDNIGHT: Self = Self(0);
    /// `12:00PM`
    pub const NOON: Self = Self(12 * 60);

    /// [`None`] if `minutes` is not within a single day.
    pub const fn from_minutes(minutes: u16) -> Option<Self> {
        if minutes < MINUTES_PER_DAY {
            Some(Self(minutes))
        } else {
            None
        }
    }

    /// Construct from a 12-hour clock reading.
    ///
    /// Hour `0` is accepted as a synonym for `12`.
    pub const fn from_hm12(hour: u32, minute: u32, pm: bool) -> Option<Self> {
        if hour > 12 || minute > 59 {
            return None;
        }
        let hour = hour % 12 + if pm { 12 } else { 0 };
        Some(Self((hour * 60 + minute) as u16))
    }

    /// Minutes since midnight.
    #[inline]
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Parse `H:MM(AM|PM)` or `H(AM|PM)`, case-insensitive.
    ///
    /// Returns [`None`] when the string does not contain a recognizable time.
    pub fn try_parse(s: &str) -> Option<Self> {
        let caps = TIME_PATTERN.captures(s)?;
        let hour = caps[1].parse::<u32>().ok()?;
        let minute = match &caps[2] {
            "" => 0,
            m => m.parse::<u32>().ok()?,
        };
        let pm = caps[3].eq_ignore_ascii_case("PM");
        Self::from_hm12(hour, minute, pm)
    }

    /// Lossy version of [`Self::try_parse`].
    ///
    /// Upstream schedule data is hand-maintained, so a malformed time degrades
    /// to midnight with a warning instead of rejecting the whole record.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_else(|| {
            tracing::warn!(input = s, "unrecognized time string, treating as midnight");
            Self::MIDNIGHT
        })
    }

    /// `(hour on a 12-hour clock, minute, is PM)`
    pub const fn to_hm12(self) -> (u16, u16, bool) {
        let hour = self.0 / 60;
        let hour12 = match hour % 12 {
            0 => 12,
            h => h,
        };
        (hour12, self.0 % 60, hour >= 12)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (hour, minute, pm) = self.to_hm12();
        write!(f, "{hour}:{minute:02}{}", if pm { "PM" } else { "AM" })
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(value: NaiveTime) -> Self {
        // hour <= 23 and minute <= 59, so this is always in range
        Self((value.hour() * 60 + value.minute()) as u16)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Accepts either a time string (parsed lossily, see [`TimeOfDay::parse`])
/// or an integer count of minutes since midnight.
impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct TimeOfDayVisitor;
        use serde::de::Error;

        impl Visitor<'_> for TimeOfDayVisitor {
            type Value = TimeOfDay;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a time like \"9:30AM\" or minutes since midnight")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                Ok(TimeOfDay::parse(v))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                u16::try_from(v)
                    .ok()
                    .and_then(TimeOfDay::from_minutes)
                    .ok_or_else(|| {
                        Error::invalid_value(serde::de::Unexpected::Unsigned(v), &self)
                    })
            }
        }

        deserializer.deserialize_any(TimeOfDayVisitor)
    }
}

/// Every day of the week, Monday first.
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// `Mon`, `Tue`, ...
pub const fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// `Monday`, `Tuesday`, ...
pub const fn weekday_full(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Read a weekday key from raw schedule data.
///
/// Accepts full names, three-letter abbreviations and the common
/// `Tues`/`Thurs` spellings, ignoring case and surrounding whitespace.
pub fn parse_weekday(s: &str) -> Option<Weekday> {
    let s = s.trim().to_ascii_lowercase();
    let day = match s.as_str() {
        "mon" | "monday" => Weekday::Mon,
        "tue" | "tues" | "tuesday" => Weekday::Tue,
        "wed" | "weds" | "wednesday" => Weekday::Wed,
        "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "fri" | "friday" => Weekday::Fri,
        "sat" | "saturday" => Weekday::Sat,
        "sun" | "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(day)
}

/// One value for each day of the week.
///
/// Unlike a map, every day is always present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ByWeekday<T>([T; 7]);

impl<T> ByWeekday<T> {
    /// Build each day's value from its [`Weekday`].
    pub fn from_fn(mut f: impl FnMut(Weekday) -> T) -> Self {
        Self(std::array::from_fn(|i| f(WEEK[i])))
    }

    /// Days paired with their values, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &T)> {
        WEEK.into_iter().zip(self.0.iter())
    }

    /// Days paired with mutable values, Monday first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Weekday, &mut T)> {
        WEEK.into_iter().zip(self.0.iter_mut())
    }
}

impl<T> std::ops::Index<Weekday> for ByWeekday<T> {
    type Output = T;

    #[inline]
    fn index(&self, day: Weekday) -> &Self::Output {
        &self.0[day.num_days_from_monday() as usize]
    }
}

impl<T> std::ops::IndexMut<Weekday> for ByWeekday<T> {
    #[inline]
    fn index_mut(&mut self, day: Weekday) -> &mut Self::Output {
        &mut self.0[day.num_days_from_monday() as usize]
    }
}

/// Serialized as a map keyed by full day name.
impl<T: Serialize> Serialize for ByWeekday<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_map(self.iter().map(|(day, value)| (weekday_full(day), value)))
    }
}

/// First day of a displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Weeks run Sunday through Saturday.
    #[default]
    Sunday,
    /// Weeks run Monday through Sunday.
    Monday,
}

impl WeekStart {
    /// The first day of the week containing `date`.
    pub fn week_of(self, date: NaiveDate) -> NaiveDate {
        let offset = match self {
            WeekStart::Sunday => date.weekday().num_days_from_sunday(),
            WeekStart::Monday => date.weekday().num_days_from_monday(),
        };
        date.checked_sub_days(Days::new(offset.into()))
            .unwrap_or(date)
    }
}
