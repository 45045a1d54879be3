//! See [`PoolSchedule`]

use crate::{
    algo::period::{DayHours, normalize_week, regular_slots},
    clock::EasternTime,
    data::{
        record::{Restriction, SchedulePeriod},
        slot::DaySlot,
        status::PoolStatus,
        time::{ByWeekday, TimeOfDay, WEEK, weekday_full},
    },
};
use chrono::Weekday;
use serde::Serialize;

/// The weekly hours of one already-selected schedule period.
///
/// Answers simple per-day questions. Overrides are not consulted here;
/// see [`merge`](crate::algo::merge) for that.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSchedule {
    /// First matching entry per day.
    hours: ByWeekday<DayHours>,

    /// Every matching entry per day.
    #[serde(skip)]
    slots: ByWeekday<Vec<DaySlot>>,
}

/// One row of [`PoolSchedule::all_days_status`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    /// Full day name
    pub day: &'static str,
    /// See [`PoolSchedule::formatted_hours`]
    pub hours: String,
    /// Status at the requested time of day.
    pub status: PoolStatus,
    /// See [`PoolSchedule::time_slots`]
    pub time_slots: Vec<DaySlot>,
}

impl PoolSchedule {
    /// Normalize `period` together with the pool's restrictions.
    pub fn new(period: &SchedulePeriod, restrictions: &[Restriction]) -> Self {
        Self {
            hours: normalize_week(period, restrictions),
            slots: ByWeekday::from_fn(|day| regular_slots(period, day)),
        }
    }

    /// A schedule with every day closed.
    pub fn closed() -> Self {
        Self {
            hours: ByWeekday::default(),
            slots: ByWeekday::default(),
        }
    }

    /// The normalized hours for `day`.
    pub fn hours_for_day(&self, day: Weekday) -> &DayHours {
        &self.hours[day]
    }

    /// `Closed`, `9:00AM - 5:00PM`, or `Hours unavailable` when a bound is missing.
    pub fn formatted_hours(&self, day: Weekday) -> String {
        match self.hours_for_day(day) {
            DayHours::Closed => "Closed".to_string(),
            DayHours::Open(hours) => match hours.open.zip(hours.close) {
                Some((open, close)) => format!("{open} - {close}"),
                None => "Hours unavailable".to_string(),
            },
        }
    }

    /// Status at `time` on `day`.
    ///
    /// Opening and closing times are both inclusive. Within hours, the first
    /// restriction whose window contains `time` decides the status.
    pub fn status_at_time(&self, day: Weekday, time: TimeOfDay) -> PoolStatus {
        let DayHours::Open(hours) = self.hours_for_day(day) else {
            return PoolStatus::Closed;
        };
        match hours.open.zip(hours.close) {
            Some((open, close)) if (open..=close).contains(&time) => hours
                .restrictions
                .iter()
                .find(|r| r.interval.contains_time(time))
                .map_or(PoolStatus::Open, |r| r.status()),
            _ => PoolStatus::Closed,
        }
    }

    /// Status at the given Eastern wall-clock time.
    pub fn current_status(&self, now: &EasternTime) -> PoolStatus {
        self.status_at_time(now.weekday, now.time)
    }

    /// Every regular slot on `day`, in start order.
    pub fn time_slots(&self, day: Weekday) -> &[DaySlot] {
        &self.slots[day]
    }

    /// Hours, status at `time`, and slots for each day of the week, Monday first.
    pub fn all_days_status(&self, time: TimeOfDay) -> Vec<DayStatus> {
        WEEK.into_iter()
            .map(|day| DayStatus {
                day: weekday_full(day),
                hours: self.formatted_hours(day),
                status: self.status_at_time(day, time),
                time_slots: self.time_slots(day).to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::record::HourEntry,
        time,
    };
    use chrono::NaiveDate;

    fn entry(days: &[&str], start: Option<&str>, end: Option<&str>) -> HourEntry {
        HourEntry {
            week_days: days.iter().map(|s| s.to_string()).collect(),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
            types: vec!["Rec Swim".into()],
            ..Default::default()
        }
    }

    fn schedule(hours: Vec<HourEntry>, restrictions: &[Restriction]) -> PoolSchedule {
        let period = SchedulePeriod {
            start_date: NaiveDate::from_ymd_opt(2025, 5, 24),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 1),
            hours,
        };
        PoolSchedule::new(&period, restrictions)
    }

    #[test]
    fn test_formatted_hours() {
        let s = schedule(
            vec![
                entry(&["Mon"], Some("11:00AM"), Some("7:00PM")),
                entry(&["Tue"], Some("11:00AM"), None),
            ],
            &[],
        );
        assert_eq!(s.formatted_hours(Weekday::Mon), "11:00AM - 7:00PM");
        assert_eq!(s.formatted_hours(Weekday::Tue), "Hours unavailable");
        assert_eq!(s.formatted_hours(Weekday::Wed), "Closed");
    }

    #[test]
    fn test_closed_day_is_closed_at_any_time() {
        let s = schedule(vec![entry(&["Mon"], Some("11:00AM"), Some("7:00PM"))], &[]);
        for minutes in (0..1440).step_by(15) {
            let t = TimeOfDay::from_minutes(minutes).unwrap();
            assert_eq!(s.status_at_time(Weekday::Sun, t), PoolStatus::Closed);
        }
        assert_eq!(PoolSchedule::closed().status_at_time(Weekday::Mon, TimeOfDay::NOON), PoolStatus::Closed);
    }

    #[test]
    fn test_hours_bounds_are_inclusive() {
        let s = schedule(vec![entry(&["Mon"], Some("11:00AM"), Some("7:00PM"))], &[]);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(10:59 AM)), PoolStatus::Closed);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(11:00 AM)), PoolStatus::Open);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(7:00 PM)), PoolStatus::Open);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(7:01 PM)), PoolStatus::Closed);
    }

    #[test]
    fn test_missing_bound_is_closed() {
        let s = schedule(vec![entry(&["Tue"], Some("11:00AM"), None)], &[]);
        assert_eq!(s.status_at_time(Weekday::Tue, TimeOfDay::NOON), PoolStatus::Closed);
    }

    #[test]
    fn test_first_restriction_decides() {
        let restrictions = [
            Restriction {
                week_days: vec!["Mon".into()],
                start_time: Some("3:00PM".into()),
                end_time: Some("5:00PM".into()),
                kind: "practice".into(),
                notes: String::new(),
            },
            Restriction {
                week_days: vec![],
                start_time: Some("4:00PM".into()),
                end_time: Some("6:00PM".into()),
                kind: "meet".into(),
                notes: String::new(),
            },
            Restriction {
                week_days: vec![],
                start_time: Some("6:00PM".into()),
                end_time: Some("7:00PM".into()),
                kind: "adult swim".into(),
                notes: String::new(),
            },
        ];
        let s = schedule(vec![entry(&["Mon", "Tue"], Some("11:00AM"), Some("8:00PM"))], &restrictions);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(2:59 PM)), PoolStatus::Open);
        assert_eq!(s.status_at_time(Weekday::Mon, time!(4:30 PM)), PoolStatus::PracticeOnly);
        assert_eq!(s.status_at_time(Weekday::Tue, time!(4:30 PM)), PoolStatus::SwimMeet);
        assert_eq!(s.status_at_time(Weekday::Tue, time!(6:00 PM)), PoolStatus::Restricted);
        assert_eq!(s.status_at_time(Weekday::Tue, time!(7:00 PM)), PoolStatus::Open);
    }

    #[test]
    fn test_all_days_status() {
        let s = schedule(
            vec![
                entry(&["Mon", "Wed"], Some("11:00AM"), Some("7:00PM")),
                entry(&["Wed"], Some("7:00PM"), Some("9:00PM")),
            ],
            &[],
        );
        let days = s.all_days_status(TimeOfDay::NOON);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].day, "Monday");
        assert_eq!(days[0].status, PoolStatus::Open);
        assert_eq!(days[1].hours, "Closed");
        assert_eq!(days[1].status, PoolStatus::Closed);
        assert_eq!(days[2].time_slots.len(), 2, "slots keep every entry");
        assert_eq!(days[2].hours, "11:00AM - 7:00PM", "hours keep the first entry");
    }
}
