//! Choosing which [`SchedulePeriod`] is in effect on a date, and flattening
//! it into one set of hours per weekday.

use crate::data::{
    record::{Restriction, SchedulePeriod},
    slot::{Activities, DaySlot, TimeInterval},
    status::PoolStatus,
    time::{ByWeekday, TimeOfDay},
};
use chrono::{NaiveDate, Weekday};
use serde::Serialize;

/// The first period, in list order, whose range contains `date`.
///
/// Periods may overlap; list order breaks the tie.
pub fn select_active_period(periods: &[SchedulePeriod], date: NaiveDate) -> Option<&SchedulePeriod> {
    let found = periods.iter().position(|period| period.contains(date));
    match found {
        Some(i) => tracing::debug!(%date, index = i, "selected schedule period"),
        None => tracing::debug!(%date, candidates = periods.len(), "no schedule period covers date"),
    }
    found.map(|i| &periods[i])
}

/// A restriction resolved to a concrete span of time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictionWindow {
    /// When the restriction applies.
    #[serde(flatten)]
    pub interval: TimeInterval,

    /// The restriction's `type` field.
    #[serde(rename = "type")]
    pub kind: String,

    /// Free-text notes.
    pub notes: String,
}

impl RestrictionWindow {
    /// The status this restriction imposes while active.
    pub fn status(&self) -> PoolStatus {
        PoolStatus::from_restriction_type(&self.kind)
    }
}

/// A day's hours when the pool opens at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenHours {
    /// Opening time. [`None`] if the source omitted it.
    pub open: Option<TimeOfDay>,

    /// Closing time. [`None`] if the source omitted it.
    pub close: Option<TimeOfDay>,

    /// What the pool is being used for.
    pub activities: Activities,

    /// Free-text notes.
    pub notes: String,

    /// Who may attend.
    pub access: String,

    /// Restrictions that fall on this day.
    pub restrictions: Vec<RestrictionWindow>,
}

/// One day of a normalized week.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DayHours {
    /// No hours apply.
    #[default]
    Closed,

    /// Some hours apply.
    Open(OpenHours),
}

impl DayHours {
    /// Whether the day is closed.
    pub const fn is_closed(&self) -> bool {
        matches!(self, DayHours::Closed)
    }
}

/// Serialized as `{"closed": true}` or the open hours with `"closed": false`.
impl Serialize for DayHours {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        #[derive(Serialize)]
        struct Repr<'a> {
            closed: bool,
            #[serde(flatten, skip_serializing_if = "Option::is_none")]
            hours: Option<&'a OpenHours>,
        }

        match self {
            DayHours::Closed => Repr {
                closed: true,
                hours: None,
            },
            DayHours::Open(hours) => Repr {
                closed: false,
                hours: Some(hours),
            },
        }
        .serialize(serializer)
    }
}

/// Flatten a period into one [`DayHours`] per weekday.
///
/// Every day starts closed. Entries are visited in order and only the first
/// entry that lists a day is kept for that day; later entries for the same
/// day are ignored here (the override merge reads every entry instead, see
/// [`regular_slots`]). Restrictions are attached to each open day they cover.
pub fn normalize_week(period: &SchedulePeriod, restrictions: &[Restriction]) -> ByWeekday<DayHours> {
    let mut week = ByWeekday::<DayHours>::default();
    for entry in &period.hours {
        for (day, hours) in week.iter_mut() {
            if hours.is_closed() && entry.covers(day) {
                *hours = DayHours::Open(OpenHours {
                    open: entry.start(),
                    close: entry.end(),
                    activities: entry.types.iter().cloned().collect(),
                    notes: entry.notes.clone(),
                    access: entry.access.clone(),
                    restrictions: restriction_windows(restrictions, day),
                });
            }
        }
    }
    week
}

/// Every entry of `period` that lists `day`, as regular slots in start order.
pub fn regular_slots(period: &SchedulePeriod, day: Weekday) -> Vec<DaySlot> {
    let mut slots = period
        .hours
        .iter()
        .filter(|entry| entry.covers(day))
        .filter_map(|entry| entry.to_slot())
        .collect::<Vec<_>>();
    slots.sort_by_key(|slot| slot.interval);
    slots
}

fn restriction_windows(restrictions: &[Restriction], day: Weekday) -> Vec<RestrictionWindow> {
    restrictions
        .iter()
        .filter(|r| r.covers(day))
        .filter_map(|r| {
            Some(RestrictionWindow {
                interval: r.interval()?,
                kind: r.kind.clone(),
                notes: r.notes.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::HourEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(days: &[&str], start: &str, end: &str, types: &[&str]) -> HourEntry {
        HourEntry {
            week_days: days.iter().map(|s| s.to_string()).collect(),
            start_time: Some(start.to_string()),
            end_time: Some(end.to_string()),
            types: types.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn period(start: NaiveDate, end: NaiveDate, hours: Vec<HourEntry>) -> SchedulePeriod {
        SchedulePeriod {
            start_date: Some(start),
            end_date: Some(end),
            hours,
        }
    }

    #[test]
    fn test_select_none_when_empty() {
        assert_eq!(select_active_period(&[], date(2025, 7, 1)), None);
    }

    #[test]
    fn test_select_first_of_overlapping() {
        let periods = [
            period(date(2025, 1, 1), date(2025, 5, 31), vec![]),
            period(date(2025, 6, 1), date(2025, 9, 1), vec![entry(&["Mon"], "6:00AM", "9:00PM", &["Summer"])]),
            period(date(2025, 1, 1), date(2025, 12, 31), vec![entry(&["Mon"], "9:00AM", "5:00PM", &["Year"])]),
        ];
        let active = select_active_period(&periods, date(2025, 7, 1)).unwrap();
        assert_eq!(active.hours[0].types, ["Summer"]);
        let active = select_active_period(&periods, date(2025, 10, 1)).unwrap();
        assert_eq!(active.hours[0].types, ["Year"]);
        assert_eq!(select_active_period(&periods, date(2026, 1, 1)), None);
    }

    #[test]
    fn test_normalize_every_day_present() {
        let week = normalize_week(&period(date(2025, 6, 1), date(2025, 9, 1), vec![]), &[]);
        assert!(week.iter().all(|(_, hours)| hours.is_closed()));
        let json = serde_json::to_value(&week).unwrap();
        assert_eq!(json["Monday"]["closed"], true);
    }

    #[test]
    fn test_normalize_first_entry_wins() {
        let week = normalize_week(
            &period(
                date(2025, 6, 1),
                date(2025, 9, 1),
                vec![
                    entry(&["Mon", "Tue"], "6:00AM", "12:00PM", &["Laps"]),
                    entry(&["Mon", "Sat"], "1:00PM", "8:00PM", &["Rec Swim"]),
                ],
            ),
            &[],
        );
        let DayHours::Open(mon) = &week[Weekday::Mon] else {
            panic!("monday should be open");
        };
        assert_eq!(mon.open.unwrap().to_string(), "6:00AM");
        assert_eq!(mon.close.unwrap().to_string(), "12:00PM");
        let DayHours::Open(sat) = &week[Weekday::Sat] else {
            panic!("saturday should be open");
        };
        assert_eq!(sat.activities.as_slice(), ["Rec Swim"]);
        assert!(week[Weekday::Sun].is_closed());
    }

    #[test]
    fn test_regular_slots_keep_every_entry() {
        let p = period(
            date(2025, 6, 1),
            date(2025, 9, 1),
            vec![
                entry(&["Mon"], "1:00PM", "8:00PM", &["Rec Swim"]),
                entry(&["Mon", "Tue"], "6:00AM", "12:00PM", &["Laps"]),
                entry(&["Mon"], "bogus", "11:00PM", &["Broken"]),
            ],
        );
        let slots = regular_slots(&p, Weekday::Mon);
        assert_eq!(slots.len(), 3);
        assert_eq!(slots[0].activities.as_slice(), ["Broken"], "malformed start degrades to midnight");
        assert_eq!(slots[1].activities.as_slice(), ["Laps"]);
        assert_eq!(slots[2].activities.as_slice(), ["Rec Swim"]);
        assert_eq!(regular_slots(&p, Weekday::Tue).len(), 1);
    }

    #[test]
    fn test_restrictions_attach_to_covered_days() {
        let restrictions = [Restriction {
            week_days: vec!["Tue".into()],
            start_time: Some("3:00PM".into()),
            end_time: Some("5:00PM".into()),
            kind: "practice".into(),
            notes: "Swim team".into(),
        }];
        let week = normalize_week(
            &period(date(2025, 6, 1), date(2025, 9, 1), vec![entry(&["Mon", "Tue"], "6:00AM", "9:00PM", &[])]),
            &restrictions,
        );
        let (DayHours::Open(mon), DayHours::Open(tue)) = (&week[Weekday::Mon], &week[Weekday::Tue]) else {
            panic!("both days should be open");
        };
        assert!(mon.restrictions.is_empty());
        assert_eq!(tue.restrictions.len(), 1);
        assert_eq!(tue.restrictions[0].status(), PoolStatus::PracticeOnly);
    }
}
