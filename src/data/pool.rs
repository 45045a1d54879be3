//! See [`Pool`]

use crate::{
    algo::{
        label::override_status,
        merge::{override_slots, resolve_day},
        period::select_active_period,
        schedule::{DayStatus, PoolSchedule},
    },
    clock::EasternTime,
    data::{
        record::{Location, PoolRecord, Restriction, SchedulePeriod, ScheduleOverride, SpecialEvent},
        slot::DaySlot,
        status::PoolStatus,
        time::{WeekStart, weekday_full},
    },
};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::borrow::Cow;

/// A pool in canonical form.
///
/// Built once from a [`PoolRecord`] and never changed afterwards. The raw
/// periods and overrides are kept so any date can be resolved later, not just
/// the one the pool was loaded on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    /// Unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Canonical address, whatever shape the record used.
    pub location: Location,
    /// Contact phone number
    pub phone: Option<String>,
    /// Website URL
    pub website: Option<String>,
    /// Feature tags
    pub features: Vec<String>,
    /// Amenity tags
    pub amenities: Vec<String>,
    /// Has a diving board.
    pub diving_board: bool,
    /// Has a wading pool.
    pub baby_pool: bool,

    /// Regular schedule of the period active on [`loaded_on`](Self::loaded_on).
    schedule: Option<PoolSchedule>,

    #[serde(rename = "schedules")]
    periods: Vec<SchedulePeriod>,

    #[serde(rename = "scheduleOverrides")]
    overrides: Vec<ScheduleOverride>,

    restrictions: Vec<Restriction>,

    special_events: Vec<SpecialEvent>,

    /// When the record was last edited, as written in the file.
    pub last_updated: Option<String>,

    #[serde(skip)]
    loaded_on: NaiveDate,
}

/// One day of a [`WeekSchedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    /// Calendar date
    pub date: NaiveDate,
    /// Full day name
    pub day: &'static str,
    /// Effective slots, overrides merged in.
    pub slots: Vec<DaySlot>,
    /// No slots at all.
    pub closed: bool,
}

/// Seven consecutive days of effective slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSchedule {
    /// First day of the week.
    pub start: NaiveDate,
    /// Seven days from `start`.
    pub days: Vec<DaySchedule>,
}

/// Everything a detail view shows about a pool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs, reason = "mirrors the fields of `Pool`")]
pub struct PoolDetails<'a> {
    pub id: &'a str,
    pub name: &'a str,
    /// One-line address
    pub address: String,
    pub location: &'a Location,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub features: &'a [String],
    pub amenities: &'a [String],
    pub diving_board: bool,
    pub baby_pool: bool,
    /// See [`Pool::current_status`]
    pub status: PoolStatus,
    /// See [`Pool::effective_status_at`]
    pub effective_status: PoolStatus,
    pub is_open_now: bool,
    /// Today's effective hours, e.g. `9:00AM - 12:00PM, 1:00PM - 5:00PM`.
    pub today_hours: String,
    pub week: WeekSchedule,
    pub todays_events: Vec<&'a SpecialEvent>,
    pub last_updated: Option<&'a str>,
}

impl Pool {
    /// Canonicalize a record, selecting the schedule active on `today`.
    pub fn from_record(record: PoolRecord, today: NaiveDate) -> Self {
        let schedule = select_active_period(&record.schedules, today)
            .map(|period| PoolSchedule::new(period, &record.restrictions));
        if schedule.is_none() {
            tracing::debug!(pool = record.id.as_str(), %today, "no active schedule period");
        }
        Self {
            id: record.id,
            name: record.name,
            location: record.location.into(),
            phone: record.phone,
            website: record.website,
            features: record.features,
            amenities: record.amenities,
            diving_board: record.diving_board,
            baby_pool: record.baby_pool,
            schedule,
            periods: record.schedules,
            overrides: record.schedule_overrides,
            restrictions: record.restrictions,
            special_events: record.special_events,
            last_updated: record.last_updated,
            loaded_on: today,
        }
    }

    /// The regular schedule active on the day the pool was loaded.
    pub fn schedule(&self) -> Option<&PoolSchedule> {
        self.schedule.as_ref()
    }

    /// The day the pool was loaded.
    pub fn loaded_on(&self) -> NaiveDate {
        self.loaded_on
    }

    /// Raw schedule periods, in source order.
    pub fn periods(&self) -> &[SchedulePeriod] {
        &self.periods
    }

    /// Raw schedule overrides, in source order.
    pub fn overrides(&self) -> &[ScheduleOverride] {
        &self.overrides
    }

    /// Restrictions within operating hours.
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// Dated events.
    pub fn special_events(&self) -> &[SpecialEvent] {
        &self.special_events
    }

    /// The regular schedule active on `date`, if any period covers it.
    pub fn schedule_on(&self, date: NaiveDate) -> Option<Cow<'_, PoolSchedule>> {
        if date == self.loaded_on {
            return self.schedule.as_ref().map(Cow::Borrowed);
        }
        select_active_period(&self.periods, date)
            .map(|period| Cow::Owned(PoolSchedule::new(period, &self.restrictions)))
    }

    /// Status at `now` from the regular schedule alone.
    ///
    /// Overrides are not consulted; see [`effective_status_at`](Self::effective_status_at).
    /// [`PoolStatus::ScheduleNotFound`] if no period covers the date.
    pub fn current_status(&self, now: &EasternTime) -> PoolStatus {
        match self.schedule_on(now.date) {
            Some(schedule) => schedule.current_status(now),
            None => PoolStatus::ScheduleNotFound,
        }
    }

    /// Whether the public can swim at `now`, by [`current_status`](Self::current_status).
    pub fn is_open_now(&self, now: &EasternTime) -> bool {
        self.current_status(now).is_open()
    }

    /// Status at `now` with the day's overrides taken into account.
    ///
    /// Without an override on `now.date` this is [`current_status`](Self::current_status).
    /// Otherwise the merged slot containing `now.time` decides:
    /// - no slot: [`PoolStatus::Closed`]
    /// - an override slot: see [`override_status`]
    /// - a regular slot: by the first restriction in effect, else open
    pub fn effective_status_at(&self, now: &EasternTime) -> PoolStatus {
        if override_slots(&self.overrides, now.date).is_empty() {
            return self.current_status(now);
        }
        let slots = self.day_slots(now.date);
        let Some(slot) = slots.iter().find(|slot| slot.contains_time(now.time)) else {
            return PoolStatus::Closed;
        };
        if !slot.is_override {
            return self
                .restrictions
                .iter()
                .filter(|r| r.covers(now.weekday))
                .find(|r| r.interval().is_some_and(|i| i.contains_time(now.time)))
                .map_or(PoolStatus::Open, |r| PoolStatus::from_restriction_type(&r.kind));
        }

        override_status(
            slot.activities
                .iter()
                .map(String::as_str)
                .chain(slot.override_reason.as_deref()),
        )
    }

    /// Effective slots on `date`, overrides merged in. Empty means closed.
    pub fn day_slots(&self, date: NaiveDate) -> Vec<DaySlot> {
        resolve_day(select_active_period(&self.periods, date), &self.overrides, date)
    }

    /// The seven days starting at `start`.
    ///
    /// Each day selects its own active period, so a week that crosses a
    /// period boundary shows both.
    pub fn week_schedule_for_date(&self, start: NaiveDate) -> WeekSchedule {
        let days = start
            .iter_days()
            .take(7)
            .map(|date| {
                let slots = self.day_slots(date);
                DaySchedule {
                    date,
                    day: weekday_full(date.weekday()),
                    closed: slots.is_empty(),
                    slots,
                }
            })
            .collect();
        WeekSchedule { start, days }
    }

    /// The week containing `now`.
    pub fn week_schedule(&self, now: &EasternTime, week_start: WeekStart) -> WeekSchedule {
        self.week_schedule_for_date(week_start.week_of(now.date))
    }

    /// Effective slots for `day` within the week containing `now`.
    pub fn time_slots(&self, day: Weekday, now: &EasternTime, week_start: WeekStart) -> Vec<DaySlot> {
        let date = week_start
            .week_of(now.date)
            .iter_days()
            .take(7)
            .find(|date| date.weekday() == day)
            .unwrap_or(now.date);
        self.day_slots(date)
    }

    /// Hours and status of every day at `now.time`, from the schedule active on `now.date`.
    ///
    /// Always seven rows. Every day is closed if no period covers the date.
    pub fn all_days_status(&self, now: &EasternTime) -> Vec<DayStatus> {
        match self.schedule_on(now.date) {
            Some(schedule) => schedule.all_days_status(now.time),
            None => PoolSchedule::closed().all_days_status(now.time),
        }
    }

    /// Special events dated `now.date`.
    pub fn todays_events(&self, now: &EasternTime) -> Vec<&SpecialEvent> {
        self.special_events
            .iter()
            .filter(|event| event.date == Some(now.date))
            .collect()
    }

    /// Everything a detail view needs, as of `now`.
    pub fn detailed_info(&self, now: &EasternTime, week_start: WeekStart) -> PoolDetails<'_> {
        let today = self.day_slots(now.date);
        let today_hours = if today.is_empty() {
            "Closed".to_string()
        } else {
            today.iter().map(|slot| slot.interval.to_string()).collect::<Vec<_>>().join(", ")
        };
        PoolDetails {
            id: &self.id,
            name: &self.name,
            address: self.location.address(),
            location: &self.location,
            phone: self.phone.as_deref(),
            website: self.website.as_deref(),
            features: &self.features,
            amenities: &self.amenities,
            diving_board: self.diving_board,
            baby_pool: self.baby_pool,
            status: self.current_status(now),
            effective_status: self.effective_status_at(now),
            is_open_now: self.is_open_now(now),
            today_hours,
            week: self.week_schedule(now, week_start),
            todays_events: self.todays_events(now),
            last_updated: self.last_updated.as_deref(),
        }
    }

    /// Whether `term` appears (case-insensitively) in the pool's name,
    /// address, features or amenities. A blank term matches every pool.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        let location = &self.location;
        [&self.name, &location.street, &location.city, &location.zip]
            .into_iter()
            .chain(&self.features)
            .chain(&self.amenities)
            .any(|field| field.to_lowercase().contains(&term))
    }

    /// The canonical pool as JSON.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
