//! Raw pool records as they appear in the JSON data files.
//!
//! Records are third-party data and often imperfect. Deserialization here
//! is forgiving: a bad value, list item or weekday key degrades to "doesn't
//! apply" rather than failing the pool.

use crate::data::{
    slot::{Activities, DaySlot, TimeInterval},
    time::{TimeOfDay, parse_weekday},
};
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

pub(crate) mod lenient {
    //! Field deserializers that never fail on bad values.

    use crate::data::time::parse_weekday;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, de::DeserializeOwned};
    use serde_json::Value;

    /// A string. `null` and non-strings are [`None`].
    pub(crate) fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => {
                tracing::warn!(input = %other, "expected text");
                None
            }
        })
    }

    /// Like [`text`], but empty instead of [`None`].
    pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(deserializer)?.unwrap_or_default())
    }

    /// A list, keeping only the items that read as `T`.
    ///
    /// `null` is empty. A lone value is read as a one-item list.
    pub(crate) fn each<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let values = match Value::deserialize(deserializer)? {
            Value::Array(values) => values,
            Value::Null => Vec::new(),
            other => vec![other],
        };
        Ok(values
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<T>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping malformed list item");
                    None
                }
            })
            .collect())
    }

    /// Weekday keys, kept as written. Unknown keys are logged here, once.
    pub(crate) fn weekday_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let keys: Vec<String> = each(deserializer)?;
        for key in keys.iter().filter(|key| parse_weekday(key).is_none()) {
            tracing::debug!(key = key.as_str(), "ignoring unknown weekday key");
        }
        Ok(keys)
    }

    /// `YYYY-MM-DD`, or the date part of an ISO date-time. Anything else is [`None`].
    pub(crate) fn date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = text(deserializer)? else {
            return Ok(None);
        };
        let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .or_else(|e| {
                raw.get(..10)
                    .ok_or(e)
                    .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d"))
            })
            .inspect_err(|e| tracing::warn!(input = raw.as_str(), error = %e, "unrecognized date"))
            .ok();
        Ok(parsed)
    }

    /// Pool ids are usually strings but some files use numbers.
    pub(crate) fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Id {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Id::deserialize(deserializer)? {
            Id::Text(s) => s,
            Id::Number(n) => n.to_string(),
        })
    }

    /// `null` is read as the default value.
    pub(crate) fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Whether a raw weekday list covers `day`. Unknown keys never match.
fn covers_day(week_days: &[String], day: Weekday) -> bool {
    week_days.iter().filter_map(|key| parse_weekday(key)).any(|d| d == day)
}

/// Whether an optional inclusive date range contains `date`.
/// A missing or unreadable bound means the range applies nowhere.
fn range_contains(start: Option<NaiveDate>, end: Option<NaiveDate>, date: NaiveDate) -> bool {
    start.zip(end).is_some_and(|(start, end)| start <= date && date <= end)
}

/// One line of a weekly schedule: some days, one span of time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourEntry {
    /// Days the entry applies to, e.g. `["Mon", "Wed"]`.
    #[serde(default, deserialize_with = "lenient::weekday_keys")]
    pub week_days: Vec<String>,

    /// e.g. `6:00AM`
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_time: Option<String>,

    /// e.g. `9:00PM`
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_time: Option<String>,

    /// Activity labels.
    #[serde(default, deserialize_with = "lenient::each")]
    pub types: Vec<String>,

    /// Free-text notes.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub notes: String,

    /// Who may attend.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub access: String,
}

impl HourEntry {
    /// Whether the entry lists `day`.
    pub fn covers(&self, day: Weekday) -> bool {
        covers_day(&self.week_days, day)
    }

    /// Parsed start time, if present.
    pub fn start(&self) -> Option<TimeOfDay> {
        self.start_time.as_deref().map(TimeOfDay::parse)
    }

    /// Parsed end time, if present.
    pub fn end(&self) -> Option<TimeOfDay> {
        self.end_time.as_deref().map(TimeOfDay::parse)
    }

    /// The entry's span of time, if both ends are present and in order.
    pub fn interval(&self) -> Option<TimeInterval> {
        let (start, end) = self.start().zip(self.end())?;
        let interval = TimeInterval::new(start, end);
        if interval.is_none() {
            tracing::warn!(
                start = ?self.start_time,
                end = ?self.end_time,
                "dropping hour entry that does not end after it starts"
            );
        }
        interval
    }

    /// The entry as a regular-schedule slot.
    pub fn to_slot(&self) -> Option<DaySlot> {
        Some(DaySlot {
            notes: self.notes.clone(),
            access: self.access.clone(),
            ..DaySlot::regular(self.interval()?, Activities::from_iter(self.types.iter().cloned()))
        })
    }
}

/// A date-ranged version of a pool's weekly hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePeriod {
    /// First day of the period, inclusive.
    #[serde(default, deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,

    /// Last day of the period, inclusive.
    #[serde(default, deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,

    /// The weekly hours.
    #[serde(default, deserialize_with = "lenient::each")]
    pub hours: Vec<HourEntry>,
}

impl SchedulePeriod {
    /// Whether `date` falls within the period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        range_contains(self.start_date, self.end_date, date)
    }
}

/// Date-scoped hours that supersede the regular schedule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOverride {
    /// First day of the override, inclusive.
    #[serde(default, deserialize_with = "lenient::date")]
    pub start_date: Option<NaiveDate>,

    /// Last day of the override, inclusive.
    #[serde(default, deserialize_with = "lenient::date")]
    pub end_date: Option<NaiveDate>,

    /// Why the hours differ, e.g. "Swim Meet".
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub reason: String,

    /// Replacement hours.
    #[serde(default, deserialize_with = "lenient::each")]
    pub hours: Vec<HourEntry>,
}

impl ScheduleOverride {
    /// Whether `date` falls within the override's range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        range_contains(self.start_date, self.end_date, date)
    }

    /// The override's entries for the weekday of `date`, if the override covers `date`.
    pub fn entries_on(&self, date: NaiveDate) -> impl Iterator<Item = &HourEntry> {
        use chrono::Datelike;

        let day = date.weekday();
        let applies = self.contains(date);
        self.hours
            .iter()
            .filter(move |entry| applies && entry.covers(day))
    }
}

/// A recurring restriction inside operating hours, e.g. team practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restriction {
    /// Days the restriction applies to. Empty means every day.
    #[serde(default, deserialize_with = "lenient::weekday_keys")]
    pub week_days: Vec<String>,

    /// e.g. `3:00PM`
    #[serde(default, deserialize_with = "lenient::text")]
    pub start_time: Option<String>,

    /// e.g. `5:00PM`
    #[serde(default, deserialize_with = "lenient::text")]
    pub end_time: Option<String>,

    /// `practice`, `meet`, `closed`, or anything else for a generic restriction.
    #[serde(rename = "type", default, deserialize_with = "lenient::text_or_empty")]
    pub kind: String,

    /// Free-text notes.
    #[serde(default, deserialize_with = "lenient::text_or_empty")]
    pub notes: String,
}

impl Restriction {
    /// Whether the restriction applies on `day`.
    pub fn covers(&self, day: Weekday) -> bool {
        self.week_days.is_empty() || covers_day(&self.week_days, day)
    }

    /// The restricted span of time, if both ends are present and in order.
    pub fn interval(&self) -> Option<TimeInterval> {
        let start = self.start_time.as_deref().map(TimeOfDay::parse)?;
        let end = self.end_time.as_deref().map(TimeOfDay::parse)?;
        TimeInterval::new(start, end)
    }
}

/// A dated event at the pool. Fields other than `date` are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialEvent {
    /// The day of the event.
    #[serde(default, deserialize_with = "lenient::date")]
    pub date: Option<NaiveDate>,

    /// Remaining event fields (title, description, times...).
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Current nested location shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NestedLocation {
    /// Street address
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub street: String,
    /// City
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub city: String,
    /// State abbreviation
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub state: String,
    /// Postal code
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub zip: String,
    /// Latitude
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude
    #[serde(default)]
    pub lng: Option<f64>,
    /// Search string for map links.
    #[serde(default)]
    pub maps_query: Option<String>,
}

/// Where a pool record keeps its address. Resolved once into a [`Location`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationRecord {
    /// `{ "location": { "street": ..., "city": ... } }`
    Nested {
        /// The nested location object.
        location: NestedLocation,
    },

    /// `{ "address": "street, city, ST zip", "lat": ..., "lng": ... }`
    #[serde(rename_all = "camelCase")]
    Legacy {
        /// One-line address.
        address: String,
        /// Latitude
        #[serde(default)]
        lat: Option<f64>,
        /// Longitude
        #[serde(default)]
        lng: Option<f64>,
        /// Search string for map links.
        #[serde(default)]
        maps_query: Option<String>,
    },

    /// No address at all.
    Missing {},
}

/// Canonical pool location.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Street address
    pub street: String,
    /// City
    pub city: String,
    /// State abbreviation
    pub state: String,
    /// Postal code
    pub zip: String,
    /// Latitude
    pub lat: Option<f64>,
    /// Longitude
    pub lng: Option<f64>,
    /// Search string for map links.
    pub maps_query: Option<String>,
}

impl Location {
    /// Split a legacy one-line address of the form `street, city, ST zip`.
    ///
    /// Any other shape is kept whole as the street.
    pub fn from_legacy_address(address: &str) -> Self {
        let parts = address.split(',').map(str::trim).collect::<Vec<_>>();
        match parts.as_slice() {
            [street, city, state_zip] => match state_zip.split_once(' ') {
                Some((state, zip)) => Self {
                    street: street.to_string(),
                    city: city.to_string(),
                    state: state.to_string(),
                    zip: zip.trim().to_string(),
                    ..Default::default()
                },
                None => Self {
                    street: street.to_string(),
                    city: city.to_string(),
                    state: state_zip.to_string(),
                    ..Default::default()
                },
            },
            _ => Self {
                street: address.trim().to_string(),
                ..Default::default()
            },
        }
    }

    /// One-line address, skipping empty parts.
    pub fn address(&self) -> String {
        let state_zip = [self.state.as_str(), self.zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [self.street.as_str(), self.city.as_str(), state_zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<LocationRecord> for Location {
    fn from(value: LocationRecord) -> Self {
        match value {
            LocationRecord::Nested { location } => Self {
                street: location.street,
                city: location.city,
                state: location.state,
                zip: location.zip,
                lat: location.lat,
                lng: location.lng,
                maps_query: location.maps_query,
            },
            LocationRecord::Legacy {
                address,
                lat,
                lng,
                maps_query,
            } => Self {
                lat,
                lng,
                maps_query,
                ..Self::from_legacy_address(&address)
            },
            LocationRecord::Missing {} => Self::default(),
        }
    }
}

/// A pool as stored in the data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    /// Unique id
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,

    /// Display name
    pub name: String,

    /// Address, in either supported shape.
    #[serde(flatten)]
    pub location: LocationRecord,

    /// Contact phone number
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: Option<String>,

    /// Website URL
    #[serde(default, deserialize_with = "lenient::text")]
    pub website: Option<String>,

    /// Feature tags, e.g. "Lap Lanes".
    #[serde(default, deserialize_with = "lenient::each")]
    pub features: Vec<String>,

    /// Amenity tags, e.g. "Snack Bar".
    #[serde(default, deserialize_with = "lenient::each")]
    pub amenities: Vec<String>,

    /// Has a diving board.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub diving_board: bool,

    /// Has a wading pool.
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub baby_pool: bool,

    /// Date-ranged weekly schedules, in source order.
    #[serde(default, deserialize_with = "lenient::each")]
    pub schedules: Vec<SchedulePeriod>,

    /// Date-scoped overrides, in source order.
    #[serde(default, deserialize_with = "lenient::each")]
    pub schedule_overrides: Vec<ScheduleOverride>,

    /// Restrictions within operating hours.
    #[serde(default, deserialize_with = "lenient::each")]
    pub restrictions: Vec<Restriction>,

    /// Dated events.
    #[serde(default, deserialize_with = "lenient::each")]
    pub special_events: Vec<SpecialEvent>,

    /// When the record was last edited, as written in the file.
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_updated: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_nested_location_record() {
        let record: PoolRecord = serde_json::from_value(json!({
            "id": "oak",
            "name": "Oak Marr",
            "location": {
                "street": "3200 Jermantown Rd",
                "city": "Oakton",
                "state": "VA",
                "zip": "22124",
                "lat": 38.87,
                "lng": -77.31
            }
        }))
        .unwrap();
        let location = Location::from(record.location);
        assert_eq!(location.city, "Oakton");
        assert_eq!(location.address(), "3200 Jermantown Rd, Oakton, VA 22124");
        assert_eq!(location.lat, Some(38.87));
    }

    #[test]
    fn test_legacy_location_record() {
        let record: PoolRecord = serde_json::from_value(json!({
            "id": 7,
            "name": "Spring Hill",
            "address": "1239 Spring Hill Rd, McLean, VA 22102",
            "mapsQuery": "Spring Hill Rec Center"
        }))
        .unwrap();
        assert_eq!(record.id, "7");
        let location = Location::from(record.location);
        assert_eq!(location.street, "1239 Spring Hill Rd");
        assert_eq!(location.city, "McLean");
        assert_eq!(location.state, "VA");
        assert_eq!(location.zip, "22102");
        assert_eq!(location.maps_query.as_deref(), Some("Spring Hill Rec Center"));
    }

    #[test]
    fn test_unusual_legacy_address_kept_whole() {
        let location = Location::from_legacy_address("Behind the library");
        assert_eq!(location.street, "Behind the library");
        assert_eq!(location.address(), "Behind the library");
    }

    #[test]
    fn test_missing_location() {
        let record: PoolRecord =
            serde_json::from_value(json!({ "id": "x", "name": "Nowhere" })).unwrap();
        assert_eq!(record.location, LocationRecord::Missing {});
    }

    #[test]
    fn test_bad_dates_degrade_to_none() {
        let period: SchedulePeriod = serde_json::from_value(json!({
            "startDate": "June 1st",
            "endDate": "2025-09-01T00:00:00Z",
            "hours": null
        }))
        .unwrap();
        assert_eq!(period.start_date, None);
        assert_eq!(period.end_date, Some(date(2025, 9, 1)));
        assert!(period.hours.is_empty());
        assert!(!period.contains(date(2025, 7, 1)), "an unbounded range applies nowhere");
    }

    #[test]
    fn test_range_is_inclusive() {
        let period = SchedulePeriod {
            start_date: Some(date(2025, 6, 1)),
            end_date: Some(date(2025, 6, 30)),
            hours: vec![],
        };
        assert!(period.contains(date(2025, 6, 1)));
        assert!(period.contains(date(2025, 6, 30)));
        assert!(!period.contains(date(2025, 7, 1)));
        assert!(!period.contains(date(2025, 5, 31)));
    }

    #[test]
    fn test_hour_entry_slot() {
        let entry: HourEntry = serde_json::from_value(json!({
            "weekDays": ["Mon", "Wednesday", "Caturday"],
            "startTime": "6:00AM",
            "endTime": "9:00PM",
            "types": ["Laps", "Rec Swim"],
            "notes": null,
            "access": "Members"
        }))
        .unwrap();
        assert!(entry.covers(Weekday::Mon));
        assert!(entry.covers(Weekday::Wed));
        assert!(!entry.covers(Weekday::Sat));

        let slot = entry.to_slot().unwrap();
        assert_eq!(slot.start.to_string(), "6:00AM");
        assert_eq!(slot.end.to_string(), "9:00PM");
        assert_eq!(slot.activities.as_slice(), ["Laps", "Rec Swim"]);
        assert_eq!(slot.access, "Members");
        assert!(slot.notes.is_empty());
        assert!(!slot.is_override);
    }

    #[test]
    fn test_reversed_hour_entry_has_no_slot() {
        let entry = HourEntry {
            week_days: vec!["Fri".into()],
            start_time: Some("9:00PM".into()),
            end_time: Some("1:00AM".into()),
            ..Default::default()
        };
        assert_eq!(entry.interval(), None);
        assert_eq!(entry.to_slot(), None);
    }

    #[test]
    fn test_override_entries_on() {
        let over = ScheduleOverride {
            start_date: Some(date(2025, 7, 4)),
            end_date: Some(date(2025, 7, 4)),
            reason: "Independence Day".into(),
            hours: vec![HourEntry {
                week_days: vec!["Fri".into()],
                start_time: Some("10:00AM".into()),
                end_time: Some("4:00PM".into()),
                ..Default::default()
            }],
        };
        // 2025-07-04 is a Friday
        assert_eq!(over.entries_on(date(2025, 7, 4)).count(), 1);
        assert_eq!(over.entries_on(date(2025, 7, 11)).count(), 0);
    }

    #[test]
    fn test_mistyped_fields_degrade_the_entry_only() {
        let over: ScheduleOverride = serde_json::from_value(json!({
            "startDate": "2025-07-12",
            "endDate": "2025-07-12",
            "reason": 42,
            "hours": [
                { "weekDays": ["Sat"], "startTime": 900, "endTime": "11:00AM", "types": ["Meet"] },
                { "weekDays": "Sat", "startTime": "1:00PM", "endTime": "2:00PM", "types": "Meet" },
                "not an entry"
            ]
        }))
        .unwrap();
        assert!(over.reason.is_empty());
        assert_eq!(over.hours.len(), 2, "the string item is dropped");
        assert_eq!(over.hours[0].start_time, None);
        assert_eq!(over.hours[0].to_slot(), None);
        assert_eq!(over.hours[1].types, ["Meet"]);
        assert!(over.hours[1].covers(Weekday::Sat));
    }

    #[test]
    fn test_malformed_list_items_are_skipped() {
        let record: PoolRecord = serde_json::from_value(json!({
            "id": "lake",
            "name": "Lake Audubon",
            "phone": 7035550100_u64,
            "features": ["Slide", 3],
            "schedules": [
                7,
                { "startDate": "2025-06-01", "endDate": "2025-08-31", "hours": [] }
            ],
            "scheduleOverrides": { "startDate": "2025-07-04", "endDate": "2025-07-04", "reason": "Closed" },
            "restrictions": "practice"
        }))
        .unwrap();
        assert_eq!(record.phone, None);
        assert_eq!(record.features, ["Slide"]);
        assert_eq!(record.schedules.len(), 1);
        assert_eq!(record.schedule_overrides.len(), 1, "a lone object reads as one override");
        assert!(record.restrictions.is_empty());
    }

    #[test]
    fn test_restriction_without_days_covers_all() {
        let restriction = Restriction {
            start_time: Some("3:00PM".into()),
            end_time: Some("5:00PM".into()),
            kind: "practice".into(),
            ..Default::default()
        };
        assert!(restriction.covers(Weekday::Sun));
        assert_eq!(restriction.interval().unwrap().start.to_string(), "3:00PM");
    }
}
