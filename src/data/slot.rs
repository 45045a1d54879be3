//! See [`DaySlot`]

use crate::data::time::TimeOfDay;
use serde::Serialize;
use smallvec::{SmallVec, smallvec};

/// Activity labels on a slot, e.g. `["Laps", "Rec Swim"]`.
pub type Activities = SmallVec<[String; 2]>;

/// A same-day range of time, `[start, end)`.
///
/// # [Ordering](`Ord`)
///
/// [`TimeInterval`] is ordered by start, then end.
/// In other words, if [`TimeInterval`] `a` starts before [`TimeInterval`] `b`,
/// then `a` will be ordered ahead of `b` no matter when either ends.
/// However, if both start at the same time, then the one that ends first
/// will be ordered ahead of the one that ends later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeInterval {
    /// Beginning of the interval
    #[serde(rename = "startTime")]
    pub start: TimeOfDay,

    /// Conclusion of the interval
    #[serde(rename = "endTime")]
    pub end: TimeOfDay,
}

impl std::ops::RangeBounds<TimeOfDay> for TimeInterval {
    fn start_bound(&self) -> std::ops::Bound<&TimeOfDay> {
        std::ops::Bound::Included(&self.start)
    }

    fn end_bound(&self) -> std::ops::Bound<&TimeOfDay> {
        std::ops::Bound::Excluded(&self.end)
    }
}

impl PartialOrd for TimeInterval {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeInterval {
    #[inline]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.start.cmp(&other.start) {
            std::cmp::Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

impl TimeInterval {
    /// [`None`] unless `start < end`. Intervals crossing midnight are not supported.
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    /// Returns whether `self` and `other` share some nonzero span of time.
    ///
    /// Intervals that only touch (one ends exactly when the other starts) do not overlap.
    pub fn is_overlapping(&self, other: &Self) -> bool {
        debug_assert!(self.start < self.end && other.start < other.end);
        self.start < other.end && other.start < self.end
    }

    /// Returns whether `time` falls within `[start, end)`.
    pub fn contains_time(&self, time: TimeOfDay) -> bool {
        std::ops::RangeBounds::contains(self, &time)
    }

    /// Returns whether `self` completely encloses `other`.
    pub fn contains(&self, other: &Self) -> bool {
        debug_assert!(self.start < self.end && other.start < other.end);
        self.start <= other.start && other.end <= self.end
    }

    /// The parts of `self` not covered by `cut`, in order.
    ///
    /// - `cut` encloses `self`: nothing survives.
    /// - `cut` overlaps part of `self`: the remainder before `cut.start`
    ///   and/or after `cut.end`.
    /// - no overlap: `self` unchanged.
    pub fn subtract(&self, cut: &Self) -> SmallVec<[Self; 2]> {
        if !self.is_overlapping(cut) {
            return smallvec![*self];
        }
        if cut.contains(self) {
            return SmallVec::new();
        }
        let left = Self::new(self.start, cut.start);
        let right = Self::new(cut.end, self.end);
        left.into_iter().chain(right).collect()
    }
}

/// One entry in a day's schedule.
///
/// Dereferences to its [`TimeInterval`]; slots sort by interval
/// (See [`TimeInterval` ordering](TimeInterval#ordering)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySlot {
    /// The time period the slot refers to.
    #[serde(flatten)]
    pub interval: TimeInterval,

    /// What the pool is being used for.
    pub activities: Activities,

    /// Free-text notes. Empty if none.
    pub notes: String,

    /// Who may attend, e.g. "Members". Empty if unrestricted.
    pub access: String,

    /// Whether the slot comes from a special-event override.
    pub is_override: bool,

    /// The override's reason. Only [`Some`] when [`is_override`](Self::is_override).
    pub override_reason: Option<String>,
}

impl std::ops::Deref for DaySlot {
    type Target = TimeInterval;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.interval
    }
}

impl std::ops::DerefMut for DaySlot {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.interval
    }
}

impl DaySlot {
    /// A regular-schedule slot with no notes or access restriction.
    pub fn regular(interval: TimeInterval, activities: Activities) -> Self {
        Self {
            interval,
            activities,
            notes: String::new(),
            access: String::new(),
            is_override: false,
            override_reason: None,
        }
    }

    /// Copy of `self` covering a different interval.
    pub fn with_interval(&self, interval: TimeInterval) -> Self {
        Self {
            interval,
            ..self.clone()
        }
    }

    /// Whether both slots list the same activities, ignoring order.
    pub fn same_activities(&self, other: &Self) -> bool {
        if self.activities.len() != other.activities.len() {
            return false;
        }
        let mut a = self.activities.iter().collect::<SmallVec<[_; 4]>>();
        let mut b = other.activities.iter().collect::<SmallVec<[_; 4]>>();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

#[cfg(test)]
mod tests {
    use crate::{slot, time, time_interval};

    #[test]
    fn test_interval_contains_self() {
        assert!(
            time_interval!(9:00 AM - 5:00 PM).contains(&time_interval!(9:00 AM - 5:00 PM)),
            "an interval should contain itself"
        );
    }

    #[test]
    fn test_interval_contains_later_start() {
        assert!(
            time_interval!(9:00 AM - 5:00 PM).contains(&time_interval!(10:00 AM - 5:00 PM)),
            "an interval starting later but sharing an end should count as contained"
        );
    }

    #[test]
    fn test_interval_contains_later_start_and_earlier_end() {
        assert!(
            time_interval!(9:00 AM - 5:00 PM).contains(&time_interval!(10:00 AM - 4:00 PM)),
            "an interval starting later and ending earlier should count as contained"
        );
    }

    #[test]
    fn test_interval_not_contains_earlier_start() {
        assert!(
            !time_interval!(9:00 AM - 5:00 PM).contains(&time_interval!(8:00 AM - 4:00 PM)),
            "an interval starting earlier should not count as contained, even if ending earlier"
        );
        assert!(
            !time_interval!(9:00 AM - 5:00 PM).contains(&time_interval!(8:00 AM - 5:00 PM)),
            "an interval starting earlier should not count as contained, even if sharing an end"
        );
    }

    #[test]
    fn test_interval_touching_is_not_overlapping() {
        assert!(!time_interval!(9:00 AM - 12:00 PM).is_overlapping(&time_interval!(12:00 PM - 1:00 PM)));
        assert!(time_interval!(9:00 AM - 12:01 PM).is_overlapping(&time_interval!(12:00 PM - 1:00 PM)));
    }

    #[test]
    fn test_contains_time_excludes_end() {
        let interval = time_interval!(3:00 PM - 5:00 PM);
        assert!(interval.contains_time(time!(3:00 PM)));
        assert!(interval.contains_time(time!(4:59 PM)));
        assert!(!interval.contains_time(time!(5:00 PM)));
    }

    #[test]
    fn test_reversed_interval_rejected() {
        assert_eq!(super::TimeInterval::new(time!(5:00 PM), time!(9:00 AM)), None);
        assert_eq!(super::TimeInterval::new(time!(9:00 AM), time!(9:00 AM)), None);
    }

    #[test]
    fn test_subtract_middle_splits() {
        let pieces = time_interval!(9:00 AM - 5:00 PM).subtract(&time_interval!(12:00 PM - 1:00 PM));
        assert_eq!(
            pieces.as_slice(),
            [time_interval!(9:00 AM - 12:00 PM), time_interval!(1:00 PM - 5:00 PM)]
        );
    }

    #[test]
    fn test_subtract_edges() {
        let base = time_interval!(9:00 AM - 5:00 PM);
        assert_eq!(
            base.subtract(&time_interval!(8:00 AM - 10:00 AM)).as_slice(),
            [time_interval!(10:00 AM - 5:00 PM)]
        );
        assert_eq!(
            base.subtract(&time_interval!(3:00 PM - 9:00 PM)).as_slice(),
            [time_interval!(9:00 AM - 3:00 PM)]
        );
        assert!(base.subtract(&time_interval!(6:00 AM - 9:00 PM)).is_empty());
        assert_eq!(base.subtract(&time_interval!(6:00 PM - 9:00 PM)).as_slice(), [base]);
    }

    #[test]
    fn test_same_activities_ignores_order() {
        let a = slot!(9:00 AM - 5:00 PM; "Laps", "Rec Swim");
        let b = slot!(9:00 AM - 5:00 PM; "Rec Swim", "Laps");
        let c = slot!(9:00 AM - 5:00 PM; "Laps");
        assert!(a.same_activities(&b));
        assert!(!a.same_activities(&c));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(slot!(9:00 AM - 12:30 PM; "Laps")).unwrap();
        assert_eq!(json["startTime"], "9:00AM");
        assert_eq!(json["endTime"], "12:30PM");
        assert_eq!(json["activities"][0], "Laps");
        assert_eq!(json["isOverride"], false);
        assert!(json["overrideReason"].is_null());
    }
}
