//! Merging a day's regular slots with its override slots.
//!
//! # Algorithm
//!
//! 1. Each override slot is classified. If any of its activity labels, or its
//!    override's reason, [looks like a special event](is_special_event_label),
//!    it is a *true* override: flagged, and carrying the reason. Otherwise it
//!    is *inert*: it still replaces the regular hours it covers, but reads as
//!    an ordinary slot.
//! 1. Override slots that overlap an earlier override slot (in list order)
//!    are trimmed to the uncovered part, so the earlier one wins.
//! 1. Every regular slot has every override interval subtracted from it.
//!    Fully covered slots vanish; partially covered slots keep whatever lies
//!    before and/or after the override.
//! 1. Surviving regular pieces and override slots are sorted by start time.
//! 1. Directly consecutive slots with the same activities and the same
//!    override reason are joined. Slots with different activities are never
//!    joined, even when they come from the same override.
//!
//! Subtraction of one interval after another always leaves the maximal
//! uncovered pieces, so the order in which overrides are applied to a regular
//! slot does not change the result.

use crate::{
    algo::{label::is_special_event_label, period::regular_slots},
    data::{
        record::{HourEntry, SchedulePeriod, ScheduleOverride},
        slot::{DaySlot, TimeInterval},
    },
};
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use smallvec::{SmallVec, smallvec};

/// An override slot before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideSlot {
    /// The replacement hours, as read from the override's entry.
    pub slot: DaySlot,

    /// The parent override's reason.
    pub reason: String,
}

impl OverrideSlot {
    /// Read an override entry. [`None`] if it has no usable interval.
    pub fn from_entry(entry: &HourEntry, reason: &str) -> Option<Self> {
        Some(Self {
            slot: entry.to_slot()?,
            reason: reason.to_string(),
        })
    }

    /// Whether this slot should be displayed as a special event.
    pub fn is_special_event(&self) -> bool {
        is_special_event_label(&self.reason)
            || self
                .slot
                .activities
                .iter()
                .any(|label| is_special_event_label(label))
    }

    /// The slot as it appears in the merged day.
    ///
    /// A true override is flagged with its reason, and falls back to the
    /// reason for notes when it has none. An inert override is unchanged.
    pub fn classify(self) -> DaySlot {
        if !self.is_special_event() {
            return self.slot;
        }
        let notes = if self.slot.notes.is_empty() {
            self.reason.clone()
        } else {
            self.slot.notes
        };
        DaySlot {
            notes,
            is_override: true,
            override_reason: Some(self.reason),
            ..self.slot
        }
    }
}

/// Every override slot that applies on `date`, in list order.
pub fn override_slots(overrides: &[ScheduleOverride], date: NaiveDate) -> Vec<OverrideSlot> {
    overrides
        .iter()
        .flat_map(|over| {
            over.entries_on(date)
                .filter_map(move |entry| OverrideSlot::from_entry(entry, &over.reason))
        })
        .collect()
}

/// The parts of `slot` not covered by any of `cuts`.
fn carve(slot: DaySlot, cuts: &[TimeInterval]) -> SmallVec<[DaySlot; 2]> {
    let mut pieces: SmallVec<[TimeInterval; 2]> = smallvec![slot.interval];
    for cut in cuts {
        pieces = pieces.iter().flat_map(|piece| piece.subtract(cut)).collect();
        if pieces.is_empty() {
            break;
        }
    }
    if pieces.len() == 1 && pieces[0] == slot.interval {
        return smallvec![slot];
    }
    pieces.into_iter().map(|piece| slot.with_interval(piece)).collect()
}

/// Whether `next` can be folded into `prev`.
fn joinable(prev: &DaySlot, next: &DaySlot) -> bool {
    prev.end == next.start
        && prev.is_override == next.is_override
        && prev.override_reason == next.override_reason
        && prev.same_activities(next)
}

/// Merge one day's regular slots with the override slots that apply to it.
///
/// See the [module-level documentation](crate::algo::merge) for the steps.
pub fn merge_day(regular: Vec<DaySlot>, overrides: Vec<OverrideSlot>) -> Vec<DaySlot> {
    let mut placed: Vec<DaySlot> = Vec::with_capacity(overrides.len());
    for over in overrides {
        let cuts = placed.iter().map(|slot| slot.interval).collect::<Vec<_>>();
        placed.extend(carve(over.classify(), &cuts));
    }

    let cuts = placed.iter().map(|slot| slot.interval).collect::<Vec<_>>();
    let mut slots = regular
        .into_iter()
        .flat_map(|slot| carve(slot, &cuts))
        .chain(placed)
        .collect::<Vec<_>>();
    slots.sort_by_key(|slot| slot.interval);

    let merged = slots
        .into_iter()
        .coalesce(|mut prev, next| {
            if joinable(&prev, &next) {
                prev.end = next.end;
                Ok(prev)
            } else {
                Err((prev, next))
            }
        })
        .collect::<Vec<_>>();

    tracing::trace!(slots = merged.len(), "merged day");
    merged
}

/// The effective slots on `date`: the active period's entries for that
/// weekday, with every applicable override merged in.
///
/// With no active period, only overrides contribute. An empty result means
/// the pool is closed that day.
pub fn resolve_day(
    period: Option<&SchedulePeriod>,
    overrides: &[ScheduleOverride],
    date: NaiveDate,
) -> Vec<DaySlot> {
    let regular = period
        .map(|period| regular_slots(period, date.weekday()))
        .unwrap_or_default();
    let overrides = override_slots(overrides, date);
    if !overrides.is_empty() {
        tracing::debug!(%date, count = overrides.len(), "applying schedule overrides");
    }
    merge_day(regular, overrides)
}
