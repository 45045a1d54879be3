//! Schedule resolution: choosing the active period, per-day lookups, and
//! merging overrides into a day's slots.

pub mod label;
pub mod merge;
pub mod period;
pub mod schedule;

pub use label::{is_special_event_label, override_status};
pub use merge::{OverrideSlot, merge_day, override_slots, resolve_day};
pub use period::{DayHours, OpenHours, RestrictionWindow, normalize_week, regular_slots, select_active_period};
pub use schedule::{DayStatus, PoolSchedule};
