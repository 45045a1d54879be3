//! Reading free-text override labels.
//!
//! Both checks are plain substring matches. Everything that depends on them
//! goes through [`is_special_event_label`] or [`override_status`], so the
//! heuristics can be replaced without touching the merge or the status logic.

use crate::data::status::PoolStatus;

/// Lowercase markers that flag a label as a special event.
pub const SPECIAL_EVENT_MARKERS: [&str; 6] = [
    "swim meet",
    "pool party",
    "maintenance",
    "private event",
    "competition",
    "closed",
];

/// Whether `label` names a special event (case-insensitive).
pub fn is_special_event_label(label: &str) -> bool {
    let label = label.to_lowercase();
    SPECIAL_EVENT_MARKERS
        .iter()
        .any(|marker| label.contains(marker))
}

/// Lowercase markers for each status an override slot can imply, checked in order.
const STATUS_MARKERS: [(PoolStatus, &[&str]); 3] = [
    (PoolStatus::SwimMeet, &["meet", "competition"]),
    (PoolStatus::PracticeOnly, &["practice"]),
    (PoolStatus::ClosedToPublic, &["closed", "maintenance", "private event"]),
];

/// Status implied by an override slot's labels (activities and reason), case-insensitive.
///
/// [`PoolStatus::Open`] if no label names a meet, practice or closure.
pub fn override_status<'a>(labels: impl IntoIterator<Item = &'a str>) -> PoolStatus {
    let labels = labels.into_iter().map(str::to_lowercase).collect::<Vec<_>>();
    STATUS_MARKERS
        .into_iter()
        .find(|(_, markers)| {
            labels
                .iter()
                .any(|label| markers.iter().any(|marker| label.contains(marker)))
        })
        .map_or(PoolStatus::Open, |(status, _)| status)
}
