//! See [`PoolStatus`]

use serde::Serialize;
use strum::{EnumIter, IntoStaticStr};

/// Display color family for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusColor {
    /// Open
    Green,
    /// Open with caveats
    Yellow,
    /// Not open to the public
    Red,
    /// Unknown
    Gray,
}

/// The live status of a pool at some instant.
///
/// A closed vocabulary; compared by variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(into = "StatusSummary")]
pub enum PoolStatus {
    /// Open for regular swimming.
    Open,
    /// Outside operating hours.
    Closed,
    /// Open, but with some restriction in effect.
    Restricted,
    /// In use for team practice only.
    PracticeOnly,
    /// Closed to the public for another reason.
    ClosedToPublic,
    /// Hosting a swim meet.
    SwimMeet,
    /// No schedule period covers the date in question.
    ScheduleNotFound,
}

impl PoolStatus {
    /// Whether the public can swim.
    pub const fn is_open(self) -> bool {
        matches!(self, PoolStatus::Open | PoolStatus::Restricted)
    }

    /// Human-readable label.
    pub const fn label(self) -> &'static str {
        match self {
            PoolStatus::Open => "Open",
            PoolStatus::Closed => "Closed",
            PoolStatus::Restricted => "Open (Restricted)",
            PoolStatus::PracticeOnly => "Practice Only",
            PoolStatus::ClosedToPublic => "Closed to Public",
            PoolStatus::SwimMeet => "Swim Meet",
            PoolStatus::ScheduleNotFound => "Schedule Not Found",
        }
    }

    /// Badge color.
    pub const fn color(self) -> StatusColor {
        match self {
            PoolStatus::Open => StatusColor::Green,
            PoolStatus::Restricted | PoolStatus::PracticeOnly | PoolStatus::SwimMeet => {
                StatusColor::Yellow
            }
            PoolStatus::Closed | PoolStatus::ClosedToPublic => StatusColor::Red,
            PoolStatus::ScheduleNotFound => StatusColor::Gray,
        }
    }

    /// Stable machine-readable name, e.g. `practice_only`.
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Status implied by a restriction's `type` field.
    pub fn from_restriction_type(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "practice" => PoolStatus::PracticeOnly,
            "meet" => PoolStatus::SwimMeet,
            "closed" => PoolStatus::ClosedToPublic,
            _ => PoolStatus::Restricted,
        }
    }
}

impl std::fmt::Display for PoolStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Serialized form of [`PoolStatus`].
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    status: &'static str,
    is_open: bool,
    label: &'static str,
    color: StatusColor,
}

impl From<PoolStatus> for StatusSummary {
    fn from(value: PoolStatus) -> Self {
        Self {
            status: value.code(),
            is_open: value.is_open(),
            label: value.label(),
            color: value.color(),
        }
    }
}
