//! Pool data: times, slots, statuses, raw records and the [`Pool`](pool::Pool) facade.

pub mod pool;
pub mod record;
pub mod slot;
pub mod status;
pub mod time;

pub use pool::*;
pub use record::*;
pub use slot::*;
pub use status::*;
pub use time::*;

/// Create a [`TimeOfDay`](time::TimeOfDay) literal.
///
/// Expects `h:mm AM` or `h:mm PM`.
#[macro_export]
macro_rules! time {
    (@pm AM) => {
        false
    };
    (@pm PM) => {
        true
    };
    ($hr:literal:$m:literal $meridiem:ident) => {
        $crate::data::time::TimeOfDay::from_hm12($hr, $m, $crate::time!(@pm $meridiem))
            .unwrap_or_else(|| {
                panic!(
                    "`{}:{} {}` is not a valid time",
                    $hr,
                    $m,
                    stringify!($meridiem),
                )
            })
    };
}

/// Create a [`TimeInterval`](slot::TimeInterval) literal.
///
/// Expects `h:mm AM - h:mm PM` format.
#[macro_export]
macro_rules! time_interval {
    ($hr0:literal:$m0:literal $ap0:ident - $hr1:literal:$m1:literal $ap1:ident) => {
        $crate::data::slot::TimeInterval::new(
            $crate::time!($hr0:$m0 $ap0),
            $crate::time!($hr1:$m1 $ap1),
        )
        .unwrap_or_else(|| {
            panic!(
                "`{}:{} {} - {}:{} {}` is not a forward interval",
                $hr0,
                $m0,
                stringify!($ap0),
                $hr1,
                $m1,
                stringify!($ap1),
            )
        })
    };
}

/// Create a regular [`DaySlot`](slot::DaySlot) for testing.
///
/// Expects `h:mm AM - h:mm PM`, optionally followed by `;` and activity labels.
#[macro_export]
macro_rules! slot {
    ($hr0:literal:$m0:literal $ap0:ident - $hr1:literal:$m1:literal $ap1:ident $(; $($act:literal),* $(,)?)?) => {
        $crate::data::slot::DaySlot::regular(
            $crate::time_interval!($hr0:$m0 $ap0 - $hr1:$m1 $ap1),
            <$crate::data::slot::Activities as ::std::iter::FromIterator<String>>::from_iter([
                $($($act.to_string()),*)?
            ]),
        )
    };
}
