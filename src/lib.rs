//! # pool-hours
//!
//! Resolves a pool's effective operating hours for any day from its
//! date-ranged weekly schedules and date-scoped overrides, and classifies
//! the pool's live status in Eastern Time.
//!
//! Data flows one way:
//! raw JSON ([`data::record`]) → period selection ([`algo::period`]) →
//! [`PoolSchedule`](algo::schedule::PoolSchedule) → override merging
//! ([`algo::merge`]) → the [`Pool`](data::pool::Pool) facade.

#![deny(
    clippy::undocumented_unsafe_blocks,
    clippy::missing_safety_doc,
    reason = "multi-person projects should document dangers"
)]
#![warn(missing_docs)]
#![cfg_attr(
    not(any(test, debug_assertions)),
    deny(
        clippy::missing_panics_doc,
        clippy::panic,
        clippy::unimplemented,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "prefer errors over panicking"
    )
)]
#![cfg_attr(
    not(any(test, debug_assertions)),
    forbid(clippy::todo, reason = "production code should not use `todo`")
)]

pub mod algo;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod data;

pub use catalog::{Catalog, CatalogError};
pub use clock::{Clock, EasternTime, FixedClock, SystemClock};
pub use config::Config;
pub use data::{pool::Pool, status::PoolStatus, time::TimeOfDay};
