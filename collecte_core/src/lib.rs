//! This crate holds the waste collection calendar of Pont-sur-Yonne: which bin (yellow
//! recycling or grey household waste) is picked up on which date, and the public holidays.
//!
//! Weeks and months are computed by [`period`], lookups go through [`service::CollecteService`]
//! over any [`store::CollectionStore`], and yearly schedules are seeded from TOML files by
//! [`schedule`].

pub use chrono;
pub use ical;

pub mod ical_export;
pub mod model;
pub mod period;
pub mod schedule;
pub mod service;
pub mod store;
