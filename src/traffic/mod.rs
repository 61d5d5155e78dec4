//! Station traffic aggregation and time-of-day filtering.
//!
//! Everything here is a pure function of stations, trips and a
//! [`TimeFilter`]; nothing in this module knows about loading, scaling or
//! the map viewport.

pub mod aggregate;
pub mod profile;
pub mod window;

pub use aggregate::{aggregate, busiest, max_traffic};
pub use profile::{HourlyProfile, TrafficSummary};
pub use window::{DEFAULT_TOLERANCE_MINUTES, MinuteOfDay, TimeFilter, filter_by_time, minute_of_day};
