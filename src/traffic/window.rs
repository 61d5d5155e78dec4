use crate::model::Trip;
use anyhow::{Result, bail};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;
use std::fmt;

/// Minutes in a day; valid minute-of-day values are `0..MINUTES_PER_DAY`.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Default half-width of the time window.
pub const DEFAULT_TOLERANCE_MINUTES: u32 = 60;

/// A minute of the day in `0..MINUTES_PER_DAY`. Only [`MinuteOfDay::new`]
/// builds one, so a held value is always in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MinuteOfDay(u32);

impl MinuteOfDay {
    pub fn new(minute: u32) -> Result<Self> {
        if minute >= MINUTES_PER_DAY {
            bail!("minute of day {minute} is outside 0..={}", MINUTES_PER_DAY - 1);
        }
        Ok(Self(minute))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn hour(self) -> u32 {
        self.0 / 60
    }

    pub fn minute(self) -> u32 {
        self.0 % 60
    }

    /// Wall-clock time of this minute.
    pub fn to_time(self) -> NaiveTime {
        NaiveTime::MIN + TimeDelta::minutes(i64::from(self.0))
    }
}

impl From<&NaiveTime> for MinuteOfDay {
    fn from(t: &NaiveTime) -> Self {
        Self(minute_of_time(t))
    }
}

impl fmt::Display for MinuteOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Which trips take part in an aggregation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    /// Every trip counts.
    #[default]
    Any,
    /// Trips whose start or end minute-of-day is near this minute.
    At(MinuteOfDay),
}

impl TimeFilter {
    /// Builds a filter for a concrete minute-of-day, rejecting values
    /// outside `[0, 1439]`.
    pub fn at(minute: u32) -> Result<Self> {
        MinuteOfDay::new(minute).map(Self::At)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::At(_))
    }

    pub fn minute(&self) -> Option<u32> {
        match self {
            Self::Any => None,
            Self::At(m) => Some(m.get()),
        }
    }
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::At(m) => m.fmt(f),
        }
    }
}

/// Minutes since midnight of a timestamp. Date and seconds are dropped.
pub fn minute_of_day(ts: &NaiveDateTime) -> u32 {
    ts.hour() * 60 + ts.minute()
}

/// Minutes since midnight of a wall-clock time.
pub fn minute_of_time(t: &NaiveTime) -> u32 {
    t.hour() * 60 + t.minute()
}

/// Selects the trips active around the filter's minute.
///
/// With [`TimeFilter::Any`] every trip is returned in input order. Otherwise
/// a trip is kept when its start or end minute-of-day lies within
/// `tolerance_minutes` of the centre, bounds included. Distances are taken
/// within a single day: 23:50 and 00:05 are 1425 minutes apart.
pub fn filter_by_time(trips: &[Trip], filter: TimeFilter, tolerance_minutes: u32) -> Vec<&Trip> {
    let center = match filter {
        TimeFilter::Any => return trips.iter().collect(),
        TimeFilter::At(center) => center.get(),
    };

    let within = |ts: &NaiveDateTime| minute_of_day(ts).abs_diff(center) <= tolerance_minutes;

    trips
        .iter()
        .filter(|trip| within(&trip.started_at) || within(&trip.ended_at))
        .collect()
}
