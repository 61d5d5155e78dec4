use crate::model::{StationTraffic, Trip};
use chrono::Timelike;
use serde::Serialize;

/// Trips per hour of day, bucketed once by start time and once by end time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyProfile {
    pub departures: [u64; 24],
    pub arrivals: [u64; 24],
}

impl HourlyProfile {
    pub fn from_trips<'a, I>(trips: I) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut departures = [0u64; 24];
        let mut arrivals = [0u64; 24];

        for trip in trips {
            departures[trip.started_at.hour() as usize] += 1;
            arrivals[trip.ended_at.hour() as usize] += 1;
        }

        Self {
            departures,
            arrivals,
        }
    }

    /// Hour with the most departures; the earliest wins a tie.
    pub fn peak_departure_hour(&self) -> Option<usize> {
        peak(&self.departures)
    }

    pub fn peak_arrival_hour(&self) -> Option<usize> {
        peak(&self.arrivals)
    }
}

fn peak(buckets: &[u64; 24]) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (hour, &count) in buckets.iter().enumerate() {
        if count == 0 {
            continue;
        }
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((hour, count));
        }
    }
    best.map(|(hour, _)| hour)
}

/// Network-wide totals for one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub stations: usize,
    pub trips: usize,
    pub active_stations: usize,
    pub max_traffic: u64,
    pub mean_traffic: f64,
    pub stddev_traffic: f64,
}

impl TrafficSummary {
    pub fn new(traffic: &[StationTraffic], trips: usize) -> Self {
        let totals: Vec<f64> = traffic.iter().map(|t| t.total_traffic as f64).collect();
        let mean = mean(&totals);

        Self {
            stations: traffic.len(),
            trips,
            active_stations: traffic.iter().filter(|t| t.total_traffic > 0).count(),
            max_traffic: traffic.iter().map(|t| t.total_traffic).max().unwrap_or(0),
            mean_traffic: mean,
            stddev_traffic: stddev(&totals, mean),
        }
    }
}

/// Arithmetic mean, 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a pre-computed mean.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
