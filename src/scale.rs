//! Visual encodings for station traffic: circle radius and departure flow.

use crate::model::{Coordinates, StationTraffic};
use crate::traffic::{TimeFilter, max_traffic};
use clap::ValueEnum;
use serde::Serialize;

/// Radius range while no time filter is active.
pub const UNFILTERED_RADIUS: (f64, f64) = (0.0, 25.0);

/// Radius range while a time filter is active.
pub const FILTERED_RADIUS: (f64, f64) = (3.0, 50.0);

/// Colour used when every trip at a station is a departure.
pub const DEPARTURE_COLOR: &str = "steelblue";

/// Colour used when every trip at a station is an arrival.
pub const ARRIVAL_COLOR: &str = "darkorange";

/// Picks the radius range for the current filter.
pub fn radius_range(filter: TimeFilter) -> (f64, f64) {
    if filter.is_active() {
        FILTERED_RADIUS
    } else {
        UNFILTERED_RADIUS
    }
}

/// How traffic maps onto the radius range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RadiusCurve {
    /// Circle area proportional to traffic.
    #[default]
    Sqrt,
    Linear,
}

/// Maps `[0, max_traffic]` onto a radius range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    max_traffic: u64,
    range: (f64, f64),
    curve: RadiusCurve,
}

impl RadiusScale {
    pub fn new(max_traffic: u64, range: (f64, f64), curve: RadiusCurve) -> Self {
        Self {
            max_traffic,
            range,
            curve,
        }
    }

    pub fn for_traffic(traffic: &[StationTraffic], filter: TimeFilter, curve: RadiusCurve) -> Self {
        Self::new(max_traffic(traffic), radius_range(filter), curve)
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Radius for a traffic count. An all-zero pass maps to the range
    /// minimum; counts above the domain are clamped to the maximum.
    pub fn radius(&self, total_traffic: u64) -> f64 {
        let (lo, hi) = self.range;
        if self.max_traffic == 0 {
            return lo;
        }

        let t = (total_traffic.min(self.max_traffic)) as f64 / self.max_traffic as f64;
        let t = match self.curve {
            RadiusCurve::Sqrt => t.sqrt(),
            RadiusCurve::Linear => t,
        };
        lo + (hi - lo) * t
    }
}

/// Share of a station's traffic that left from it, in `[0, 1]`.
/// A station without traffic is balanced at 0.5.
pub fn departure_ratio(departures: u64, total_traffic: u64) -> f64 {
    if total_traffic == 0 {
        return 0.5;
    }
    (departures as f64 / total_traffic as f64).clamp(0.0, 1.0)
}

/// Quantizes a departure ratio into three equal-width buckets over `[0, 1]`.
///
/// | Ratio          | Flow |
/// |----------------|------|
/// | < 1/3          | 0    |
/// | [1/3, 2/3)     | 0.5  |
/// | >= 2/3         | 1    |
pub fn flow_bucket(ratio: f64) -> f64 {
    match ratio {
        r if r < 1.0 / 3.0 => 0.0,
        r if r < 2.0 / 3.0 => 0.5,
        _ => 1.0,
    }
}

/// CSS colour for a flow bucket, mixing departures over arrivals.
pub fn flow_color(flow: f64) -> String {
    format!(
        "color-mix(in oklch, {DEPARTURE_COLOR} calc(100% * {flow}), {ARRIVAL_COLOR})"
    )
}

/// Everything the render layer needs to draw one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationMarker {
    pub id: String,
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub arrivals: u64,
    pub departures: u64,
    pub total_traffic: u64,
    pub radius: f64,
    pub departure_ratio: f64,
    pub flow: f64,
    pub color: String,
}

/// Builds one marker per station of an aggregation pass, in the same order.
pub fn markers(traffic: &[StationTraffic], scale: &RadiusScale) -> Vec<StationMarker> {
    traffic
        .iter()
        .map(|t| {
            let ratio = departure_ratio(t.departures, t.total_traffic);
            let flow = flow_bucket(ratio);
            StationMarker {
                id: t.station.id.clone(),
                name: t.station.name.clone(),
                coordinates: t.station.coordinates,
                arrivals: t.arrivals,
                departures: t.departures,
                total_traffic: t.total_traffic,
                radius: scale.radius(t.total_traffic),
                departure_ratio: ratio,
                flow,
                color: flow_color(flow),
            }
        })
        .collect()
}
