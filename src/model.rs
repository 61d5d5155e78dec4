//! Core records shared by the loaders, the traffic aggregator and the
//! render layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in degrees (WGS 84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinates {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Returns `true` when both components are finite and inside the
    /// geographic ranges.
    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }
}

/// A bike-share dock as loaded from the station document.
///
/// Coordinates are optional: a record whose position is missing or
/// unparseable still loads, and the render layer places it off-screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: Option<String>,
    pub coordinates: Option<Coordinates>,
}

/// One rental, from the trip CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

/// A station annotated with the counts of one aggregation pass.
///
/// Always built through [`StationTraffic::new`] so that `total_traffic`
/// equals `arrivals + departures`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTraffic {
    #[serde(flatten)]
    pub station: Station,
    pub arrivals: u64,
    pub departures: u64,
    pub total_traffic: u64,
}

impl StationTraffic {
    pub fn new(station: Station, arrivals: u64, departures: u64) -> Self {
        Self {
            station,
            arrivals,
            departures,
            total_traffic: arrivals + departures,
        }
    }

    pub fn id(&self) -> &str {
        &self.station.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_traffic_is_sum() {
        let station = Station {
            id: "A32000".to_string(),
            name: None,
            coordinates: None,
        };
        let traffic = StationTraffic::new(station, 4, 7);
        assert_eq!(traffic.total_traffic, 11);
        assert_eq!(traffic.id(), "A32000");
    }

    #[test]
    fn test_coordinates_validity() {
        assert!(Coordinates::new(-71.09, 42.36).is_valid());
        assert!(!Coordinates::new(f64::NAN, 42.36).is_valid());
        assert!(!Coordinates::new(-71.09, 91.0).is_valid());
        assert!(!Coordinates::new(200.0, 0.0).is_valid());
    }
}
