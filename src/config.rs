//! Dataset locations.
//!
//! Each source is an `http(s)` URL or a local path. Defaults point at the
//! published Boston-area datasets; `STATIONS_URL`, `TRIPS_URL` and
//! `BIKE_LANES_URLS` (comma-separated) override them, and CLI flags
//! override the environment.

use std::time::Duration;

pub const DEFAULT_STATIONS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-stations.json";
pub const DEFAULT_TRIPS_URL: &str = "https://dsc106.com/labs/lab07/data/bluebikes-traffic-2024-03.csv";
pub const DEFAULT_LANE_URLS: [&str; 2] = [
    "https://bostonopendata-boston.opendata.arcgis.com/datasets/boston::existing-bike-network-2022.geojson",
    "https://raw.githubusercontent.com/cambridgegis/cambridgegis_data/main/Recreation/Bike_Facilities/RECREATION_BikeFacilities.geojson",
];

/// Timeout for each dataset download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetConfig {
    pub stations: String,
    pub trips: String,
    pub lanes: Vec<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            stations: DEFAULT_STATIONS_URL.to_string(),
            trips: DEFAULT_TRIPS_URL.to_string(),
            lanes: DEFAULT_LANE_URLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl DatasetConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("STATIONS_URL").filter(|v| !v.trim().is_empty()) {
            config.stations = url.trim().to_string();
        }
        if let Some(url) = lookup("TRIPS_URL").filter(|v| !v.trim().is_empty()) {
            config.trips = url.trim().to_string();
        }
        if let Some(urls) = lookup("BIKE_LANES_URLS") {
            config.lanes = split_list(&urls);
        }

        config
    }

    /// Applies explicit overrides, e.g. from the command line.
    pub fn with_overrides(
        mut self,
        stations: Option<String>,
        trips: Option<String>,
        lanes: Vec<String>,
    ) -> Self {
        if let Some(stations) = stations {
            self.stations = stations;
        }
        if let Some(trips) = trips {
            self.trips = trips;
        }
        if !lanes.is_empty() {
            self.lanes = lanes;
        }
        self
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = DatasetConfig::from_lookup(|_| None);
        assert_eq!(config.stations, DEFAULT_STATIONS_URL);
        assert_eq!(config.trips, DEFAULT_TRIPS_URL);
        assert_eq!(config.lanes.len(), 2);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("STATIONS_URL", "data/stations.json"),
            ("TRIPS_URL", "  "),
            ("BIKE_LANES_URLS", "a.geojson, b.geojson,,"),
        ]
        .into_iter()
        .collect();

        let config = DatasetConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.stations, "data/stations.json");
        assert_eq!(config.trips, DEFAULT_TRIPS_URL);
        assert_eq!(config.lanes, vec!["a.geojson", "b.geojson"]);
    }

    #[test]
    fn test_cli_overrides_win() {
        let config = DatasetConfig::default().with_overrides(
            None,
            Some("trips.csv.gz".to_string()),
            vec!["lanes.geojson".to_string()],
        );

        assert_eq!(config.stations, DEFAULT_STATIONS_URL);
        assert_eq!(config.trips, "trips.csv.gz");
        assert_eq!(config.lanes, vec!["lanes.geojson"]);
    }
}
