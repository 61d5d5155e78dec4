use crate::model::{Coordinates, Station};
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Accepted spellings for each station field, tried in order.
const LONGITUDE_KEYS: &[&str] = &["lon", "Lon", "LON", "longitude", "Longitude", "lng", "Long"];
const LATITUDE_KEYS: &[&str] = &["lat", "Lat", "LAT", "latitude", "Latitude"];
const ID_KEYS: &[&str] = &["short_name", "Number"];
const NAME_KEYS: &[&str] = &["name", "NAME", "Name"];

/// Parses the station document (`{"data": {"stations": [...]}}`).
///
/// Records without an identifier are dropped. A repeated identifier keeps
/// the first record. Missing or unparseable coordinates leave
/// `coordinates` empty rather than failing the load.
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let doc: Value = serde_json::from_slice(bytes).context("station document is not valid JSON")?;
    let records = doc
        .pointer("/data/stations")
        .and_then(Value::as_array)
        .context("station document has no data.stations array")?;

    let mut seen = HashSet::new();
    let mut stations = Vec::with_capacity(records.len());
    let mut without_id = 0usize;
    let mut without_coordinates = 0usize;

    for record in records {
        let Some(fields) = record.as_object() else {
            without_id += 1;
            continue;
        };

        let Some(station) = normalize(fields) else {
            without_id += 1;
            continue;
        };

        if !seen.insert(station.id.clone()) {
            warn!(station_id = %station.id, "Duplicate station id, keeping the first record");
            continue;
        }

        if station.coordinates.is_none() {
            debug!(station_id = %station.id, "Station has no usable coordinates");
            without_coordinates += 1;
        }

        stations.push(station);
    }

    if without_id > 0 {
        warn!(count = without_id, "Dropped station records without an identifier");
    }
    if without_coordinates > 0 {
        warn!(count = without_coordinates, "Stations without coordinates will render off-screen");
    }

    Ok(stations)
}

/// Resolves every aliased field of one record.
fn normalize(fields: &Map<String, Value>) -> Option<Station> {
    let id = lookup(fields, ID_KEYS).and_then(as_text)?;

    let lon = lookup(fields, LONGITUDE_KEYS).and_then(as_number);
    let lat = lookup(fields, LATITUDE_KEYS).and_then(as_number);
    let coordinates = match (lon, lat) {
        (Some(lon), Some(lat)) => Some(Coordinates::new(lon, lat)).filter(Coordinates::is_valid),
        _ => None,
    };

    Some(Station {
        id,
        name: lookup(fields, NAME_KEYS).and_then(as_text),
        coordinates,
    })
}

/// First alias present with a non-null value.
fn lookup<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| fields.get(*key))
        .find(|v| !v.is_null())
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliased_fields() {
        let doc = br#"{"data": {"stations": [
            {"short_name": "A32000", "name": "Fan Pier", "lon": -71.04, "lat": 42.35},
            {"Number": "M32006", "NAME": "MIT", "Longitude": "-71.09", "Latitude": "42.36"},
            {"short_name": "B1", "Long": -71.1, "LAT": 42.3}
        ]}}"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations.len(), 3);
        assert_eq!(stations[0].id, "A32000");
        assert_eq!(stations[0].name.as_deref(), Some("Fan Pier"));
        assert_eq!(stations[0].coordinates, Some(Coordinates::new(-71.04, 42.35)));
        assert_eq!(stations[1].id, "M32006");
        assert_eq!(stations[1].name.as_deref(), Some("MIT"));
        assert_eq!(stations[1].coordinates, Some(Coordinates::new(-71.09, 42.36)));
        assert_eq!(stations[2].coordinates, Some(Coordinates::new(-71.1, 42.3)));
    }

    #[test]
    fn test_short_name_wins_over_number() {
        let doc = br#"{"data": {"stations": [
            {"short_name": "A1", "Number": "99", "lon": 0, "lat": 0}
        ]}}"#;
        assert_eq!(parse_stations(doc).unwrap()[0].id, "A1");
    }

    #[test]
    fn test_bad_coordinates_are_not_fatal() {
        let doc = br#"{"data": {"stations": [
            {"short_name": "A1", "lon": "n/a", "lat": 42.3},
            {"short_name": "A2"},
            {"short_name": "A3", "lon": -71.0, "lat": 123.0}
        ]}}"#;

        let stations = parse_stations(doc).unwrap();

        assert_eq!(stations.len(), 3);
        assert!(stations.iter().all(|s| s.coordinates.is_none()));
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        let doc = br#"{"data": {"stations": [
            {"name": "nameless", "lon": 0, "lat": 0},
            {"short_name": "", "lon": 0, "lat": 0},
            "garbage",
            {"Number": 7, "lon": 0, "lat": 0}
        ]}}"#;

        let stations = parse_stations(doc).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].id, "7");
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let doc = br#"{"data": {"stations": [
            {"short_name": "A1", "name": "first"},
            {"short_name": "A1", "name": "second"}
        ]}}"#;

        let stations = parse_stations(doc).unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name.as_deref(), Some("first"));
    }

    #[test]
    fn test_missing_stations_array() {
        assert!(parse_stations(br#"{"data": {}}"#).is_err());
        assert!(parse_stations(b"not json").is_err());
    }
}
