//! Output formatting and persistence for station markers.
//!
//! Supports pretty-printing, JSON, CSV and a GeoJSON point layer a map
//! front-end can load directly.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

use crate::scale::StationMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
    Geojson,
}

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One CSV row per marker; coordinates are split into columns.
#[derive(Debug, Serialize)]
struct MarkerRow<'a> {
    id: &'a str,
    name: Option<&'a str>,
    lon: Option<f64>,
    lat: Option<f64>,
    arrivals: u64,
    departures: u64,
    total_traffic: u64,
    radius: f64,
    departure_ratio: f64,
    flow: f64,
}

impl<'a> From<&'a StationMarker> for MarkerRow<'a> {
    fn from(m: &'a StationMarker) -> Self {
        Self {
            id: &m.id,
            name: m.name.as_deref(),
            lon: m.coordinates.map(|c| c.lon),
            lat: m.coordinates.map(|c| c.lat),
            arrivals: m.arrivals,
            departures: m.departures,
            total_traffic: m.total_traffic,
            radius: m.radius,
            departure_ratio: m.departure_ratio,
            flow: m.flow,
        }
    }
}

/// Writes markers as CSV with a header row, replacing any existing file.
pub fn write_csv(path: &str, markers: &[StationMarker]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
    let mut writer = csv::Writer::from_writer(file);

    for marker in markers {
        writer.serialize(MarkerRow::from(marker))?;
    }
    writer.flush()?;

    debug!(path, rows = markers.len(), "CSV written");
    Ok(())
}

/// Builds a GeoJSON `FeatureCollection` of station points. Stations without
/// coordinates get a `null` geometry so their counts are not lost.
pub fn to_geojson(markers: &[StationMarker]) -> Value {
    let features: Vec<Value> = markers
        .iter()
        .map(|m| {
            let geometry = match m.coordinates {
                Some(c) => json!({ "type": "Point", "coordinates": [c.lon, c.lat] }),
                None => Value::Null,
            };
            json!({
                "type": "Feature",
                "id": m.id,
                "geometry": geometry,
                "properties": {
                    "name": m.name,
                    "arrivals": m.arrivals,
                    "departures": m.departures,
                    "totalTraffic": m.total_traffic,
                    "radius": m.radius,
                    "departureRatio": m.departure_ratio,
                    "flow": m.flow,
                    "color": m.color,
                },
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}

/// Serializes `value` as pretty JSON into `path`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("cannot create {path}"))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Writes markers to `path` in the requested format, creating parent
/// directories as needed.
pub fn export(path: &str, format: ExportFormat, markers: &[StationMarker]) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    match format {
        ExportFormat::Json => write_json(path, &markers)?,
        ExportFormat::Csv => write_csv(path, markers)?,
        ExportFormat::Geojson => write_json(path, &to_geojson(markers))?,
    }

    info!(path, format = ?format, stations = markers.len(), "Export written");
    Ok(())
}
