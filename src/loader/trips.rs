use crate::model::Trip;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, warn};

/// Naive timestamp layouts tried in order after RFC 3339.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// The columns of a trip row this crate reads; any others are ignored.
#[derive(Debug, Deserialize)]
struct TripRow {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

/// Result of reading a trip CSV.
#[derive(Debug, Default)]
pub struct TripLoad {
    pub trips: Vec<Trip>,
    /// Rows dropped because a timestamp matched no known layout.
    pub skipped: usize,
}

/// Reads trip rows from CSV.
///
/// Structural CSV errors (missing columns, ragged rows) fail the load. Rows
/// with unparseable timestamps are skipped and counted.
pub fn parse_trips<R: Read>(reader: R) -> Result<TripLoad> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut load = TripLoad::default();

    for (line, result) in rdr.deserialize().enumerate() {
        let row: TripRow = result.with_context(|| format!("malformed trip row {}", line + 1))?;

        match (parse_timestamp(&row.started_at), parse_timestamp(&row.ended_at)) {
            (Some(started_at), Some(ended_at)) => load.trips.push(Trip {
                start_station_id: row.start_station_id,
                end_station_id: row.end_station_id,
                started_at,
                ended_at,
            }),
            _ => {
                debug!(
                    row = line + 1,
                    started_at = %row.started_at,
                    ended_at = %row.ended_at,
                    "Unparseable trip timestamps"
                );
                load.skipped += 1;
            }
        }
    }

    if load.skipped > 0 {
        warn!(skipped = load.skipped, "Skipped trip rows with unparseable timestamps");
    }

    Ok(load)
}

/// Parses a trip timestamp into local wall-clock time.
///
/// RFC 3339 values keep their written wall-clock time; the offset is
/// dropped so minute-of-day matches what the feed printed.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
