//! Dataset loading: stations, trips and bike-lane overlays.
//!
//! A source is fetched over HTTP when it starts with `http`, read from disk
//! otherwise, and gunzipped when its path ends in `.gz`.

pub mod lanes;
pub mod stations;
pub mod trips;

pub use lanes::{BikeLaneLayer, LaneStats, parse_lanes};
pub use stations::parse_stations;
pub use trips::{TripLoad, parse_timestamp, parse_trips};

use crate::config::DatasetConfig;
use crate::fetch::{HttpClient, fetch_bytes};
use crate::model::{Station, Trip};
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use futures::future::join_all;
use std::io::Read;
use tracing::{info, warn};

/// Everything the map needs, loaded once and then read-only.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub stations: Vec<Station>,
    pub trips: Vec<Trip>,
    pub lanes: Vec<BikeLaneLayer>,
}

/// Reads a source into memory.
pub async fn read_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("failed to fetch {source}"))?
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("failed to read {source}"))?
    };

    if is_gzip(source) {
        return gunzip(&bytes).with_context(|| format!("failed to decompress {source}"));
    }
    Ok(bytes)
}

fn is_gzip(source: &str) -> bool {
    let path = source.split(['?', '#']).next().unwrap_or(source);
    path.ends_with(".gz")
}

fn gunzip(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    GzDecoder::new(bytes).read_to_end(&mut out)?;
    Ok(out)
}

#[tracing::instrument(skip(client))]
pub async fn load_stations<C: HttpClient>(client: &C, source: &str) -> Result<Vec<Station>> {
    let bytes = read_source(client, source).await?;
    let stations = parse_stations(&bytes).with_context(|| format!("in {source}"))?;
    info!(stations = stations.len(), "Stations loaded");
    Ok(stations)
}

#[tracing::instrument(skip(client))]
pub async fn load_trips<C: HttpClient>(client: &C, source: &str) -> Result<Vec<Trip>> {
    let bytes = read_source(client, source).await?;
    let load = parse_trips(bytes.as_slice()).with_context(|| format!("in {source}"))?;
    info!(trips = load.trips.len(), skipped = load.skipped, "Trips loaded");
    Ok(load.trips)
}

/// Loads one lane layer. Lanes are decoration, so a failure is logged and
/// the layer left out instead of failing the whole load.
#[tracing::instrument(skip(client))]
pub async fn load_lanes<C: HttpClient>(client: &C, source: &str) -> Option<BikeLaneLayer> {
    let result = async {
        let bytes = read_source(client, source).await?;
        parse_lanes(source, &bytes)
    }
    .await;

    match result {
        Ok(layer) => {
            info!(features = layer.features, "Bike lanes loaded");
            Some(layer)
        }
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Bike lane layer unavailable");
            None
        }
    }
}

/// Loads stations, trips and lanes concurrently. Fails if stations or trips
/// cannot be loaded.
pub async fn load_dataset<C: HttpClient>(client: &C, config: &DatasetConfig) -> Result<Dataset> {
    let lanes = async {
        let layers = join_all(config.lanes.iter().map(|source| load_lanes(client, source))).await;
        Ok::<_, anyhow::Error>(layers.into_iter().flatten().collect::<Vec<_>>())
    };

    let (stations, trips, lanes) = tokio::try_join!(
        load_stations(client, &config.stations),
        load_trips(client, &config.trips),
        lanes,
    )?;

    Ok(Dataset {
        stations,
        trips,
        lanes,
    })
}
