use anyhow::{Context, Result};
use geo::{Coord, HaversineLength, LineString, MultiLineString};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<Vec<f64>> },
    MultiLineString { coordinates: Vec<Vec<Vec<f64>>> },
    #[serde(other)]
    Unsupported,
}

/// One bike-lane overlay: every line of every usable feature.
#[derive(Debug, Clone)]
pub struct BikeLaneLayer {
    pub source: String,
    pub lines: MultiLineString<f64>,
    pub features: usize,
    /// Features without a line geometry.
    pub ignored: usize,
}

/// Headline numbers of a lane layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaneStats {
    pub source: String,
    pub features: usize,
    pub ignored: usize,
    pub segments: usize,
    pub length_km: f64,
}

impl BikeLaneLayer {
    pub fn length_km(&self) -> f64 {
        self.lines.haversine_length() / 1000.0
    }

    pub fn stats(&self) -> LaneStats {
        LaneStats {
            source: self.source.clone(),
            features: self.features,
            ignored: self.ignored,
            segments: self.lines.0.len(),
            length_km: self.length_km(),
        }
    }
}

/// Parses a GeoJSON feature collection of `LineString`/`MultiLineString`
/// features. Other geometry types, and positions with fewer than two
/// components, are ignored.
pub fn parse_lanes(source: &str, bytes: &[u8]) -> Result<BikeLaneLayer> {
    let collection: FeatureCollection = serde_json::from_slice(bytes)
        .with_context(|| format!("{source} is not a GeoJSON feature collection"))?;

    let mut lines = Vec::new();
    let mut features = 0;
    let mut ignored = 0;

    for feature in collection.features {
        let parts = match feature.geometry {
            Some(Geometry::LineString { coordinates }) => vec![coordinates],
            Some(Geometry::MultiLineString { coordinates }) => coordinates,
            Some(Geometry::Unsupported) | None => {
                ignored += 1;
                continue;
            }
        };

        features += 1;
        lines.extend(parts.into_iter().filter_map(to_line));
    }

    debug!(source, features, ignored, "Parsed bike lane layer");

    Ok(BikeLaneLayer {
        source: source.to_string(),
        lines: MultiLineString::new(lines),
        features,
        ignored,
    })
}

fn to_line(positions: Vec<Vec<f64>>) -> Option<LineString<f64>> {
    let coords: Vec<Coord<f64>> = positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect();

    (coords.len() >= 2).then(|| LineString::new(coords))
}
