use super::projection::{ScreenPoint, Viewport};
use crate::scale::StationMarker;
use serde::Serialize;

/// A marker placed on screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCircle {
    pub id: String,
    pub position: ScreenPoint,
    pub radius: f64,
    pub color: String,
    pub visible: bool,
}

/// The station circles currently drawn. Markers change when the time filter
/// changes; positions are recomputed on every viewport change.
#[derive(Debug, Clone, Default)]
pub struct CircleLayer {
    markers: Vec<StationMarker>,
}

impl CircleLayer {
    pub fn new(markers: Vec<StationMarker>) -> Self {
        Self { markers }
    }

    pub fn markers(&self) -> &[StationMarker] {
        &self.markers
    }

    pub fn replace(&mut self, markers: Vec<StationMarker>) {
        self.markers = markers;
    }

    /// Projects every marker into `viewport`, in marker order.
    pub fn place(&self, viewport: &Viewport) -> Vec<PlacedCircle> {
        self.markers
            .iter()
            .map(|m| {
                let position = viewport.project(m.coordinates);
                PlacedCircle {
                    id: m.id.clone(),
                    position,
                    radius: m.radius,
                    color: m.color.clone(),
                    visible: viewport.contains(position) && m.radius > 0.0,
                }
            })
            .collect()
    }
}
