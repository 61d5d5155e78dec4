//! Screen placement of station circles and bike-lane styling.
//!
//! The render layer only knows about markers and viewports. It is handed
//! new markers when the time filter changes and re-projects them whenever
//! the [`MapView`] reports a pan, zoom or resize.

pub mod layer;
pub mod projection;
pub mod view;

pub use layer::{CircleLayer, PlacedCircle};
pub use projection::{OFFSCREEN, ScreenPoint, Viewport};
pub use view::{MapView, SubscriptionId};

use serde::Serialize;

/// Stroke used for a bike-lane overlay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaneStyle {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

/// Both lane layers share this style.
pub const BIKE_LANE_STYLE: LaneStyle = LaneStyle {
    color: "#32D400",
    width: 3.0,
    opacity: 0.6,
};
