use crate::model::Coordinates;
use serde::Serialize;
use std::f64::consts::PI;

/// World width in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the Web-Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Where stations without a usable position are drawn.
pub const OFFSCREEN: ScreenPoint = ScreenPoint {
    x: -9999.0,
    y: -9999.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// The visible part of the map: centre, zoom level and pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Coordinates,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Screen position of a coordinate. Missing or out-of-range coordinates
    /// land on [`OFFSCREEN`].
    pub fn project(&self, coordinates: Option<Coordinates>) -> ScreenPoint {
        let Some(c) = coordinates.filter(|c| c.is_valid() && c.lat.abs() <= MAX_LATITUDE) else {
            return OFFSCREEN;
        };

        let world = self.world_size();
        let (x, y) = mercator(c);
        let (cx, cy) = mercator(self.center);

        ScreenPoint {
            x: (x - cx) * world + self.width / 2.0,
            y: (y - cy) * world + self.height / 2.0,
        }
    }

    /// Coordinate under a screen position.
    pub fn unproject(&self, point: ScreenPoint) -> Coordinates {
        let world = self.world_size();
        let (cx, cy) = mercator(self.center);
        let x = cx + (point.x - self.width / 2.0) / world;
        let y = cy + (point.y - self.height / 2.0) / world;

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        Coordinates::new(lon, lat.clamp(-MAX_LATITUDE, MAX_LATITUDE))
    }

    pub fn contains(&self, point: ScreenPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

/// Normalized Web-Mercator position, both axes in `[0, 1]`, y pointing south.
fn mercator(c: Coordinates) -> (f64, f64) {
    let x = (c.lon + 180.0) / 360.0;
    let phi = c.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y = (1.0 - (PI / 4.0 + phi / 2.0).tan().ln() / PI) / 2.0;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boston() -> Viewport {
        Viewport::new(Coordinates::new(-71.09415, 42.36027), 12.0, 800.0, 600.0)
    }

    #[test]
    fn test_center_projects_to_middle() {
        let view = boston();
        let p = view.project(Some(view.center));
        assert!((p.x - 400.0).abs() < 1e-6);
        assert!((p.y - 300.0).abs() < 1e-6);
        assert!(view.contains(p));
    }

    #[test]
    fn test_east_is_right_and_north_is_up() {
        let view = boston();
        let east = view.project(Some(Coordinates::new(-71.08, 42.36027)));
        let north = view.project(Some(Coordinates::new(-71.09415, 42.37)));
        assert!(east.x > 400.0);
        assert!(north.y < 300.0);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let view = boston();
        let c = Coordinates::new(-71.1, 42.35);
        let back = view.unproject(view.project(Some(c)));
        assert!((back.lon - c.lon).abs() < 1e-9);
        assert!((back.lat - c.lat).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_coordinates_go_offscreen() {
        let view = boston();
        assert_eq!(view.project(None), OFFSCREEN);
        assert_eq!(view.project(Some(Coordinates::new(f64::NAN, 42.0))), OFFSCREEN);
        assert_eq!(view.project(Some(Coordinates::new(0.0, 89.0))), OFFSCREEN);
        assert!(!view.contains(OFFSCREEN));
    }

    #[test]
    fn test_zoom_doubles_distances() {
        let near = boston();
        let mut far = near;
        far.zoom += 1.0;
        let c = Some(Coordinates::new(-71.08, 42.36027));

        let dx_near = near.project(c).x - 400.0;
        let dx_far = far.project(c).x - 400.0;
        assert!((dx_far - 2.0 * dx_near).abs() < 1e-6);
    }
}
