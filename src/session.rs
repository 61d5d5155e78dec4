//! The interactive map state: loaded data, the current time filter and the
//! circles derived from them.
//!
//! A filter change re-runs filter → aggregate → scale and replaces the
//! circle layer. A viewport change only re-projects the existing circles.
//! Only the latest filter is kept.

use crate::model::{Station, StationTraffic, Trip};
use crate::render::{CircleLayer, MapView, PlacedCircle, SubscriptionId, Viewport};
use crate::scale::{RadiusCurve, RadiusScale, StationMarker, markers};
use crate::slider::{format_label, from_slider, to_slider};
use crate::traffic::{TimeFilter, aggregate, filter_by_time};
use anyhow::Result;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

pub struct TrafficMap {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    tolerance_minutes: u32,
    curve: RadiusCurve,
    filter: TimeFilter,
    active_trips: usize,
    traffic: Vec<StationTraffic>,
    scale: RadiusScale,
    layer: CircleLayer,
}

impl TrafficMap {
    /// Takes ownership of the loaded data and computes the unfiltered view.
    pub fn new(
        stations: Vec<Station>,
        trips: Vec<Trip>,
        tolerance_minutes: u32,
        curve: RadiusCurve,
    ) -> Self {
        let mut map = Self {
            stations,
            trips,
            tolerance_minutes,
            curve,
            filter: TimeFilter::Any,
            active_trips: 0,
            traffic: Vec::new(),
            scale: RadiusScale::new(0, (0.0, 0.0), curve),
            layer: CircleLayer::default(),
        };
        map.recompute();
        map
    }

    /// Applies a new filter and returns the recomputed markers.
    pub fn set_filter(&mut self, filter: TimeFilter) -> &[StationMarker] {
        self.filter = filter;
        self.recompute();
        self.layer.markers()
    }

    /// Applies a raw slider value (`-1` or a minute of day).
    pub fn set_slider(&mut self, value: i32) -> Result<&[StationMarker]> {
        let filter = from_slider(value)?;
        Ok(self.set_filter(filter))
    }

    fn recompute(&mut self) {
        let active = filter_by_time(&self.trips, self.filter, self.tolerance_minutes);
        self.active_trips = active.len();
        self.traffic = aggregate(&self.stations, active);
        self.scale = RadiusScale::for_traffic(&self.traffic, self.filter, self.curve);
        self.layer.replace(markers(&self.traffic, &self.scale));

        debug!(
            filter = %self.filter,
            active_trips = self.active_trips,
            radius_range = ?self.scale.range(),
            "Station traffic recomputed"
        );
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn label(&self) -> String {
        format_label(self.filter)
    }

    /// Slider position matching the current filter.
    pub fn slider_value(&self) -> i32 {
        to_slider(self.filter)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Trips that passed the current filter.
    pub fn active_trips(&self) -> usize {
        self.active_trips
    }

    pub fn traffic(&self) -> &[StationTraffic] {
        &self.traffic
    }

    pub fn markers(&self) -> &[StationMarker] {
        self.layer.markers()
    }

    pub fn radius_range(&self) -> (f64, f64) {
        self.scale.range()
    }

    /// Circle positions for a viewport. Does not touch aggregation.
    pub fn place(&self, viewport: &Viewport) -> Vec<PlacedCircle> {
        self.layer.place(viewport)
    }

    /// Re-projects the circles of `map` into every new viewport of `view`
    /// and hands them to `draw`.
    pub fn redraw_on_viewport_change<F>(
        map: &Rc<RefCell<Self>>,
        view: &mut MapView,
        mut draw: F,
    ) -> SubscriptionId
    where
        F: FnMut(Vec<PlacedCircle>) + 'static,
    {
        let map = Rc::clone(map);
        view.subscribe(move |viewport| draw(map.borrow().place(viewport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use crate::traffic::tests::{station, trip};

    fn sample() -> TrafficMap {
        let stations = vec![station("A"), station("B")];
        let trips = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("A", "B", "08:30", "08:45"),
            trip("B", "A", "17:00", "17:20"),
        ];
        TrafficMap::new(stations, trips, 60, RadiusCurve::Sqrt)
    }

    #[test]
    fn test_initial_view_is_unfiltered() {
        let map = sample();
        assert_eq!(map.filter(), TimeFilter::Any);
        assert_eq!(map.label(), "(any time)");
        assert_eq!(map.active_trips(), 3);
        assert_eq!(map.radius_range(), (0.0, 25.0));
        assert_eq!(map.traffic()[0].total_traffic, 3);
    }

    #[test]
    fn test_filter_change_recomputes_and_switches_range() {
        let mut map = sample();

        let markers = map.set_filter(TimeFilter::at(8 * 60).unwrap());
        assert_eq!(markers[0].departures, 2);
        assert_eq!(markers[0].arrivals, 0);
        assert_eq!(map.active_trips(), 2);
        assert_eq!(map.radius_range(), (3.0, 50.0));
        assert_eq!(map.label(), "8:00 AM");

        map.set_filter(TimeFilter::at(17 * 60).unwrap());
        assert_eq!(map.traffic()[0].departures, 0);
        assert_eq!(map.traffic()[0].arrivals, 1);

        map.set_slider(-1).unwrap();
        assert_eq!(map.radius_range(), (0.0, 25.0));
        assert_eq!(map.traffic()[0].total_traffic, 3);
    }

    #[test]
    fn test_source_data_is_untouched() {
        let mut map = sample();
        map.set_filter(TimeFilter::at(17 * 60).unwrap());
        assert_eq!(map.trips().len(), 3);
        assert_eq!(map.stations().len(), 2);
    }

    #[test]
    fn test_bad_slider_value_keeps_state() {
        let mut map = sample();
        map.set_filter(TimeFilter::at(600).unwrap());
        assert!(map.set_slider(5000).is_err());
        assert_eq!(map.filter(), TimeFilter::at(600).unwrap());
    }

    #[test]
    fn test_minute_past_end_of_day_is_rejected() {
        let mut map = sample();
        assert!(TimeFilter::at(1440).is_err());
        assert!(map.set_slider(1440).is_err());
        assert!(map.set_slider(2000).is_err());

        assert_eq!(map.filter(), TimeFilter::Any);
        assert_eq!(map.label(), "(any time)");
        assert_eq!(map.radius_range(), (0.0, 25.0));
        assert_eq!(map.active_trips(), 3);
    }

    #[test]
    fn test_slider_value_follows_filter() {
        let mut map = sample();
        assert_eq!(map.slider_value(), -1);

        map.set_slider(480).unwrap();
        assert_eq!(map.slider_value(), 480);
        assert_eq!(map.label(), "8:00 AM");

        map.set_filter(TimeFilter::Any);
        assert_eq!(map.slider_value(), -1);
    }

    #[test]
    fn test_viewport_subscription_redraws() {
        let map = Rc::new(RefCell::new(sample()));
        let mut view = MapView::new(Viewport::new(
            Coordinates::new(-71.09, 42.36),
            12.0,
            800.0,
            600.0,
        ));
        let frames = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&frames);

        TrafficMap::redraw_on_viewport_change(&map, &mut view, move |circles| {
            sink.borrow_mut().push(circles)
        });

        view.zoom_to(14.0);
        map.borrow_mut().set_filter(TimeFilter::at(17 * 60).unwrap());
        view.resize(400.0, 300.0);

        let frames = frames.borrow();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].len(), 2);
        assert_eq!(frames[1][0].position.x, 200.0);
    }
}
