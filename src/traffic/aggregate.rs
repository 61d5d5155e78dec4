use crate::model::{Station, StationTraffic, Trip};
use std::collections::HashMap;

/// Counts arrivals and departures for every station over `trips`.
///
/// The result has the same length and order as `stations`. Each entry owns a
/// fresh clone of its station, so repeated calls with different trip subsets
/// never see each other's counts. Trips that reference unknown station ids
/// are ignored and stations nobody visited get zero counts.
pub fn aggregate<'a, I>(stations: &[Station], trips: I) -> Vec<StationTraffic>
where
    I: IntoIterator<Item = &'a Trip>,
{
    let mut departures: HashMap<&str, u64> = HashMap::new();
    let mut arrivals: HashMap<&str, u64> = HashMap::new();

    for trip in trips {
        *departures.entry(trip.start_station_id.as_str()).or_default() += 1;
        *arrivals.entry(trip.end_station_id.as_str()).or_default() += 1;
    }

    stations
        .iter()
        .map(|station| {
            let id = station.id.as_str();
            StationTraffic::new(
                station.clone(),
                arrivals.get(id).copied().unwrap_or(0),
                departures.get(id).copied().unwrap_or(0),
            )
        })
        .collect()
}

/// Largest `total_traffic` in a pass, 0 for an empty slice.
pub fn max_traffic(traffic: &[StationTraffic]) -> u64 {
    traffic.iter().map(|t| t.total_traffic).max().unwrap_or(0)
}

/// The `n` busiest stations, highest traffic first. Ties keep input order.
pub fn busiest(traffic: &[StationTraffic], n: usize) -> Vec<&StationTraffic> {
    let mut sorted: Vec<&StationTraffic> = traffic.iter().collect();
    sorted.sort_by(|a, b| b.total_traffic.cmp(&a.total_traffic));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traffic::tests::{station, trip};

    #[test]
    fn test_counts_per_station() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("A", "C", "09:00", "09:20"),
            trip("B", "A", "10:00", "10:05"),
        ];

        let traffic = aggregate(&stations, &trips);

        assert_eq!(traffic.len(), 3);
        assert_eq!(traffic[0].id(), "A");
        assert_eq!((traffic[0].departures, traffic[0].arrivals), (2, 1));
        assert_eq!((traffic[1].departures, traffic[1].arrivals), (1, 1));
        assert_eq!((traffic[2].departures, traffic[2].arrivals), (0, 1));
        for t in &traffic {
            assert_eq!(t.total_traffic, t.arrivals + t.departures);
        }
    }

    #[test]
    fn test_empty_trips_yield_zero_counts() {
        let stations = vec![station("A"), station("B")];
        let traffic = aggregate(&stations, &Vec::<Trip>::new());

        assert!(traffic.iter().all(|t| t.total_traffic == 0));
        assert!(traffic.iter().all(|t| t.arrivals == 0 && t.departures == 0));
    }

    #[test]
    fn test_unknown_station_ids_are_ignored() {
        let stations = vec![station("A")];
        let trips = vec![trip("X", "Y", "08:00", "08:10")];

        let traffic = aggregate(&stations, &trips);
        assert_eq!(traffic[0].total_traffic, 0);
    }

    #[test]
    fn test_repeated_aggregation_does_not_accumulate() {
        let stations = vec![station("A"), station("B")];
        let morning = vec![
            trip("A", "B", "08:00", "08:10"),
            trip("A", "B", "08:30", "08:40"),
        ];
        let evening = vec![trip("B", "A", "18:00", "18:10")];

        let first = aggregate(&stations, &morning);
        let second = aggregate(&stations, &evening);

        assert_eq!(first[0].departures, 2);
        assert_eq!(second[0].departures, 0);
        assert_eq!(second[0].arrivals, 1);
        assert_eq!(second[1].departures, 1);
        assert_eq!(second[1].arrivals, 0);
    }

    #[test]
    fn test_round_trip_counts_both_ways() {
        let stations = vec![station("A")];
        let trips = vec![trip("A", "A", "12:00", "12:30")];

        let traffic = aggregate(&stations, &trips);
        assert_eq!(traffic[0].arrivals, 1);
        assert_eq!(traffic[0].departures, 1);
        assert_eq!(traffic[0].total_traffic, 2);
    }

    #[test]
    fn test_busiest_orders_by_total() {
        let stations = vec![station("A"), station("B"), station("C")];
        let trips = vec![
            trip("B", "C", "08:00", "08:10"),
            trip("B", "C", "08:00", "08:10"),
            trip("A", "B", "08:00", "08:10"),
        ];
        let traffic = aggregate(&stations, &trips);

        let top = busiest(&traffic, 2);
        let ids: Vec<_> = top.iter().map(|t| t.id()).collect();
        assert_eq!(ids, vec!["B", "C"]);
        assert_eq!(max_traffic(&traffic), 3);
        assert_eq!(max_traffic(&[]), 0);
    }
}
