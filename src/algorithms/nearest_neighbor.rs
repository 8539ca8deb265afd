// Nearest-neighbor route sequencing: repeatedly drive to the closest
// unvisited stop, then return to the depot. O(S²) in stops, which truck
// capacity bounds.

use log::debug;

use crate::algorithms::RoutePlanner;
use crate::error::HubError;
use crate::models::{Distance, LocationId, Truck};
use crate::utils::distance_table::LocationGraph;

/// Greedy nearest-neighbor planner, the production strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl NearestNeighbor {
    pub fn new() -> Self {
        Self
    }

    /// Closest candidate to `current`, first in manifest order on ties.
    /// Candidates without a recorded distance are unreachable, not free.
    fn nearest(
        graph: &LocationGraph,
        current: LocationId,
        candidates: &[LocationId],
    ) -> Option<(usize, Distance)> {
        let mut nearest: Option<(usize, Distance)> = None;

        for (i, &candidate) in candidates.iter().enumerate() {
            match graph.get_distance(Some(current), Some(candidate)) {
                Some(distance) => {
                    if nearest.map_or(true, |(_, best)| distance < best) {
                        nearest = Some((i, distance));
                    }
                }
                None => debug!(
                    "skipping {} -> {}: no distance recorded",
                    graph.label(current),
                    graph.label(candidate)
                ),
            }
        }

        nearest
    }
}

impl RoutePlanner for NearestNeighbor {
    fn sequence(
        &self,
        truck: &Truck,
        graph: &LocationGraph,
    ) -> Result<(Vec<(LocationId, Distance)>, Distance), HubError> {
        let depot = graph.depot();
        let mut unvisited = truck.stops();
        let mut legs = Vec::with_capacity(unvisited.len());
        let mut current = depot;
        let mut total = 0.0;

        while !unvisited.is_empty() {
            let Some((index, distance)) = Self::nearest(graph, current, &unvisited) else {
                // Every remaining stop is unreachable from here
                return Err(HubError::NoEdge {
                    from: graph.label(current),
                    to: graph.label(unvisited[0]),
                });
            };

            current = unvisited.remove(index);
            total += distance;
            legs.push((current, total));
        }

        total += graph.try_distance(current, depot)?;
        debug!(
            "truck {}: {} stops, {:.1} miles",
            truck.id,
            legs.len(),
            total
        );

        Ok((legs, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeliveryStatus, Location};
    use crate::utils::clock::Clock;
    use crate::utils::package_table::PackageTable;

    fn location(label: &str) -> Location {
        Location::new(label, label, label, "84107")
    }

    fn create_test_data() -> (LocationGraph, PackageTable, Truck) {
        let mut graph = LocationGraph::new(location("D"));
        let a = graph.add_location(location("A"));
        let b = graph.add_location(location("B"));
        let d = graph.depot();
        graph.add_distance(d, a, 3.0).unwrap();
        graph.add_distance(d, b, 5.0).unwrap();
        graph.add_distance(a, b, 2.0).unwrap();

        let mut packages = PackageTable::new();
        packages.insert(1, "B", "84107", "EOD", 1.0, "").unwrap();
        packages.insert(2, "A", "84107", "EOD", 1.0, "").unwrap();
        packages.insert(3, "B", "84107", "EOD", 1.0, "").unwrap();

        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        for (id, stop) in [(1, b), (2, a), (3, b)] {
            truck.load_package(id, Some(stop));
            packages.look_up_mut(id).unwrap().mark_in_route(1).unwrap();
        }

        (graph, packages, truck)
    }

    #[test]
    fn test_visits_nearest_first() {
        let (graph, mut packages, mut truck) = create_test_data();

        let route = NearestNeighbor.plan_route(&mut truck, &graph, &mut packages).unwrap();

        assert_eq!(route.path("D"), vec!["D", "A", "B", "D"]);
        assert_eq!(route.mileage, 10.0);
        assert_eq!(route.stops[0].distance, 3.0);
        assert_eq!(route.stops[1].distance, 5.0);
        assert!(truck.is_empty());
    }

    #[test]
    fn test_stamps_colocated_packages_together() {
        let (graph, mut packages, mut truck) = create_test_data();

        let route = NearestNeighbor.plan_route(&mut truck, &graph, &mut packages).unwrap();

        assert_eq!(route.stops[1].packages, vec![1, 3]);
        let first = packages.look_up(1).unwrap();
        let third = packages.look_up(3).unwrap();
        assert_eq!(first.status(), DeliveryStatus::Delivered);
        assert_eq!(first.delivered_at(), third.delivered_at());
        // 5 miles at 18 mph
        assert_eq!(first.delivered_at().unwrap().to_string(), "08:16 AM");
        assert_eq!(route.return_time.to_string(), "08:33 AM");
    }

    #[test]
    fn test_failed_stamp_keeps_stop_on_truck() {
        let (graph, mut packages, mut truck) = create_test_data();
        let b = graph.get_location("B").unwrap();
        // package 3 never left the hub
        packages.insert(3, "B", "84107", "EOD", 1.0, "").unwrap();

        let err = NearestNeighbor
            .plan_route(&mut truck, &graph, &mut packages)
            .unwrap_err();

        assert!(matches!(err, HubError::InvalidTransition { id: 3, .. }));
        assert!(truck.has_stop(b));
        assert_eq!(truck.packages_at(b).unwrap().len(), 2);
    }

    #[test]
    fn test_tie_goes_to_first_loaded() {
        let mut graph = LocationGraph::new(location("D"));
        let a = graph.add_location(location("A"));
        let b = graph.add_location(location("B"));
        let d = graph.depot();
        graph.add_distance(d, a, 4.0).unwrap();
        graph.add_distance(d, b, 4.0).unwrap();
        graph.add_distance(a, b, 1.0).unwrap();

        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        truck.load_package(1, Some(b));
        truck.load_package(2, Some(a));

        let (legs, total) = NearestNeighbor.sequence(&truck, &graph).unwrap();
        assert_eq!(legs, vec![(b, 4.0), (a, 5.0)]);
        assert_eq!(total, 9.0);
    }

    #[test]
    fn test_missing_edge_is_not_a_shortcut() {
        let mut graph = LocationGraph::new(location("D"));
        let a = graph.add_location(location("A"));
        let b = graph.add_location(location("B"));
        let d = graph.depot();
        graph.add_distance(d, a, 3.0).unwrap();
        graph.add_distance(d, b, 1.0).unwrap();
        // no A-B edge

        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        truck.load_package(1, Some(a));
        truck.load_package(2, Some(b));

        let err = NearestNeighbor.sequence(&truck, &graph).unwrap_err();
        assert!(matches!(
            err,
            HubError::NoEdge { ref from, ref to } if from == "B" && to == "A"
        ));
    }

    #[test]
    fn test_empty_truck_stays_home() {
        let graph = LocationGraph::new(location("D"));
        let truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));

        let (legs, total) = NearestNeighbor.sequence(&truck, &graph).unwrap();
        assert!(legs.is_empty());
        assert_eq!(total, 0.0);
    }
}
