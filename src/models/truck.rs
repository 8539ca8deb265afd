// Truck model with a capacity-bounded stop manifest

use indexmap::IndexMap;
use std::collections::BTreeSet;

use crate::models::{LocationId, PackageId, TruckId};
use crate::utils::clock::Clock;
use crate::utils::distance_table::LocationGraph;

/// Represents a delivery truck and the packages it carries
#[derive(Debug, Clone)]
pub struct Truck {
    /// Truck number, starting at 1
    pub id: TruckId,

    /// Average speed in distance units per hour
    pub speed: f64,

    /// Maximum number of packages on board
    pub capacity: usize,

    /// Stops in load order, each with the packages delivered there
    manifest: IndexMap<LocationId, BTreeSet<PackageId>>,

    /// Packages currently on board
    count: usize,

    /// Scheduled departure from the hub
    departure: Clock,
}

impl Truck {
    /// Creates an empty truck departing at the given time
    pub fn new(id: TruckId, speed: f64, capacity: usize, departure: Clock) -> Self {
        Self {
            id,
            speed,
            capacity,
            manifest: IndexMap::new(),
            count: 0,
            departure,
        }
    }

    /// Adds a package to the stop at `location`.
    /// Returns false if the truck is full, the location is unknown, or
    /// the package is already on board.
    pub fn load_package(&mut self, id: PackageId, location: Option<LocationId>) -> bool {
        if !self.not_full() {
            return false;
        }
        let Some(location) = location else {
            return false;
        };

        if self.manifest.entry(location).or_default().insert(id) {
            self.count += 1;
            true
        } else {
            false
        }
    }

    /// Removes the stop at `location` and returns its packages
    pub fn unload_package(&mut self, location: LocationId) -> BTreeSet<PackageId> {
        let packages = self.manifest.shift_remove(&location).unwrap_or_default();
        self.count -= packages.len();
        packages
    }

    pub fn not_full(&self) -> bool {
        self.count < self.capacity
    }

    /// Number of packages on board
    pub fn package_count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Stop locations in load order
    pub fn stops(&self) -> Vec<LocationId> {
        self.manifest.keys().copied().collect()
    }

    pub fn has_stop(&self, location: LocationId) -> bool {
        self.manifest.contains_key(&location)
    }

    /// Packages bound for `location`
    pub fn packages_at(&self, location: LocationId) -> Option<&BTreeSet<PackageId>> {
        self.manifest.get(&location)
    }

    /// Addresses of every stop on the manifest
    pub fn get_all_stops(&self, graph: &LocationGraph) -> Vec<String> {
        self.manifest
            .keys()
            .filter_map(|location| graph.location(*location))
            .map(|location| location.address.clone())
            .collect()
    }

    pub fn departure(&self) -> Clock {
        self.departure
    }

    /// Pushes the departure later, never earlier
    pub fn delay_departure(&mut self, available_at: Clock) {
        self.departure = self.departure.max(available_at);
    }

    /// Sets the departure for the next trip
    pub fn set_departure(&mut self, departure: Clock) {
        self.departure = departure;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Location;

    fn create_test_graph() -> (LocationGraph, LocationId, LocationId) {
        let mut graph = LocationGraph::new(Location::new("HUB", "Hub", "1 Hub Way", "84107"));
        let a = graph.add_location(Location::new("A", "Stop A", "10 A St", "84111"));
        let b = graph.add_location(Location::new("B", "Stop B", "20 B St", "84115"));
        (graph, a, b)
    }

    #[test]
    fn test_load_until_full() {
        let (_, a, _) = create_test_graph();
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));

        for id in 1..=16 {
            assert!(truck.load_package(id, Some(a)));
        }
        assert!(!truck.not_full());

        assert!(!truck.load_package(17, Some(a)));
        assert_eq!(truck.package_count(), 16);
        assert_eq!(truck.packages_at(a).map(|p| p.len()), Some(16));
        assert!(!truck.packages_at(a).unwrap().contains(&17));
    }

    #[test]
    fn test_load_rejects_missing_location() {
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        assert!(!truck.load_package(1, None));
        assert!(truck.is_empty());
    }

    #[test]
    fn test_colocated_packages_share_stop() {
        let (graph, a, b) = create_test_graph();
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        truck.load_package(1, Some(a));
        truck.load_package(2, Some(b));
        truck.load_package(3, Some(a));

        assert_eq!(truck.stops(), vec![a, b]);
        assert_eq!(truck.get_all_stops(&graph), vec!["10 A St", "20 B St"]);
        assert_eq!(truck.package_count(), 3);
    }

    #[test]
    fn test_duplicate_load_is_rejected() {
        let (_, a, _) = create_test_graph();
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        assert!(truck.load_package(1, Some(a)));
        assert!(!truck.load_package(1, Some(a)));
        assert_eq!(truck.package_count(), 1);
    }

    #[test]
    fn test_unload_package() {
        let (_, a, b) = create_test_graph();
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        truck.load_package(1, Some(a));
        truck.load_package(2, Some(a));

        let unloaded = truck.unload_package(a);
        assert_eq!(unloaded.into_iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(truck.is_empty());
        assert!(truck.unload_package(b).is_empty());
    }

    #[test]
    fn test_delay_departure_never_earlier() {
        let mut truck = Truck::new(1, 18.0, 16, Clock::from_hours(8.0));
        truck.delay_departure(Clock::from_hours(9.0));
        truck.delay_departure(Clock::from_hours(8.5));
        assert_eq!(truck.departure(), Clock::from_hours(9.0));
    }
}
