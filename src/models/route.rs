// Route models for representing a truck's delivery trip

use serde::Serialize;

use crate::models::{Distance, PackageId, TruckId};
use crate::utils::clock::Clock;

/// One visited stop on a delivery route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStop {
    /// Label of the stop location
    pub label: String,

    /// Distance travelled from the hub when the stop is reached
    pub distance: Distance,

    /// Arrival time, shared by every package delivered here
    pub arrival: Clock,

    /// Packages delivered at this stop
    pub packages: Vec<PackageId>,
}

/// Represents a complete delivery trip that starts and ends at the hub
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryRoute {
    pub truck_id: TruckId,

    /// Stops in visiting order, hub excluded
    pub stops: Vec<RouteStop>,

    /// Total distance including the return leg
    pub mileage: Distance,

    pub departure: Clock,

    /// Time the truck is back at the hub
    pub return_time: Clock,
}

impl DeliveryRoute {
    /// Labels of the full trip, starting and ending at the hub
    pub fn path(&self, hub_label: &str) -> Vec<String> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(hub_label.to_string());
        path.extend(self.stops.iter().map(|stop| stop.label.clone()));
        path.push(hub_label.to_string());
        path
    }

    /// Number of packages delivered on this trip
    pub fn package_count(&self) -> usize {
        self.stops.iter().map(|stop| stop.packages.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_wraps_hub() {
        let route = DeliveryRoute {
            truck_id: 1,
            stops: vec![
                RouteStop {
                    label: "A".to_string(),
                    distance: 3.0,
                    arrival: Clock::from_hours(8.5),
                    packages: vec![1, 2],
                },
                RouteStop {
                    label: "B".to_string(),
                    distance: 5.0,
                    arrival: Clock::from_hours(9.0),
                    packages: vec![3],
                },
            ],
            mileage: 10.0,
            departure: Clock::from_hours(8.0),
            return_time: Clock::from_hours(9.5),
        };

        assert_eq!(route.path("HUB"), vec!["HUB", "A", "B", "HUB"]);
        assert_eq!(route.package_count(), 3);
    }
}
