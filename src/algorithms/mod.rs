pub mod dispatch;
pub mod nearest_neighbor;
pub mod shortest_path;

// Common algorithm traits
use crate::error::HubError;
use crate::models::{DeliveryRoute, Distance, LocationId, RouteStop, Truck};
use crate::utils::distance_table::LocationGraph;
use crate::utils::package_table::PackageTable;

/// Trait for route sequencing strategies
pub trait RoutePlanner {
    /// Order the truck's stops into legs: each stop with the distance
    /// travelled from the depot when it is reached, plus the total
    /// mileage including the return to the depot
    fn sequence(
        &self,
        truck: &Truck,
        graph: &LocationGraph,
    ) -> Result<(Vec<(LocationId, Distance)>, Distance), HubError>;

    /// Sequence the truck's stops, then drive the route: unload every
    /// stop and stamp its packages as delivered
    fn plan_route(
        &self,
        truck: &mut Truck,
        graph: &LocationGraph,
        packages: &mut PackageTable,
    ) -> Result<DeliveryRoute, HubError> {
        let (legs, mileage) = self.sequence(truck, graph)?;
        deliver(truck, graph, packages, &legs, mileage)
    }
}

/// Unload each stop in order and mark its packages delivered at the
/// arrival time derived from distance, speed and departure
fn deliver(
    truck: &mut Truck,
    graph: &LocationGraph,
    packages: &mut PackageTable,
    legs: &[(LocationId, Distance)],
    mileage: Distance,
) -> Result<DeliveryRoute, HubError> {
    let departure = truck.departure();
    let mut stops = Vec::with_capacity(legs.len());

    for &(location, distance) in legs {
        let arrival = departure.advance(distance / truck.speed);

        // Stamp first so a failure leaves the stop on the manifest
        for &id in truck.packages_at(location).into_iter().flatten() {
            packages
                .look_up_mut(id)
                .ok_or(HubError::UnknownPackage { id })?
                .mark_delivered(departure, arrival)?;
        }
        let unloaded = truck.unload_package(location);

        stops.push(RouteStop {
            label: graph.label(location),
            distance,
            arrival,
            packages: unloaded.into_iter().collect(),
        });
    }

    Ok(DeliveryRoute {
        truck_id: truck.id,
        stops,
        mileage,
        departure,
        return_time: departure.advance(mileage / truck.speed),
    })
}
