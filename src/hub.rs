// Hub orchestration: fleet, package table and distance graph for one run

use log::{info, warn};

use crate::algorithms::dispatch::{DispatchPlanner, LoadingPass};
use crate::algorithms::shortest_path::route_lower_bound;
use crate::algorithms::RoutePlanner;
use crate::config::HubConfig;
use crate::error::HubError;
use crate::models::{DeliveryRoute, DeliveryStatus, Distance, PackageId, Truck, TruckId};
use crate::utils::clock::Clock;
use crate::utils::distance_table::LocationGraph;
use crate::utils::init_hub::init_hub_from_json;
use crate::utils::package_table::PackageTable;

/// Depot that loads trucks, routes them and tracks deliveries
#[derive(Debug, Clone)]
pub struct Hub {
    config: HubConfig,
    graph: LocationGraph,
    packages: PackageTable,
    trucks: Vec<Truck>,
    routes: Vec<DeliveryRoute>,
}

impl Hub {
    /// Creates a hub with a fresh fleet waiting for the opening time
    pub fn new(
        config: HubConfig,
        graph: LocationGraph,
        packages: PackageTable,
    ) -> Result<Self, HubError> {
        config.validate()?;
        let trucks = (1..=config.truck_count)
            .map(|id| {
                Truck::new(
                    id,
                    config.truck_speed,
                    config.truck_capacity,
                    config.opening_time,
                )
            })
            .collect();

        Ok(Self {
            config,
            graph,
            packages,
            trucks,
            routes: Vec::new(),
        })
    }

    /// Creates a hub from JSON location and package rows
    pub fn from_json(config: HubConfig, json: &str) -> Result<Self, HubError> {
        let (graph, packages) = init_hub_from_json(json)?;
        Self::new(config, graph, packages)
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn graph(&self) -> &LocationGraph {
        &self.graph
    }

    pub fn packages(&self) -> &PackageTable {
        &self.packages
    }

    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    /// Completed trips in the order they were driven
    pub fn routes(&self) -> &[DeliveryRoute] {
        &self.routes
    }

    /// Pass order used by `run` for each truck. Truck 1 takes grouped and
    /// early packages, truck 2 the pinned and delayed ones.
    pub fn default_passes(truck_id: TruckId) -> Vec<LoadingPass> {
        use LoadingPass::*;
        match truck_id {
            1 => vec![ForcedGroup, FixedTruck, EarlyDeadline, SameStop, SameZip, CatchAll],
            2 => vec![FixedTruck, Delayed, SameStop, SameZip, EarlyDeadline, CatchAll],
            _ => LoadingPass::ALL.to_vec(),
        }
    }

    /// Amend a package's address, keeping its status and prior notes
    pub fn correct_package(
        &mut self,
        id: PackageId,
        address: &str,
        zip: &str,
        note: &str,
    ) -> Result<(), HubError> {
        let package = self
            .packages
            .look_up_mut(id)
            .ok_or(HubError::UnknownPackage { id })?;
        package.correct_info(address, zip, note);
        info!("package {} corrected to {} {}", id, address, zip);
        Ok(())
    }

    /// Run loading passes for one truck
    pub fn load_truck(
        &mut self,
        truck_id: TruckId,
        passes: &[LoadingPass],
    ) -> Result<usize, HubError> {
        let planner = DispatchPlanner::new(&self.graph, self.config.early_deadline_cutoff);
        let truck = self
            .trucks
            .iter_mut()
            .find(|truck| truck.id == truck_id)
            .ok_or(HubError::UnknownTruck { id: truck_id })?;
        planner.load(truck, &mut self.packages, passes)
    }

    /// Drive one truck's current manifest. The truck is ready again when
    /// it is back at the hub.
    pub fn route_truck(
        &mut self,
        truck_id: TruckId,
        planner: &dyn RoutePlanner,
    ) -> Result<DeliveryRoute, HubError> {
        let truck = self
            .trucks
            .iter_mut()
            .find(|truck| truck.id == truck_id)
            .ok_or(HubError::UnknownTruck { id: truck_id })?;

        let bound = route_lower_bound(truck, &self.graph);
        let route = planner.plan_route(truck, &self.graph, &mut self.packages)?;
        if route.mileage + 1e-9 < bound {
            warn!(
                "truck {} route of {:.1} miles is below the shortest-path bound {:.1}",
                truck_id, route.mileage, bound
            );
        }

        info!(
            "truck {} left at {} with {} packages, {:.1} miles, back at {}",
            truck_id,
            route.departure,
            route.package_count(),
            route.mileage,
            route.return_time
        );
        truck.set_departure(route.return_time);
        self.routes.push(route.clone());
        Ok(route)
    }

    /// Load and route trucks trip after trip until nothing at the hub can
    /// be dispatched
    pub fn run(&mut self, planner: &dyn RoutePlanner) -> Result<&[DeliveryRoute], HubError> {
        let truck_ids: Vec<TruckId> = self.trucks.iter().map(|truck| truck.id).collect();

        while self.packages.count_with_status(DeliveryStatus::AtHub) > 0 {
            let mut progressed = false;

            for &truck_id in &truck_ids {
                if self.packages.count_with_status(DeliveryStatus::AtHub) == 0 {
                    break;
                }
                if self.load_truck(truck_id, &Self::default_passes(truck_id))? == 0 {
                    continue;
                }
                self.route_truck(truck_id, planner)?;
                progressed = true;
            }

            if !progressed {
                let stranded: Vec<PackageId> = self
                    .packages
                    .iter()
                    .filter(|package| package.status() == DeliveryStatus::AtHub)
                    .map(|package| package.id)
                    .collect();
                warn!("packages left at the hub: {:?}", stranded);
                break;
            }
        }

        Ok(&self.routes)
    }

    /// Distance driven by the whole fleet
    pub fn total_mileage(&self) -> Distance {
        self.routes.iter().map(|route| route.mileage).sum()
    }

    /// Mileage per truck, in fleet order
    pub fn truck_mileage(&self) -> Vec<(TruckId, Distance)> {
        self.trucks
            .iter()
            .map(|truck| {
                let miles = self
                    .routes
                    .iter()
                    .filter(|route| route.truck_id == truck.id)
                    .map(|route| route.mileage)
                    .sum();
                (truck.id, miles)
            })
            .collect()
    }

    /// Status of every package as of the given time, based on recorded
    /// departures and deliveries
    pub fn status_at(&self, time: Clock) -> Vec<(PackageId, DeliveryStatus)> {
        self.packages
            .iter()
            .map(|package| (package.id, package.status_at(time)))
            .collect()
    }

    /// Packages delivered after their deadline
    pub fn late_packages(&self) -> Vec<PackageId> {
        self.packages
            .iter()
            .filter(|package| package.is_late())
            .map(|package| package.id)
            .collect()
    }
}
