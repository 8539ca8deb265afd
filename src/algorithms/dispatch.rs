// Truck loading passes: one scan of the package table per pass, stopping
// once the truck is full. The AtHub status guard keeps a package from
// being loaded twice.

use log::{debug, warn};
use std::collections::{HashSet, VecDeque};

use crate::error::HubError;
use crate::models::{DeliveryStatus, Instructions, LocationId, Package, PackageId, Truck};
use crate::utils::clock::Clock;
use crate::utils::distance_table::LocationGraph;
use crate::utils::package_table::PackageTable;

/// A single loading rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadingPass {
    /// Packages that must travel with others; the whole group is loaded
    ForcedGroup,
    /// Packages pinned to this truck
    FixedTruck,
    /// Packages for a stop already on the manifest
    SameStop,
    /// Packages sharing a zip with a stop already on the manifest
    SameZip,
    /// Packages that reach the hub late; may push the departure back
    Delayed,
    /// Plain packages due before the early-deadline cutoff
    EarlyDeadline,
    /// Anything left
    CatchAll,
}

impl LoadingPass {
    /// Every pass in priority order
    pub const ALL: [LoadingPass; 7] = [
        LoadingPass::ForcedGroup,
        LoadingPass::FixedTruck,
        LoadingPass::SameStop,
        LoadingPass::SameZip,
        LoadingPass::Delayed,
        LoadingPass::EarlyDeadline,
        LoadingPass::CatchAll,
    ];
}

/// Assigns packages at the hub to trucks
#[derive(Debug, Clone, Copy)]
pub struct DispatchPlanner<'a> {
    graph: &'a LocationGraph,
    early_deadline_cutoff: Clock,
}

impl<'a> DispatchPlanner<'a> {
    pub fn new(graph: &'a LocationGraph, early_deadline_cutoff: Clock) -> Self {
        Self {
            graph,
            early_deadline_cutoff,
        }
    }

    /// Run the given passes in order and return how many packages were loaded
    pub fn load(
        &self,
        truck: &mut Truck,
        packages: &mut PackageTable,
        passes: &[LoadingPass],
    ) -> Result<usize, HubError> {
        let mut loaded = 0;
        for &pass in passes {
            if !truck.not_full() {
                break;
            }
            let count = self.run_pass(pass, truck, packages)?;
            if count > 0 {
                debug!("truck {}: {:?} loaded {}", truck.id, pass, count);
            }
            loaded += count;
        }
        Ok(loaded)
    }

    /// One scan of the table applying a single rule
    pub fn run_pass(
        &self,
        pass: LoadingPass,
        truck: &mut Truck,
        packages: &mut PackageTable,
    ) -> Result<usize, HubError> {
        let mut loaded = 0;

        for id in packages.ids() {
            if !truck.not_full() {
                break;
            }
            let Some(package) = packages.look_up(id) else {
                continue;
            };
            let instructions = package.instructions();
            if !Self::is_eligible(package, &instructions, truck)
                || !self.accepts(pass, package, &instructions, truck)
            {
                continue;
            }

            if self.load_one(truck, packages, id)? {
                loaded += 1;
                if pass == LoadingPass::ForcedGroup {
                    loaded += self.load_group(truck, packages, id, &instructions.co_delivery)?;
                }
            }
        }

        Ok(loaded)
    }

    /// Load the partners of a package that was just loaded, following each
    /// partner's own group in turn. Stops at capacity; whatever did not fit
    /// stays at the hub.
    fn load_group(
        &self,
        truck: &mut Truck,
        packages: &mut PackageTable,
        leader: PackageId,
        group: &[PackageId],
    ) -> Result<usize, HubError> {
        let mut loaded = 0;
        let mut seen: HashSet<PackageId> = HashSet::from([leader]);
        let mut pending: VecDeque<(PackageId, PackageId)> =
            group.iter().map(|&partner| (leader, partner)).collect();

        while let Some((listed_by, partner)) = pending.pop_front() {
            if !seen.insert(partner) {
                continue;
            }
            if !truck.not_full() {
                warn!(
                    "truck {} full while loading group of package {}; {} partners loaded, {} left",
                    truck.id,
                    leader,
                    loaded,
                    pending.len() + 1
                );
                break;
            }
            let Some(package) = packages.look_up(partner) else {
                warn!("package {} lists unknown partner {}", listed_by, partner);
                continue;
            };
            let instructions = package.instructions();
            if !Self::is_eligible(package, &instructions, truck) {
                if package.truck() != Some(truck.id) {
                    warn!(
                        "partner {} of package {} cannot join truck {}",
                        partner, listed_by, truck.id
                    );
                }
                continue;
            }
            if self.load_one(truck, packages, partner)? {
                loaded += 1;
                pending.extend(instructions.co_delivery.iter().map(|&next| (partner, next)));
            }
        }

        Ok(loaded)
    }

    /// Put one package on the truck and move it to `InRoute`
    fn load_one(
        &self,
        truck: &mut Truck,
        packages: &mut PackageTable,
        id: PackageId,
    ) -> Result<bool, HubError> {
        let package = packages.look_up(id).ok_or(HubError::UnknownPackage { id })?;

        let Some(location) = self.graph.get_location(&package.address) else {
            warn!("package {}: no location for {:?}", id, package.address);
            return Ok(false);
        };

        let available_at = package.instructions().available_at;
        if let Some(available_at) = available_at {
            if available_at > truck.departure()
                && !self.departure_fits(truck, packages, (id, location), available_at)
            {
                debug!(
                    "package {} would hold truck {} until {} past a deadline on board",
                    id, truck.id, available_at
                );
                return Ok(false);
            }
        }

        if !truck.load_package(id, Some(location)) {
            return Ok(false);
        }

        packages
            .look_up_mut(id)
            .ok_or(HubError::UnknownPackage { id })?
            .mark_in_route(truck.id)?;
        if let Some(available_at) = available_at {
            truck.delay_departure(available_at);
        }
        Ok(true)
    }

    /// Whether leaving at `departure` still lets every timed package on
    /// board, and the candidate, reach its stop by its deadline on a direct
    /// run from the depot. Stops without a recorded distance are not judged.
    fn departure_fits(
        &self,
        truck: &Truck,
        packages: &PackageTable,
        candidate: (PackageId, LocationId),
        departure: Clock,
    ) -> bool {
        let depot = self.graph.depot();
        let on_board = truck.stops().into_iter().flat_map(move |stop| {
            truck
                .packages_at(stop)
                .into_iter()
                .flatten()
                .map(move |&id| (id, stop))
        });

        on_board.chain([candidate]).all(|(id, stop)| {
            let Some(package) = packages.look_up(id) else {
                return true;
            };
            if package.deadline.is_end_of_day() {
                return true;
            }
            self.graph
                .get_distance(Some(depot), Some(stop))
                .map_or(true, |distance| {
                    departure.advance(distance / truck.speed) <= package.deadline
                })
        })
    }

    /// Packages at the hub that this truck may carry at all
    fn is_eligible(package: &Package, instructions: &Instructions, truck: &Truck) -> bool {
        package.status() == DeliveryStatus::AtHub
            && instructions.allows_truck(truck.id)
            && !instructions.awaiting_correction
    }

    fn accepts(
        &self,
        pass: LoadingPass,
        package: &Package,
        instructions: &Instructions,
        truck: &Truck,
    ) -> bool {
        // Only the delayed pass may hold a truck back for a late package
        let ready = instructions
            .available_at
            .map_or(true, |available_at| available_at <= truck.departure());
        if pass != LoadingPass::Delayed && !ready {
            return false;
        }

        match pass {
            LoadingPass::ForcedGroup => !instructions.co_delivery.is_empty(),
            LoadingPass::FixedTruck => instructions.pinned_truck == Some(truck.id),
            LoadingPass::SameStop => self
                .graph
                .get_location(&package.address)
                .map_or(false, |location| truck.has_stop(location)),
            LoadingPass::SameZip => truck.stops().into_iter().any(|stop| {
                self.graph
                    .location(stop)
                    .map_or(false, |location| location.zip == package.zip)
            }),
            LoadingPass::Delayed => instructions.available_at.is_some(),
            LoadingPass::EarlyDeadline => {
                package.deadline < self.early_deadline_cutoff && package.notes.trim().is_empty()
            }
            LoadingPass::CatchAll => true,
        }
    }
}
