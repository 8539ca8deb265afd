use log::debug;
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};

use crate::algorithms::RoutePlanner;
use crate::error::HubError;
use crate::models::{Distance, LocationId, Truck};
use crate::utils::distance_table::LocationGraph;

// Custom wrapper to make f64 implement Ord
#[derive(PartialEq, Copy, Clone, Debug)]
struct OrderedDistance(Distance);

impl Eq for OrderedDistance {}

impl PartialOrd for OrderedDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// Single-source shortest paths over a set of locations.
///
/// Built fresh for every query, so no distance or predecessor state is
/// left behind on the graph.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: LocationId,
    distances: HashMap<LocationId, Distance>,
    predecessors: HashMap<LocationId, LocationId>,
    settled: Vec<LocationId>,
}

impl ShortestPathTree {
    /// Dijkstra from `source` over the subgraph induced by `source` and
    /// `nodes`; edges leaving that set are ignored
    pub fn compute(graph: &LocationGraph, source: LocationId, nodes: &[LocationId]) -> Self {
        let allowed: HashSet<LocationId> = nodes.iter().copied().chain([source]).collect();

        // Every node starts unreachable
        let mut distances: HashMap<LocationId, Distance> = allowed
            .iter()
            .map(|&node| (node, Distance::INFINITY))
            .collect();
        distances.insert(source, 0.0);

        let mut predecessors = HashMap::new();
        let mut settled = Vec::with_capacity(allowed.len());
        let mut queue = PriorityQueue::new();
        queue.push(source, Reverse(OrderedDistance(0.0)));

        while let Some((current, Reverse(OrderedDistance(distance)))) = queue.pop() {
            settled.push(current);

            for (neighbor, weight) in graph.neighbors(current) {
                if !allowed.contains(&neighbor) {
                    continue;
                }

                let alternative = distance + weight;
                let known = distances.get(&neighbor).copied().unwrap_or(Distance::INFINITY);
                if alternative < known {
                    distances.insert(neighbor, alternative);
                    predecessors.insert(neighbor, current);
                    queue.push_increase(neighbor, Reverse(OrderedDistance(alternative)));
                }
            }
        }

        Self {
            source,
            distances,
            predecessors,
            settled,
        }
    }

    pub fn source(&self) -> LocationId {
        self.source
    }

    /// Shortest distance from the source, `None` if unreachable
    pub fn distance_to(&self, node: LocationId) -> Option<Distance> {
        self.distances
            .get(&node)
            .copied()
            .filter(|distance| distance.is_finite())
    }

    /// Shortest path from the source to `node`, both ends included
    pub fn path_to(&self, node: LocationId) -> Option<Vec<LocationId>> {
        self.distance_to(node)?;

        let mut path = vec![node];
        let mut current = node;
        while let Some(&previous) = self.predecessors.get(&current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        Some(path)
    }

    /// Reachable nodes in the order Dijkstra settled them, source first
    pub fn settle_order(&self) -> &[LocationId] {
        &self.settled
    }

    /// Lower bound on any closed tour from the source through every
    /// reachable node: the farthest node must be reached and left again
    pub fn tour_lower_bound(&self) -> Distance {
        self.settled
            .iter()
            .filter_map(|&node| self.distance_to(node))
            .fold(0.0, Distance::max)
            * 2.0
    }
}

/// Shortest-path lower bound for a truck's current stops
pub fn route_lower_bound(truck: &Truck, graph: &LocationGraph) -> Distance {
    ShortestPathTree::compute(graph, graph.depot(), &truck.stops()).tour_lower_bound()
}

/// Alternate planner that visits stops in order of their shortest-path
/// distance from the depot. Used to cross-check nearest-neighbor routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortestPath;

impl ShortestPath {
    pub fn new() -> Self {
        Self
    }
}

impl RoutePlanner for ShortestPath {
    fn sequence(
        &self,
        truck: &Truck,
        graph: &LocationGraph,
    ) -> Result<(Vec<(LocationId, Distance)>, Distance), HubError> {
        let depot = graph.depot();
        let stops = truck.stops();
        let tree = ShortestPathTree::compute(graph, depot, &stops);

        if let Some(&unreachable) = stops.iter().find(|&&stop| tree.distance_to(stop).is_none()) {
            return Err(HubError::NoEdge {
                from: graph.label(depot),
                to: graph.label(unreachable),
            });
        }

        let mut legs = Vec::with_capacity(stops.len());
        let mut current = depot;
        let mut total = 0.0;

        for &stop in tree.settle_order().iter().filter(|&&node| node != depot) {
            total += graph.try_distance(current, stop)?;
            legs.push((stop, total));
            current = stop;
        }

        total += graph.try_distance(current, depot)?;
        debug!(
            "truck {}: shortest-path order over {} stops, {:.1} miles (bound {:.1})",
            truck.id,
            legs.len(),
            total,
            tree.tour_lower_bound()
        );

        Ok((legs, total))
    }
}
