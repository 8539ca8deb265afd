use log::debug;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

use crate::error::HubError;
use crate::models::{Distance, Location, LocationId};

/// Undirected distance graph over delivery locations.
///
/// Every location gets a `LocationId` handle when it is registered, and
/// edges are stored once per unordered pair so `a -> b` and `b -> a`
/// always share a weight. The depot is registered on construction.
#[derive(Debug, Clone)]
pub struct LocationGraph {
    graph: UnGraph<Location, Distance>,
    labels: HashMap<String, LocationId>,
    depot: LocationId,
}

impl LocationGraph {
    /// Create a new graph holding only the depot
    pub fn new(depot: Location) -> Self {
        let mut graph = UnGraph::default();
        let mut labels = HashMap::new();
        let label = depot.label.clone();
        let depot = graph.add_node(depot);
        labels.insert(label, depot);

        LocationGraph {
            graph,
            labels,
            depot,
        }
    }

    /// Handle of the depot, the start and end of every route
    pub fn depot(&self) -> LocationId {
        self.depot
    }

    /// Register a location with no adjacent locations.
    /// Registering an existing label again returns the existing handle.
    pub fn add_location(&mut self, location: Location) -> LocationId {
        if let Some(&existing) = self.labels.get(&location.label) {
            debug!("location {:?} already registered", location.label);
            return existing;
        }

        let label = location.label.clone();
        let id = self.graph.add_node(location);
        self.labels.insert(label, id);
        id
    }

    /// Set the distance between two locations in both directions.
    /// Repeating the call with the same arguments changes nothing.
    pub fn add_distance(
        &mut self,
        a: LocationId,
        b: LocationId,
        weight: Distance,
    ) -> Result<(), HubError> {
        let from = self.require(a)?.label.clone();
        let to = self.require(b)?.label.clone();

        if !weight.is_finite() || weight < 0.0 {
            return Err(HubError::InvalidDistance { from, to, weight });
        }

        // Self-distance is always 0 and never stored
        if a == b {
            return Ok(());
        }

        self.graph.update_edge(a, b, weight);
        Ok(())
    }

    /// Find a location by label
    pub fn get_location(&self, label: &str) -> Option<LocationId> {
        self.labels.get(label).copied()
    }

    /// Location record behind a handle
    pub fn location(&self, id: LocationId) -> Option<&Location> {
        self.graph.node_weight(id)
    }

    /// Label of a location, for messages
    pub fn label(&self, id: LocationId) -> String {
        self.location(id)
            .map(|location| location.label.clone())
            .unwrap_or_else(|| format!("#{}", id.index()))
    }

    /// Distance between two locations.
    ///
    /// Missing endpoints and identical endpoints give `Some(0.0)`;
    /// `None` means there is no edge, which routing must not treat as 0.
    pub fn get_distance(&self, from: Option<LocationId>, to: Option<LocationId>) -> Option<Distance> {
        let (Some(from), Some(to)) = (from, to) else {
            return Some(0.0);
        };
        if from == to {
            return Some(0.0);
        }

        self.graph
            .find_edge(from, to)
            .and_then(|edge| self.graph.edge_weight(edge))
            .copied()
    }

    /// Distance between two registered locations, failing on a missing edge
    pub fn try_distance(&self, from: LocationId, to: LocationId) -> Result<Distance, HubError> {
        self.get_distance(Some(from), Some(to))
            .ok_or_else(|| HubError::NoEdge {
                from: self.label(from),
                to: self.label(to),
            })
    }

    /// Adjacent locations with edge weights
    pub fn neighbors(&self, id: LocationId) -> impl Iterator<Item = (LocationId, Distance)> + '_ {
        self.graph.edges(id).map(move |edge| {
            let other = if edge.source() == id {
                edge.target()
            } else {
                edge.source()
            };
            (other, *edge.weight())
        })
    }

    /// All locations in registration order, depot first
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> + '_ {
        self.graph
            .node_indices()
            .filter_map(move |id| self.graph.node_weight(id).map(|location| (id, location)))
    }

    /// Number of registered locations
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of stored unordered distances
    pub fn distance_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn require(&self, id: LocationId) -> Result<&Location, HubError> {
        self.location(id).ok_or_else(|| HubError::UnknownLocation {
            label: format!("#{}", id.index()),
        })
    }
}
