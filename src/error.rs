// Error types raised while building the hub and planning deliveries

use thiserror::Error;

use crate::models::{DeliveryStatus, PackageId, TruckId};

/// Errors raised by ingestion, dispatch and route planning.
///
/// Unknown lookups and full trucks are ordinary outcomes and are reported
/// through `Option` and `bool`; only malformed data and broken guards end
/// up here.
#[derive(Debug, Error)]
pub enum HubError {
    /// A location label or handle is not registered in the graph.
    #[error("unknown location {label:?}")]
    UnknownLocation {
        /// Label (or handle description) that failed to resolve.
        label: String,
    },
    /// A package ID has no record in the package table.
    #[error("unknown package {id}")]
    UnknownPackage {
        /// Requested package ID.
        id: PackageId,
    },
    /// No truck with this number in the fleet.
    #[error("unknown truck {id}")]
    UnknownTruck {
        /// Requested truck number.
        id: TruckId,
    },
    /// Two locations that must be compared while routing have no distance.
    #[error("no distance recorded between {from:?} and {to:?}")]
    NoEdge {
        /// Label of the location the truck is leaving.
        from: String,
        /// Label of the location the truck would travel to.
        to: String,
    },
    /// A package status change that does not move forward one step.
    #[error("package {id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Affected package.
        id: PackageId,
        /// Status the package currently has.
        from: DeliveryStatus,
        /// Status that was requested.
        to: DeliveryStatus,
    },
    /// Distances must be finite and non-negative.
    #[error("distance between {from:?} and {to:?} must be non-negative, got {weight}")]
    InvalidDistance {
        /// First endpoint label.
        from: String,
        /// Second endpoint label.
        to: String,
        /// Rejected weight.
        weight: f64,
    },
    /// Package IDs start at 1 and are bounded by the table size.
    #[error("package id must be between 1 and the table limit")]
    InvalidPackageId,
    /// A clock string could not be parsed.
    #[error("failed to parse clock time {input:?}")]
    InvalidClock {
        /// Raw text that was rejected.
        input: String,
    },
    /// Location rows were empty so no depot could be registered.
    #[error("location data does not contain a depot row")]
    MissingDepot,
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Hub data or configuration JSON could not be decoded.
    #[error("failed to decode hub data")]
    Parse(#[from] serde_json::Error),
}
