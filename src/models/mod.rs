// Models module - exports all model types

mod instructions;
mod location;
mod package;
mod route;
mod truck;

// Re-export model types
pub use self::instructions::Instructions;
pub use self::location::Location;
pub use self::package::{DeliveryStatus, Package};
pub use self::route::{DeliveryRoute, RouteStop};
pub use self::truck::Truck;

// Common type aliases for improved code readability
pub type PackageId = u32;
pub type TruckId = u32;
pub type Distance = f64;

/// Handle assigned to a location when it is registered in the graph
pub type LocationId = petgraph::graph::NodeIndex;
