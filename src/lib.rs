// Public modules
pub mod algorithms;
pub mod config;
pub mod error;
pub mod hub;
pub mod models;
pub mod utils;

// Re-exports for convenience
pub use algorithms::dispatch::{DispatchPlanner, LoadingPass};
pub use algorithms::nearest_neighbor::NearestNeighbor;
pub use algorithms::shortest_path::{ShortestPath, ShortestPathTree};
pub use algorithms::RoutePlanner;
pub use config::HubConfig;
pub use error::HubError;
pub use hub::Hub;
pub use models::{DeliveryRoute, DeliveryStatus, Location, Package, Truck};
pub use utils::clock::Clock;
pub use utils::distance_table::LocationGraph;
pub use utils::package_table::PackageTable;
