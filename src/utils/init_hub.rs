use log::{info, warn};
use serde::Deserialize;

use crate::error::HubError;
use crate::models::{Location, LocationId};
use crate::utils::distance_table::LocationGraph;
use crate::utils::package_table::PackageTable;

/// One row of the distance table: a location and its distances to the
/// locations listed before it
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRow {
    pub label: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub zip: String,
    /// Distance to each earlier row by position; entries at or past this
    /// row's own position are ignored
    #[serde(default)]
    pub distances: Vec<f64>,
}

/// One row of the package file
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRow {
    pub id: u32,
    pub address: String,
    pub zip: String,
    /// "H:MM AM/PM" or "EOD"
    pub deadline: String,
    pub weight: f64,
    #[serde(default)]
    pub notes: String,
}

/// Location and package rows handed over by ingestion
#[derive(Debug, Clone, Deserialize)]
pub struct HubData {
    pub locations: Vec<LocationRow>,
    pub packages: Vec<PackageRow>,
}

impl From<&LocationRow> for Location {
    fn from(row: &LocationRow) -> Self {
        Location::new(
            row.label.as_str(),
            row.name.as_str(),
            row.address.as_str(),
            row.zip.as_str(),
        )
        .with_city(row.city.as_str(), row.state.as_str())
    }
}

/// Build the location graph. The first row is the depot.
pub fn load_locations(rows: &[LocationRow]) -> Result<LocationGraph, HubError> {
    let (depot, rest) = rows.split_first().ok_or(HubError::MissingDepot)?;
    let mut graph = LocationGraph::new(Location::from(depot));

    // Handles by row position, used to align the distance columns
    let mut ids: Vec<LocationId> = Vec::with_capacity(rows.len());
    ids.push(graph.depot());
    ids.extend(rest.iter().map(|row| graph.add_location(Location::from(row))));

    for (i, row) in rows.iter().enumerate() {
        if row.distances.len() < i {
            warn!(
                "location {:?} lists {} distances, expected {}",
                row.label,
                row.distances.len(),
                i
            );
        }
        for (j, &weight) in row.distances.iter().enumerate().take(i) {
            graph.add_distance(ids[j], ids[i], weight)?;
        }
    }

    info!(
        "Loaded {} locations and {} distances",
        graph.len(),
        graph.distance_count()
    );
    Ok(graph)
}

/// Build the package table from package rows
pub fn load_packages(rows: &[PackageRow]) -> Result<PackageTable, HubError> {
    let max_id = rows.iter().map(|row| row.id as usize).max().unwrap_or(0);
    let mut table = PackageTable::with_capacity(max_id);

    for row in rows {
        table.insert(
            row.id,
            &row.address,
            &row.zip,
            &row.deadline,
            row.weight,
            &row.notes,
        )?;
    }

    info!("Loaded {} packages", table.len());
    Ok(table)
}

/// Decode hub data from JSON and build the graph and package table
pub fn init_hub_from_json(json: &str) -> Result<(LocationGraph, PackageTable), HubError> {
    let data: HubData = serde_json::from_str(json)?;
    let graph = load_locations(&data.locations)?;
    let packages = load_packages(&data.packages)?;
    Ok((graph, packages))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "locations": [
            {"label": "HUB", "name": "Hub", "address": "4001 S 700 E", "zip": "84107", "distances": [0.0]},
            {"label": "A", "name": "Stop A", "address": "10 A St", "zip": "84111", "distances": [3.0, 0.0]},
            {"label": "B", "name": "Stop B", "address": "20 B St", "zip": "84115", "distances": [5.0, 2.0, 0.0]}
        ],
        "packages": [
            {"id": 1, "address": "A", "zip": "84111", "deadline": "10:30 AM", "weight": 2.0},
            {"id": 2, "address": "B", "zip": "84115", "deadline": "EOD", "weight": 5.0, "notes": "Can only be on truck 2"}
        ]
    }"#;

    #[test]
    fn test_init_hub_from_json() {
        let (graph, packages) = init_hub_from_json(SAMPLE).unwrap();

        let a = graph.get_location("A").unwrap();
        let b = graph.get_location("B").unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get_distance(Some(graph.depot()), Some(a)), Some(3.0));
        assert_eq!(graph.get_distance(Some(b), Some(a)), Some(2.0));
        assert_eq!(graph.get_distance(Some(b), Some(graph.depot())), Some(5.0));

        assert_eq!(packages.len(), 2);
        assert_eq!(packages.look_up(2).unwrap().notes, "Can only be on truck 2");
    }

    #[test]
    fn test_missing_depot() {
        assert!(matches!(load_locations(&[]), Err(HubError::MissingDepot)));
    }

    #[test]
    fn test_short_distance_row_leaves_edge_missing() {
        let rows: HubData = serde_json::from_str(
            r#"{
                "locations": [
                    {"label": "HUB", "name": "Hub", "address": "1", "zip": "1"},
                    {"label": "A", "name": "A", "address": "2", "zip": "2", "distances": [1.0]},
                    {"label": "B", "name": "B", "address": "3", "zip": "3", "distances": [4.0]}
                ],
                "packages": []
            }"#,
        )
        .unwrap();

        let graph = load_locations(&rows.locations).unwrap();
        let a = graph.get_location("A").unwrap();
        let b = graph.get_location("B").unwrap();
        assert_eq!(graph.get_distance(Some(a), Some(b)), None);
        assert_eq!(graph.get_distance(Some(graph.depot()), Some(b)), Some(4.0));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            init_hub_from_json("{\"locations\": 3}"),
            Err(HubError::Parse(_))
        ));
    }
}
