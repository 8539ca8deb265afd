// Package store addressed directly by package ID

use crate::error::HubError;
use crate::models::{DeliveryStatus, Package, PackageId};
use crate::utils::clock::Clock;

/// Largest package ID the table will hold. IDs are slot indexes, so this
/// caps the slot vector.
pub const MAX_PACKAGE_ID: PackageId = 100_000;

/// Keyed store of package records.
///
/// The ID is the slot index, so lookup and insert are O(1). The slot
/// vector grows when an ID beyond the current size is inserted.
#[derive(Debug, Clone, Default)]
pub struct PackageTable {
    slots: Vec<Option<Package>>,
}

impl PackageTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with slots for IDs up to `max_id`, capped at
    /// `MAX_PACKAGE_ID`
    pub fn with_capacity(max_id: usize) -> Self {
        Self {
            slots: vec![None; max_id.min(MAX_PACKAGE_ID as usize) + 1],
        }
    }

    /// Builds a package at the hub and stores it, replacing any record
    /// with the same ID
    pub fn insert(
        &mut self,
        id: PackageId,
        address: &str,
        zip: &str,
        deadline: &str,
        weight: f64,
        notes: &str,
    ) -> Result<(), HubError> {
        let deadline = Clock::parse(deadline)?;
        self.insert_package(Package::new(id, address, zip, deadline, weight, notes))
    }

    /// Stores a prebuilt package record
    pub fn insert_package(&mut self, package: Package) -> Result<(), HubError> {
        if package.id == 0 || package.id > MAX_PACKAGE_ID {
            return Err(HubError::InvalidPackageId);
        }
        let index = package.id as usize;
        if index >= self.slots.len() {
            self.slots.resize(index + 1, None);
        }
        self.slots[index] = Some(package);
        Ok(())
    }

    /// Gets the package with the given ID
    pub fn look_up(&self, id: PackageId) -> Option<&Package> {
        self.slots.get(id as usize).and_then(Option::as_ref)
    }

    /// Gets the package with the given ID for modification
    pub fn look_up_mut(&mut self, id: PackageId) -> Option<&mut Package> {
        self.slots.get_mut(id as usize).and_then(Option::as_mut)
    }

    /// Replaces a stored record. Returns false, changing nothing, if no
    /// record with that ID exists
    pub fn update(&mut self, package: Package) -> bool {
        match self.look_up_mut(package.id) {
            Some(slot) => {
                *slot = package;
                true
            }
            None => false,
        }
    }

    /// Removes a record, freeing its slot
    pub fn remove(&mut self, id: PackageId) -> Option<Package> {
        self.slots.get_mut(id as usize).and_then(Option::take)
    }

    /// Live records in ID order
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.slots.iter().flatten()
    }

    /// Live IDs in ID order
    pub fn ids(&self) -> Vec<PackageId> {
        self.iter().map(|package| package.id).collect()
    }

    /// Number of live records
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Number of records currently in the given status
    pub fn count_with_status(&self, status: DeliveryStatus) -> usize {
        self.iter()
            .filter(|package| package.status() == status)
            .count()
    }
}
