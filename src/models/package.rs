// Package model with delivery status tracking

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::HubError;
use crate::models::{Instructions, PackageId, TruckId};
use crate::utils::clock::Clock;

/// Delivery status of a package. Moves forward only:
/// `AtHub -> InRoute -> Delivered`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryStatus {
    AtHub,
    InRoute,
    Delivered,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeliveryStatus::AtHub => "At Hub",
            DeliveryStatus::InRoute => "In Route",
            DeliveryStatus::Delivered => "Delivered",
        };
        f.write_str(text)
    }
}

/// Represents a package waiting at, or leaving from, the hub
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Unique package ID
    pub id: PackageId,

    /// Delivery address, matched against location labels
    pub address: String,

    /// Postal code of the delivery address
    pub zip: String,

    /// Deadline as hours since midnight, end of day is 24.0
    pub deadline: Clock,

    /// Mass of the package
    pub weight: f64,

    /// Free-text special instructions
    pub notes: String,

    status: DeliveryStatus,

    /// Truck the package was loaded on
    truck: Option<TruckId>,

    /// Departure time of the trip that carried the package
    departed_at: Option<Clock>,

    /// Delivery timestamp, unset until delivered
    delivered_at: Option<Clock>,
}

impl Package {
    /// Creates a new package at the hub
    pub fn new<S: Into<String>>(
        id: PackageId,
        address: S,
        zip: S,
        deadline: Clock,
        weight: f64,
        notes: S,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            zip: zip.into(),
            deadline,
            weight,
            notes: notes.into(),
            status: DeliveryStatus::AtHub,
            truck: None,
            departed_at: None,
            delivered_at: None,
        }
    }

    pub fn status(&self) -> DeliveryStatus {
        self.status
    }

    pub fn truck(&self) -> Option<TruckId> {
        self.truck
    }

    pub fn departed_at(&self) -> Option<Clock> {
        self.departed_at
    }

    pub fn delivered_at(&self) -> Option<Clock> {
        self.delivered_at
    }

    /// Parsed special instructions
    pub fn instructions(&self) -> Instructions {
        Instructions::parse(&self.notes)
    }

    /// Marks the package as loaded on a truck
    pub fn mark_in_route(&mut self, truck_id: TruckId) -> Result<(), HubError> {
        self.advance(DeliveryStatus::AtHub, DeliveryStatus::InRoute)?;
        self.truck = Some(truck_id);
        Ok(())
    }

    /// Marks the package as delivered at the given time
    pub fn mark_delivered(&mut self, departed_at: Clock, delivered_at: Clock) -> Result<(), HubError> {
        self.advance(DeliveryStatus::InRoute, DeliveryStatus::Delivered)?;
        self.departed_at = Some(departed_at);
        self.delivered_at = Some(delivered_at);
        Ok(())
    }

    fn advance(&mut self, expected: DeliveryStatus, next: DeliveryStatus) -> Result<(), HubError> {
        if self.status != expected {
            return Err(HubError::InvalidTransition {
                id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Amends the address and zip, appending to the notes so earlier
    /// instructions are kept. Status is left untouched.
    pub fn correct_info<S: Into<String>>(&mut self, address: S, zip: S, note: &str) {
        self.address = address.into();
        self.zip = zip.into();
        if !note.is_empty() {
            if !self.notes.is_empty() {
                self.notes.push_str("; ");
            }
            self.notes.push_str(note);
        }
    }

    /// Status as it was at the given clock time
    pub fn status_at(&self, time: Clock) -> DeliveryStatus {
        match (self.departed_at, self.delivered_at) {
            (_, Some(delivered)) if delivered <= time => DeliveryStatus::Delivered,
            (Some(departed), _) if departed <= time => DeliveryStatus::InRoute,
            _ => DeliveryStatus::AtHub,
        }
    }

    /// Delivered after the deadline
    pub fn is_late(&self) -> bool {
        self.delivered_at
            .map_or(false, |delivered| delivered > self.deadline)
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Package {}: {} {} due {} ({})",
            self.id, self.address, self.zip, self.deadline, self.status
        )?;
        if let Some(delivered) = self.delivered_at {
            write!(f, " at {}", delivered)?;
        }
        Ok(())
    }
}
