// Location model representing a delivery address on the distance graph

use serde::{Deserialize, Serialize};

/// Represents a delivery location, identified by its short label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Unique short label, usually the normalised street address
    pub label: String,

    /// Display name
    pub name: String,

    /// Street address
    pub address: String,

    pub city: String,

    pub state: String,

    /// Postal code
    pub zip: String,
}

impl Location {
    /// Creates a new location with the given label, name, address and zip
    pub fn new<S: Into<String>>(label: S, name: S, address: S, zip: S) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
            address: address.into(),
            city: String::new(),
            state: String::new(),
            zip: zip.into(),
        }
    }

    /// Sets the city and state of this location
    pub fn with_city<S: Into<String>>(mut self, city: S, state: S) -> Self {
        self.city = city.into();
        self.state = state.into();
        self
    }

    /// Full postal address
    pub fn full_address(&self) -> String {
        let mut out = self.address.clone();
        if !self.city.is_empty() {
            out.push_str(", ");
            out.push_str(&self.city);
        }
        if !self.state.is_empty() {
            out.push_str(", ");
            out.push_str(&self.state);
        }
        if !self.zip.is_empty() {
            out.push(' ');
            out.push_str(&self.zip);
        }
        out
    }
}
