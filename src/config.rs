// Hub configuration

use serde::Deserialize;

use crate::error::HubError;
use crate::utils::clock::Clock;

/// Fleet and schedule settings for a hub run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Number of trucks, numbered from 1
    pub truck_count: u32,

    /// Average truck speed in distance units per hour
    pub truck_speed: f64,

    /// Packages per truck
    pub truck_capacity: usize,

    /// Earliest departure for every truck
    pub opening_time: Clock,

    /// Deadlines before this time count as early
    pub early_deadline_cutoff: Clock,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            truck_count: 2,
            truck_speed: 18.0,
            truck_capacity: 16,
            opening_time: Clock::from_hours(8.0),
            early_deadline_cutoff: Clock::from_hours(11.0),
        }
    }
}

impl HubConfig {
    /// Parse a configuration from JSON, filling gaps with defaults
    pub fn from_json(json: &str) -> Result<Self, HubError> {
        let config: HubConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), HubError> {
        if self.truck_count == 0 {
            return Err(HubError::InvalidConfig("truck_count must be at least 1".into()));
        }
        if !(self.truck_speed.is_finite() && self.truck_speed > 0.0) {
            return Err(HubError::InvalidConfig(format!(
                "truck_speed must be positive, got {}",
                self.truck_speed
            )));
        }
        if self.truck_capacity == 0 {
            return Err(HubError::InvalidConfig(
                "truck_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HubConfig::default();
        assert_eq!(config.truck_count, 2);
        assert_eq!(config.truck_capacity, 16);
        assert_eq!(config.opening_time.to_string(), "08:00 AM");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config =
            HubConfig::from_json(r#"{"truck_count": 3, "opening_time": "7:30 AM"}"#).unwrap();
        assert_eq!(config.truck_count, 3);
        assert_eq!(config.opening_time.hours(), 7.5);
        assert_eq!(config.truck_speed, 18.0);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert!(matches!(
            HubConfig::from_json(r#"{"truck_speed": 0.0}"#),
            Err(HubError::InvalidConfig(_))
        ));
        assert!(matches!(
            HubConfig::from_json(r#"{"opening_time": "soon"}"#),
            Err(HubError::Parse(_))
        ));
    }
}
