// Special delivery instructions parsed out of free-text package notes

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{PackageId, TruckId};
use crate::utils::clock::Clock;

// Only the comma-separated ID list; text appended after it is not part of the group
static CO_DELIVERY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*must be delivered with\s+(\d+(?:\s*,\s*\d+)*)").expect("valid regex")
});

static PINNED_TRUCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)can only be on truck\s+(\d+)").expect("valid regex"));

static AVAILABLE_AT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:until|available at|corrected at)\s+(\d{1,2}:\d{2}\s*(?:[ap]m)?)")
        .expect("valid regex")
});

static WRONG_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)wrong address").expect("valid regex"));

static CORRECTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)corrected").expect("valid regex"));

static PACKAGE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Dispatch-relevant view of a package's notes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Instructions {
    /// Packages that must ride on the same truck
    pub co_delivery: Vec<PackageId>,

    /// Truck the package is restricted to
    pub pinned_truck: Option<TruckId>,

    /// Earliest time the package can leave the hub
    pub available_at: Option<Clock>,

    /// The listed address is wrong and no correction has been applied yet
    pub awaiting_correction: bool,
}

impl Instructions {
    /// Parses package notes
    pub fn parse(notes: &str) -> Self {
        let co_delivery = CO_DELIVERY
            .captures(notes)
            .map(|caps| {
                PACKAGE_ID
                    .find_iter(&caps[1])
                    .filter_map(|m| m.as_str().parse::<PackageId>().ok())
                    .collect()
            })
            .unwrap_or_default();

        let pinned_truck = PINNED_TRUCK
            .captures(notes)
            .and_then(|caps| caps[1].parse::<TruckId>().ok());

        // Later of a delay and a correction time wins
        let available_at = AVAILABLE_AT
            .captures_iter(notes)
            .filter_map(|caps| Clock::parse(&caps[1]).ok())
            .reduce(Clock::max);

        let awaiting_correction = WRONG_ADDRESS.is_match(notes) && !CORRECTED.is_match(notes);

        Self {
            co_delivery,
            pinned_truck,
            available_at,
            awaiting_correction,
        }
    }

    /// Whether the notes carry nothing dispatch cares about
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the given truck may carry the package
    pub fn allows_truck(&self, truck_id: TruckId) -> bool {
        self.pinned_truck.map_or(true, |pinned| pinned == truck_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_co_delivery_group() {
        let parsed = Instructions::parse("Must be delivered with 15, 19");
        assert_eq!(parsed.co_delivery, vec![15, 19]);
        assert_eq!(parsed.pinned_truck, None);
    }

    #[test]
    fn test_co_delivery_ignores_appended_notes() {
        let parsed = Instructions::parse("Must be delivered with 15, 19; corrected at 10:20 am");
        assert_eq!(parsed.co_delivery, vec![15, 19]);
        assert!(parsed.available_at.is_some());

        let parsed = Instructions::parse("Must be delivered with 13,15 until 9:05 am");
        assert_eq!(parsed.co_delivery, vec![13, 15]);
    }

    #[test]
    fn test_co_delivery_must_lead() {
        let parsed = Instructions::parse("Fragile. Must be delivered with 15");
        assert!(parsed.co_delivery.is_empty());
    }

    #[test]
    fn test_pinned_truck() {
        let parsed = Instructions::parse("Can only be on truck 2");
        assert_eq!(parsed.pinned_truck, Some(2));
        assert!(parsed.allows_truck(2));
        assert!(!parsed.allows_truck(1));
    }

    #[test]
    fn test_delayed_package() {
        let parsed = Instructions::parse("Delayed on flight---will not arrive to depot until 9:05 am");
        let available = parsed.available_at.unwrap();
        assert!((available.hours() - (9.0 + 5.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_wrong_address_until_corrected() {
        let parsed = Instructions::parse("Wrong address listed");
        assert!(parsed.awaiting_correction);
        assert_eq!(parsed.available_at, None);

        let parsed = Instructions::parse("Wrong address listed; corrected at 10:20 am");
        assert!(!parsed.awaiting_correction);
        assert!((parsed.available_at.unwrap().hours() - (10.0 + 20.0 / 60.0)).abs() < 1e-9);
    }

    #[test]
    fn test_plain_notes() {
        assert!(Instructions::parse("").is_plain());
        assert!(Instructions::parse("Leave at back door").is_plain());
    }
}
