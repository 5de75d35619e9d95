//! Fleet configuration.

use fleet_core::{TimeOfDay, Truck};

/// Fleet-wide settings for one simulated day.
///
/// Typically built in code (or deserialized with the `serde` feature) by the
/// application and handed to [`SimBuilder`](crate::SimBuilder).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleetConfig {
    /// Number of trucks.  Ids run `1..=truck_count`.  Default: 2.
    pub truck_count: u16,

    /// Average truck speed in miles per hour.  Default: 18.
    pub speed_mph: f64,

    /// Packages per truck.  Default: 16.
    pub capacity: usize,

    /// Address of the depot node in the distance graph.  Default: `"HUB"`.
    pub hub_address: String,

    /// Nothing leaves the hub before this time.  Default: 08:00.
    pub opening_time: TimeOfDay,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            truck_count:  2,
            speed_mph:    Truck::DEFAULT_SPEED_MPH,
            capacity:     Truck::DEFAULT_CAPACITY,
            hub_address:  "HUB".to_string(),
            opening_time: TimeOfDay::from_hm(8, 0),
        }
    }
}
