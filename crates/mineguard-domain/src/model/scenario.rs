//! Fleet setup description, as loaded from a scenario file

use serde::{Deserialize, Serialize};

/// Waypoints plus the vehicles placed on them.
///
/// An empty waypoint list means the built-in pit layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub waypoints: Vec<WaypointDef>,

    #[serde(default)]
    pub vehicles: Vec<VehicleSetup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaypointDef {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
}

/// Initial state of one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSetup {
    pub id: String,

    /// Category tag, e.g. `haul_truck`, `excavator`, `light_vehicle`
    pub category: String,

    /// Starting waypoint name
    pub start: String,

    /// Waypoint names to follow; empty for a vehicle that stays put
    #[serde(default)]
    pub route: Vec<String>,

    /// Index into `route` of the first waypoint to head for
    #[serde(default)]
    pub waypoint_index: usize,

    /// `idle`, `loading`, `hauling`, `dumping` or `returning`
    #[serde(default)]
    pub cycle_state: Option<String>,

    /// km/h
    #[serde(default)]
    pub target_speed: f64,

    /// Initial speed in km/h
    #[serde(default)]
    pub speed: f64,

    /// Explicit initial heading; otherwise faces the first waypoint
    #[serde(default)]
    pub heading: Option<f64>,

    /// Seconds of loading/dumping left before moving off
    #[serde(default)]
    pub wait_seconds: f64,

    /// Meters; defaults per category
    #[serde(default)]
    pub arrival_threshold: Option<f64>,

    /// Tonnes
    #[serde(default)]
    pub payload: f64,

    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_vehicle_defaults() {
        let text = r#"
            [[vehicles]]
            id = "HT-900"
            category = "haul_truck"
            start = "PIT_LOAD_1"
        "#;
        let scenario: Scenario = toml::from_str(text).unwrap();
        assert!(scenario.waypoints.is_empty());
        let v = &scenario.vehicles[0];
        assert_eq!(v.id, "HT-900");
        assert!(v.route.is_empty());
        assert_eq!(v.target_speed, 0.0);
        assert!(v.heading.is_none());
        assert!(v.active);
    }
}
