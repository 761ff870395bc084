//! Static per-category vehicle specifications

use mineguard_types::VehicleCategory;
use serde::{Deserialize, Serialize};

/// Performance and physical constants of one vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// km/h
    pub max_speed: f64,
    /// Tonnes (0 for vehicles that do not carry load)
    pub max_payload: f64,
    /// Liters
    pub fuel_capacity: f64,
    /// Liters per hour at full load factor
    pub fuel_burn_rate: f64,
    /// Half of the minimum separation this vehicle requires, meters
    pub safety_radius: f64,
    pub length: f64,
    pub width: f64,
}

impl CategorySpec {
    /// Zero-capability spec for a category with no table entry
    pub const FALLBACK: CategorySpec = CategorySpec {
        max_speed: 0.0,
        max_payload: 0.0,
        fuel_capacity: 0.0,
        fuel_burn_rate: 0.0,
        safety_radius: 0.0,
        length: 0.0,
        width: 0.0,
    };

    pub const fn for_category(category: VehicleCategory) -> CategorySpec {
        match category {
            // CAT 793 class
            VehicleCategory::HaulTruck => CategorySpec {
                max_speed: 45.0,
                max_payload: 220.0,
                fuel_capacity: 3800.0,
                fuel_burn_rate: 180.0,
                safety_radius: 30.0,
                length: 13.0,
                width: 8.0,
            },
            VehicleCategory::Excavator => CategorySpec {
                max_speed: 5.0,
                max_payload: 0.0,
                fuel_capacity: 2500.0,
                fuel_burn_rate: 120.0,
                safety_radius: 25.0,
                length: 15.0,
                width: 7.0,
            },
            VehicleCategory::LightVehicle => CategorySpec {
                max_speed: 60.0,
                max_payload: 0.0,
                fuel_capacity: 80.0,
                fuel_burn_rate: 12.0,
                safety_radius: 10.0,
                length: 5.0,
                width: 2.2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hauler_spec() {
        let spec = CategorySpec::for_category(VehicleCategory::HaulTruck);
        assert_eq!(spec.max_speed, 45.0);
        assert_eq!(spec.safety_radius, 30.0);
        assert_eq!(spec.max_payload, 220.0);
    }

    #[test]
    fn test_only_haulers_carry_payload() {
        for category in VehicleCategory::ALL {
            let spec = CategorySpec::for_category(category);
            assert_eq!(
                spec.max_payload > 0.0,
                category == VehicleCategory::HaulTruck
            );
        }
    }

    #[test]
    fn test_fallback_has_no_capability() {
        let spec = CategorySpec::FALLBACK;
        assert_eq!(spec.max_speed, 0.0);
        assert_eq!(spec.safety_radius, 0.0);
        assert_eq!(spec.fuel_capacity, 0.0);
    }
}
