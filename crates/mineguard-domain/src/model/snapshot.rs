//! Read-only view of a vehicle as consumed by the proximity engine

use mineguard_types::{Position, VehicleCategory};
use serde::{Deserialize, Serialize};

use crate::model::{CategorySpec, Vehicle};
use crate::service::geo;

/// What the proximity engine needs to know about a vehicle each tick
pub trait KinematicSnapshot {
    fn id(&self) -> &str;

    fn category(&self) -> VehicleCategory;

    fn position(&self) -> Position;

    /// km/h
    fn speed(&self) -> f64;

    /// Degrees clockwise from north
    fn heading(&self) -> f64;

    fn is_active(&self) -> bool;

    /// Meters
    fn safety_radius(&self) -> f64 {
        CategorySpec::for_category(self.category()).safety_radius
    }

    /// Constant-velocity position `seconds_ahead` from now
    fn predict_position(&self, seconds_ahead: f64) -> Position {
        geo::project(&self.position(), self.speed(), self.heading(), seconds_ahead)
    }
}

impl KinematicSnapshot for Vehicle {
    fn id(&self) -> &str {
        Vehicle::id(self)
    }

    fn category(&self) -> VehicleCategory {
        Vehicle::category(self)
    }

    fn position(&self) -> Position {
        *Vehicle::position(self)
    }

    fn speed(&self) -> f64 {
        Vehicle::speed(self)
    }

    fn heading(&self) -> f64 {
        Vehicle::heading(self)
    }

    fn is_active(&self) -> bool {
        Vehicle::is_active(self)
    }

    fn safety_radius(&self) -> f64 {
        Vehicle::safety_radius(self)
    }

    fn predict_position(&self, seconds_ahead: f64) -> Position {
        Vehicle::predict_position(self, seconds_ahead)
    }
}

/// Owned per-tick vehicle state, as supplied by navigation
///
/// Fields are taken as given. Unlike [`Vehicle`], speed is not clamped to
/// the category maximum and heading is not normalized, so a snapshot can
/// describe motion no real vehicle of its category reaches. Build one from a
/// [`Vehicle`] to get the kinematic limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSnapshot {
    pub id: String,
    pub category: VehicleCategory,
    pub position: Position,
    pub speed: f64,
    pub heading: f64,
    pub payload: f64,
    pub fuel_level: f64,
    pub active: bool,
}

impl VehicleSnapshot {
    /// Active snapshot with empty payload and a full tank
    pub fn new(
        id: impl Into<String>,
        category: VehicleCategory,
        position: Position,
        speed: f64,
        heading: f64,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            position,
            speed,
            heading,
            payload: 0.0,
            fuel_level: 100.0,
            active: true,
        }
    }
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        let telemetry = vehicle.telemetry();
        Self {
            id: vehicle.id().to_string(),
            category: vehicle.category(),
            position: *vehicle.position(),
            speed: telemetry.speed,
            heading: telemetry.heading,
            payload: telemetry.payload,
            fuel_level: telemetry.fuel_level,
            active: vehicle.is_active(),
        }
    }
}

impl KinematicSnapshot for VehicleSnapshot {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> VehicleCategory {
        self.category
    }

    fn position(&self) -> Position {
        self.position
    }

    fn speed(&self) -> f64 {
        self.speed
    }

    fn heading(&self) -> f64 {
        self.heading
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
