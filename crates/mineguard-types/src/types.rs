//! Shared data records
//!
//! Units are fixed across the workspace: speed in km/h, distances in meters,
//! time in seconds, fuel as a 0-100 percentage, angles in degrees clockwise
//! from north, positions in decimal degrees with altitude in meters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters; carried through motion unchanged
    pub altitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
        }
    }
}

/// Live telemetry of one vehicle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// km/h
    pub speed: f64,
    /// Degrees in [0, 360), 0 = north
    pub heading: f64,
    /// Tonnes
    pub payload: f64,
    /// Percentage 0-100
    pub fuel_level: f64,
    pub engine_rpm: f64,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            speed: 0.0,
            heading: 0.0,
            payload: 0.0,
            fuel_level: 100.0,
            engine_rpm: 800.0,
        }
    }
}

/// Returned when a wire code does not name a known variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownCode(pub u8);

impl fmt::Display for UnknownCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown code {}", self.0)
    }
}

impl std::error::Error for UnknownCode {}

/// Vehicle category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum VehicleCategory {
    HaulTruck,
    Excavator,
    LightVehicle,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 3] = [
        VehicleCategory::HaulTruck,
        VehicleCategory::Excavator,
        VehicleCategory::LightVehicle,
    ];

    pub fn code(self) -> u8 {
        match self {
            VehicleCategory::HaulTruck => 0,
            VehicleCategory::Excavator => 1,
            VehicleCategory::LightVehicle => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleCategory::HaulTruck => "HaulTruck",
            VehicleCategory::Excavator => "Excavator",
            VehicleCategory::LightVehicle => "LightVehicle",
        }
    }
}

impl From<VehicleCategory> for u8 {
    fn from(category: VehicleCategory) -> Self {
        category.code()
    }
}

impl TryFrom<u8> for VehicleCategory {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(UnknownCode(code))
    }
}

impl FromStr for VehicleCategory {
    type Err = String;

    /// Accepts scenario-file tags such as `haul_truck`, `excavator`, `light_vehicle`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "haultruck" | "hauler" => Ok(VehicleCategory::HaulTruck),
            "excavator" => Ok(VehicleCategory::Excavator),
            "lightvehicle" | "lv" => Ok(VehicleCategory::LightVehicle),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Haul cycle state, owned by navigation and passed through telemetry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum CycleState {
    #[default]
    Idle,
    Loading,
    Hauling,
    Dumping,
    Returning,
}

impl CycleState {
    pub fn code(self) -> u8 {
        match self {
            CycleState::Idle => 0,
            CycleState::Loading => 1,
            CycleState::Hauling => 2,
            CycleState::Dumping => 3,
            CycleState::Returning => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CycleState::Idle => "IDLE",
            CycleState::Loading => "LOADING",
            CycleState::Hauling => "HAULING",
            CycleState::Dumping => "DUMPING",
            CycleState::Returning => "RETURNING",
        }
    }
}

impl From<CycleState> for u8 {
    fn from(state: CycleState) -> Self {
        state.code()
    }
}

impl TryFrom<u8> for CycleState {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(CycleState::Idle),
            1 => Ok(CycleState::Loading),
            2 => Ok(CycleState::Hauling),
            3 => Ok(CycleState::Dumping),
            4 => Ok(CycleState::Returning),
            other => Err(UnknownCode(other)),
        }
    }
}

impl FromStr for CycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "idle" => Ok(CycleState::Idle),
            "loading" => Ok(CycleState::Loading),
            "hauling" => Ok(CycleState::Hauling),
            "dumping" => Ok(CycleState::Dumping),
            "returning" => Ok(CycleState::Returning),
            _ => Err(s.to_string()),
        }
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert severity, ordered from `None` (no risk) up to `Critical`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum AlertSeverity {
    #[default]
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl AlertSeverity {
    /// Severity for a closest approach reached `tti` seconds from now
    pub fn from_time_to_impact(tti: f64) -> Self {
        if tti < 3.0 {
            AlertSeverity::Critical
        } else if tti < 5.0 {
            AlertSeverity::High
        } else if tti < 10.0 {
            AlertSeverity::Medium
        } else if tti < 15.0 {
            AlertSeverity::Low
        } else {
            AlertSeverity::None
        }
    }

    pub fn code(self) -> u8 {
        match self {
            AlertSeverity::None => 0,
            AlertSeverity::Low => 1,
            AlertSeverity::Medium => 2,
            AlertSeverity::High => 3,
            AlertSeverity::Critical => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::None => "NONE",
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
            AlertSeverity::Critical => "CRITICAL",
        }
    }
}

impl From<AlertSeverity> for u8 {
    fn from(severity: AlertSeverity) -> Self {
        severity.code()
    }
}

impl TryFrom<u8> for AlertSeverity {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AlertSeverity::None),
            1 => Ok(AlertSeverity::Low),
            2 => Ok(AlertSeverity::Medium),
            3 => Ok(AlertSeverity::High),
            4 => Ok(AlertSeverity::Critical),
            other => Err(UnknownCode(other)),
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Encounter geometry derived from the two headings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum AlertClass {
    /// Head-on
    Approach,
    Crossing,
    /// Same direction
    Tailgating,
    BlindSpot,
}

impl AlertClass {
    pub fn code(self) -> u8 {
        match self {
            AlertClass::Approach => 0,
            AlertClass::Crossing => 1,
            AlertClass::Tailgating => 2,
            AlertClass::BlindSpot => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertClass::Approach => "APPROACH",
            AlertClass::Crossing => "CROSSING",
            AlertClass::Tailgating => "TAILGATING",
            AlertClass::BlindSpot => "BLIND_SPOT",
        }
    }
}

impl From<AlertClass> for u8 {
    fn from(class: AlertClass) -> Self {
        class.code()
    }
}

impl TryFrom<u8> for AlertClass {
    type Error = UnknownCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AlertClass::Approach),
            1 => Ok(AlertClass::Crossing),
            2 => Ok(AlertClass::Tailgating),
            3 => Ok(AlertClass::BlindSpot),
            other => Err(UnknownCode(other)),
        }
    }
}

impl fmt::Display for AlertClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Collision risk between two vehicles, produced fresh every tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollisionAlert {
    /// Vehicle discovered first (lower fleet index)
    pub vehicle_id_1: String,
    pub vehicle_id_2: String,
    #[serde(rename = "priority")]
    pub severity: AlertSeverity,
    #[serde(rename = "alert_type")]
    pub class: AlertClass,
    /// Seconds; 0 when the pair is already inside the safety envelope
    pub time_to_impact: f64,
    /// Minimum predicted separation in meters
    pub distance: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

/// Outbound telemetry record for one vehicle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryPacket {
    pub vehicle_id: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub vehicle_type: VehicleCategory,
    pub cycle_state: CycleState,
    pub position: Position,
    pub telemetry: Telemetry,
}

/// One tick worth of telemetry and alerts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPacket {
    pub telemetry: Vec<TelemetryPacket>,
    pub alerts: Vec<CollisionAlert>,
}
