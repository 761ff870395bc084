//! Error types for mineguard

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

/// Fleet setup errors, raised while building a fleet from a scenario
#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("Unknown waypoint: {0}")]
    UnknownWaypoint(String),

    #[error("Duplicate vehicle id: {0}")]
    DuplicateVehicle(String),

    #[error("Unknown vehicle category: {0}")]
    UnknownCategory(String),

    #[error("Unknown cycle state: {0}")]
    UnknownCycleState(String),

    #[error("Vehicle {vehicle} starts at waypoint index {index} but its route has {len} waypoints")]
    WaypointIndexOutOfRange {
        vehicle: String,
        index: usize,
        len: usize,
    },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Scenario file error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Scenario encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, Error>;
