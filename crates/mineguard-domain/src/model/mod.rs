//! Domain model types

pub mod category;
pub mod layout;
pub mod scenario;
pub mod snapshot;
pub mod vehicle;

pub use category::CategorySpec;
pub use layout::{MineLayout, Route};
pub use scenario::{Scenario, VehicleSetup, WaypointDef};
pub use snapshot::{KinematicSnapshot, VehicleSnapshot};
pub use vehicle::Vehicle;
