//! Domain services

pub mod fleet;
pub mod geo;
pub mod proximity;

pub use fleet::{Fleet, NavigationState};
pub use proximity::{assess_pair, classify, PairAssessment, ProximityEngine};
