//! Application service layer - config, tick driver, output sinks

pub mod config;
pub mod repository;
pub mod simulation;
pub mod sink;
