//! Mine fleet domain: vehicle kinematics, pairwise collision prediction and
//! haul-cycle navigation

pub mod model;
pub mod repository;
pub mod service;
