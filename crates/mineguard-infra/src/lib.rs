//! Infrastructure layer - scenario files, batch encoding, TCP framing

pub mod persistence;
pub mod transport;
