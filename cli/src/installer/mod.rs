//! Platform installation

pub mod bootstrap;
pub mod status;
