//! Deployment helpers

pub mod wait;
