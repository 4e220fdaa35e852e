//! Deployment status resolution

pub mod revisions;
