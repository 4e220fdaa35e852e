//! HTTP client for the riser API

pub mod apps;
pub mod client;
pub mod deployments;
pub mod environments;
pub mod namespaces;
pub mod rollouts;
pub mod secrets;

pub use client::ApiClient;
