//! riser CLI Library
//!
//! Core modules for the riser command-line client.

pub mod commands;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod installer;
pub mod logs;
pub mod notify;
pub mod status;
pub mod steps;
pub mod storage;
pub mod ui;
pub mod utils;
