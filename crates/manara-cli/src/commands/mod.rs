//! Command handlers

pub mod config;
pub mod content;
pub mod serve;
pub mod snapshot;
pub mod status;
