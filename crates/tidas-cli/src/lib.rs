//! CLI library components for the TIDAS dataset update workflow.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod repository;
pub mod types;
