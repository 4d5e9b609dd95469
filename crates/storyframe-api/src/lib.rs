//! Storyframe — HTTP transport for the storyboard generator.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;
