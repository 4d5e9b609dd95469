//! Application layer for the storyboard pipeline.

pub mod command_handlers;
