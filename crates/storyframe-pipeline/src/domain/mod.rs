//! Domain layer for the storyboard pipeline.

pub mod assembler;
pub mod auditor;
pub mod commands;
