//! Domain layer for the prompt context.

pub mod composer;
pub mod rules;
