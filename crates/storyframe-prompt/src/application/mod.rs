//! Application layer for the prompt context.

pub mod compose;
pub mod enrichment;
