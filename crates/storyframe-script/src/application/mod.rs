//! Application layer for script decomposition.

pub mod decompose;
