//! Application layer for continuity tracking.

pub mod tracker;
