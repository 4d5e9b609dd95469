//! Domain layer for continuity tracking.

pub mod extraction;
pub mod lexicon;
pub mod palette;
pub mod registry;
