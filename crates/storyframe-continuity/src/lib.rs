//! Storyframe Continuity — the request-scoped registry of characters,
//! environments and visual motifs.
//!
//! Responsible for entity extraction, alias resolution, descriptor drift
//! detection and deterministic colour palettes.

pub mod application;
pub mod domain;
